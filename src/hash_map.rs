use core::fmt::Debug;

use bytemuck::Pod;
use bytemuck::Zeroable;

use crate::error::TableError;
use crate::hash_table::HashTable;
use crate::hasher::KeyHasher;
use crate::hasher::MixHasher;
use crate::record::Pair;

/// A hash map implemented on top of [`HashTable`], storing `(key, value)`
/// records inline.
///
/// `HashMap<K, V, H>` inherits the table's requirements: keys are [`Pod`] and
/// compared by their bytes, values are [`Zeroable`] and `Copy`, and a fresh
/// value starts out zeroed. For payloads that need destructors or heap data,
/// store an index into caller-owned storage instead.
#[derive(Clone)]
pub struct HashMap<K, V, H = MixHasher> {
    table: HashTable<Pair<K, V>, H>,
}

impl<K, V, H> Debug for HashMap<K, V, H>
where
    K: Pod + Debug,
    V: Zeroable + Copy + Debug,
    H: KeyHasher,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V> HashMap<K, V, MixHasher>
where
    K: Pod,
    V: Zeroable + Copy,
{
    /// Creates a map with exactly `slots` slots.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_table::HashMap;
    /// #
    /// let map: HashMap<u32, f32> = HashMap::with_capacity(64)?;
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 64);
    /// # Ok::<(), slot_table::TableError>(())
    /// ```
    pub fn with_capacity(slots: usize) -> Result<Self, TableError> {
        Self::with_capacity_and_hasher(slots, MixHasher)
    }

    /// Creates a map that holds `max_items` entries without growing.
    pub fn for_max_items(max_items: usize) -> Result<Self, TableError> {
        Self::for_max_items_and_hasher(max_items, MixHasher)
    }
}

impl<K, V, H> HashMap<K, V, H>
where
    K: Pod,
    V: Zeroable + Copy,
    H: KeyHasher,
{
    /// Creates a map with exactly `slots` slots and the given hasher.
    pub fn with_capacity_and_hasher(slots: usize, hasher: H) -> Result<Self, TableError> {
        Ok(Self {
            table: HashTable::with_capacity_and_hasher(slots, hasher)?,
        })
    }

    /// Creates a map that holds `max_items` entries without growing, using the
    /// given hasher.
    pub fn for_max_items_and_hasher(max_items: usize, hasher: H) -> Result<Self, TableError> {
        Ok(Self {
            table: HashTable::for_max_items_and_hasher(max_items, hasher)?,
        })
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Removes all entries, keeping the capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Reserves room for `additional` more entries without growing.
    pub fn reserve(&mut self, additional: usize) -> Result<(), TableError> {
        self.table.reserve(additional)
    }

    /// Inserts a key-value pair, returning the previous value if the key was
    /// present.
    ///
    /// Fails only if the map needed to grow and could not.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_table::HashMap;
    /// #
    /// let mut map: HashMap<[i32; 2], u32> = HashMap::with_capacity(16)?;
    /// assert_eq!(map.insert([3, -1], 10)?, None);
    /// assert_eq!(map.insert([3, -1], 11)?, Some(10));
    /// assert_eq!(map.get(&[3, -1]), Some(&11));
    /// # Ok::<(), slot_table::TableError>(())
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        let (pair, found) = self.table.get_or_add(key)?;
        let previous = core::mem::replace(&mut pair.value, value);
        Ok(found.then_some(previous))
    }

    /// Returns the value for `key`, inserting a zeroed one if it is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_table::HashMap;
    /// #
    /// let mut counts: HashMap<u8, u32> = HashMap::with_capacity(16)?;
    /// for byte in b"hello" {
    ///     *counts.get_or_zeroed(*byte)? += 1;
    /// }
    /// assert_eq!(counts.get(&b'l'), Some(&2));
    /// # Ok::<(), slot_table::TableError>(())
    /// ```
    pub fn get_or_zeroed(&mut self, key: K) -> Result<&mut V, TableError> {
        let (pair, _) = self.table.get_or_add(key)?;
        Ok(&mut pair.value)
    }

    /// Returns a reference to the value for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.table.get(key).map(|pair| &pair.value)
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.table.get_mut(key).map(|pair| &mut pair.value)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.table.contains(key)
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.table.take(key).map(|pair| pair.value)
    }

    /// Keeps only the entries for which `keep` returns `true`.
    ///
    /// An entry may be offered twice; see [`HashTable::retain`].
    pub fn retain(&mut self, mut keep: impl FnMut(&K, &mut V) -> bool) {
        self.table.retain(|pair| keep(&pair.key, &mut pair.value));
    }

    /// Returns an iterator over the entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.table.iter().map(|pair| (&pair.key, &pair.value))
    }

    /// Returns an iterator over the keys in slot order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.table.iter().map(|pair| &pair.key)
    }

    /// Returns an iterator over the values in slot order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.table.iter().map(|pair| &pair.value)
    }

    /// Returns the underlying table.
    pub fn as_table(&self) -> &HashTable<Pair<K, V>, H> {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::vec::Vec;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn insert_get_remove() {
        let mut map: HashMap<u64, u32> = HashMap::with_capacity(10).unwrap();
        for k in 0..100u64 {
            assert_eq!(map.insert(k, k as u32 * 3).unwrap(), None);
        }
        assert_eq!(map.len(), 100);
        for k in 0..100u64 {
            assert_eq!(map.get(&k), Some(&(k as u32 * 3)));
        }

        assert_eq!(map.remove(&42), Some(126));
        assert_eq!(map.remove(&42), None);
        assert!(!map.contains_key(&42));
        assert_eq!(map.len(), 99);
    }

    #[test]
    fn insert_replaces_value() {
        let mut map: HashMap<u16, [u8; 3]> = HashMap::with_capacity(10).unwrap();
        assert_eq!(map.insert(1, [1, 2, 3]).unwrap(), None);
        assert_eq!(map.insert(1, [4, 5, 6]).unwrap(), Some([1, 2, 3]));
        assert_eq!(map.len(), 1);
        *map.get_mut(&1).unwrap() = [7, 8, 9];
        assert_eq!(map.get(&1), Some(&[7, 8, 9]));
    }

    #[test]
    fn wide_keys() {
        let mut map: HashMap<[u64; 3], u8> = HashMap::with_capacity(10).unwrap();
        let mut rng = SmallRng::seed_from_u64(11);
        let keys: Vec<[u64; 3]> = (0..300).map(|_| rng.random()).collect();
        for (i, key) in keys.iter().enumerate() {
            map.insert(*key, i as u8).unwrap();
        }
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(map.get(key), Some(&(i as u8)));
        }
    }

    #[test]
    fn retain_and_iterate() {
        let mut map: HashMap<u32, u32> = HashMap::for_max_items(64).unwrap();
        let slots = map.capacity();
        for k in 0..64u32 {
            *map.get_or_zeroed(k).unwrap() += k;
        }
        assert_eq!(map.capacity(), slots);

        map.retain(|k, v| {
            *v += 1;
            k % 2 == 1
        });
        assert_eq!(map.len(), 32);
        let mut keys: Vec<u32> = map.keys().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, (0..64).filter(|k| k % 2 == 1).collect::<Vec<_>>());
        for (k, v) in map.iter() {
            // Retain may offer an entry twice, so the value grew at least once.
            assert!(*v > *k);
        }
        assert_eq!(map.values().count(), 32);
    }

    /// Folds keys into a handful of home slots.
    #[derive(Clone, Copy)]
    struct Buckets(u64);

    impl KeyHasher for Buckets {
        fn hash_word(&self, word: u64) -> u64 {
            word % self.0
        }
    }

    #[test]
    fn presized_with_custom_hasher() {
        let mut map: HashMap<u32, u32, Buckets> =
            HashMap::for_max_items_and_hasher(40, Buckets(3)).unwrap();
        let slots = map.capacity();
        assert_eq!(slots, crate::capacity::slots_for_max_items(40));
        for k in 0..40u32 {
            assert_eq!(map.insert(k, k + 1).unwrap(), None);
        }
        assert_eq!(map.capacity(), slots);
        for k in (0..40u32).step_by(2) {
            assert_eq!(map.remove(&k), Some(k + 1));
        }
        for k in 0..40u32 {
            assert_eq!(map.get(&k).copied(), (k % 2 == 1).then_some(k + 1));
        }
        assert_eq!(map.as_table().hasher().0, 3);
    }

    #[test]
    fn debug_lists_entries() {
        let mut map: HashMap<u8, u8> = HashMap::with_capacity(10).unwrap();
        map.insert(1, 2).unwrap();
        assert_eq!(format!("{map:?}"), "{1: 2}");
        map.clear();
        assert_eq!(format!("{map:?}"), "{}");
        assert!(map.as_table().is_empty());
    }
}

//! The open-addressed table.
//!
//! Records live inline in a single boxed slice. Collisions are resolved by
//! linear probing with wraparound, and removal uses backward-shift compaction
//! instead of tombstones, so a probe for a key always stops at the first
//! empty slot.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::capacity;
use crate::error::TableError;
use crate::hasher::KeyHasher;
use crate::hasher::MixHasher;
use crate::record::Record;
use crate::record::fresh;
use crate::record::key_eq;

/// Outcome of walking the probe sequence for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// The key lives at this index.
    Found(usize),
    /// The key is absent; this is the first empty slot on its probe path.
    Vacant(usize),
    /// Every slot was visited without finding the key or an empty slot.
    Full,
}

#[inline(always)]
fn home_slot<R: Record, H: KeyHasher>(slots: &[R], hasher: &H, key: &R::Key) -> usize {
    let hash = hasher.hash_bytes(bytemuck::bytes_of(key));
    (hash % slots.len() as u64) as usize
}

/// Walk forward from the key's home slot, wrapping at the end of the array,
/// until the key or an empty slot turns up.
#[inline]
fn probe<R: Record, H: KeyHasher>(slots: &[R], hasher: &H, key: &R::Key) -> Probe {
    let home = home_slot(slots, hasher, key);
    let mut index = home;
    loop {
        let record = &slots[index];
        if !record.is_occupied() {
            return Probe::Vacant(index);
        }
        if key_eq(record.key(), key) {
            return Probe::Found(index);
        }

        index += 1;
        if index == slots.len() {
            index = 0;
        }
        if index == home {
            return Probe::Full;
        }
    }
}

/// Returns `true` if `hole` comes before `current` on the forward probe path
/// that starts at `home`, wrapping modulo `slots`.
///
/// A record at `current` whose home slot is `home` may be moved into `hole`
/// exactly when this holds: it stays reachable from its home slot. `hole` may
/// equal `home`; it never equals `current`.
#[inline(always)]
fn on_probe_path(home: usize, hole: usize, current: usize, slots: usize) -> bool {
    debug_assert_ne!(hole, current);
    let distance = |to: usize| {
        if to >= home {
            to - home
        } else {
            to + slots - home
        }
    };
    distance(hole) < distance(current)
}

#[cold]
#[track_caller]
fn table_full() -> ! {
    panic!("hash table has no empty slot left; the load factor invariant is broken")
}

/// A reference to an occupied slot, valid until the next structural mutation.
///
/// Handles are plain indices tagged with the table's mutation generation.
/// Claiming a new slot, removing any record, growing and clearing all bump
/// the generation, and a handle from an older generation panics when used.
/// The one exception is the handle returned by
/// [`HashTable::remove_and_next`], which is issued after the removal and is
/// the cursor to continue an iteration with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: usize,
    generation: u64,
}

impl Handle {
    /// The slot index this handle points at.
    pub fn index(self) -> usize {
        self.index
    }
}

/// Debug statistics for probe-length analysis.
///
/// Requires the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of occupied slots.
    pub occupied: usize,
    /// Total number of slots.
    pub slots: usize,
    /// Number of records the table holds before it grows.
    pub max_load: usize,
    /// `occupied / slots`.
    pub load_factor: f64,
    /// Longest distance of any record from its home slot.
    pub max_probe_distance: usize,
    /// Mean distance of records from their home slots.
    pub mean_probe_distance: f64,
    /// Bytes held by the slot array.
    pub total_bytes: usize,
    /// Bytes held by empty slots.
    pub wasted_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} slots ({:.2}% load factor, grows past {})",
            self.occupied,
            self.slots,
            self.load_factor * 100.0,
            self.max_load
        );
        println!(
            "Probe distance: max {}, mean {:.3}",
            self.max_probe_distance, self.mean_probe_distance
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
        println!(
            "Memory: {} bytes wasted ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

/// Number of records found at each distance from their home slot.
///
/// Requires the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    counts: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// `counts()[d]` is the number of records stored `d` slots past their
    /// home slot.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let total: usize = self.counts.iter().sum();
        let max_bar = 60usize;
        println!("probe histogram ({} records):", total);
        for (distance, &count) in self.counts.iter().enumerate() {
            let units = (count * max_bar).div_ceil(max);
            println!("{:>3} | {} ({})", distance, "█".repeat(units), count);
        }
    }
}

/// An open-addressed hash table of fixed-size records.
///
/// `HashTable<R, H>` stores records of type `R` inline, keyed by
/// [`Record::Key`]. Keys are hashed by their bytes through `H` and collisions
/// are resolved by linear probing. The table grows by doubling before an
/// insertion could push its load factor above 0.7, and it never shrinks.
///
/// ## Handles and references
///
/// Insertions and lookups return plain references, so the borrow checker
/// keeps them from outliving the next mutation. For walking the table while
/// deleting from it, [`first`](Self::first), [`next`](Self::next) and
/// [`remove_and_next`](Self::remove_and_next) work with [`Handle`]s.
///
/// ## Example
///
/// ```rust
/// use slot_table::HashTable;
/// use slot_table::Pair;
///
/// let mut table: HashTable<Pair<u64, u32>> = HashTable::with_capacity(16)?;
/// table.add(7)?.value = 70;
///
/// let (record, found) = table.get_or_add(7)?;
/// assert!(found);
/// record.value += 1;
///
/// assert_eq!(table.get(&7).map(|p| p.value), Some(71));
/// assert!(table.remove(&7));
/// assert!(table.get(&7).is_none());
/// # Ok::<(), slot_table::TableError>(())
/// ```
#[derive(Clone)]
pub struct HashTable<R, H = MixHasher> {
    slots: Box<[R]>,
    occupied: usize,
    generation: u64,
    hasher: H,
}

impl<R: Record, H: KeyHasher> Debug for HashTable<R, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::string::ToString;

        f.debug_struct("HashTable")
            .field("slots", &self.slots.len())
            .field("occupied", &self.occupied)
            .field("generation", &self.generation)
            .field(
                "popmap",
                &self
                    .slots
                    .chunks(16)
                    .enumerate()
                    .map(|(chunk, window)| {
                        window
                            .iter()
                            .enumerate()
                            .map(|(offset, record)| {
                                if record.is_occupied() {
                                    format!("{:02}", self.probe_distance(chunk * 16 + offset))
                                } else {
                                    "..".to_string()
                                }
                            })
                            .collect::<Vec<String>>()
                            .join(", ")
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<R: Record> HashTable<R, MixHasher> {
    /// Creates a table with exactly `slots` slots.
    ///
    /// Fails if `slots` is below [`MIN_SLOTS`](crate::capacity::MIN_SLOTS) or
    /// the storage cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_table::HashTable;
    /// # use slot_table::Pair;
    /// # use slot_table::TableError;
    /// #
    /// let table: HashTable<Pair<u32, u32>> = HashTable::with_capacity(10)?;
    /// assert_eq!(table.capacity(), 10);
    ///
    /// assert!(matches!(
    ///     HashTable::<Pair<u32, u32>>::with_capacity(9),
    ///     Err(TableError::CapacityTooSmall { .. })
    /// ));
    /// # Ok::<(), TableError>(())
    /// ```
    pub fn with_capacity(slots: usize) -> Result<Self, TableError> {
        Self::with_capacity_and_hasher(slots, MixHasher)
    }

    /// Creates a table that holds `max_items` records without ever growing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_table::HashTable;
    /// # use slot_table::Pair;
    /// #
    /// let mut table: HashTable<Pair<u32, ()>> = HashTable::for_max_items(100)?;
    /// let slots = table.capacity();
    /// for k in 0..100 {
    ///     table.add(k)?;
    /// }
    /// assert_eq!(table.capacity(), slots);
    /// # Ok::<(), slot_table::TableError>(())
    /// ```
    pub fn for_max_items(max_items: usize) -> Result<Self, TableError> {
        Self::for_max_items_and_hasher(max_items, MixHasher)
    }

    /// Adopts a caller-provided buffer as slot storage.
    ///
    /// The buffer is zeroed and its length becomes the slot count. Pair with
    /// [`slots_for_memory`](Self::slots_for_memory) to size the buffer for a
    /// memory budget.
    pub fn from_buffer(buffer: Vec<R>) -> Result<Self, TableError> {
        Self::from_buffer_and_hasher(buffer, MixHasher)
    }
}

impl<R: Record, H: KeyHasher> HashTable<R, H> {
    /// Creates a table with exactly `slots` slots and the given hasher.
    pub fn with_capacity_and_hasher(slots: usize, hasher: H) -> Result<Self, TableError> {
        let slots = capacity::validate(slots)?;
        let storage = Self::allocate(slots)?;
        tracing::trace!(
            slots,
            record_size = core::mem::size_of::<R>(),
            "created hash table"
        );
        Ok(Self::from_storage(storage, hasher))
    }

    /// Creates a table that holds `max_items` records without growing, using
    /// the given hasher.
    pub fn for_max_items_and_hasher(max_items: usize, hasher: H) -> Result<Self, TableError> {
        Self::with_capacity_and_hasher(capacity::slots_for_max_items(max_items), hasher)
    }

    /// Adopts a caller-provided buffer as slot storage, using the given
    /// hasher.
    pub fn from_buffer_and_hasher(mut buffer: Vec<R>, hasher: H) -> Result<Self, TableError> {
        capacity::validate(buffer.len())?;
        buffer.fill(R::zeroed());
        Ok(Self::from_storage(buffer.into_boxed_slice(), hasher))
    }

    /// How many records of type `R` fit in `bytes` of memory.
    pub fn slots_for_memory(bytes: usize) -> usize {
        capacity::slots_for_memory(bytes, core::mem::size_of::<R>())
    }

    fn from_storage(slots: Box<[R]>, hasher: H) -> Self {
        Self {
            slots,
            occupied: 0,
            generation: 0,
            hasher,
        }
    }

    fn allocate(slots: usize) -> Result<Box<[R]>, TableError> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(slots)
            .map_err(|_| TableError::AllocFailed { slots })?;
        storage.resize(slots, R::zeroed());
        Ok(storage.into_boxed_slice())
    }

    /// Releases the table and hands back its slot storage.
    pub fn into_buffer(self) -> Vec<R> {
        self.slots.into_vec()
    }

    /// Returns the number of records in the table.
    pub fn len(&self) -> usize {
        self.occupied
    }

    /// Returns `true` if the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Returns the number of slots.
    ///
    /// The table grows before its record count would exceed 70% of this.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.occupied as f64 / self.slots.len() as f64
    }

    /// Returns the table's hasher.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    #[inline(always)]
    fn probe(&self, key: &R::Key) -> Probe {
        probe(&self.slots, &self.hasher, key)
    }

    #[inline(always)]
    fn home_slot(&self, key: &R::Key) -> usize {
        home_slot(&self.slots, &self.hasher, key)
    }

    fn probe_distance(&self, index: usize) -> usize {
        let home = self.home_slot(self.slots[index].key());
        if index >= home {
            index - home
        } else {
            index + self.slots.len() - home
        }
    }

    #[inline(always)]
    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    #[inline(always)]
    fn handle(&self, index: usize) -> Handle {
        Handle {
            index,
            generation: self.generation,
        }
    }

    /// Grow if one more record would push the load factor past the maximum.
    #[inline]
    fn reserve_one(&mut self) -> Result<(), TableError> {
        if capacity::exceeds_max_load(self.occupied + 1, self.slots.len()) {
            self.resize(capacity::grown_slots(self.slots.len())?)?;
        }
        Ok(())
    }

    /// Move every record into fresh storage of `new_slots` slots.
    ///
    /// The new storage is filled completely before it replaces the old one,
    /// so a failed allocation leaves the table as it was.
    #[cold]
    fn resize(&mut self, new_slots: usize) -> Result<(), TableError> {
        debug_assert!(new_slots > self.slots.len());
        let mut storage = Self::allocate(new_slots)?;

        let mut migrated = 0;
        for record in self.slots.iter().filter(|r| r.is_occupied()) {
            let Probe::Vacant(index) = probe(&storage, &self.hasher, record.key()) else {
                table_full()
            };
            storage[index] = *record;
            migrated += 1;
        }
        debug_assert_eq!(migrated, self.occupied);

        tracing::debug!(
            old_slots = self.slots.len(),
            new_slots,
            records = self.occupied,
            "resized hash table"
        );
        self.slots = storage;
        self.bump_generation();
        Ok(())
    }

    /// Reserves room so that `additional` more insertions cannot trigger a
    /// resize.
    ///
    /// Grows by doubling. On failure the table is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_table::HashTable;
    /// # use slot_table::Pair;
    /// #
    /// let mut table: HashTable<Pair<u64, u64>> = HashTable::with_capacity(10)?;
    /// table.reserve(50)?;
    /// assert_eq!(table.capacity(), 80);
    /// # Ok::<(), slot_table::TableError>(())
    /// ```
    pub fn reserve(&mut self, additional: usize) -> Result<(), TableError> {
        let needed = self
            .occupied
            .checked_add(additional)
            .ok_or(TableError::CapacityOverflow)?;

        let mut slots = self.slots.len();
        while capacity::exceeds_max_load(needed, slots) {
            slots = capacity::grown_slots(slots)?;
        }
        if slots != self.slots.len() {
            self.resize(slots)?;
        }
        Ok(())
    }

    /// Inserts a new record for `key` and returns it, zeroed apart from its
    /// key and occupancy bit, for the caller to fill in.
    ///
    /// The key must not already be present. Adding a present key is a bug:
    /// debug builds panic, release builds reset the existing record to a
    /// fresh one and log a warning.
    ///
    /// Fails only if the table needed to grow and could not.
    pub fn add(&mut self, key: R::Key) -> Result<&mut R, TableError> {
        self.reserve_one()?;

        let index = match self.probe(&key) {
            Probe::Vacant(index) => {
                self.occupied += 1;
                index
            }
            Probe::Found(index) => {
                tracing::warn!(index, "add() found its key already present, resetting the record");
                if cfg!(debug_assertions) {
                    panic!("key added to the hash table twice");
                }
                index
            }
            Probe::Full => table_full(),
        };

        self.bump_generation();
        self.slots[index] = fresh(key);
        Ok(&mut self.slots[index])
    }

    /// Returns the record for `key`, inserting a zeroed one if it is absent.
    ///
    /// The flag is `true` if the record was already present. Since the
    /// growth check runs before the lookup, this may resize even when the key
    /// is found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_table::HashTable;
    /// # use slot_table::Pair;
    /// #
    /// let mut table: HashTable<Pair<u16, u32>> = HashTable::with_capacity(10)?;
    /// for word in [3u16, 5, 3, 3] {
    ///     let (record, _) = table.get_or_add(word)?;
    ///     record.value += 1;
    /// }
    /// assert_eq!(table.get(&3).unwrap().value, 3);
    /// assert_eq!(table.len(), 2);
    /// # Ok::<(), slot_table::TableError>(())
    /// ```
    pub fn get_or_add(&mut self, key: R::Key) -> Result<(&mut R, bool), TableError> {
        self.reserve_one()?;

        match self.probe(&key) {
            Probe::Found(index) => Ok((&mut self.slots[index], true)),
            Probe::Vacant(index) => {
                self.occupied += 1;
                self.bump_generation();
                self.slots[index] = fresh(key);
                Ok((&mut self.slots[index], false))
            }
            Probe::Full => table_full(),
        }
    }

    fn lookup(&self, key: &R::Key) -> Option<usize> {
        match self.probe(key) {
            Probe::Found(index) => Some(index),
            Probe::Vacant(_) => None,
            Probe::Full => {
                tracing::warn!(
                    slots = self.slots.len(),
                    occupied = self.occupied,
                    "lookup wrapped around a hash table with no empty slot"
                );
                None
            }
        }
    }

    /// Returns the record for `key`, if present.
    pub fn get(&self, key: &R::Key) -> Option<&R> {
        self.lookup(key).map(|index| &self.slots[index])
    }

    /// Returns the record for `key` mutably, if present.
    ///
    /// The key of the returned record must not be changed.
    pub fn get_mut(&mut self, key: &R::Key) -> Option<&mut R> {
        self.lookup(key).map(|index| &mut self.slots[index])
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &R::Key) -> bool {
        self.lookup(key).is_some()
    }

    /// Returns a handle to the record for `key`, if present.
    pub fn find(&self, key: &R::Key) -> Option<Handle> {
        self.lookup(key).map(|index| self.handle(index))
    }

    /// Removes the record for `key`. Returns `true` if it was present.
    pub fn remove(&mut self, key: &R::Key) -> bool {
        self.take(key).is_some()
    }

    /// Removes the record for `key` and returns it, if present.
    ///
    /// The returned copy still has its occupancy bit set.
    pub fn take(&mut self, key: &R::Key) -> Option<R> {
        let index = self.lookup(key)?;
        Some(self.remove_at(index))
    }

    /// Removes the record a handle points at and returns it.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or points at an empty slot.
    pub fn remove_node(&mut self, handle: Handle) -> R {
        let index = self.occupied_index(handle);
        self.remove_at(index)
    }

    /// Removes the record a handle points at and returns the handle to visit
    /// next in memory order, or `None` once the walk is over.
    ///
    /// This is the only way to delete while walking the table with
    /// [`first`](Self::first) and [`next`](Self::next). Compaction may move a
    /// record into the freed slot, in which case the returned handle points at
    /// that same slot again. Records only ever move backwards towards their
    /// home slot, so no record that was present when the walk started is
    /// skipped. A record whose probe path wraps from the end of the array to
    /// the start may be visited twice.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or points at an empty slot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use slot_table::HashTable;
    /// # use slot_table::Pair;
    /// #
    /// let mut table: HashTable<Pair<u32, u32>> = HashTable::with_capacity(32)?;
    /// for k in 0..20 {
    ///     table.add(k)?.value = k % 3;
    /// }
    ///
    /// let mut cursor = table.first();
    /// while let Some(handle) = cursor {
    ///     cursor = if table.record(handle).value == 0 {
    ///         table.remove_and_next(handle)
    ///     } else {
    ///         table.next(handle)
    ///     };
    /// }
    /// assert_eq!(table.len(), 13);
    /// assert!(table.iter().all(|p| p.value != 0));
    /// # Ok::<(), slot_table::TableError>(())
    /// ```
    pub fn remove_and_next(&mut self, handle: Handle) -> Option<Handle> {
        let index = self.occupied_index(handle);
        self.remove_at(index);
        if self.slots[index].is_occupied() {
            return Some(self.handle(index));
        }
        self.next_from(index + 1)
    }

    /// Vacate `index`, then close the hole by walking the run of occupied
    /// slots after it and pulling back every record whose probe path passes
    /// through the hole. Stops at the first empty slot.
    fn remove_at(&mut self, index: usize) -> R {
        let slots = self.slots.len();
        let removed = core::mem::replace(&mut self.slots[index], R::zeroed());
        debug_assert!(removed.is_occupied());
        self.occupied -= 1;
        self.bump_generation();

        let mut hole = index;
        let mut current = index;
        loop {
            current += 1;
            if current == slots {
                current = 0;
            }

            let record = self.slots[current];
            if !record.is_occupied() {
                break;
            }

            let home = self.home_slot(record.key());
            if on_probe_path(home, hole, current, slots) {
                self.slots[hole] = record;
                self.slots[current] = R::zeroed();
                hole = current;
            }
        }

        removed
    }

    /// Returns a handle to the first occupied slot in memory order.
    pub fn first(&self) -> Option<Handle> {
        self.next_from(0)
    }

    /// Returns a handle to the next occupied slot after `handle` in memory
    /// order.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn next(&self, handle: Handle) -> Option<Handle> {
        let index = self.checked_index(handle);
        self.next_from(index + 1)
    }

    fn next_from(&self, start: usize) -> Option<Handle> {
        self.slots
            .get(start..)?
            .iter()
            .position(|record| record.is_occupied())
            .map(|offset| self.handle(start + offset))
    }

    /// Returns the record a handle points at.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or points at an empty slot.
    pub fn record(&self, handle: Handle) -> &R {
        &self.slots[self.occupied_index(handle)]
    }

    /// Returns the record a handle points at mutably.
    ///
    /// The key of the returned record must not be changed.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or points at an empty slot.
    pub fn record_mut(&mut self, handle: Handle) -> &mut R {
        let index = self.occupied_index(handle);
        &mut self.slots[index]
    }

    #[track_caller]
    fn checked_index(&self, handle: Handle) -> usize {
        assert_eq!(
            handle.generation, self.generation,
            "stale handle: the table was mutated after this handle was issued"
        );
        assert!(handle.index < self.slots.len(), "handle out of bounds");
        handle.index
    }

    #[track_caller]
    fn occupied_index(&self, handle: Handle) -> usize {
        let index = self.checked_index(handle);
        assert!(
            self.slots[index].is_occupied(),
            "handle points at an empty slot"
        );
        index
    }

    /// Keeps only the records for which `keep` returns `true`.
    ///
    /// Records are offered in memory order. A record whose probe path wraps
    /// around the end of the array may be offered twice if a removal pulls it
    /// back behind the walk; every record is offered at least once.
    pub fn retain(&mut self, mut keep: impl FnMut(&mut R) -> bool) {
        let mut cursor = self.first();
        while let Some(handle) = cursor {
            cursor = if keep(self.record_mut(handle)) {
                self.next(handle)
            } else {
                self.remove_and_next(handle)
            };
        }
    }

    /// Removes every record, keeping the capacity.
    pub fn clear(&mut self) {
        self.slots.fill(R::zeroed());
        self.occupied = 0;
        self.bump_generation();
    }

    /// Returns an iterator over the records in memory order.
    pub fn iter(&self) -> Iter<'_, R> {
        Iter {
            inner: self.slots.iter(),
            remaining: self.occupied,
        }
    }

    /// Returns an iterator over mutable references to the records in memory
    /// order. Keys must not be changed.
    pub fn iter_mut(&mut self) -> IterMut<'_, R> {
        IterMut {
            inner: self.slots.iter_mut(),
            remaining: self.occupied,
        }
    }

    /// Counts records by their distance from their home slot.
    ///
    /// Requires the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut counts = alloc::vec![0usize; 1];
        for index in 0..self.slots.len() {
            if !self.slots[index].is_occupied() {
                continue;
            }
            let distance = self.probe_distance(index);
            if distance >= counts.len() {
                counts.resize(distance + 1, 0);
            }
            counts[distance] += 1;
        }
        ProbeHistogram { counts }
    }

    /// Returns utilization and probe statistics for debugging.
    ///
    /// Requires the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let histogram = self.probe_histogram();
        let counts = histogram.counts();
        let total_distance: usize = counts
            .iter()
            .enumerate()
            .map(|(distance, count)| distance * count)
            .sum();
        let record_size = core::mem::size_of::<R>();

        DebugStats {
            occupied: self.occupied,
            slots: self.slots.len(),
            max_load: capacity::max_load(self.slots.len()),
            load_factor: self.load_factor(),
            max_probe_distance: counts.iter().rposition(|&c| c > 0).unwrap_or(0),
            mean_probe_distance: if self.occupied == 0 {
                0.0
            } else {
                total_distance as f64 / self.occupied as f64
            },
            total_bytes: self.slots.len() * record_size,
            wasted_bytes: (self.slots.len() - self.occupied) * record_size,
        }
    }
}

/// An iterator over the records of a [`HashTable`], in memory order.
///
/// Created by [`HashTable::iter`].
pub struct Iter<'a, R> {
    inner: core::slice::Iter<'a, R>,
    remaining: usize,
}

impl<'a, R: Record> Iterator for Iter<'a, R> {
    type Item = &'a R;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let record = self.inner.find(|record| record.is_occupied())?;
        self.remaining -= 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<R: Record> ExactSizeIterator for Iter<'_, R> {}

/// A mutable iterator over the records of a [`HashTable`], in memory order.
///
/// Created by [`HashTable::iter_mut`].
pub struct IterMut<'a, R> {
    inner: core::slice::IterMut<'a, R>,
    remaining: usize,
}

impl<'a, R: Record> Iterator for IterMut<'a, R> {
    type Item = &'a mut R;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let record = self.inner.find(|record| record.is_occupied())?;
        self.remaining -= 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<R: Record> ExactSizeIterator for IterMut<'_, R> {}

impl<'a, R: Record, H: KeyHasher> IntoIterator for &'a HashTable<R, H> {
    type Item = &'a R;
    type IntoIter = Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, R: Record, H: KeyHasher> IntoIterator for &'a mut HashTable<R, H> {
    type Item = &'a mut R;
    type IntoIter = IterMut<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

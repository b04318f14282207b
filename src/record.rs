//! The slot record contract.
//!
//! A [`HashTable`](crate::HashTable) stores caller-defined records inline in
//! one contiguous array. Each record carries its key, a [`Flags`] word whose
//! lowest bit marks the slot as occupied, and whatever payload fields the
//! caller wants. Records must be valid when zeroed, because the table hands
//! out freshly zeroed records on insertion and zeroes vacated slots.

use bytemuck::Pod;
use bytemuck::Zeroable;

/// The occupancy word of a record.
///
/// Bit 0 is owned by the table and set while the slot is occupied. The
/// remaining 31 bits are free for the caller and are preserved by lookups and
/// relocations, but cleared whenever the table claims or vacates the slot.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Zeroable, Pod)]
#[repr(transparent)]
pub struct Flags(u32);

impl Flags {
    const OCCUPIED: u32 = 0x1;

    pub(crate) const fn occupied() -> Self {
        Flags(Self::OCCUPIED)
    }

    /// Returns `true` if the table considers this slot occupied.
    #[inline(always)]
    pub const fn is_occupied(self) -> bool {
        self.0 & Self::OCCUPIED != 0
    }

    /// The caller-owned bits, shifted down so bit 0 is the first free bit.
    #[inline]
    pub const fn user(self) -> u32 {
        self.0 >> 1
    }

    /// Replace the caller-owned bits. Bits shifted out of the top are lost.
    #[inline]
    pub fn set_user(&mut self, bits: u32) {
        self.0 = (self.0 & Self::OCCUPIED) | (bits << 1);
    }

    /// The raw word, occupancy bit included.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl core::fmt::Debug for Flags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Flags")
            .field("occupied", &self.is_occupied())
            .field("user", &format_args!("{:#x}", self.user()))
            .finish()
    }
}

/// A fixed-size record that can live in a [`HashTable`](crate::HashTable).
///
/// The key must be [`Pod`]: it has no padding and no invalid bit patterns, so
/// the table can hash its raw bytes and compare keys byte for byte. Two keys
/// are equal exactly when their bytes are equal; a type's own `PartialEq` is
/// never consulted.
///
/// # Examples
///
/// ```rust
/// use bytemuck::Zeroable;
/// use slot_table::Flags;
/// use slot_table::Record;
///
/// #[derive(Clone, Copy, Zeroable)]
/// struct ChunkMeta {
///     key: [i32; 2],
///     flags: Flags,
///     entities: u32,
/// }
///
/// impl Record for ChunkMeta {
///     type Key = [i32; 2];
///
///     fn key(&self) -> &[i32; 2] {
///         &self.key
///     }
///     fn key_mut(&mut self) -> &mut [i32; 2] {
///         &mut self.key
///     }
///     fn flags(&self) -> Flags {
///         self.flags
///     }
///     fn flags_mut(&mut self) -> &mut Flags {
///         &mut self.flags
///     }
/// }
/// ```
pub trait Record: Zeroable + Copy {
    /// The key type. Compared and hashed by its bytes.
    type Key: Pod;

    /// The record's key.
    fn key(&self) -> &Self::Key;

    /// Mutable access to the key, used by the table when claiming a slot.
    ///
    /// Changing the key of an occupied record breaks the table's invariants.
    fn key_mut(&mut self) -> &mut Self::Key;

    /// The record's occupancy word.
    fn flags(&self) -> Flags;

    /// Mutable access to the occupancy word.
    ///
    /// Callers may change the user bits freely but must not clear the
    /// occupancy bit of a record living in a table.
    fn flags_mut(&mut self) -> &mut Flags;

    /// Shorthand for `self.flags().is_occupied()`.
    #[inline(always)]
    fn is_occupied(&self) -> bool {
        self.flags().is_occupied()
    }
}

/// Byte-exact key equality.
#[inline]
pub fn key_eq<K: Pod>(a: &K, b: &K) -> bool {
    bytemuck::bytes_of(a) == bytemuck::bytes_of(b)
}

/// A zeroed record bearing `key`, marked occupied.
#[inline]
pub(crate) fn fresh<R: Record>(key: R::Key) -> R {
    let mut record = R::zeroed();
    *record.key_mut() = key;
    *record.flags_mut() = Flags::occupied();
    record
}

/// A ready-made key/value record, used by [`HashMap`](crate::HashMap).
#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct Pair<K, V> {
    /// The key.
    pub key: K,
    /// The occupancy word.
    pub flags: Flags,
    /// The payload.
    pub value: V,
}

// SAFETY: every field is `Zeroable` (`Pod` implies `Zeroable`), so the
// all-zero bit pattern is a valid `Pair`.
unsafe impl<K: Pod, V: Zeroable> Zeroable for Pair<K, V> {}

impl<K: Pod, V: Zeroable + Copy> Record for Pair<K, V> {
    type Key = K;

    #[inline(always)]
    fn key(&self) -> &K {
        &self.key
    }

    #[inline(always)]
    fn key_mut(&mut self) -> &mut K {
        &mut self.key
    }

    #[inline(always)]
    fn flags(&self) -> Flags {
        self.flags
    }

    #[inline(always)]
    fn flags_mut(&mut self) -> &mut Flags {
        &mut self.flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_bits_do_not_touch_occupancy() {
        let mut flags = Flags::occupied();
        flags.set_user(0b101);
        assert!(flags.is_occupied());
        assert_eq!(flags.user(), 0b101);
        assert_eq!(flags.bits(), 0b1011);

        let mut empty = Flags::default();
        empty.set_user(u32::MAX);
        assert!(!empty.is_occupied());
        assert_eq!(empty.user(), u32::MAX >> 1);
    }

    #[test]
    fn fresh_records_are_zeroed_except_key_and_occupancy() {
        let pair: Pair<u64, [u32; 4]> = fresh(77);
        assert_eq!(pair.key, 77);
        assert!(pair.is_occupied());
        assert_eq!(pair.flags.user(), 0);
        assert_eq!(pair.value, [0; 4]);
    }

    #[test]
    fn keys_compare_by_bytes() {
        assert!(key_eq(&[1u16, 2], &[1u16, 2]));
        assert!(!key_eq(&[1u16, 2], &[2u16, 1]));
        // -0.0 == 0.0 by value, but their bit patterns differ.
        assert!(!key_eq(&0.0f32, &-0.0f32));
        assert!(key_eq(&f32::NAN, &f32::NAN));
    }
}

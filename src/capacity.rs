//! Growth policy arithmetic.
//!
//! The table keeps its load factor at or below 7/10. All of the checks here
//! use exact integer arithmetic, so there is no floating point rounding to
//! second-guess.

use crate::error::TableError;

/// The smallest slot count a table may have. Below this the one-slot margin
/// left by the growth check is a large fraction of the table and probes
/// degrade badly.
pub const MIN_SLOTS: usize = 10;

const LOAD_NUMERATOR: u128 = 7;
const LOAD_DENOMINATOR: u128 = 10;

/// Returns `true` if `occupied` records would exceed the maximum load of a
/// table with `slots` slots, i.e. `occupied > 0.7 * slots`.
#[inline(always)]
pub fn exceeds_max_load(occupied: usize, slots: usize) -> bool {
    occupied as u128 * LOAD_DENOMINATOR > slots as u128 * LOAD_NUMERATOR
}

/// The largest record count a table with `slots` slots holds without growing.
#[inline]
pub fn max_load(slots: usize) -> usize {
    ((slots as u128 * LOAD_NUMERATOR) / LOAD_DENOMINATOR) as usize
}

/// The minimum slot count such that a table holding `max_items` records never
/// needs to grow, even for an insertion attempt made while it is full (the
/// growth check always assumes one more record is about to arrive).
///
/// The result is never below [`MIN_SLOTS`].
///
/// # Examples
///
/// ```rust
/// # use slot_table::capacity::slots_for_max_items;
/// #
/// assert_eq!(slots_for_max_items(0), 10);
/// assert_eq!(slots_for_max_items(6), 10);
/// assert_eq!(slots_for_max_items(100), 145);
/// ```
pub fn slots_for_max_items(max_items: usize) -> usize {
    let needed = max_items as u128 + 1;
    let slots = (needed * LOAD_DENOMINATOR).div_ceil(LOAD_NUMERATOR);
    debug_assert!(needed * LOAD_DENOMINATOR <= slots * LOAD_NUMERATOR);
    usize::try_from(slots).unwrap_or(usize::MAX).max(MIN_SLOTS)
}

/// How many records of `record_size` bytes fit in `bytes` of memory.
///
/// For callers that budget memory themselves and then hand the table a buffer
/// through [`HashTable::from_buffer`](crate::HashTable::from_buffer). A zero
/// `record_size` yields zero.
#[inline]
pub fn slots_for_memory(bytes: usize, record_size: usize) -> usize {
    bytes.checked_div(record_size).unwrap_or(0)
}

/// The slot count after one growth step.
#[inline]
pub(crate) fn grown_slots(slots: usize) -> Result<usize, TableError> {
    slots.checked_mul(2).ok_or(TableError::CapacityOverflow)
}

/// Reject slot counts below [`MIN_SLOTS`].
#[inline]
pub(crate) fn validate(slots: usize) -> Result<usize, TableError> {
    if slots < MIN_SLOTS {
        return Err(TableError::CapacityTooSmall {
            requested: slots,
            minimum: MIN_SLOTS,
        });
    }
    Ok(slots)
}

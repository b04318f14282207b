use thiserror::Error;

/// Errors reported by table construction and growth.
///
/// Lookups never fail: a missing key is `None`, not an error. Misuse of the
/// API (stale handles, removing vacant slots) panics instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// The requested slot count is below the supported minimum.
    #[error("a table needs at least {minimum} slots, {requested} requested")]
    CapacityTooSmall {
        /// The slot count that was asked for.
        requested: usize,
        /// The smallest accepted slot count.
        minimum: usize,
    },

    /// Growing the table would overflow `usize`.
    #[error("slot count overflow")]
    CapacityOverflow,

    /// The allocator could not provide storage for `slots` records.
    #[error("failed to allocate {slots} slots")]
    AllocFailed {
        /// The slot count of the failed allocation.
        slots: usize,
    },
}

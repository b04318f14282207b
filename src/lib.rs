#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod capacity;

mod error;

/// A key/value map over a [`HashTable`] of [`Pair`] records.
pub mod hash_map;

pub mod hash_table;

pub mod hasher;

pub mod record;

pub use error::TableError;
pub use hash_map::HashMap;
pub use hash_table::Handle;
pub use hash_table::HashTable;
pub use record::Flags;
pub use record::Pair;
pub use record::Record;

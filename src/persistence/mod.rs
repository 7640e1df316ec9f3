//! Saving and resuming.
//!
//! - `store`: the `KeyValueStore` trait with memory and file backends
//! - `snapshot`: `SaveSnapshot`, the versioned JSON save of a level in progress
//! - `error`: `SnapshotError` (unresumable save) and `StoreError` (backend failure)

pub mod error;
pub mod snapshot;
pub mod store;

pub use error::{SnapshotError, StoreError};
pub use snapshot::{CardState, SaveSnapshot, SAVE_VERSION};
pub use store::{FileStore, KeyValueStore, MemoryStore};

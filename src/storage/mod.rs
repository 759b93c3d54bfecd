//! Durable Storage Module
//!
//! A synchronous, string-only key/value store that survives restarts.
//! The cache checkpoints itself into one of these after every mutation.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::Result;

// == Storage Trait ==
/// Durable key/value persistence with string values.
///
/// Implementations must be fast and local: the cache calls them while
/// holding its async lock, on the runtime worker thread. With `FileStorage`
/// every mutation therefore performs blocking filesystem writes on that
/// worker, and other cache callers wait until the write finishes.
pub trait Storage: Send + Sync {
    /// Returns the stored item, or `None` if it was never written or was removed.
    fn get_item(&self, name: &str) -> Result<Option<String>>;

    /// Stores `value` under `name`, replacing any previous value.
    fn set_item(&self, name: &str, value: &str) -> Result<()>;

    /// Removes the item. Removing a missing item is not an error.
    fn remove_item(&self, name: &str) -> Result<()>;
}

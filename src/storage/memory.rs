//! In-process storage backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::Storage;
use crate::error::{CacheError, Result};

/// Storage kept in memory.
///
/// Clones share the same underlying map, so a test can hand one clone to a
/// cache, drop the cache, and load a fresh cache from another clone to
/// simulate a process restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items currently stored.
    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, name: &str) -> Result<Option<String>> {
        let items = self
            .items
            .lock()
            .map_err(|e| CacheError::Storage(e.to_string()))?;
        Ok(items.get(name).cloned())
    }

    fn set_item(&self, name: &str, value: &str) -> Result<()> {
        let mut items = self
            .items
            .lock()
            .map_err(|e| CacheError::Storage(e.to_string()))?;
        items.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, name: &str) -> Result<()> {
        let mut items = self
            .items
            .lock()
            .map_err(|e| CacheError::Storage(e.to_string()))?;
        items.remove(name);
        Ok(())
    }
}

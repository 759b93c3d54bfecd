//! DLC Cache - A persistent, deduplicating response cache
//!
//! Memoizes JSON responses from the DLC pension statistics API with per-entry
//! TTL, checkpoints them to durable storage, and collapses concurrent
//! identical requests into a single upstream call. Ships with a small caching
//! proxy built on the same cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{CacheError, Result};
pub use fetch::{HttpTransport, ResponseCache, Transport};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use tasks::spawn_cleanup_task;

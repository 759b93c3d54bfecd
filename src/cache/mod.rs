//! Cache Module
//!
//! Provides TTL caching of JSON responses with durable checkpoints.

mod clock;
mod entry;
mod key;
pub mod snapshot;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, EntryMeta};
pub use key::{cache_key, canonical_json};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// TTL applied when the caller does not specify one (5 minutes)
pub const DEFAULT_TTL_MS: u64 = 5 * 60 * 1000;

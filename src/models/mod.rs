//! Request and Response models
//!
//! DTOs for the caching proxy's own endpoints, plus typed schemas for the
//! upstream statistics payloads.

pub mod dashboard;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use dashboard::{AgeBucket, PublicStats, SubmissionStats, PUBLIC_STATS_PATH};
pub use requests::{empty_object, InvalidateRequest};
pub use responses::{ClearResponse, HealthResponse, InvalidateResponse, StatsResponse};

//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageOutcome`: how each fetched URL ended (saved, unsupported, or which failure kind)
//! - `StopReason`: why a job stopped popping from its frontier

mod page_state;

// Re-export main types
pub use page_state::{PageOutcome, StopReason};

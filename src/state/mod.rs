//! State module for tracking crawl progress
//!
//! This module provides the state owned by a discovery run.
//!
//! # Components
//!
//! - `CrawlPhase`: The phases of the per-category listing state machine
//! - `CategoryCursor`: Position of a crawl within one category's pagination
//! - `DiscoverySets`: The deduplicated product and variant URL sets

mod cursor;
mod discovery;

// Re-export main types
pub use cursor::{CategoryCursor, CrawlPhase};
pub use discovery::DiscoverySets;

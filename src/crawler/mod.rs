//! Crawler module for category listing discovery
//!
//! This module contains the listing side of a harvest, including:
//! - Page rendering through the `PageRenderer` seam
//! - Listing parsing: product entry links and pagination state
//! - The per-category pagination state machine

mod category;
mod fetcher;
mod parser;

pub use category::{CategoryCrawl, CategoryCrawler, Termination};
pub use fetcher::{build_http_client, HttpRenderer, PageRenderer, RenderError, RenderedPage};
pub use parser::{EntryError, ListingPage, ListingParser, NextControl};

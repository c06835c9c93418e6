//! Run statistics
//!
//! This module aggregates what a harvest run did and prints it once the
//! run is over.

use crate::crawler::CategoryCrawl;
use crate::variants::{FallbackReason, Resolution};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Summary of one harvest run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    // Product stage
    pub categories_crawled: usize,
    pub categories_abandoned: usize,
    pub pages_visited: u64,
    pub products: usize,

    // Variant stage
    pub products_expanded: usize,
    pub resolution_calls: usize,
    pub resolution_failures: usize,
    pub fallbacks: HashMap<FallbackReason, usize>,
    pub variants: usize,
}

impl RunSummary {
    /// Creates an empty summary stamped with the current time
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            categories_crawled: 0,
            categories_abandoned: 0,
            pages_visited: 0,
            products: 0,
            products_expanded: 0,
            resolution_calls: 0,
            resolution_failures: 0,
            fallbacks: HashMap::new(),
            variants: 0,
        }
    }

    pub fn record_category(&mut self, crawl: &CategoryCrawl) {
        self.categories_crawled += 1;
        self.pages_visited += u64::from(crawl.pages_visited);
        if crawl.termination.is_abandoned() {
            self.categories_abandoned += 1;
        }
    }

    pub fn record_resolution(&mut self, resolution: &Resolution) {
        self.resolution_calls += resolution.attempted;
        self.resolution_failures += resolution.attempted - resolution.resolved;
        match resolution.fallback {
            Some(reason) => *self.fallbacks.entry(reason).or_insert(0) += 1,
            None => self.products_expanded += 1,
        }
    }

    /// Number of products that kept their own URL
    pub fn products_fallback(&self) -> usize {
        self.fallbacks.values().sum()
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("=== Harvest Summary ===\n");

    println!("Started: {}", summary.started_at.to_rfc3339());
    if let Some(seconds) = summary.duration_seconds() {
        println!("Duration: {}s", seconds);
    }
    println!();

    println!("Products:");
    println!(
        "  Categories crawled: {} ({} abandoned)",
        summary.categories_crawled, summary.categories_abandoned
    );
    println!("  Listing pages visited: {}", summary.pages_visited);
    println!("  Unique product URLs: {}", summary.products);
    println!();

    println!("Variants:");
    println!("  Products expanded: {}", summary.products_expanded);
    println!("  Products kept as-is: {}", summary.products_fallback());
    for (reason, count) in &summary.fallbacks {
        println!("    {:?}: {}", reason, count);
    }
    println!(
        "  Resolution calls: {} ({} failed)",
        summary.resolution_calls, summary.resolution_failures
    );
    println!("  Unique variant URLs: {}", summary.variants);
}

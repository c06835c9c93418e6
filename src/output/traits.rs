//! Output handler traits and types
//!
//! This module defines the trait interface the pipeline persists its two
//! URL sets through.

use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Which of the two URL sets a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    Product,
    Variant,
}

impl UrlKind {
    /// Column header of the persisted file
    pub fn header(&self) -> &'static str {
        match self {
            Self::Product => "Product URL",
            Self::Variant => "Product/Variant URL",
        }
    }

    /// Rows between progress log lines, if progress is logged for this kind
    pub fn progress_interval(&self) -> Option<usize> {
        match self {
            Self::Product => Some(50),
            Self::Variant => None,
        }
    }
}

/// Trait for output handlers
///
/// The pipeline calls `write_urls` once per stage, after the stage's set is
/// complete.
pub trait OutputHandler {
    /// Persists a complete URL set
    ///
    /// # Arguments
    ///
    /// * `kind` - Which set is being written
    /// * `urls` - The deduplicated URLs, in set order
    fn write_urls(&mut self, kind: UrlKind, urls: &BTreeSet<String>) -> OutputResult<()>;
}

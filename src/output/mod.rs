//! Output module for persisting discovered URLs and reporting on a run
//!
//! This module handles:
//! - Writing the product and variant sets as delimited text files
//! - Reading a persisted product list back for variant-only runs
//! - Recording and printing run statistics

mod csv_output;
pub mod stats;
mod traits;

pub use csv_output::{read_url_list, CsvOutput};
pub use stats::{print_summary, RunSummary};
pub use traits::{OutputError, OutputHandler, OutputResult, UrlKind};

//! Integration tests against mock HTTP servers

mod common;
mod crawl_tests;
mod pipeline_tests;

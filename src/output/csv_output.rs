//! Single-column delimited URL files
//!
//! Each file starts with a header row naming the column, followed by one
//! record per URL.

use crate::output::traits::{OutputError, OutputHandler, OutputResult, UrlKind};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Writes the product and variant sets to two delimited files
#[derive(Debug, Clone)]
pub struct CsvOutput {
    products_path: PathBuf,
    variants_path: PathBuf,
}

impl CsvOutput {
    pub fn new(products_path: impl Into<PathBuf>, variants_path: impl Into<PathBuf>) -> Self {
        Self {
            products_path: products_path.into(),
            variants_path: variants_path.into(),
        }
    }

    pub fn path(&self, kind: UrlKind) -> &Path {
        match kind {
            UrlKind::Product => &self.products_path,
            UrlKind::Variant => &self.variants_path,
        }
    }
}

impl OutputHandler for CsvOutput {
    fn write_urls(&mut self, kind: UrlKind, urls: &BTreeSet<String>) -> OutputResult<()> {
        let path = self.path(kind).to_path_buf();
        write_url_file(&path, kind, urls).map_err(|source| OutputError::Write {
            path: path.display().to_string(),
            source,
        })?;

        tracing::info!(
            "Saving completed. Total unique URLs: {} -> {}",
            urls.len(),
            path.display()
        );
        Ok(())
    }
}

fn write_url_file(path: &Path, kind: UrlKind, urls: &BTreeSet<String>) -> csv::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([kind.header()])?;

    for (index, url) in urls.iter().enumerate() {
        writer.write_record([url])?;

        let written = index + 1;
        if kind.progress_interval().is_some_and(|every| written % every == 0) {
            tracing::info!("Written {} URLs to {}", written, path.display());
        }
    }

    writer.flush()?;
    Ok(())
}

/// Reads a URL file written by [`CsvOutput`], skipping the header row
///
/// Only the first column of each record is used; records with an empty
/// first column are ignored.
pub fn read_url_list(path: &Path) -> OutputResult<Vec<String>> {
    let read_error = |source| OutputError::Read {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(read_error)?;

    let mut urls = Vec::new();
    for result in reader.records() {
        let record = result.map_err(read_error)?;
        let url = record.get(0).unwrap_or_default().trim();
        if !url.is_empty() {
            urls.push(url.to_string());
        }
    }

    Ok(urls)
}

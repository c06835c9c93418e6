//! URL handling module for Catalog Harvester
//!
//! This module provides product ID extraction and the link resolution rules
//! shared by the listing crawler and the variant resolver.

mod product_id;

use url::Url;

pub use product_id::{extract_product_id, ProductId};

/// Resolves an `href` found in a document to an absolute HTTP(S) URL
///
/// Returns None if the link cannot point at a page:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel:, data: schemes
/// - hrefs that do not parse against the base
/// - non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use catalog_harvester::url::resolve_href;
/// use url::Url;
///
/// let base = Url::parse("https://shop.example.com/en_US/balls/272/").unwrap();
/// let url = resolve_href(&base, "/en_US/p/ball/15/").unwrap();
/// assert_eq!(url.as_str(), "https://shop.example.com/en_US/p/ball/15/");
/// ```
pub fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        _ => None,
    }
}

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

/// Product detail URLs look like `/p/<slug>/<digits>/`
static PRODUCT_PATH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/p/[^/]+/(\d+)/").expect("hardcoded regex pattern is valid"));

/// Canonical numeric identifier of a product
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extracts the product ID embedded in a product URL
///
/// # Extraction Order
///
/// 1. The digit run of a `/p/<slug>/<digits>/` path
/// 2. The first path segment made only of ASCII digits
///
/// Returns `None` when neither rule matches. Callers skip ID-dependent work
/// for that product instead of failing the run.
///
/// # Examples
///
/// ```
/// use catalog_harvester::url::extract_product_id;
///
/// let id = extract_product_id("https://site/en_US/p/slug-name/12345/").unwrap();
/// assert_eq!(id.as_str(), "12345");
/// assert!(extract_product_id("https://site/en_US/category/no-id-here/").is_none());
/// ```
pub fn extract_product_id(url: &str) -> Option<ProductId> {
    if let Some(captures) = PRODUCT_PATH_REGEX.captures(url) {
        return Some(ProductId(captures[1].to_string()));
    }

    let found = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.find(|s| is_all_digits(s)))
            .map(str::to_string),
        Err(_) => url.split('/').find(|s| is_all_digits(s)).map(str::to_string),
    };

    if found.is_none() {
        tracing::warn!("ProductIdNotFound: no product ID in {}", url);
    }

    found.map(ProductId)
}

fn is_all_digits(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

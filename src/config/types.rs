use serde::Deserialize;
use std::time::Duration;

/// Placeholder substituted with the product ID in endpoint templates
pub const PRODUCT_ID_PLACEHOLDER: &str = "{product_id}";

/// Main configuration structure for Catalog Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub listing: ListingSelectors,
    #[serde(default)]
    pub api: ApiConfig,
    pub output: OutputConfig,
    /// Category entry points, crawled in order
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL that API endpoints and relative variant URLs are joined to
    #[serde(rename = "base-url")]
    pub base_url: String,
}

/// Crawler timing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// How long a listing page may take to become ready (seconds)
    #[serde(rename = "page-timeout-secs")]
    pub page_timeout_secs: u64,

    /// Timeout for each facet or resolution API call (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Delay between two listing pages of the same category (milliseconds)
    #[serde(rename = "inter-page-delay-ms")]
    pub inter_page_delay_ms: u64,
}

impl CrawlerConfig {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn inter_page_delay(&self) -> Duration {
        Duration::from_millis(self.inter_page_delay_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_timeout_secs: 30,
            request_timeout_secs: 10,
            inter_page_delay_ms: 2000,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    pub name: String,
    pub version: String,
}

impl UserAgentConfig {
    /// Formats the header value as `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// CSS selectors describing the listing page markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// One element per product entry on a listing page
    #[serde(rename = "product-entry")]
    pub product_entry: String,

    /// Title link inside a product entry
    #[serde(rename = "title-link")]
    pub title_link: String,

    /// Image link inside a product entry; the earlier of the two links is used
    #[serde(rename = "image-link")]
    pub image_link: String,

    /// Pagination controls (buttons or links)
    pub pagination: String,

    /// Text that marks a pagination control as "next"
    #[serde(rename = "next-label")]
    pub next_label: String,

    /// Class that marks a pagination control as disabled
    #[serde(rename = "disabled-class")]
    pub disabled_class: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            product_entry: "article.product".to_string(),
            title_link: "a.product-title".to_string(),
            image_link: "a.product-image".to_string(),
            pagination: ".page-btn".to_string(),
            next_label: "Next".to_string(),
            disabled_class: "is-disabled".to_string(),
        }
    }
}

/// Backend API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Path template of the facet discovery endpoint
    #[serde(rename = "facet-endpoint")]
    pub facet_endpoint: String,

    /// Path template of the filter resolution endpoint
    #[serde(rename = "resolve-endpoint")]
    pub resolve_endpoint: String,

    /// Name of the mandatory size facet
    #[serde(rename = "size-facet")]
    pub size_facet: String,

    /// Name of the optional color facet
    #[serde(rename = "color-facet")]
    pub color_facet: String,
}

impl ApiConfig {
    pub fn facet_path(&self, product_id: &str) -> String {
        self.facet_endpoint.replace(PRODUCT_ID_PLACEHOLDER, product_id)
    }

    pub fn resolve_path(&self, product_id: &str) -> String {
        self.resolve_endpoint.replace(PRODUCT_ID_PLACEHOLDER, product_id)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            facet_endpoint: "/en_US/api/v1/product/v2/{product_id}/variant-filter/".to_string(),
            resolve_endpoint: "/en_US/xhr/product/get_filter_attributes/{product_id}".to_string(),
            size_facet: "Size".to_string(),
            color_facet: "Variant".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the delimited product URL file
    #[serde(rename = "products-path")]
    pub products_path: String,

    /// Path of the delimited variant URL file
    #[serde(rename = "variants-path")]
    pub variants_path: String,
}

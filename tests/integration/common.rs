//! Shared fixtures for the integration tests

use catalog_harvester::config::{
    ApiConfig, Config, CrawlerConfig, ListingSelectors, OutputConfig, SiteConfig, UserAgentConfig,
};
use std::path::Path;

/// Creates a test configuration pointed at a mock server
pub fn create_test_config(base_url: &str, categories: Vec<String>, out_dir: &Path) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
        },
        crawler: CrawlerConfig {
            page_timeout_secs: 1,
            request_timeout_secs: 1,
            inter_page_delay_ms: 0, // No pacing in tests
        },
        user_agent: UserAgentConfig {
            name: "TestBot".to_string(),
            version: "1.0.0".to_string(),
        },
        listing: ListingSelectors::default(),
        api: ApiConfig::default(),
        output: OutputConfig {
            products_path: out_dir.join("products.csv").display().to_string(),
            variants_path: out_dir.join("variants.csv").display().to_string(),
        },
        categories,
    }
}

/// Builds a listing page with one entry per product href
pub fn listing_html(products: &[&str], next: &str) -> String {
    let entries: String = products
        .iter()
        .map(|href| {
            format!(
                r#"<article class="product">
                    <a class="product-image" href="{href}"><img src="/i.jpg"></a>
                    <a class="product-title" href="{href}">Product</a>
                </article>"#
            )
        })
        .collect();

    format!(
        r#"<html><head><title>Listing</title></head><body>
        <div class="grid">{entries}</div>
        <nav class="pagination">
            <a class="page-btn" href="/previous/">Previous</a>
            {next}
        </nav>
        </body></html>"#
    )
}

pub fn next_link(href: &str) -> String {
    format!(r#"<a class="page-btn" href="{href}">Next</a>"#)
}

pub fn next_disabled() -> String {
    r#"<button class="page-btn is-disabled" disabled>Next</button>"#.to_string()
}

/// Facet discovery path for a product
pub fn facet_path(product_id: &str) -> String {
    format!("/en_US/api/v1/product/v2/{product_id}/variant-filter/")
}

/// Filter resolution path for a product
pub fn resolve_path(product_id: &str) -> String {
    format!("/en_US/xhr/product/get_filter_attributes/{product_id}")
}

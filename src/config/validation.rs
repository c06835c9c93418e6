use crate::config::types::{
    ApiConfig, Config, CrawlerConfig, ListingSelectors, OutputConfig, UserAgentConfig,
    PRODUCT_ID_PLACEHOLDER,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.site.base_url)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_listing_selectors(&config.listing)?;
    validate_api_config(&config.api)?;
    validate_output_config(&config.output)?;
    validate_categories(&config.categories)?;
    Ok(())
}

/// Validates crawler timing configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.page_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "page-timeout-secs must be >= 1, got {}",
            config.page_timeout_secs
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "user-agent name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    Ok(())
}

/// Every listing selector must be valid CSS
fn validate_listing_selectors(listing: &ListingSelectors) -> Result<(), ConfigError> {
    for (key, selector) in [
        ("product-entry", &listing.product_entry),
        ("title-link", &listing.title_link),
        ("image-link", &listing.image_link),
        ("pagination", &listing.pagination),
    ] {
        Selector::parse(selector)
            .map_err(|e| ConfigError::InvalidSelector(format!("{} '{}': {}", key, selector, e)))?;
    }

    if listing.next_label.trim().is_empty() {
        return Err(ConfigError::Validation(
            "next-label cannot be empty".to_string(),
        ));
    }

    if listing.disabled_class.trim().is_empty() {
        return Err(ConfigError::Validation(
            "disabled-class cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates endpoint templates and facet names
fn validate_api_config(api: &ApiConfig) -> Result<(), ConfigError> {
    for (key, template) in [
        ("facet-endpoint", &api.facet_endpoint),
        ("resolve-endpoint", &api.resolve_endpoint),
    ] {
        if !template.contains(PRODUCT_ID_PLACEHOLDER) {
            return Err(ConfigError::Validation(format!(
                "{} must contain {}, got '{}'",
                key, PRODUCT_ID_PLACEHOLDER, template
            )));
        }
    }

    if api.size_facet.is_empty() {
        return Err(ConfigError::Validation(
            "size-facet cannot be empty".to_string(),
        ));
    }

    if api.color_facet.is_empty() {
        return Err(ConfigError::Validation(
            "color-facet cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.products_path.is_empty() {
        return Err(ConfigError::Validation(
            "products-path cannot be empty".to_string(),
        ));
    }

    if config.variants_path.is_empty() {
        return Err(ConfigError::Validation(
            "variants-path cannot be empty".to_string(),
        ));
    }

    if config.products_path == config.variants_path {
        return Err(ConfigError::Validation(format!(
            "products-path and variants-path must differ, both are '{}'",
            config.products_path
        )));
    }

    Ok(())
}

/// Validates the category entry points
fn validate_categories(categories: &[String]) -> Result<(), ConfigError> {
    if categories.is_empty() {
        return Err(ConfigError::Validation(
            "at least one category URL is required".to_string(),
        ));
    }

    for category in categories {
        validate_http_url("category", category)?;
    }

    Ok(())
}

/// Parses a URL and requires an HTTP(S) scheme
fn validate_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", key, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use HTTP or HTTPS",
            key, value
        )));
    }

    Ok(())
}

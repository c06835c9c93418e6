//! Variant resolver - expands a product into its variant URLs
//!
//! For every size × color combination the resolver asks the backend's filter
//! resolution endpoint for the canonical variant URL. A failed combination is
//! logged and skipped. Whatever happens, a product maps to at least one URL:
//! when nothing resolves, the product URL itself is returned.

use crate::config::{ApiConfig, Config};
use crate::url::{extract_product_id, ProductId};
use crate::variants::types::{enumerate_combinations, ResolveResponse, VariantCombination};
use crate::variants::VariantFacet;
use reqwest::Client;
use std::collections::BTreeSet;
use std::time::Duration;
use thiserror::Error;
use tracing::Instrument;
use url::Url;

/// Errors for a single resolution call
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cannot build resolution endpoint: {0}")]
    Endpoint(#[source] url::ParseError),

    #[error("resolution call timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("resolution endpoint returned HTTP {0}")]
    Status(u16),

    #[error("resolution response has no url")]
    MissingUrl,

    #[error("undecodable resolution response: {0}")]
    Decode(String),

    #[error("resolved url '{url}' is not valid: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Why a product fell back to its own URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackReason {
    /// No product ID could be extracted, so the API cannot be called
    MissingProductId,

    /// The facets carry no size facet
    MissingSizeFacet,

    /// Every combination failed, or there were none to try
    NoVariantResolved,
}

/// Outcome of resolving one product
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Never empty
    pub urls: BTreeSet<String>,

    /// Number of resolution calls issued
    pub attempted: usize,

    /// Number of calls that produced a URL
    pub resolved: usize,

    pub fallback: Option<FallbackReason>,
}

impl Resolution {
    fn with_fallback(product_url: &str, reason: FallbackReason, attempted: usize) -> Self {
        Self {
            urls: BTreeSet::from([product_url.to_string()]),
            attempted,
            resolved: 0,
            fallback: Some(reason),
        }
    }

    pub fn into_urls(self) -> BTreeSet<String> {
        self.urls
    }
}

/// Resolves variant combinations through the filter resolution endpoint
#[derive(Debug, Clone)]
pub struct VariantResolver {
    client: Client,
    base_url: Url,
    api: ApiConfig,
    timeout: Duration,
}

impl VariantResolver {
    pub fn new(client: Client, base_url: Url, api: ApiConfig, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            api,
            timeout,
        }
    }

    /// Builds a resolver from the run configuration
    pub fn from_config(client: Client, config: &Config) -> Result<Self, url::ParseError> {
        Ok(Self::new(
            client,
            Url::parse(&config.site.base_url)?,
            config.api.clone(),
            config.crawler.request_timeout(),
        ))
    }

    /// Expands a product into its resolved variant URLs
    ///
    /// # Algorithm
    ///
    /// 1. Extract the product ID, else fall back
    /// 2. Find the size facet by name, else fall back
    /// 3. Find the color facet by name; absent means size-only combinations
    /// 4. Issue one resolution call per combination, size outer, color inner
    /// 5. Fall back if no call produced a URL
    pub async fn resolve(&self, product_url: &str, facets: &[VariantFacet]) -> Resolution {
        let product_id = extract_product_id(product_url);
        self.resolve_product(product_url, product_id.as_ref(), facets)
            .await
    }

    /// Same as [`resolve`](Self::resolve), for callers that already
    /// extracted the product ID
    pub async fn resolve_product(
        &self,
        product_url: &str,
        product_id: Option<&ProductId>,
        facets: &[VariantFacet],
    ) -> Resolution {
        let span = tracing::info_span!("product", url = %product_url);
        self.resolve_inner(product_url, product_id, facets)
            .instrument(span)
            .await
    }

    async fn resolve_inner(
        &self,
        product_url: &str,
        product_id: Option<&ProductId>,
        facets: &[VariantFacet],
    ) -> Resolution {
        let Some(product_id) = product_id else {
            tracing::debug!("Keeping product URL {} without a product ID", product_url);
            return Resolution::with_fallback(product_url, FallbackReason::MissingProductId, 0);
        };

        let Some(size) = facets.iter().find(|f| f.name == self.api.size_facet) else {
            tracing::warn!("No size variants found for {}", product_url);
            return Resolution::with_fallback(product_url, FallbackReason::MissingSizeFacet, 0);
        };
        let color = facets.iter().find(|f| f.name == self.api.color_facet);

        let combinations = enumerate_combinations(size, color);
        let mut urls = BTreeSet::new();
        let mut resolved = 0;

        for combination in &combinations {
            match self.resolve_combination(product_id, combination).await {
                Ok(variant_url) => {
                    tracing::info!("Generated variant URL: {}", variant_url);
                    resolved += 1;
                    urls.insert(variant_url.into());
                }
                Err(e) => {
                    tracing::error!(
                        "Variant {:?} of {} not resolved: {}",
                        combination.filters,
                        product_url,
                        e
                    );
                }
            }
        }

        if urls.is_empty() {
            tracing::warn!("No variant URLs generated for {}", product_url);
            return Resolution::with_fallback(
                product_url,
                FallbackReason::NoVariantResolved,
                combinations.len(),
            );
        }

        Resolution {
            urls,
            attempted: combinations.len(),
            resolved,
            fallback: None,
        }
    }

    /// Issues one resolution call and returns the absolute variant URL
    async fn resolve_combination(
        &self,
        product_id: &ProductId,
        combination: &VariantCombination,
    ) -> Result<Url, ResolveError> {
        let endpoint = self
            .base_url
            .join(&self.api.resolve_path(product_id.as_str()))
            .map_err(ResolveError::Endpoint)?;

        let response = self
            .client
            .post(endpoint)
            .json(&combination.request())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let decoded: ResolveResponse =
            serde_json::from_str(&body).map_err(|e| ResolveError::Decode(e.to_string()))?;

        let path = decoded
            .url
            .filter(|url| !url.trim().is_empty())
            .ok_or(ResolveError::MissingUrl)?;

        self.base_url
            .join(path.trim())
            .map_err(|source| ResolveError::InvalidUrl { url: path, source })
    }

    fn classify(&self, error: reqwest::Error) -> ResolveError {
        if error.is_timeout() {
            ResolveError::Timeout(self.timeout)
        } else {
            ResolveError::Transport(error)
        }
    }
}

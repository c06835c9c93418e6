use crate::config::{ApiConfig, Config};
use crate::url::ProductId;
use crate::variants::VariantFacet;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur while fetching a product's facets
#[derive(Debug, Error)]
pub enum FacetError {
    #[error("cannot build facet endpoint for product {product_id}: {source}")]
    Endpoint {
        product_id: String,
        #[source]
        source: url::ParseError,
    },

    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("facet endpoint {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("facet endpoint {url} returned an undecodable body: {message}")]
    Decode { url: String, message: String },
}

/// Client for the per-product facet discovery endpoint
///
/// One request per call, no retry.
#[derive(Debug, Clone)]
pub struct FacetClient {
    client: Client,
    base_url: Url,
    api: ApiConfig,
    timeout: Duration,
}

impl FacetClient {
    pub fn new(client: Client, base_url: Url, api: ApiConfig, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            api,
            timeout,
        }
    }

    /// Builds a facet client from the run configuration
    pub fn from_config(client: Client, config: &Config) -> Result<Self, url::ParseError> {
        Ok(Self::new(
            client,
            Url::parse(&config.site.base_url)?,
            config.api.clone(),
            config.crawler.request_timeout(),
        ))
    }

    /// Fetches the facets describing a product's variants
    ///
    /// Elements of the returned array that do not have the facet shape are
    /// skipped; a body that is not an array is a [`FacetError::Decode`].
    pub async fn fetch_facets(&self, product_id: &ProductId) -> Result<Vec<VariantFacet>, FacetError> {
        let endpoint = self
            .base_url
            .join(&self.api.facet_path(product_id.as_str()))
            .map_err(|source| FacetError::Endpoint {
                product_id: product_id.to_string(),
                source,
            })?;

        let response = self
            .client
            .get(endpoint.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| FacetError::Transport {
                url: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FacetError::Status {
                url: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FacetError::Transport {
            url: endpoint.to_string(),
            source,
        })?;

        let facets = decode_facets(&body).map_err(|message| FacetError::Decode {
            url: endpoint.to_string(),
            message,
        })?;

        tracing::debug!("Product {} has {} facets", product_id, facets.len());
        Ok(facets)
    }
}

/// Decodes a facet array element by element
fn decode_facets(body: &str) -> Result<Vec<VariantFacet>, String> {
    let elements: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| e.to_string())?;

    Ok(elements
        .into_iter()
        .filter_map(|element| match serde_json::from_value::<VariantFacet>(element) {
            Ok(facet) => Some(facet),
            Err(e) => {
                tracing::debug!("Ignoring malformed facet: {}", e);
                None
            }
        })
        .collect())
}

//! Discovery pipeline - the two-stage harvest run
//!
//! Stage one crawls every category and builds the product URL set. Stage
//! two expands each product into its variant URLs. Each set is persisted
//! once its stage completes. Everything runs sequentially: one category,
//! one product and one resolution call at a time.

use crate::config::Config;
use crate::crawler::{CategoryCrawler, PageRenderer};
use crate::output::{OutputHandler, RunSummary, UrlKind};
use crate::state::DiscoverySets;
use crate::url::extract_product_id;
use crate::variants::{FacetClient, VariantResolver};
use crate::Result;
use reqwest::Client;
use url::Url;

/// Orchestrates category crawling and variant expansion for one site
pub struct DiscoveryPipeline<R> {
    crawler: CategoryCrawler<R>,
    facets: FacetClient,
    resolver: VariantResolver,
    sets: DiscoverySets,
    summary: RunSummary,
}

impl<R: PageRenderer> DiscoveryPipeline<R> {
    pub fn new(crawler: CategoryCrawler<R>, facets: FacetClient, resolver: VariantResolver) -> Self {
        Self {
            crawler,
            facets,
            resolver,
            sets: DiscoverySets::new(),
            summary: RunSummary::start(),
        }
    }

    /// Builds the pipeline from the run configuration
    ///
    /// # Arguments
    ///
    /// * `config` - A validated configuration
    /// * `renderer` - Renderer used for listing pages
    /// * `client` - HTTP client shared by the facet and resolution calls
    pub fn from_config(config: &Config, renderer: R, client: Client) -> Result<Self> {
        Ok(Self::new(
            CategoryCrawler::from_config(renderer, config)?,
            FacetClient::from_config(client.clone(), config)?,
            VariantResolver::from_config(client, config)?,
        ))
    }

    /// The sets accumulated by the latest run
    pub fn sets(&self) -> &DiscoverySets {
        &self.sets
    }

    /// Runs both stages and persists each set as soon as it is complete
    ///
    /// Failures of single categories, products or combinations are logged
    /// and absorbed. Only an output failure aborts the run.
    pub async fn run(
        &mut self,
        categories: &[Url],
        output: &mut dyn OutputHandler,
    ) -> Result<RunSummary> {
        self.reset();

        tracing::info!("Product stage: {} categories", categories.len());
        self.discover_products(categories).await;
        output.write_urls(UrlKind::Product, self.sets.products())?;

        let products: Vec<String> = self.sets.products().iter().cloned().collect();
        tracing::info!("Variant stage: {} products", products.len());
        self.expand_variants(&products).await;
        output.write_urls(UrlKind::Variant, self.sets.variants())?;

        self.summary.finish();
        Ok(self.summary.clone())
    }

    /// Runs only the variant stage over an already persisted product list
    pub async fn run_variants_only(
        &mut self,
        products: Vec<String>,
        output: &mut dyn OutputHandler,
    ) -> Result<RunSummary> {
        self.reset();

        self.sets.add_products(products);
        self.summary.products = self.sets.products().len();

        let products: Vec<String> = self.sets.products().iter().cloned().collect();
        tracing::info!("Variant stage: {} products", products.len());
        self.expand_variants(&products).await;
        output.write_urls(UrlKind::Variant, self.sets.variants())?;

        self.summary.finish();
        Ok(self.summary.clone())
    }

    /// Crawls every category and merges its product URLs into the set
    pub async fn discover_products(&mut self, categories: &[Url]) {
        for category in categories {
            let crawl = self.crawler.crawl(category).await;
            self.summary.record_category(&crawl);

            if crawl.termination.is_abandoned() {
                tracing::error!(
                    "Category {} abandoned after {} pages; keeping {} URLs",
                    category,
                    crawl.pages_visited,
                    crawl.product_urls.len()
                );
            }

            let added = self.sets.add_products(crawl.product_urls);
            tracing::info!(
                "Category {} added {} new product URLs (total {})",
                category,
                added,
                self.sets.products().len()
            );
        }

        self.summary.products = self.sets.products().len();
    }

    /// Expands each product into its variant URLs and merges them into the set
    ///
    /// A product whose ID cannot be extracted, or whose facets cannot be
    /// fetched, is still handed to the resolver with no facets so that it
    /// falls back to its own URL.
    pub async fn expand_variants(&mut self, products: &[String]) {
        for (index, product_url) in products.iter().enumerate() {
            tracing::info!("Processing product {}/{}: {}", index + 1, products.len(), product_url);

            let product_id = extract_product_id(product_url);
            let facets = match &product_id {
                Some(product_id) => match self.facets.fetch_facets(product_id).await {
                    Ok(facets) => facets,
                    Err(e) => {
                        tracing::error!("Facets unavailable for {}: {}", product_url, e);
                        Vec::new()
                    }
                },
                None => Vec::new(),
            };

            let resolution = self
                .resolver
                .resolve_product(product_url, product_id.as_ref(), &facets)
                .await;
            self.summary.record_resolution(&resolution);
            self.sets.add_variants(resolution.into_urls());
        }

        self.summary.variants = self.sets.variants().len();
    }

    fn reset(&mut self) {
        self.sets = DiscoverySets::new();
        self.summary = RunSummary::start();
    }
}

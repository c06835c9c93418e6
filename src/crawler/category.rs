//! Category crawler - walks one paginated category listing
//!
//! The crawl is a state machine driven through a [`CategoryCursor`]:
//! render the page, require product entries, collect their detail links,
//! then follow the "next" control until pagination ends.

use crate::config::Config;
use crate::crawler::fetcher::{PageRenderer, RenderError};
use crate::crawler::parser::{ListingParser, NextControl};
use crate::state::{CategoryCursor, CrawlPhase};
use crate::{ConfigError, HarvestError};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::Instrument;
use url::Url;

/// Why the crawl of a category ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The "next" control was marked disabled
    NextDisabled,

    /// No usable "next" control on the last page
    NoNextControl,

    /// The "next" control pointed back at the current page
    SameDestination,

    /// The last page never showed product entries
    NoProducts,

    /// A hard failure abandoned the category
    Abandoned { reason: String },
}

impl Termination {
    /// Returns true if the category ended because of a failure
    pub fn is_abandoned(&self) -> bool {
        matches!(self, Self::Abandoned { .. })
    }
}

/// Result of crawling one category
#[derive(Debug, Clone)]
pub struct CategoryCrawl {
    pub category_url: Url,

    /// Product URLs gathered across all visited pages
    pub product_urls: BTreeSet<String>,

    /// Number of listing pages fetched
    pub pages_visited: u32,

    pub termination: Termination,
}

/// Walks category listings through a [`PageRenderer`]
pub struct CategoryCrawler<R> {
    renderer: R,
    parser: ListingParser,
    page_timeout: Duration,
    inter_page_delay: Duration,
}

impl<R: PageRenderer> CategoryCrawler<R> {
    pub fn new(
        renderer: R,
        parser: ListingParser,
        page_timeout: Duration,
        inter_page_delay: Duration,
    ) -> Self {
        Self {
            renderer,
            parser,
            page_timeout,
            inter_page_delay,
        }
    }

    /// Builds a crawler from the run configuration
    pub fn from_config(renderer: R, config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(
            renderer,
            ListingParser::new(&config.listing)?,
            config.crawler.page_timeout(),
            config.crawler.inter_page_delay(),
        ))
    }

    /// Crawls every page of one category
    ///
    /// Never fails: a hard error ends the category with
    /// [`Termination::Abandoned`] and keeps the URLs gathered so far.
    pub async fn crawl(&self, category_url: &Url) -> CategoryCrawl {
        let span = tracing::info_span!("category", url = %category_url);
        self.crawl_inner(category_url).instrument(span).await
    }

    async fn crawl_inner(&self, category_url: &Url) -> CategoryCrawl {
        let mut cursor = CategoryCursor::new(category_url.clone());
        let mut product_urls = BTreeSet::new();

        let termination = loop {
            match self.crawl_page(&mut cursor, &mut product_urls).await {
                Ok(Some(termination)) => break termination,
                Ok(None) => tokio::time::sleep(self.inter_page_delay).await,
                Err(e) => {
                    tracing::error!(
                        "Abandoning category {} at page {} ({}): {}",
                        category_url,
                        cursor.page_index(),
                        cursor.current_url(),
                        e
                    );
                    break Termination::Abandoned {
                        reason: e.to_string(),
                    };
                }
            }
        };
        cursor.terminate();

        tracing::info!(
            "Category crawl completed. Total pages: {}, URLs: {}, end: {:?}",
            cursor.page_index(),
            product_urls.len(),
            termination
        );

        CategoryCrawl {
            category_url: category_url.clone(),
            product_urls,
            pages_visited: cursor.page_index(),
            termination,
        }
    }

    /// Runs one Fetching → CheckingNext cycle
    ///
    /// Returns `Ok(None)` when the cursor moved on to a next page.
    async fn crawl_page(
        &self,
        cursor: &mut CategoryCursor,
        product_urls: &mut BTreeSet<String>,
    ) -> Result<Option<Termination>, HarvestError> {
        let page_index = cursor.start_page()?;
        let page_url = cursor.current_url().clone();
        tracing::info!("Scraping page {}: {}", page_index, page_url);

        let rendered = match self.renderer.render(&page_url, self.page_timeout).await {
            Ok(rendered) => rendered,
            Err(RenderError::Timeout { url, timeout }) => {
                tracing::warn!("Page {} not ready after {:?}; no products found", url, timeout);
                return Ok(Some(Termination::NoProducts));
            }
            Err(e) => return Err(e.into()),
        };

        cursor.transition(CrawlPhase::CheckingNoProducts)?;
        let listing = self.parser.parse(&rendered.html, &rendered.final_url);
        if listing.entries.is_empty() {
            tracing::warn!("No products found on page {}", page_url);
            return Ok(Some(Termination::NoProducts));
        }

        cursor.transition(CrawlPhase::ExtractingProducts)?;
        tracing::info!("Number of products on the page: {}", listing.entries.len());
        for (index, entry) in listing.entries.into_iter().enumerate() {
            match entry {
                Ok(url) => {
                    tracing::debug!("Product {}: URL captured - {}", index + 1, url);
                    product_urls.insert(url.into());
                }
                Err(e) => {
                    tracing::warn!("Skipping product {} on {}: {}", index + 1, page_url, e);
                }
            }
        }

        cursor.transition(CrawlPhase::CheckingNext)?;
        let termination = match listing.next {
            NextControl::Disabled => {
                tracing::info!("The 'Next' control is disabled. Pagination ends.");
                Termination::NextDisabled
            }
            NextControl::Enabled(Some(next)) if &next != cursor.current_url() => {
                tracing::info!("Proceeding to next page: {}", next);
                cursor.follow(next)?;
                return Ok(None);
            }
            NextControl::Enabled(Some(_)) => {
                tracing::info!("'Next' points at the current page. Pagination ends.");
                Termination::SameDestination
            }
            NextControl::Enabled(None) | NextControl::Absent => {
                tracing::info!("No 'Next' destination. Pagination ends.");
                Termination::NoNextControl
            }
        };

        Ok(Some(termination))
    }
}

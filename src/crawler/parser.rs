//! Listing page parser
//!
//! This module reads a rendered category listing and extracts:
//! - One detail-page link per product entry
//! - The state of the "next" pagination control

use crate::config::ListingSelectors;
use crate::url::resolve_href;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

/// Why a single product entry yielded no link
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("entry has neither a title link nor an image link")]
    MissingLink,

    #[error("entry link '{0}' does not resolve to a page URL")]
    InvalidHref(String),
}

/// State of the "next" pagination control on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextControl {
    /// A next control is present and marked disabled
    Disabled,

    /// An enabled next control; `None` when it exposes no usable destination
    Enabled(Option<Url>),

    /// No next control on the page
    Absent,
}

/// Extracted information from a listing page
#[derive(Debug, Clone)]
pub struct ListingPage {
    /// One result per product entry, in document order
    pub entries: Vec<Result<Url, EntryError>>,

    /// Pagination state
    pub next: NextControl,
}

/// Listing parser with selectors compiled once per run
#[derive(Debug, Clone)]
pub struct ListingParser {
    product_entry: Selector,
    /// Title and image link roles as one selector list, matched in document order
    entry_link: Selector,
    pagination: Selector,
    next_label: String,
    disabled_class: String,
}

impl ListingParser {
    /// Compiles the configured selectors
    pub fn new(selectors: &ListingSelectors) -> Result<Self, ConfigError> {
        Ok(Self {
            product_entry: compile("product-entry", &selectors.product_entry)?,
            entry_link: compile_entry_link(selectors)?,
            pagination: compile("pagination", &selectors.pagination)?,
            next_label: selectors.next_label.clone(),
            disabled_class: selectors.disabled_class.clone(),
        })
    }

    /// Parses a listing document
    ///
    /// # Arguments
    ///
    /// * `html` - The rendered page markup
    /// * `page_url` - The page URL relative links are resolved against
    ///
    /// # Example
    ///
    /// ```
    /// use catalog_harvester::config::ListingSelectors;
    /// use catalog_harvester::crawler::{ListingParser, NextControl};
    /// use url::Url;
    ///
    /// let parser = ListingParser::new(&ListingSelectors::default()).unwrap();
    /// let html = r#"<article class="product"><a class="product-title" href="/p/ball/7/">Ball</a></article>
    ///               <button class="page-btn is-disabled">Next</button>"#;
    /// let page = parser.parse(html, &Url::parse("https://shop.example.com/c/1/").unwrap());
    ///
    /// assert_eq!(page.entries.len(), 1);
    /// assert_eq!(page.next, NextControl::Disabled);
    /// ```
    pub fn parse(&self, html: &str, page_url: &Url) -> ListingPage {
        let document = Html::parse_document(html);

        let entries = document
            .select(&self.product_entry)
            .map(|entry| self.entry_link(entry, page_url))
            .collect();

        let next = self.next_control(&document, page_url);

        ListingPage { entries, next }
    }

    /// Resolves an entry's detail link from whichever link role comes first
    fn entry_link(&self, entry: ElementRef<'_>, page_url: &Url) -> Result<Url, EntryError> {
        let href = entry
            .select(&self.entry_link)
            .find_map(|link| link.value().attr("href"))
            .ok_or(EntryError::MissingLink)?;

        resolve_href(page_url, href).ok_or_else(|| EntryError::InvalidHref(href.to_string()))
    }

    /// Applies next-page detection in fixed priority order
    ///
    /// 1. Any "next" control carrying the disabled class wins
    /// 2. Otherwise the first enabled "next" control with a usable href
    /// 3. Otherwise the control is absent, or enabled without a destination
    fn next_control(&self, document: &Html, page_url: &Url) -> NextControl {
        let next_controls: Vec<ElementRef<'_>> = document
            .select(&self.pagination)
            .filter(|control| self.is_next(control))
            .collect();

        if next_controls.is_empty() {
            return NextControl::Absent;
        }

        if next_controls.iter().any(|control| self.is_disabled(control)) {
            return NextControl::Disabled;
        }

        let destination = next_controls
            .iter()
            .filter_map(|control| control.value().attr("href"))
            .find_map(|href| resolve_href(page_url, href));

        NextControl::Enabled(destination)
    }

    fn is_next(&self, control: &ElementRef<'_>) -> bool {
        control.text().collect::<String>().contains(&self.next_label)
    }

    fn is_disabled(&self, control: &ElementRef<'_>) -> bool {
        control
            .value()
            .classes()
            .any(|class| class == self.disabled_class)
    }
}

fn compile_entry_link(selectors: &ListingSelectors) -> Result<Selector, ConfigError> {
    compile("title-link", &selectors.title_link)?;
    compile("image-link", &selectors.image_link)?;
    compile(
        "title-link, image-link",
        &format!("{}, {}", selectors.title_link, selectors.image_link),
    )
}

fn compile(key: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("{} '{}': {}", key, selector, e)))
}

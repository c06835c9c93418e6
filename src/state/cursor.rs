/// Crawl phase and cursor definitions for walking one category listing
use crate::HarvestError;
use std::fmt;
use url::Url;

/// Represents the phase of a category crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// The current listing page is being rendered
    Fetching,

    /// Waiting for at least one product entry on the rendered page
    CheckingNoProducts,

    /// Collecting product links from the page's entries
    ExtractingProducts,

    /// Deciding whether pagination continues
    CheckingNext,

    /// The crawl of this category is over; never left once entered
    Terminal,
}

impl CrawlPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal)
    }

    /// Returns true if the state machine allows moving from `self` to `to`
    ///
    /// Any non-terminal phase may end the crawl. Otherwise phases only move
    /// forward within a page, and `CheckingNext` loops back to `Fetching`.
    pub fn can_transition_to(&self, to: CrawlPhase) -> bool {
        match (self, to) {
            (Self::Terminal, _) => false,
            (_, Self::Terminal) => true,
            (Self::Fetching, Self::CheckingNoProducts) => true,
            (Self::CheckingNoProducts, Self::ExtractingProducts) => true,
            (Self::ExtractingProducts, Self::CheckingNext) => true,
            (Self::CheckingNext, Self::Fetching) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::CheckingNoProducts => "checking_no_products",
            Self::ExtractingProducts => "extracting_products",
            Self::CheckingNext => "checking_next",
            Self::Terminal => "terminal",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a crawl inside one category's paginated listing
#[derive(Debug, Clone)]
pub struct CategoryCursor {
    category_url: Url,
    current_url: Url,
    page_index: u32,
    phase: CrawlPhase,
}

impl CategoryCursor {
    /// Creates a cursor positioned on the category's first page
    pub fn new(category_url: Url) -> Self {
        Self {
            current_url: category_url.clone(),
            category_url,
            page_index: 0,
            phase: CrawlPhase::Fetching,
        }
    }

    pub fn category_url(&self) -> &Url {
        &self.category_url
    }

    pub fn current_url(&self) -> &Url {
        &self.current_url
    }

    /// Number of pages fetched so far (1-based once the first fetch starts)
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Records the fetch of `current_url` and returns the new page index
    pub fn start_page(&mut self) -> Result<u32, HarvestError> {
        if self.phase != CrawlPhase::Fetching {
            return Err(HarvestError::InvalidTransition {
                from: self.phase,
                to: CrawlPhase::Fetching,
            });
        }
        self.page_index += 1;
        Ok(self.page_index)
    }

    /// Moves to another phase, rejecting transitions the state machine forbids
    pub fn transition(&mut self, to: CrawlPhase) -> Result<(), HarvestError> {
        if !self.phase.can_transition_to(to) {
            return Err(HarvestError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        self.phase = to;
        Ok(())
    }

    /// Points the cursor at the next listing page and returns to `Fetching`
    pub fn follow(&mut self, next_url: Url) -> Result<(), HarvestError> {
        self.transition(CrawlPhase::Fetching)?;
        self.current_url = next_url;
        Ok(())
    }

    /// Ends the crawl; idempotent
    pub fn terminate(&mut self) {
        self.phase = CrawlPhase::Terminal;
    }
}

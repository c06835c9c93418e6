use std::collections::BTreeSet;

/// The two deduplicated URL sets accumulated over one pipeline run
///
/// Dedup is on the exact URL string. Sets are ordered so that persisted
/// output is stable between runs over the same catalog.
#[derive(Debug, Clone, Default)]
pub struct DiscoverySets {
    products: BTreeSet<String>,
    variants: BTreeSet<String>,
}

impl DiscoverySets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges product URLs into the set, returning how many were new
    pub fn add_products<I>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        union_count(&mut self.products, urls)
    }

    /// Merges variant URLs into the set, returning how many were new
    pub fn add_variants<I>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        union_count(&mut self.variants, urls)
    }

    pub fn products(&self) -> &BTreeSet<String> {
        &self.products
    }

    pub fn variants(&self) -> &BTreeSet<String> {
        &self.variants
    }
}

fn union_count<I>(set: &mut BTreeSet<String>, urls: I) -> usize
where
    I: IntoIterator<Item = String>,
{
    urls.into_iter().filter(|url| set.insert(url.clone())).count()
}

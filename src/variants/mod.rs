//! Variant expansion: facet discovery and combination resolution
//!
//! - `FacetClient` fetches the facets (size, color, ...) of a product
//! - `VariantResolver` turns those facets into resolved variant URLs

mod facets;
mod resolver;
mod types;

pub use facets::{FacetClient, FacetError};
pub use resolver::{FallbackReason, Resolution, ResolveError, VariantResolver};
pub use types::{
    enumerate_combinations, FacetOption, ResolveRequest, ResolveResponse, VariantCombination,
    VariantFacet,
};

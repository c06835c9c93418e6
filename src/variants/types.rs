//! Typed records for the facet and resolution endpoints

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A named product attribute with its selectable options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VariantFacet {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    pub name: String,

    /// Options in the order the backend lists them
    #[serde(default)]
    pub options: Vec<FacetOption>,
}

/// One selectable value of a facet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FacetOption {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    pub label: Option<String>,
}

/// Ids arrive as JSON numbers or strings; both are kept as strings
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(serde_json::Number),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

/// One concrete option choice per relevant facet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantCombination {
    /// Id of the size facet (the attribute under test)
    pub size_facet_id: String,

    /// Id of the chosen size option (the value under test)
    pub size_option_id: String,

    /// Facet id to option id, for every facet present in the combination
    pub filters: BTreeMap<String, String>,
}

impl VariantCombination {
    /// Builds the payload of the resolution call
    pub fn request(&self) -> ResolveRequest<'_> {
        ResolveRequest {
            attribute: &self.size_facet_id,
            value: &self.size_option_id,
            filters: &self.filters,
        }
    }
}

/// Enumerates size options × color options
///
/// Size is the outer loop and color the inner loop, both in backend order.
/// Without a color facet the color list collapses to a single "no selection"
/// placeholder and no color entry is put in the filters.
pub fn enumerate_combinations(
    size: &VariantFacet,
    color: Option<&VariantFacet>,
) -> Vec<VariantCombination> {
    let color_choices: Vec<Option<(&VariantFacet, &FacetOption)>> = match color {
        Some(facet) => facet.options.iter().map(|o| Some((facet, o))).collect(),
        None => vec![None],
    };

    let mut combinations = Vec::with_capacity(size.options.len() * color_choices.len());
    for size_option in &size.options {
        for color_choice in &color_choices {
            let mut filters = BTreeMap::new();
            filters.insert(size.id.clone(), size_option.id.clone());
            if let Some((facet, option)) = color_choice {
                filters.insert(facet.id.clone(), option.id.clone());
            }

            combinations.push(VariantCombination {
                size_facet_id: size.id.clone(),
                size_option_id: size_option.id.clone(),
                filters,
            });
        }
    }
    combinations
}

/// Payload of the filter resolution endpoint
#[derive(Debug, Serialize)]
pub struct ResolveRequest<'a> {
    pub attribute: &'a str,
    pub value: &'a str,
    pub filters: &'a BTreeMap<String, String>,
}

/// Body returned by the filter resolution endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveResponse {
    #[serde(default)]
    pub url: Option<String>,
}

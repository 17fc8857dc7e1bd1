use serde::{Deserialize, Serialize};

use crate::shared::pagination::Page;

/// Число credentials с данным значением поля
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: u64,
}

/// Counts per facet field, largest first. Categories use `type::value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCounts {
    #[serde(default)]
    pub category: Vec<FacetCount>,
    #[serde(default)]
    pub credential_type_id: Vec<FacetCount>,
    #[serde(default)]
    pub issuer_id: Vec<FacetCount>,
}

impl FacetCounts {
    pub fn count_of(facet: &[FacetCount], value: &str) -> Option<u64> {
        facet.iter().find(|f| f.value == value).map(|f| f.count)
    }
}

/// Response of `GET /api/v2/search/credential/topic/facets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetResults<T> {
    pub facets: FacetCounts,
    pub objects: Page<T>,
}

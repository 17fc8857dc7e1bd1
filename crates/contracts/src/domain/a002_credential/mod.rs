pub mod aggregate;
pub mod facets;
pub mod filter;

pub use aggregate::{CredentialId, CredentialSearchResult, CredentialTypeRef, IssuerRef, NameSuggestion};
pub use facets::{FacetCount, FacetCounts, FacetResults};
pub use filter::{
    AutocompleteParams, CategoryFilter, CredentialCriteria, CredentialFilter, CredentialOrdering,
    CredentialSearchParams, OrderField, StatusFilter,
};

use std::collections::HashMap;

use super::repository;
use crate::domain::a001_topic::repository as topic_repository;
use contracts::domain::a001_topic::Name;
use contracts::domain::a002_credential::{
    AutocompleteParams, CredentialSearchParams, CredentialSearchResult, FacetResults,
    NameSuggestion,
};
use contracts::shared::pagination::{LimitedResults, Page, PageRequest, RESULT_LIMIT};

pub const TOPIC_SEARCH_PATH: &str = "/api/v2/search/credential/topic";
pub const TOPIC_FACETS_PATH: &str = "/api/v2/search/credential/topic/facets";

/// Ошибки поиска; handlers отображают их в HTTP статусы
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Bad filter value (400)
    #[error("{0}")]
    InvalidParams(String),
    /// Page outside the result set (404)
    #[error("{0}")]
    PageNotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

fn group_names(names: Vec<topic_repository::names::Model>) -> HashMap<i64, Vec<Name>> {
    let mut grouped: HashMap<i64, Vec<Name>> = HashMap::new();
    for name in names {
        if let Some(credential_id) = name.credential_id {
            grouped.entry(credential_id).or_default().push(name.into());
        }
    }
    grouped
}

/// Credentials of topics, paginated
///
/// `query` is the raw query string, reused for the next/previous links.
pub async fn search_topic_credentials(
    params: &CredentialSearchParams,
    query: Option<&str>,
) -> Result<Page<CredentialSearchResult>, SearchError> {
    search_page(params, query, TOPIC_SEARCH_PATH).await
}

/// Same page as [`search_topic_credentials`] plus facet counts of the whole match
pub async fn search_topic_facets(
    params: &CredentialSearchParams,
    query: Option<&str>,
) -> Result<FacetResults<CredentialSearchResult>, SearchError> {
    let objects = search_page(params, query, TOPIC_FACETS_PATH).await?;
    let criteria = params.criteria().map_err(SearchError::InvalidParams)?;
    let facets = repository::facet_counts(&criteria).await?;
    Ok(FacetResults { facets, objects })
}

async fn search_page(
    params: &CredentialSearchParams,
    query: Option<&str>,
    path: &str,
) -> Result<Page<CredentialSearchResult>, SearchError> {
    let criteria = params.criteria().map_err(SearchError::InvalidParams)?;
    let request = PageRequest::parse(params.page.as_deref(), params.page_size.as_deref())
        .map_err(SearchError::PageNotFound)?;

    let total = repository::count(&criteria).await?;
    let window = request.window(total).map_err(SearchError::PageNotFound)?;
    let models = repository::search(&criteria, &window).await?;

    let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
    let mut names = group_names(topic_repository::names_for_credentials(&ids).await?);
    let results = models
        .into_iter()
        .map(|m| {
            let credential_names = names.remove(&m.id).unwrap_or_default();
            m.into_search_result(credential_names)
        })
        .collect();

    tracing::debug!(
        "credential search: total={}, page={}/{}",
        total,
        window.page,
        window.num_pages
    );
    Ok(Page::new(&window, results, path, query))
}

/// Name suggestions, at most [`RESULT_LIMIT`]
pub async fn autocomplete(
    params: &AutocompleteParams,
) -> Result<LimitedResults<NameSuggestion>, SearchError> {
    let (revoked, inactive, latest) = params.statuses().map_err(SearchError::InvalidParams)?;
    let category = params.category().map_err(SearchError::InvalidParams)?;
    let Some(term) = params.term() else {
        return Ok(LimitedResults::new(Vec::new()));
    };
    let items = repository::autocomplete(
        term,
        revoked,
        inactive,
        latest,
        category.as_ref(),
        RESULT_LIMIT as u64,
    )
    .await?;
    Ok(LimitedResults::new(items))
}

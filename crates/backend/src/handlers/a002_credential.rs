use axum::{
    extract::{Query, RawQuery},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::domain::a002_credential::service::{self, SearchError};
use contracts::domain::a002_credential::{
    AutocompleteParams, CredentialSearchParams, CredentialSearchResult, FacetResults,
    NameSuggestion,
};
use contracts::shared::pagination::{LimitedResults, Page};

type ApiError = (StatusCode, Json<Value>);

fn into_response_error(e: SearchError) -> ApiError {
    let status = match &e {
        SearchError::InvalidParams(_) => StatusCode::BAD_REQUEST,
        SearchError::PageNotFound(_) => StatusCode::NOT_FOUND,
        SearchError::Internal(err) => {
            tracing::error!("Credential search failed: {:#}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let detail = match status {
        StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
        _ => e.to_string(),
    };
    (status, Json(json!({ "detail": detail })))
}

/// GET /api/v2/search/credential/topic
pub async fn search_topic(
    Query(params): Query<CredentialSearchParams>,
    RawQuery(query): RawQuery,
) -> Result<Json<Page<CredentialSearchResult>>, ApiError> {
    service::search_topic_credentials(&params, query.as_deref())
        .await
        .map(Json)
        .map_err(into_response_error)
}

/// GET /api/v2/search/credential/topic/facets
pub async fn search_topic_facets(
    Query(params): Query<CredentialSearchParams>,
    RawQuery(query): RawQuery,
) -> Result<Json<FacetResults<CredentialSearchResult>>, ApiError> {
    service::search_topic_facets(&params, query.as_deref())
        .await
        .map(Json)
        .map_err(into_response_error)
}

/// GET /api/v2/search/autocomplete
pub async fn autocomplete(
    Query(params): Query<AutocompleteParams>,
) -> Result<Json<LimitedResults<NameSuggestion>>, ApiError> {
    service::autocomplete(&params)
        .await
        .map(Json)
        .map_err(into_response_error)
}

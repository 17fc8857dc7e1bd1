use axum::{extract::Path, http::StatusCode, Json};

use crate::domain::a001_topic;
use contracts::domain::a001_topic::{Topic, TopicLookup};

async fn respond(lookup: TopicLookup) -> Result<Json<Topic>, StatusCode> {
    match a001_topic::service::get_formatted(&lookup).await {
        Ok(Some(topic)) => Ok(Json(topic)),
        Ok(None) => {
            tracing::debug!("Topic {} not found", lookup.to_ident());
            Err(StatusCode::NOT_FOUND)
        }
        Err(e) => {
            tracing::error!("Failed to load topic {}: {}", lookup.to_ident(), e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/v2/topic/:id/formatted
pub async fn get_formatted(Path(id): Path<String>) -> Result<Json<Topic>, StatusCode> {
    match TopicLookup::parse(&id) {
        Ok(lookup) => respond(lookup).await,
        Err(e) => {
            tracing::debug!("Bad topic id '{}': {}", id, e);
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// GET /api/v2/topic/ident/:type/:source_id/formatted
pub async fn get_formatted_by_ident(
    Path((topic_type, source_id)): Path<(String, String)>,
) -> Result<Json<Topic>, StatusCode> {
    respond(TopicLookup::BySource {
        topic_type,
        source_id,
    })
    .await
}

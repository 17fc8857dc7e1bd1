use axum::{extract::State, Json};

use crate::routes::AppState;
use contracts::shared::display_config::DisplayConfig;

/// GET /api/v2/config
pub async fn display_config(State(state): State<AppState>) -> Json<DisplayConfig> {
    Json(state.display.clone())
}

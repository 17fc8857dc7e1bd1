use std::path::PathBuf;

use axum::{
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use contracts::shared::display_config::DisplayConfig;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::{handlers, system};

/// Состояние, общее для всех обработчиков
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub display: DisplayConfig,
}

/// Конфигурация всех роутов приложения
///
/// `static_dir` - собранный фронтенд; неизвестные пути отдают его
/// `index.html`, чтобы клиентский роутер обработал `/topic/...`.
pub fn configure_routes(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let router = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/v2/config", get(handlers::config::display_config))
        // A001 Topic
        .route(
            "/api/v2/topic/:id/formatted",
            get(handlers::a001_topic::get_formatted),
        )
        .route(
            "/api/v2/topic/ident/:type/:source_id/formatted",
            get(handlers::a001_topic::get_formatted_by_ident),
        )
        // A002 Credential search
        .route(
            "/api/v2/search/credential/topic",
            get(handlers::a002_credential::search_topic),
        )
        .route(
            "/api/v2/search/credential/topic/facets",
            get(handlers::a002_credential::search_topic_facets),
        )
        .route(
            "/api/v2/search/autocomplete",
            get(handlers::a002_credential::autocomplete),
        )
        .with_state(state);

    let router = match static_dir {
        Some(dir) => {
            let index = dir.join("index.html");
            router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)))
        }
        None => router,
    };

    router
        .layer(middleware::from_fn(system::middleware::request_logger))
        .layer(cors)
}

//! HTTP API against a temporary SQLite database seeded from `data/seed.json`.
//!
//! The database connection is process-global, so everything runs inside a
//! single test.

use std::path::PathBuf;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use backend::routes::{configure_routes, AppState};
use backend::shared::data::db;
use backend::system::initialization::seed_if_empty;
use contracts::shared::display_config::DisplayConfig;

fn seed_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/seed.json")
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn ids(body: &Value) -> Vec<i64> {
    body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect()
}

fn texts(body: &Value, key: &str) -> Vec<String> {
    body[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["text"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn registry_api() {
    let dir = tempfile::tempdir().unwrap();
    db::initialize_database(&dir.path().join("registry.db"))
        .await
        .unwrap();

    let stats = seed_if_empty(&seed_path()).await.unwrap().unwrap();
    assert_eq!(stats.topics, 3);
    assert_eq!(stats.credentials, 18);
    assert_eq!(stats.categories, 11);
    // a populated database is left alone
    assert!(seed_if_empty(&seed_path()).await.unwrap().is_none());

    let state = AppState {
        display: DisplayConfig {
            display_timezone: Some("America/Vancouver".into()),
            default_topic_type: Some("registration".into()),
        },
    };
    let app = configure_routes(state, None);

    // --- service endpoints ---
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = get(&app, "/api/v2/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display_timezone"], "America/Vancouver");
    assert_eq!(body["default_topic_type"], "registration");

    // --- topics ---
    let (status, body) = get(&app, "/api/v2/topic/1/formatted").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source_id"], "BC0000001");
    assert_eq!(body["type"], "registration");
    // the name of the revoked credential is hidden
    assert_eq!(
        texts(&body, "names"),
        vec!["Acme Holdings Ltd.", "Acme Holdings Ltd.", "Acme Hardware", "Acme Holdings Ltd."]
    );

    let (status, body) = get(&app, "/api/v2/topic/ident/registration/BC0000002/formatted").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 2);
    let names = texts(&body, "names");
    assert_eq!(names.len(), 10);
    assert_eq!(names[0], "Northern Lights Bakery Inc.");
    assert_eq!(body["names"][1]["language"], "fr");

    let (status, _) = get(&app, "/api/v2/topic/999/formatted").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&app, "/api/v2/topic/abc/formatted").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&app, "/api/v2/topic/ident/registration/XX404/formatted").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // --- credential search ---
    // defaults: not revoked, not inactive, latest; newest first
    let (status, body) = get(&app, "/api/v2/search/credential/topic?topic_id=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(ids(&body), vec![3, 2]);
    assert_eq!(body["results"][0]["credential_type"]["issuer"]["name"], "City of Victoria");
    assert_eq!(body["results"][0]["names"][0]["text"], "Acme Hardware");
    assert!(body["next"].is_null());
    assert!(body["previous"].is_null());

    // empty values lift the status constraints
    let (_, body) = get(
        &app,
        "/api/v2/search/credential/topic?topic_id=1&revoked=&inactive=&latest=",
    )
    .await;
    assert_eq!(body["total"], 4);

    let (_, body) = get(
        &app,
        "/api/v2/search/credential/topic?topic_id=1&revoked=true&latest=any&ordering=revoked_date",
    )
    .await;
    assert_eq!(ids(&body), vec![1]);
    assert_eq!(body["results"][0]["revoked_date"], "2020-06-01T09:00:00Z");

    // pagination
    let (status, body) = get(
        &app,
        "/api/v2/search/credential/topic?topic_id=2&revoked=&latest=&page_size=5&page=3",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 13);
    assert_eq!(body["page"], 3);
    assert_eq!(body["first_index"], 11);
    assert_eq!(body["last_index"], 13);
    assert_eq!(ids(&body).len(), 3);
    assert!(body["next"].is_null());
    assert_eq!(
        body["previous"],
        "/api/v2/search/credential/topic?topic_id=2&revoked=&latest=&page_size=5&page=2"
    );

    let (_, body) = get(
        &app,
        "/api/v2/search/credential/topic?topic_id=2&revoked=&latest=&page_size=5",
    )
    .await;
    assert_eq!(
        body["next"],
        "/api/v2/search/credential/topic?topic_id=2&revoked=&latest=&page_size=5&page=2"
    );

    // name matches credential names and topic source ids
    let (_, body) = get(&app, "/api/v2/search/credential/topic?name=hardware").await;
    assert_eq!(ids(&body), vec![3]);
    let (_, body) = get(&app, "/api/v2/search/credential/topic?name=BC0000002").await;
    assert_eq!(body["total"], 8);

    let (status, body) = get(&app, "/api/v2/search/credential/topic?topic_id=2&page=9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].as_str().unwrap().starts_with("Invalid page"));
    let (status, _) = get(&app, "/api/v2/search/credential/topic?page=abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&app, "/api/v2/search/credential/topic?revoked=maybe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get(&app, "/api/v2/search/credential/topic?topic_id=x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // issuer and category filters
    let (_, body) = get(&app, "/api/v2/search/credential/topic?issuer_id=1").await;
    assert_eq!(ids(&body), vec![18, 2, 17]);
    let (_, body) = get(&app, "/api/v2/search/credential/topic?category=entity_type::BC").await;
    assert_eq!(ids(&body), vec![2, 17]);
    let (_, body) = get(
        &app,
        "/api/v2/search/credential/topic?category=licence_class::Food&revoked=&latest=",
    )
    .await;
    assert_eq!(body["total"], 8);
    let (status, body) = get(&app, "/api/v2/search/credential/topic?category=entity_type").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("type::value"));
    let (status, _) = get(&app, "/api/v2/search/credential/topic?issuer_id=x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // --- facets ---
    let (status, body) = get(&app, "/api/v2/search/credential/topic/facets").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["objects"]["total"], 11);
    assert_eq!(
        body["facets"]["category"],
        serde_json::json!([
            {"value": "licence_class::Food", "count": 7},
            {"value": "entity_type::BC", "count": 2},
            {"value": "entity_type::FM", "count": 1},
        ])
    );
    assert_eq!(
        body["facets"]["credential_type_id"],
        serde_json::json!([{"value": "2", "count": 8}, {"value": "1", "count": 3}])
    );
    assert_eq!(body["facets"]["issuer_id"], body["facets"]["credential_type_id"]);

    // counts follow the filters of the result set
    let (_, body) = get(&app, "/api/v2/search/credential/topic/facets?topic_id=1").await;
    assert_eq!(ids(&body["objects"]), vec![3, 2]);
    assert_eq!(
        body["facets"]["issuer_id"],
        serde_json::json!([{"value": "1", "count": 1}, {"value": "2", "count": 1}])
    );
    assert_eq!(
        body["facets"]["category"],
        serde_json::json!([{"value": "entity_type::BC", "count": 1}])
    );

    let (_, body) = get(
        &app,
        "/api/v2/search/credential/topic/facets?category=licence_class::Food&issuer_id=2&page_size=5",
    )
    .await;
    assert_eq!(body["objects"]["total"], 7);
    assert_eq!(
        body["objects"]["next"],
        "/api/v2/search/credential/topic/facets?category=licence_class::Food&issuer_id=2&page_size=5&page=2"
    );
    assert_eq!(
        body["facets"]["issuer_id"],
        serde_json::json!([{"value": "2", "count": 7}])
    );

    let (status, _) = get(&app, "/api/v2/search/credential/topic/facets?category=::").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // --- autocomplete ---
    let (status, body) = get(&app, "/api/v2/search/autocomplete?q=acme").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["first_index"], 1);
    assert_eq!(body["last_index"], 3);
    assert_eq!(
        texts(&body, "results"),
        vec!["Acme Hardware", "Acme Holdings Ltd.", "Acme Holdings Ltd."]
    );

    let (_, body) = get(&app, "/api/v2/search/autocomplete?q=bakery").await;
    assert_eq!(body["total"], 8);
    let (_, body) = get(&app, "/api/v2/search/autocomplete?q=bakery&revoked=&latest=").await;
    assert_eq!(body["total"], 10);

    let (_, body) = get(&app, "/api/v2/search/autocomplete").await;
    assert_eq!(body["total"], 0);
    let (status, _) = get(&app, "/api/v2/search/autocomplete?q=acme&latest=yes").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = get(
        &app,
        "/api/v2/search/autocomplete?q=bakery&category=licence_class::Food",
    )
    .await;
    assert_eq!(body["total"], 7);
    let (_, body) = get(&app, "/api/v2/search/autocomplete?q=acme&category=entity_type::BC").await;
    assert_eq!(texts(&body, "results"), vec!["Acme Holdings Ltd."]);
    let (status, _) = get(&app, "/api/v2/search/autocomplete?q=acme&category=BC").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

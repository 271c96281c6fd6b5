mod common;

use std::{path::PathBuf, sync::Arc};

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use cinematch_api::{
    api::{create_router, AppState, RankingSettings},
    catalog::JsonFileSource,
    config::Config,
};

fn create_test_server() -> (TestServer, PathBuf) {
    let path = common::temp_catalog_path();
    common::write_catalog(&path, &common::catalog_json(common::CATALOG_SIZE));

    let state = AppState::new(
        common::snapshot(),
        Arc::new(JsonFileSource::new(&path)),
        RankingSettings::from(&Config::default()),
    );
    let server = TestServer::new(create_router(state)).unwrap();
    (server, path)
}

#[tokio::test]
async fn test_health_check() {
    let (server, _) = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["items"], common::CATALOG_SIZE);
    assert_eq!(body["dimension"], common::GENRE_OFFSET + common::GENRES.len());
}

#[tokio::test]
async fn test_default_recommendations() {
    let (server, _) = create_test_server();
    let response = server.post("/api/recommendations").json(&json!({})).await;
    response.assert_status_ok();

    let body: Value = response.json();
    let default_k = Config::default().default_top_k;
    assert_eq!(body["count"], default_k);
    assert_eq!(body["recommendations"].as_array().unwrap().len(), default_k);
    assert_eq!(body["user_id"], "anonymous");
    assert_eq!(body["mode"], "personalized");

    let first = &body["recommendations"][0];
    assert!(first["id"].is_u64());
    assert!(first["title"].is_string());
    assert!(first["score"].is_f64());
    assert!(first["explanation"].as_str().unwrap().starts_with("Popular"));
    assert!(first.get("features").is_none());
}

#[tokio::test]
async fn test_recommendations_exclude_rated_items() {
    let (server, _) = create_test_server();
    let response = server
        .post("/api/recommendations")
        .json(&json!({
            "user_id": "u-17",
            "liked_ids": [1, 2],
            "disliked_ids": [3],
            "excluded_ids": [4, 999],
            "k": 30
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["user_id"], "u-17");
    assert_eq!(body["count"], common::CATALOG_SIZE - 4);
    for rec in body["recommendations"].as_array().unwrap() {
        let id = rec["id"].as_u64().unwrap();
        assert!(id > 4, "rated item {} returned", id);
    }
}

#[tokio::test]
async fn test_genre_mode_filters_results() {
    let (server, _) = create_test_server();
    let response = server
        .post("/api/recommendations")
        .json(&json!({ "mode": "genre", "filter_genre": "Sci-Fi", "k": 10 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["mode"], "genre:Sci-Fi");
    let recs = body["recommendations"].as_array().unwrap();
    assert!(!recs.is_empty());
    for rec in recs {
        let genres: Vec<&str> = rec["genres"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(genres.contains(&"Sci-Fi"));
    }
}

#[tokio::test]
async fn test_invalid_mode_requests_are_rejected() {
    let (server, _) = create_test_server();

    for body in [
        json!({ "mode": "surprise_me" }),
        json!({ "mode": "genre" }),
        json!({ "mode": "trending", "filter_genre": "comedy" }),
        json!({ "mode": "year", "year_bucket": "1800s" }),
        json!({ "k": 0 }),
        json!({ "k": Config::default().max_top_k + 1 }),
        json!({ "runtime_min": 150, "runtime_max": 90 }),
    ] {
        let response = server.post("/api/recommendations").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let error: Value = response.json();
        assert!(error["error"].is_string(), "no error message for {}", body);
    }
}

#[tokio::test]
async fn test_list_genres_and_services() {
    let (server, _) = create_test_server();

    let genres: Vec<String> = server.get("/api/genres").await.json();
    assert_eq!(genres, common::GENRES.to_vec());

    let services: Vec<String> = server.get("/api/services").await.json();
    assert_eq!(services, vec!["Hulu", "Max", "Netflix"]);
}

#[tokio::test]
async fn test_get_movie() {
    let (server, _) = create_test_server();

    let response = server.get("/api/movies/3").await;
    response.assert_status_ok();
    let movie: Value = response.json();
    assert_eq!(movie["id"], 3);
    assert_eq!(movie["title"], "Movie 3");

    let response = server.get("/api/movies/4040").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reload_swaps_catalog() {
    let (server, path) = create_test_server();
    common::write_catalog(&path, &common::catalog_json(8));

    let response = server.post("/admin/catalog/reload").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["items"], 8);

    let health: Value = server.get("/health").await.json();
    assert_eq!(health["items"], 8);

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn test_failed_reload_keeps_serving_old_catalog() {
    let (server, path) = create_test_server();
    std::fs::write(&path, "{ not json").unwrap();

    let response = server.post("/admin/catalog/reload").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let health: Value = server.get("/health").await.json();
    assert_eq!(health["items"], common::CATALOG_SIZE);

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (server, _) = create_test_server();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-abc-123"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "trace-abc-123");

    let response = server.get("/health").await;
    let generated = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(generated.to_str().unwrap()).is_ok());
}

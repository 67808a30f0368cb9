use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use reelmatch_core::{VectorizerOptions, Weights};
use reelmatch_server::{build_app, ServerConfig};
use serde_json::Value;
use std::fs;
use tempfile::{tempdir, TempDir};

const CATALOG: &str = "\
show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description
s1,Movie,A,,,,,,,90 min,Drama,a lonely detective
s2,Movie,B,,,,,,,95 min,Drama,a lonely detective story
s3,Movie,C,,,,,,,80 min,Comedy,a happy clown
s4,TV Show,Apex,Unknown Director,Unknown Cast,US,\"March 2, 2020\",2020,TV-14,1 Season,,
";

fn build_tiny_app() -> (TempDir, Router) {
    build_app_from(CATALOG)
}

fn build_app_from(csv: &str) -> (TempDir, Router) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("titles.csv");
    fs::write(&path, csv).unwrap();
    let config = ServerConfig {
        catalog_path: path,
        default_weights: Weights::default(),
        vectorizer: VectorizerOptions::default(),
    };
    let app = build_app(&config).unwrap();
    (dir, app)
}

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = tower::ServiceExt::oneshot(app, req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn recommend_ranks_by_description() {
    let (_dir, app) = build_tiny_app();
    let (status, json) =
        call(app, "/recommend?title=A&genreWeight=0&descWeight=1&directorWeight=0&castWeight=0&topN=2").await;
    assert_eq!(status, StatusCode::OK);
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["title"], "B");
    assert_eq!(arr[0]["similarity"], 100.0);
    assert_eq!(arr[0]["listed_in"], "Drama");
    assert!(arr.iter().all(|hit| hit["title"] != "A"));
}

#[tokio::test]
async fn recommend_unknown_title_is_empty_ok() {
    let (_dir, app) = build_tiny_app();
    let (status, json) = call(app, "/recommend?title=Nonexistent%20Title").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, Value::Array(vec![]));
}

#[tokio::test]
async fn recommend_zero_weights_is_bad_request() {
    let (_dir, app) = build_tiny_app();
    let (status, json) =
        call(app, "/recommend?title=A&genreWeight=0&descWeight=0&directorWeight=0&castWeight=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("weight"));
}

#[tokio::test]
async fn malformed_query_params_are_json_bad_request() {
    let (_dir, app) = build_tiny_app();
    for uri in ["/recommend?title=A&genreWeight=abc", "/recommend?title=A&topN=-1"] {
        let (status, json) = call(app.clone(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()), "{uri}");
    }
}

#[tokio::test]
async fn autocomplete_matches_prefix() {
    let (_dir, app) = build_tiny_app();
    let (status, json) = call(app.clone(), "/autocomplete?query=a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!(["A", "Apex"]));
    let (_, json) = call(app, "/autocomplete?query=").await;
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn heatmap_returns_png_or_404() {
    let (_dir, app) = build_tiny_app();
    let (status, json) = call(app.clone(), "/cosine-heatmap?title=A").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["heatmap"].as_str().unwrap().starts_with("data:image/png;base64,"));
    assert_eq!(json["labels"].as_array().unwrap().len(), 3);
    let (status, json) = call(app, "/cosine-heatmap?title=Missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn heatmap_on_single_title_catalog_is_404() {
    let (_dir, app) = build_app_from(
        "show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description\n\
         s1,Movie,Solo,,,,,,,60 min,Dramas,one quiet evening\n",
    );
    let (status, json) = call(app, "/cosine-heatmap?title=Solo").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "no other titles to compare with Solo");
}

#[tokio::test]
async fn feature_importance_reports_terms() {
    let (_dir, app) = build_tiny_app();
    let (status, json) = call(app.clone(), "/feature-importance?title=B").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["feature_chart"].as_str().unwrap().starts_with("data:image/png;base64,"));
    let terms: Vec<&str> = json["terms"].as_array().unwrap().iter().map(|t| t["term"].as_str().unwrap()).collect();
    assert_eq!(terms.len(), 3);
    assert!(terms.contains(&"story"));
    let (status, _) = call(app.clone(), "/feature-importance?title=Apex").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let (status, _) = call(app, "/feature-importance?title=Missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn genre_distribution_counts_tags() {
    let (_dir, app) = build_tiny_app();
    let (status, json) = call(app.clone(), "/genre-distribution?title=A").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["genre_chart"].as_str().unwrap().starts_with("data:image/png;base64,"));
    assert_eq!(json["genres"], serde_json::json!([{ "genre": "Drama", "count": 2 }]));
    let (status, _) = call(app, "/genre-distribution?title=Apex").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn item_and_health() {
    let (_dir, app) = build_tiny_app();
    let (status, json) = call(app.clone(), "/item?title=Apex").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_tv_show"], true);
    assert_eq!(json["date_added"], "2020-03-02");
    assert_eq!(json["genres"], serde_json::json!(["Unknown"]));
    let (status, _) = call(app.clone(), "/item?title=Nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let req = Request::get("/health").body(Body::empty()).unwrap();
    let resp = tower::ServiceExt::oneshot(app, req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[test]
fn missing_catalog_fails_at_startup() {
    let dir = tempdir().unwrap();
    let config = ServerConfig {
        catalog_path: dir.path().join("absent.csv"),
        default_weights: Weights::default(),
        vectorizer: VectorizerOptions::default(),
    };
    assert!(build_app(&config).is_err());
}

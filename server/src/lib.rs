use anyhow::Result;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use reelmatch_core::{Catalog, VectorizerOptions, Weights, DEFAULT_TOP_N};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod charts;
pub mod error;

use error::{ApiError, ApiResult};

const MAX_TOP_N: usize = 100;

/// Startup settings resolved from the command line.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub catalog_path: PathBuf,
    pub default_weights: Weights,
    pub vectorizer: VectorizerOptions,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub default_weights: Weights,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendParams {
    #[serde(default)]
    pub title: String,
    pub genre_weight: Option<f32>,
    pub desc_weight: Option<f32>,
    pub director_weight: Option<f32>,
    pub cast_weight: Option<f32>,
    pub top_n: Option<usize>,
}

#[derive(Deserialize)]
pub struct TitleParams {
    #[serde(default)]
    pub title: String,
}

#[derive(Deserialize)]
pub struct AutocompleteParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Serialize)]
pub struct RecommendationHit {
    pub title: String,
    pub listed_in: String,
    pub description: String,
    pub director: String,
    pub cast: String,
    pub similarity: f64,
}

#[derive(Serialize)]
pub struct ItemResponse {
    pub id: u32,
    pub title: String,
    pub kind: String,
    pub listed_in: String,
    pub genres: Vec<String>,
    pub description: String,
    pub director: String,
    pub cast: String,
    pub country: String,
    pub rating: String,
    pub release_year: Option<u16>,
    pub duration_minutes: u32,
    pub is_tv_show: bool,
    pub date_added: String,
}

/// Load the catalog named in `config` and build the router around it.
pub fn build_app(config: &ServerConfig) -> Result<Router> {
    let catalog = Catalog::load(&config.catalog_path, config.vectorizer)?;
    let state = AppState { catalog: Arc::new(catalog), default_weights: config.default_weights };
    Ok(router(state))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/recommend", get(recommend_handler))
        .route("/autocomplete", get(autocomplete_handler))
        .route("/cosine-heatmap", get(heatmap_handler))
        .route("/feature-importance", get(feature_importance_handler))
        .route("/genre-distribution", get(genre_distribution_handler))
        .route("/item", get(item_handler))
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// CORS_ALLOW_ORIGIN (comma-separated) or any origin.
fn cors_layer() -> CorsLayer {
    let any = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                any
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => any,
    }
}

pub async fn recommend_handler(
    State(state): State<AppState>,
    query: Result<Query<RecommendParams>, QueryRejection>,
) -> ApiResult<Json<Vec<RecommendationHit>>> {
    let Query(params) = query?;
    let defaults = state.default_weights;
    let weights = Weights::new(
        params.genre_weight.unwrap_or(defaults.genre),
        params.desc_weight.unwrap_or(defaults.description),
        params.director_weight.unwrap_or(defaults.director),
        params.cast_weight.unwrap_or(defaults.cast),
    );
    let top_n = params.top_n.unwrap_or(DEFAULT_TOP_N).clamp(1, MAX_TOP_N);
    let title = params.title.trim();

    let recs = state.catalog.recommend(title, &weights, top_n)?;
    tracing::debug!(title, hits = recs.len(), "recommend");
    let hits = recs
        .into_iter()
        .map(|r| RecommendationHit {
            title: r.item.title.clone(),
            listed_in: r.item.listed_in.clone(),
            description: r.item.description.clone(),
            director: r.item.director.clone(),
            cast: r.item.cast.clone(),
            similarity: r.similarity,
        })
        .collect();
    Ok(Json(hits))
}

pub async fn autocomplete_handler(
    State(state): State<AppState>,
    query: Result<Query<AutocompleteParams>, QueryRejection>,
) -> ApiResult<Json<Vec<String>>> {
    let Query(params) = query?;
    Ok(Json(state.catalog.autocomplete(&params.query).into_iter().map(str::to_string).collect()))
}

/// Run a CPU-bound chart job on the blocking pool.
async fn render<F>(job: F) -> ApiResult<String>
where
    F: FnOnce() -> Result<Vec<u8>> + Send + 'static,
{
    let png = tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| ApiError::Render(e.into()))?
        .map_err(ApiError::Render)?;
    Ok(charts::data_uri(&png))
}

pub async fn heatmap_handler(
    State(state): State<AppState>,
    query: Result<Query<TitleParams>, QueryRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Query(params) = query?;
    let title = params.title.trim();
    let grid = state.catalog.similarity_grid(title)?;
    let labels = grid.titles.clone();
    let caption = format!("Cosine Similarity Heatmap for '{title}'");
    let heatmap = render(move || charts::heatmap_png(&caption, &grid.titles, &grid.values)).await?;
    Ok(Json(serde_json::json!({ "heatmap": heatmap, "labels": labels })))
}

pub async fn feature_importance_handler(
    State(state): State<AppState>,
    query: Result<Query<TitleParams>, QueryRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Query(params) = query?;
    let title = params.title.trim();
    let terms = state.catalog.top_terms(title)?;
    let names: Vec<String> = terms.iter().map(|t| t.term.clone()).collect();
    let weights: Vec<f32> = terms.iter().map(|t| t.weight).collect();
    let caption = format!("Top TF-IDF Terms for '{title}'");
    let chart = render(move || charts::bar_chart_png(&caption, &names, &weights)).await?;
    Ok(Json(serde_json::json!({ "feature_chart": chart, "terms": terms })))
}

pub async fn genre_distribution_handler(
    State(state): State<AppState>,
    query: Result<Query<TitleParams>, QueryRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Query(params) = query?;
    let title = params.title.trim();
    let genres = state.catalog.genre_distribution(title)?;
    let names: Vec<String> = genres.iter().map(|g| g.genre.clone()).collect();
    let counts: Vec<usize> = genres.iter().map(|g| g.count).collect();
    let caption = format!("Genre Distribution for '{title}'");
    let chart = render(move || charts::pie_chart_png(&caption, &names, &counts)).await?;
    Ok(Json(serde_json::json!({ "genre_chart": chart, "genres": genres })))
}

pub async fn item_handler(
    State(state): State<AppState>,
    query: Result<Query<TitleParams>, QueryRejection>,
) -> ApiResult<Json<ItemResponse>> {
    let Query(params) = query?;
    let title = params.title.trim();
    let item = state
        .catalog
        .item(title)
        .ok_or_else(|| ApiError::NotFound(format!("title not found: {title}")))?;
    Ok(Json(ItemResponse {
        id: item.id,
        title: item.title.clone(),
        kind: item.kind.clone(),
        listed_in: item.listed_in.clone(),
        genres: item.genre_tags.clone(),
        description: item.description.clone(),
        director: item.director.clone(),
        cast: item.cast.clone(),
        country: item.country.clone(),
        rating: item.rating.clone(),
        release_year: item.release_year,
        duration_minutes: item.duration_minutes,
        is_tv_show: item.is_tv_show,
        date_added: item.date_added_iso(),
    }))
}

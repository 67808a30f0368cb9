use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reelmatch_core::QueryError;
use serde_json::json;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NoData(String),

    /// Chart rendering or a blocking task failed; details stay in the log.
    #[error("failed to render chart")]
    Render(anyhow::Error),
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::NotFound(_) | QueryError::NoGenreData(_) | QueryError::NoNeighbours(_) => {
                ApiError::NotFound(err.to_string())
            }
            QueryError::InvalidWeight { .. } | QueryError::DegenerateWeights => {
                ApiError::InvalidInput(err.to_string())
            }
            QueryError::NoData(_) => ApiError::NoData(err.to_string()),
        }
    }
}

/// Malformed query strings (`genreWeight=abc`, `topN=-1`) are caller errors.
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NoData(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Render(err) => {
                tracing::error!(error = ?err, "chart rendering failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

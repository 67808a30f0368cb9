/// Per-request failures raised by the query surface.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("title not found: {0}")]
    NotFound(String),

    #[error("invalid {field} weight: {value}")]
    InvalidWeight { field: &'static str, value: f32 },

    #[error("at least one weight must be greater than zero")]
    DegenerateWeights,

    #[error("no term data for {0}")]
    NoData(String),

    #[error("no genre data for {0}")]
    NoGenreData(String),

    #[error("no other titles to compare with {0}")]
    NoNeighbours(String),
}

pub type QueryResult<T> = Result<T, QueryError>;

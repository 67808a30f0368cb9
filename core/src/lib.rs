//! Content-based similarity engine over a static title catalog.
//!
//! A [`Catalog`] is loaded from CSV once, vectorizes genre, description,
//! director and cast into independent TF-IDF spaces, and precomputes one
//! cosine similarity matrix per field. Queries only read these structures.

pub mod catalog;
pub mod error;
pub mod item;
pub mod loader;
pub mod query;
pub mod recommend;
pub mod similarity;
pub mod tokenizer;
pub mod vectorizer;

pub use catalog::Catalog;
pub use error::{QueryError, QueryResult};
pub use item::{Field, Item, ItemId};
pub use query::{CatalogStats, GenreCount, SimilarityGrid, TermWeight};
pub use recommend::{Recommendation, Weights, DEFAULT_TOP_N};
pub use vectorizer::VectorizerOptions;

use crate::error::{QueryError, QueryResult};
use crate::item::Field;
use crate::Catalog;
use serde::Serialize;

pub const AUTOCOMPLETE_LIMIT: usize = 10;
pub const TOP_TERMS_LIMIT: usize = 10;
pub const HEATMAP_SIZE: usize = 9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermWeight {
    pub term: String,
    pub weight: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

/// Pairwise description similarity among the items closest to a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityGrid {
    pub titles: Vec<String>,
    pub values: Vec<Vec<f32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStats {
    pub field: Field,
    pub terms: usize,
    pub empty_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub items: usize,
    pub tv_shows: usize,
    pub fields: Vec<FieldStats>,
}

impl Catalog {
    pub fn autocomplete(&self, query: &str) -> Vec<&str> {
        if query.is_empty() {
            return Vec::new();
        }
        let prefix = query.to_lowercase();
        self.items()
            .iter()
            .filter(|it| it.title.to_lowercase().starts_with(&prefix))
            .take(AUTOCOMPLETE_LIMIT)
            .map(|it| it.title.as_str())
            .collect()
    }

    /// Highest-weighted description terms of an item.
    pub fn top_terms(&self, title: &str) -> QueryResult<Vec<TermWeight>> {
        let idx = self.lookup(title).ok_or_else(|| QueryError::NotFound(title.to_string()))?;
        let space = self.space(Field::Description);
        let mut terms: Vec<TermWeight> = space.vectors[idx]
            .iter()
            .filter(|p| p.weight > 0.0)
            .filter_map(|p| {
                let term = space.vocabulary.term(p.term_id)?;
                Some(TermWeight { term: term.to_string(), weight: p.weight })
            })
            .collect();
        if terms.is_empty() {
            return Err(QueryError::NoData(title.to_string()));
        }
        terms.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.term.cmp(&b.term))
        });
        terms.truncate(TOP_TERMS_LIMIT);
        Ok(terms)
    }

    /// Corpus-wide counts for each of the item's own genre tags.
    pub fn genre_distribution(&self, title: &str) -> QueryResult<Vec<GenreCount>> {
        let item = self.item(title).ok_or_else(|| QueryError::NotFound(title.to_string()))?;
        if !item.has_genre_data() {
            return Err(QueryError::NoGenreData(title.to_string()));
        }
        let mut counts: Vec<GenreCount> = Vec::with_capacity(item.genre_tags.len());
        for genre in &item.genre_tags {
            if counts.iter().any(|c| &c.genre == genre) {
                continue;
            }
            let count = self.items().iter().filter(|it| it.genre_tags.contains(genre)).count();
            counts.push(GenreCount { genre: genre.clone(), count });
        }
        Ok(counts)
    }

    /// The `HEATMAP_SIZE` nearest items by description (query excluded) and
    /// their pairwise description similarities. A catalog holding only the
    /// query item has no grid.
    pub fn similarity_grid(&self, title: &str) -> QueryResult<SimilarityGrid> {
        let idx = self.lookup(title).ok_or_else(|| QueryError::NotFound(title.to_string()))?;
        let matrix = self.matrix(Field::Description);
        let row = matrix.row(idx);
        let mut nearest: Vec<usize> = (0..self.len()).filter(|&j| j != idx).collect();
        nearest.sort_by(|&a, &b| row[b].partial_cmp(&row[a]).unwrap_or(std::cmp::Ordering::Equal));
        nearest.truncate(HEATMAP_SIZE);
        if nearest.is_empty() {
            return Err(QueryError::NoNeighbours(title.to_string()));
        }

        let titles = nearest.iter().map(|&j| self.items()[j].title.clone()).collect();
        let values = nearest
            .iter()
            .map(|&a| nearest.iter().map(|&b| matrix.get(a, b)).collect())
            .collect();
        Ok(SimilarityGrid { titles, values })
    }

    pub fn stats(&self) -> CatalogStats {
        let fields = Field::ALL
            .iter()
            .map(|&field| {
                let space = self.space(field);
                FieldStats {
                    field,
                    terms: space.vocabulary.len(),
                    empty_rows: space.vectors.iter().filter(|v| v.is_empty()).count(),
                }
            })
            .collect();
        CatalogStats {
            items: self.len(),
            tv_shows: self.items().iter().filter(|it| it.is_tv_show).count(),
            fields,
        }
    }
}

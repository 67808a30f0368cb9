use crate::error::{QueryError, QueryResult};
use crate::item::{Field, Item};
use crate::Catalog;
use serde::{Deserialize, Serialize};

/// Caller-supplied importance of each field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub genre: f32,
    pub description: f32,
    pub director: f32,
    pub cast: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self { genre: 1.0, description: 1.0, director: 1.0, cast: 1.0 }
    }
}

impl Weights {
    pub fn new(genre: f32, description: f32, director: f32, cast: f32) -> Self {
        Self { genre, description, director, cast }
    }

    pub fn get(&self, field: Field) -> f32 {
        match field {
            Field::Genre => self.genre,
            Field::Description => self.description,
            Field::Director => self.director,
            Field::Cast => self.cast,
        }
    }

    /// Scale the weights to sum to one. Negative or non-finite weights and
    /// an all-zero set are rejected.
    pub fn normalized(&self) -> QueryResult<Weights> {
        for field in Field::ALL {
            let value = self.get(field);
            if !value.is_finite() || value < 0.0 {
                return Err(QueryError::InvalidWeight { field: field.as_str(), value });
            }
        }
        // Summed in f64 so large finite weights cannot overflow the total.
        let total: f64 = Field::ALL.iter().map(|&f| self.get(f) as f64).sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(QueryError::DegenerateWeights);
        }
        let share = |value: f32| (value as f64 / total) as f32;
        Ok(Weights {
            genre: share(self.genre),
            description: share(self.description),
            director: share(self.director),
            cast: share(self.cast),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation<'a> {
    pub item: &'a Item,
    /// Score rescaled so the best returned match is 100, two decimals.
    pub similarity: f64,
}

pub const DEFAULT_TOP_N: usize = 10;

impl Catalog {
    /// Rank every other item by weighted field similarity to `title`.
    ///
    /// An unknown title is not an error: it yields an empty list.
    pub fn recommend(&self, title: &str, weights: &Weights, top_n: usize) -> QueryResult<Vec<Recommendation<'_>>> {
        let weights = weights.normalized()?;
        let Some(query) = self.lookup(title) else {
            return Ok(Vec::new());
        };

        let rows: Vec<(f64, &[f32])> = Field::ALL
            .iter()
            .map(|&f| (weights.get(f) as f64, self.matrix(f).row(query)))
            .collect();

        let mut scored: Vec<(usize, f64)> = (0..self.len())
            .filter(|&j| j != query)
            .map(|j| {
                let score = rows.iter().map(|(w, row)| w * row[j] as f64).sum::<f64>();
                (j, score)
            })
            .collect();
        // Stable sort keeps row order among equal scores.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_n);

        let max = scored.iter().map(|(_, s)| *s).fold(0.0f64, f64::max);
        let denom = if max > 0.0 { max } else { 1.0 };
        Ok(scored
            .into_iter()
            .map(|(j, score)| Recommendation {
                item: &self.items()[j],
                similarity: round2(score / denom * 100.0),
            })
            .collect())
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

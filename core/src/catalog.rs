use crate::item::{Field, Item};
use crate::loader::load_csv;
use crate::similarity::SimilarityMatrix;
use crate::vectorizer::{FieldSpace, FieldVectorizer, VectorizerOptions};
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

/// Immutable recommendation index: cleaned items plus one vector space and
/// one similarity matrix per text field. Built once, then only read.
#[derive(Debug)]
pub struct Catalog {
    items: Vec<Item>,
    title_index: HashMap<String, usize>,
    spaces: [FieldSpace; 4],
    matrices: [SimilarityMatrix; 4],
}

impl Catalog {
    pub fn load<P: AsRef<Path>>(path: P, options: VectorizerOptions) -> Result<Self> {
        let items = load_csv(path)?;
        Ok(Self::from_items(items, options))
    }

    pub fn from_items(items: Vec<Item>, options: VectorizerOptions) -> Self {
        let start = Instant::now();

        // First row wins for duplicate titles.
        let mut title_index = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            title_index.entry(item.title.clone()).or_insert(idx);
        }

        let vectorizer = FieldVectorizer::new(options);
        let spaces = Field::ALL.map(|field| {
            let texts: Vec<&str> = items.iter().map(|it| it.field_text(field)).collect();
            vectorizer.build(&texts)
        });
        let matrices = Field::ALL.map(|field| SimilarityMatrix::build(&spaces[field.index()].vectors));

        tracing::info!(
            items = items.len(),
            genre_terms = spaces[0].vocabulary.len(),
            description_terms = spaces[1].vocabulary.len(),
            director_terms = spaces[2].vocabulary.len(),
            cast_terms = spaces[3].vocabulary.len(),
            took_s = start.elapsed().as_secs_f64(),
            "catalog built"
        );
        Self { items, title_index, spaces, matrices }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Row index of the first item titled exactly `title`.
    pub fn lookup(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }

    pub fn item(&self, title: &str) -> Option<&Item> {
        self.lookup(title).map(|idx| &self.items[idx])
    }

    pub fn space(&self, field: Field) -> &FieldSpace {
        &self.spaces[field.index()]
    }

    pub fn matrix(&self, field: Field) -> &SimilarityMatrix {
        &self.matrices[field.index()]
    }
}

use crate::tokenizer::Tokenizer;
use std::collections::{BTreeMap, HashMap};

pub type TermId = u32;

/// Term weight in one row of a field space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Posting {
    pub term_id: TermId,
    pub weight: f32,
}

/// Sparse L2-normalized TF-IDF row, sorted by term id. Empty when the
/// field text had no indexable terms.
pub type TermWeightVector = Vec<Posting>;

#[derive(Debug, Clone, Copy)]
pub struct VectorizerOptions {
    pub stem: bool,
    /// Use `1 + ln(tf)` instead of the raw count.
    pub sublinear_tf: bool,
    /// Use `ln((1 + n) / (1 + df)) + 1` instead of `ln(n / df) + 1`.
    pub smooth_idf: bool,
}

impl Default for VectorizerOptions {
    fn default() -> Self {
        Self { stem: false, sublinear_tf: false, smooth_idf: true }
    }
}

/// Term to column mapping for one field. Terms are numbered in
/// lexicographic order.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    ids: HashMap<String, TermId>,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn id(&self, term: &str) -> Option<TermId> {
        self.ids.get(term).copied()
    }

    pub fn term(&self, id: TermId) -> Option<&str> {
        self.terms.get(id as usize).map(|s| s.as_str())
    }
}

/// A built field: vocabulary, idf per term, and one vector per item.
#[derive(Debug, Clone, Default)]
pub struct FieldSpace {
    pub vocabulary: Vocabulary,
    pub idf: Vec<f32>,
    pub vectors: Vec<TermWeightVector>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldVectorizer {
    options: VectorizerOptions,
}

impl FieldVectorizer {
    pub fn new(options: VectorizerOptions) -> Self {
        Self { options }
    }

    pub fn build<S: AsRef<str>>(&self, texts: &[S]) -> FieldSpace {
        let tokenizer = Tokenizer::new(self.options.stem);

        // Per-document raw counts; BTreeMap gives the sorted vocabulary for free.
        let docs: Vec<BTreeMap<String, u32>> = texts
            .iter()
            .map(|text| {
                let mut counts = BTreeMap::new();
                for token in tokenizer.tokenize(text.as_ref()) {
                    *counts.entry(token).or_insert(0u32) += 1;
                }
                counts
            })
            .collect();

        let mut df: BTreeMap<&str, u32> = BTreeMap::new();
        for counts in &docs {
            for term in counts.keys() {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let n = docs.len() as f32;
        let mut terms = Vec::with_capacity(df.len());
        let mut ids = HashMap::with_capacity(df.len());
        let mut idf = Vec::with_capacity(df.len());
        for (tid, (term, df_t)) in df.iter().enumerate() {
            let df_t = *df_t as f32;
            let w = if self.options.smooth_idf {
                ((1.0 + n) / (1.0 + df_t)).ln() + 1.0
            } else {
                (n / df_t).ln() + 1.0
            };
            terms.push(term.to_string());
            ids.insert(term.to_string(), tid as TermId);
            idf.push(w);
        }
        let vocabulary = Vocabulary { terms, ids };

        let vectors = docs
            .iter()
            .map(|counts| {
                let mut row: Vec<Posting> = counts
                    .iter()
                    .filter_map(|(term, &tf_raw)| {
                        let term_id = vocabulary.id(term)?;
                        let tf = if self.options.sublinear_tf {
                            1.0 + (tf_raw as f32).ln()
                        } else {
                            tf_raw as f32
                        };
                        Some(Posting { term_id, weight: tf * idf[term_id as usize] })
                    })
                    .collect();
                let norm = row.iter().map(|p| p.weight * p.weight).sum::<f32>().sqrt();
                if norm > 0.0 {
                    for p in row.iter_mut() {
                        p.weight /= norm;
                    }
                }
                row
            })
            .collect();

        FieldSpace { vocabulary, idf, vectors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_unit_length() {
        let space = FieldVectorizer::default().build(&["lonely detective", "lonely detective story", "happy clown"]);
        assert_eq!(space.vocabulary.len(), 5);
        for row in &space.vectors {
            let norm: f32 = row.iter().map(|p| p.weight * p.weight).sum();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn vocabulary_is_sorted_and_skips_stopwords() {
        let space = FieldVectorizer::default().build(&["the zebra and the apple", "mango"]);
        assert_eq!(space.vocabulary.term(0), Some("apple"));
        assert_eq!(space.vocabulary.term(2), Some("zebra"));
        assert_eq!(space.vocabulary.id("the"), None);
    }

    #[test]
    fn empty_text_yields_zero_row() {
        let space = FieldVectorizer::default().build(&["", "of the", "noir"]);
        assert!(space.vectors[0].is_empty());
        assert!(space.vectors[1].is_empty());
        assert_eq!(space.vectors[2].len(), 1);
    }

    #[test]
    fn rarer_terms_weigh_more() {
        let space = FieldVectorizer::default().build(&["heist crew", "heist", "heist"]);
        let row = &space.vectors[0];
        let heist = space.vocabulary.id("heist").unwrap();
        let crew = space.vocabulary.id("crew").unwrap();
        let w = |id| row.iter().find(|p| p.term_id == id).unwrap().weight;
        assert!(w(crew) > w(heist));
    }
}

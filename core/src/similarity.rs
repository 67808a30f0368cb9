use crate::vectorizer::TermWeightVector;

/// Dense all-pairs cosine similarity for one field, stored row-major.
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f32>,
}

impl SimilarityMatrix {
    /// Inner products of already L2-normalized rows.
    ///
    /// Walks per-term posting lists so only co-occurring pairs are touched;
    /// each contribution is written to `(i, j)` and `(j, i)` together which
    /// keeps the matrix exactly symmetric.
    pub fn build(vectors: &[TermWeightVector]) -> Self {
        let n = vectors.len();
        let mut data = vec![0.0f32; n * n];

        // Term ids are dense, so postings are indexed by id; walking them in
        // id order makes every cell's sum identical from run to run.
        let terms = vectors
            .iter()
            .flat_map(|row| row.iter().map(|p| p.term_id as usize + 1))
            .max()
            .unwrap_or(0);
        let mut postings: Vec<Vec<(usize, f32)>> = vec![Vec::new(); terms];
        for (doc, row) in vectors.iter().enumerate() {
            for p in row {
                postings[p.term_id as usize].push((doc, p.weight));
            }
        }

        for plist in &postings {
            for (a, &(i, wi)) in plist.iter().enumerate() {
                data[i * n + i] += wi * wi;
                for &(j, wj) in &plist[a + 1..] {
                    let c = wi * wj;
                    data[i * n + j] += c;
                    data[j * n + i] += c;
                }
            }
        }
        for v in data.iter_mut() {
            *v = v.clamp(0.0, 1.0);
        }
        Self { n, data }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::FieldVectorizer;

    #[test]
    fn diagonal_and_symmetry() {
        let space = FieldVectorizer::default().build(&[
            "space pirates raid a colony",
            "pirates bury treasure",
            "",
            "colony ship lost in space",
        ]);
        let m = SimilarityMatrix::build(&space.vectors);
        assert_eq!(m.len(), 4);
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(m.get(i, j), m.get(j, i));
                assert!((0.0..=1.0).contains(&m.get(i, j)));
            }
        }
        assert!((m.get(0, 0) - 1.0).abs() < 1e-5);
        assert!((m.get(3, 3) - 1.0).abs() < 1e-5);
        assert_eq!(m.get(2, 2), 0.0);
        assert_eq!(m.row(2).iter().sum::<f32>(), 0.0);
        assert!(m.get(0, 1) > 0.0);
        assert_eq!(m.get(1, 3), 0.0);
    }

    #[test]
    fn rebuild_is_bit_identical() {
        let space = FieldVectorizer::default().build(&[
            "storm over the harbor town",
            "harbor town fishermen brave the storm",
            "fishermen and a storm",
        ]);
        let a = SimilarityMatrix::build(&space.vectors);
        let b = SimilarityMatrix::build(&space.vectors);
        for i in 0..3 {
            let (ra, rb): (Vec<u32>, Vec<u32>) = (
                a.row(i).iter().map(|v| v.to_bits()).collect(),
                b.row(i).iter().map(|v| v.to_bits()).collect(),
            );
            assert_eq!(ra, rb);
        }
    }
}

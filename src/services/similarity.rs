use std::collections::{HashMap, HashSet};

use crate::models::MovieRecord;

/// English stop words excluded from the genre vocabulary.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have", "if",
    "in", "into", "is", "it", "its", "no", "not", "of", "on", "or", "our", "so", "such", "that",
    "the", "their", "then", "there", "these", "they", "this", "to", "was", "were", "will", "with",
];

/// Pairwise cosine similarity over TF-IDF weighted genre text.
///
/// Built once from the full movie collection and immutable afterwards, so
/// concurrent readers need no locking. The matrix is symmetric with a unit
/// diagonal for every movie whose genre text produced at least one term;
/// movies with empty genre text have an all-zero row.
pub struct SimilarityIndex {
    ids: Vec<u64>,
    rows: HashMap<u64, usize>,
    matrix: Vec<Vec<f64>>,
}

impl SimilarityIndex {
    /// Builds the index from the movie collection.
    ///
    /// Returns `None` for an empty collection; never panics or errors. Term
    /// weights use smoothed inverse document frequency,
    /// `ln((1 + n) / (1 + df)) + 1`, and vectors are L2-normalized so the
    /// cosine of a pair is a plain dot product.
    pub fn build(records: &[MovieRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let docs: Vec<Vec<String>> = records.iter().map(|r| tokenize(&r.genres)).collect();

        // Vocabulary in first-appearance order, with document frequencies.
        let mut vocab: HashMap<&str, usize> = HashMap::new();
        let mut df: Vec<usize> = Vec::new();
        for doc in &docs {
            let mut seen: HashSet<&str> = HashSet::new();
            for term in doc {
                let next = vocab.len();
                let column = *vocab.entry(term.as_str()).or_insert_with(|| {
                    df.push(0);
                    next
                });
                if seen.insert(term.as_str()) {
                    df[column] += 1;
                }
            }
        }

        let total_docs = docs.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&count| ((1.0 + total_docs) / (1.0 + count as f64)).ln() + 1.0)
            .collect();

        // One L2-normalized weight vector per movie.
        let vectors: Vec<Vec<f64>> = docs
            .iter()
            .map(|doc| {
                let mut weights = vec![0.0; vocab.len()];
                for term in doc {
                    let column = vocab[term.as_str()];
                    weights[column] += idf[column];
                }
                let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for w in &mut weights {
                        *w /= norm;
                    }
                }
                weights
            })
            .collect();

        // Full pairwise matrix; mirrored so symmetry is exact, with the
        // diagonal pinned to 1 for any non-zero vector.
        let n = vectors.len();
        let mut matrix = vec![vec![0.0; n]; n];
        for i in 0..n {
            let non_zero = vectors[i].iter().any(|&w| w != 0.0);
            matrix[i][i] = if non_zero { 1.0 } else { 0.0 };
            for j in (i + 1)..n {
                let dot: f64 = vectors[i]
                    .iter()
                    .zip(&vectors[j])
                    .map(|(a, b)| a * b)
                    .sum();
                matrix[i][j] = dot;
                matrix[j][i] = dot;
            }
        }

        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        let mut rows = HashMap::with_capacity(ids.len());
        for (index, &id) in ids.iter().enumerate() {
            rows.entry(id).or_insert(index);
        }

        Some(Self { ids, rows, matrix })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, movie_id: u64) -> bool {
        self.rows.contains_key(&movie_id)
    }

    /// Matrix row index for a movie id.
    pub fn row_index(&self, movie_id: u64) -> Option<usize> {
        self.rows.get(&movie_id).copied()
    }

    /// The similarity row for a movie, in collection order.
    pub fn row(&self, movie_id: u64) -> Option<&[f64]> {
        self.row_index(movie_id).map(|i| self.matrix[i].as_slice())
    }

    /// Movie id at a matrix row index.
    pub fn id_at(&self, index: usize) -> u64 {
        self.ids[index]
    }

    pub fn similarity(&self, a: u64, b: u64) -> Option<f64> {
        let i = self.row_index(a)?;
        let j = self.row_index(b)?;
        Some(self.matrix[i][j])
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .collect()
}

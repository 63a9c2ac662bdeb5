//! TF-IDF vectorization of feature soups and the all-pairs cosine matrix.

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use super::stop_words::ENGLISH_STOP_WORDS;

/// Sparse document vector: `(term index, weight)` sorted by term index
pub type SparseVector = Vec<(usize, f64)>;

fn stop_words() -> &'static HashSet<&'static str> {
    static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    STOP_WORDS.get_or_init(|| ENGLISH_STOP_WORDS.iter().copied().collect())
}

/// TF-IDF vectorizer fitted on the whole corpus.
///
/// Tokens are lowercase runs of at least two alphanumeric characters; stop
/// words are dropped before weighting. Weights are raw counts times the
/// smoothed idf `ln((1 + n) / (1 + df)) + 1`, L2-normalised per document.
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Splits text into the tokens used as vocabulary terms
    pub fn tokenize(text: &str) -> Vec<String> {
        let stop_words = stop_words();
        text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|token| token.chars().count() >= 2)
            .map(str::to_lowercase)
            .filter(|token| !stop_words.contains(token.as_str()))
            .collect()
    }

    /// Fits the vocabulary and idf weights, returning one vector per document
    pub fn fit_transform(documents: &[&str]) -> (Self, Vec<SparseVector>) {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|doc| Self::tokenize(doc)).collect();

        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&String> = tokens.iter().collect();
            for token in unique {
                *document_frequency.entry(token.clone()).or_insert(0) += 1;
            }
        }

        // BTreeMap iteration is sorted, so term indices are stable across builds
        let n_docs = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (index, (term, df)) in document_frequency.into_iter().enumerate() {
            idf.push(((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        let vectorizer = Self { vocabulary, idf };
        let vectors = tokenized
            .iter()
            .map(|tokens| vectorizer.weigh(tokens))
            .collect();
        (vectorizer, vectors)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Weighted vector of a document; terms outside the vocabulary are ignored
    pub fn transform(&self, document: &str) -> SparseVector {
        self.weigh(&Self::tokenize(document))
    }

    fn weigh(&self, tokens: &[String]) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokens {
            if let Some(&index) = self.vocabulary.get(token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index]))
            .collect();

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, weight) in &mut vector {
                *weight /= norm;
            }
        }
        vector
    }
}

/// Dense, row-major, symmetric `n × n` cosine similarity matrix.
///
/// Row and column order match the row order of the catalog records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the matrix over the soups of a whole corpus
    pub fn from_documents(documents: &[&str]) -> Self {
        let (vectorizer, vectors) = TfidfVectorizer::fit_transform(documents);
        tracing::debug!(
            documents = documents.len(),
            vocabulary = vectorizer.vocabulary_size(),
            "Fitted TF-IDF vocabulary"
        );
        Self::from_vectors(&vectors, vectorizer.vocabulary_size())
    }

    /// Cosine similarity of every pair of L2-normalised vectors.
    ///
    /// Pairs are accumulated once through an inverted index and mirrored, so
    /// `S[i][j]` and `S[j][i]` are the same float.
    pub fn from_vectors(vectors: &[SparseVector], vocabulary_size: usize) -> Self {
        let size = vectors.len();
        let mut postings: Vec<Vec<(usize, f64)>> = vec![Vec::new(); vocabulary_size];
        for (doc, vector) in vectors.iter().enumerate() {
            for &(term, weight) in vector {
                postings[term].push((doc, weight));
            }
        }

        let mut values = vec![0.0; size * size];
        let mut scores = vec![0.0; size];
        for (i, vector) in vectors.iter().enumerate() {
            scores.iter_mut().for_each(|s| *s = 0.0);
            for &(term, weight) in vector {
                for &(j, other) in &postings[term] {
                    if j > i {
                        scores[j] += weight * other;
                    }
                }
            }

            values[i * size + i] = if vector.is_empty() { 0.0 } else { 1.0 };
            for j in (i + 1)..size {
                let score = scores[j].clamp(0.0, 1.0);
                values[i * size + j] = score;
                values[j * size + i] = score;
            }
        }

        Self { size, values }
    }

    /// Matrix from explicit rows; `None` unless the rows form a square
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            values: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }
}

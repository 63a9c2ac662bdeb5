//! In-memory movie catalog: records, similarity matrix and lookups.
//!
//! A [`Catalog`] is built once from the corpus files and never mutated.
//! [`CatalogStore`] is the process-wide handle that publishes catalogs.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::{
    error::{AppError, AppResult},
    models::{LocalDetails, MovieId, MovieRecord, TitleSummary},
};

pub mod literal;
pub mod loader;
pub mod similarity;
pub mod soup;
mod stop_words;

use similarity::SimilarityMatrix;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Locations of the three corpus files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub metadata: PathBuf,
    pub credits: PathBuf,
    pub keywords: PathBuf,
}

/// Counters collected while loading the corpus
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct LoadStats {
    pub metadata_rows: usize,
    pub credits_rows: usize,
    pub keywords_rows: usize,
    /// Rows whose id could not be read as an integer
    pub invalid_ids: usize,
    /// Rows the CSV reader could not decode
    pub unreadable_rows: usize,
    /// Metadata rows without a partner in both other sources
    pub unmatched: usize,
    pub malformed_genres: usize,
    pub malformed_keywords: usize,
    pub malformed_cast: usize,
    pub malformed_crew: usize,
    pub records: usize,
    /// Set when a source could not be read and the catalog is empty
    pub degraded: bool,
}

pub struct Catalog {
    records: Vec<MovieRecord>,
    similarity: SimilarityMatrix,
    by_title: HashMap<String, usize>,
    by_id: HashMap<MovieId, usize>,
    stats: LoadStats,
}

impl Catalog {
    /// Builds the similarity matrix over the records' soups
    pub fn build(records: Vec<MovieRecord>, stats: LoadStats) -> Self {
        let soups: Vec<&str> = records.iter().map(MovieRecord::soup).collect();
        let similarity = SimilarityMatrix::from_documents(&soups);
        Self::assemble(records, similarity, stats)
    }

    /// Catalog over a precomputed matrix, which must match the records' order
    pub fn with_similarity(
        records: Vec<MovieRecord>,
        similarity: SimilarityMatrix,
        stats: LoadStats,
    ) -> AppResult<Self> {
        if similarity.size() != records.len() {
            return Err(AppError::Internal(format!(
                "Similarity matrix has {} rows for {} records",
                similarity.size(),
                records.len()
            )));
        }
        Ok(Self::assemble(records, similarity, stats))
    }

    /// Empty catalog used before the first load and when a source is missing
    pub fn degraded() -> Self {
        Self::assemble(
            Vec::new(),
            SimilarityMatrix::empty(),
            LoadStats {
                degraded: true,
                ..LoadStats::default()
            },
        )
    }

    fn assemble(
        records: Vec<MovieRecord>,
        similarity: SimilarityMatrix,
        mut stats: LoadStats,
    ) -> Self {
        let mut by_title = HashMap::with_capacity(records.len());
        let mut by_id = HashMap::with_capacity(records.len());
        // Later rows overwrite earlier ones: last write wins in load order
        for (row, record) in records.iter().enumerate() {
            by_title.insert(record.title().to_string(), row);
            by_id.insert(record.id(), row);
        }
        stats.records = records.len();

        Self {
            records,
            similarity,
            by_title,
            by_id,
            stats,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True once a load completed with every source readable
    pub fn is_ready(&self) -> bool {
        !self.stats.degraded
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn record(&self, row: usize) -> Option<&MovieRecord> {
        self.records.get(row)
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn row_of_title(&self, title: &str) -> Option<usize> {
        self.by_title.get(title).copied()
    }

    pub fn row_of_id(&self, id: MovieId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    /// Every title mapped to the id the title lookup resolves to
    pub fn list_titles(&self) -> BTreeMap<String, MovieId> {
        self.by_title
            .iter()
            .map(|(title, &row)| (title.clone(), self.records[row].id()))
            .collect()
    }

    pub fn list_actors(&self) -> Vec<String> {
        self.distinct(|record| record.top_actors().to_vec())
    }

    pub fn list_directors(&self) -> Vec<String> {
        self.distinct(|record| {
            Some(record.director())
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .into_iter()
                .collect()
        })
    }

    pub fn list_genres(&self) -> Vec<String> {
        self.distinct(|record| record.genres().to_vec())
    }

    fn distinct(&self, values: impl Fn(&MovieRecord) -> Vec<String>) -> Vec<String> {
        self.records
            .iter()
            .flat_map(values)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn local_details(&self, title: &str) -> Option<LocalDetails> {
        self.row_of_title(title)
            .map(|row| self.records[row].local_details())
    }

    /// Case-insensitive substring search over titles, in load order
    pub fn search_titles(&self, query: &str, limit: usize) -> Vec<TitleSummary> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|record| record.title().to_lowercase().contains(&needle))
            .take(limit)
            .map(|record| TitleSummary {
                title: record.title().to_string(),
                movie_id: record.id(),
            })
            .collect()
    }
}

/// Result of a [`CatalogStore::load`]
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoadOutcome {
    /// False when the build was rejected and the previous catalog kept
    pub published: bool,
    /// Counters of the build that was just attempted
    #[serde(flatten)]
    pub stats: LoadStats,
}

/// Process-wide handle to the current catalog.
///
/// Readers take an `Arc` snapshot and keep it for the whole request. A load
/// builds the next catalog off to the side and publishes it in one swap.
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
    loading: Mutex<()>,
}

impl CatalogStore {
    /// Store holding an empty, not-ready catalog until [`CatalogStore::load`]
    pub fn new() -> Self {
        Self::with_catalog(Catalog::degraded())
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
            loading: Mutex::new(()),
        }
    }

    pub async fn snapshot(&self) -> Arc<Catalog> {
        self.current.read().await.clone()
    }

    /// (Re)builds the catalog from `sources` and publishes it.
    ///
    /// Concurrent callers are serialised; each one publishes a complete build.
    /// A degraded build never replaces a ready catalog: the current one keeps
    /// serving and the outcome reports `published: false`.
    pub async fn load(&self, sources: &DataSources) -> LoadOutcome {
        let _guard = self.loading.lock().await;

        let sources = sources.clone();
        let built = tokio::task::spawn_blocking(move || loader::load_catalog(&sources)).await;
        let catalog = match built {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!(error = %e, "Catalog build task failed");
                Catalog::degraded()
            }
        };
        let stats = catalog.stats().clone();

        let mut current = self.current.write().await;
        if !catalog.is_ready() && current.is_ready() {
            tracing::error!(
                serving = current.len(),
                "Catalog rebuild failed, keeping the current catalog"
            );
            return LoadOutcome {
                published: false,
                stats,
            };
        }

        *current = Arc::new(catalog);
        tracing::info!(
            records = current.len(),
            ready = current.is_ready(),
            "Catalog published"
        );
        LoadOutcome {
            published: true,
            stats,
        }
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

//! Storage abstraction for vector records.
//!
//! The [`VectorStore`] trait defines all persistence operations the engine
//! needs, enabling pluggable backends (SQLite in the app crate, in-memory
//! for tests). A store value is the open handle to the deployment's single
//! named table; `create_table` and `append` are distinct operations so the
//! engine's create-or-append branch stays explicit.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RagError;

pub use memory::InMemoryVectorStore;

/// The persisted unit: one chunk's embedding plus its provenance.
///
/// Invariant: every record's vector has the same length as every other
/// record in the same store. Backends are not required to verify this on
/// write, but comparisons against mismatched vectors are a fault, never
/// silently coerced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    /// The chunk's embedding vector.
    pub vector: Vec<f32>,
    /// The chunk text itself.
    pub text: String,
    /// Originating document identifier (e.g. a filename).
    pub source: String,
    /// Origin page for paginated sources; the chunk ordinal otherwise.
    pub page: i64,
}

impl StoredRecord {
    pub fn new(
        vector: Vec<f32>,
        text: impl Into<String>,
        source: impl Into<String>,
        page: i64,
    ) -> Self {
        Self {
            vector,
            text: text.into(),
            source: source.into(),
            page,
        }
    }
}

/// A record returned from nearest-neighbor search, with the backend's
/// native distance attached.
///
/// `distance` is whatever metric the backend ranks by; lower is more
/// similar. A backend that cannot report a distance returns `None`, which
/// callers normalize to `0.0` rather than treating as an error.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub text: String,
    pub source: String,
    pub page: i64,
    pub distance: Option<f32>,
}

/// Abstract vector storage backend.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`table_exists`](VectorStore::table_exists) | Has any ingest created the table yet? |
/// | [`create_table`](VectorStore::create_table) | Create the table seeded with records |
/// | [`append`](VectorStore::append) | Append records to the existing table |
/// | [`search`](VectorStore::search) | Nearest-neighbor search, native order |
/// | [`count_rows`](VectorStore::count_rows) | Total record count |
///
/// The store adds no locking of its own; concurrent writers see whatever
/// interleaving the backend guarantees.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Whether the backing table has been created.
    async fn table_exists(&self) -> Result<bool, RagError>;

    /// Create the table, seeded with `records`. Fails if it already exists.
    async fn create_table(&self, records: Vec<StoredRecord>) -> Result<(), RagError>;

    /// Append records to the existing table.
    async fn append(&self, records: Vec<StoredRecord>) -> Result<(), RagError>;

    /// Return the `top_k` records nearest to `query`, most similar first,
    /// in the backend's native similarity order. Callers do not re-sort.
    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>, RagError>;

    /// Total number of records in the table (0 if it does not exist).
    async fn count_rows(&self) -> Result<usize, RagError>;
}

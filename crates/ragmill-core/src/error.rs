//! Error taxonomy for the core pipeline.
//!
//! Every core operation reports failures synchronously through [`RagError`];
//! nothing is swallowed and nothing is retried here. Retry/backoff policy
//! belongs to the boundary layer (the service adapters in the app crate).

use thiserror::Error;

/// Failures surfaced by chunking, ingestion, and querying.
#[derive(Debug, Error)]
pub enum RagError {
    /// The caller supplied text that was empty after trimming.
    #[error("cannot chunk empty text")]
    EmptyInput,

    /// The caller supplied an empty chunk list to ingest.
    #[error("cannot ingest an empty chunk list")]
    EmptyChunks,

    /// Ingest metadata carried no usable source identifier.
    #[error("ingest metadata must include a source identifier")]
    MissingSource,

    /// Two embedding vectors that should be comparable have different
    /// lengths. A data-integrity fault: fatal for the current operation,
    /// never coerced.
    #[error("embedding dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// A query arrived before anything was ingested.
    #[error("no documents in the knowledge base; ingest documents first")]
    EmptyKnowledgeBase,

    /// The embedding service failed upstream.
    #[error("embedding service error: {0}")]
    Embedding(String),

    /// The generation service failed upstream.
    #[error("generation error: {0}")]
    Generation(String),

    /// The vector store backend failed.
    #[error("storage error: {0}")]
    Storage(String),
}

//! # Ragmill Core
//!
//! Shared logic for Ragmill: data contracts, the semantic chunker, the port
//! traits for external services, and the retrieval/generation engine.
//!
//! This crate contains no tokio runtime, no sqlx, no filesystem I/O, and no
//! HTTP client. Everything that talks to the outside world is reached through
//! the three port traits, so the whole pipeline is testable with in-process
//! fakes.
//!
//! ## Pipeline
//!
//! ```text
//! ┌───────────┐   ┌──────────┐   ┌──────────────┐
//! │ Document  │──▶│ Chunker  │──▶│ Engine       │
//! │ full text │   │ (chunk)  │   │ ::ingest     │
//! └───────────┘   └────┬─────┘   └──────┬───────┘
//!                      │                │
//!                      ▼                ▼
//!                 ┌──────────┐   ┌──────────────┐
//!                 │ Embedder │   │ VectorStore  │
//!                 └──────────┘   └──────┬───────┘
//!                                       │
//! ┌───────────┐   ┌──────────────┐      │
//! │ Question  │──▶│ Engine       │◀─────┘
//! └───────────┘   │ ::query      │──▶ Generator ──▶ answer + references
//!                 └──────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`chunk`] | Semantic and fixed-size chunkers, sentence splitting strategy |
//! | [`embedding`] | `Embedder` port, cosine similarity, vector BLOB codecs |
//! | [`engine`] | Ingest/query orchestration with a reloadable config |
//! | [`error`] | The `RagError` taxonomy shared by every core operation |
//! | [`generation`] | `Generator` port for non-streaming LLM completions |
//! | [`models`] | `EngineConfig`, `IngestMetadata`, `Reference`, `QueryResult` |
//! | [`store`] | `VectorStore` port, stored record types, in-memory backend |

pub mod chunk;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod generation;
pub mod models;
pub mod store;

pub use embedding::Embedder;
pub use engine::Engine;
pub use error::RagError;
pub use generation::Generator;
pub use models::{EngineConfig, IngestMetadata, QueryResult, Reference};
pub use store::{SearchHit, StoredRecord, VectorStore};

//! # Ragmill
//!
//! **Local-first retrieval-augmented question answering over your documents.**
//!
//! Ragmill ingests documents (PDF or plain text), splits them into
//! topically coherent passages with the `ragmill-core` semantic chunker,
//! stores passage embeddings in SQLite, and answers questions by
//! retrieving the closest passages and asking a local Ollama model to
//! compose a grounded answer with `[Source: ...]` citations.
//!
//! ## Data Flow
//!
//! 1. `rgm ingest <file>` extracts page texts ([`extract`]), chunks each
//!    page ([`ragmill_core::chunk`]), and persists embedded records via
//!    the engine ([`ingest`]).
//! 2. `rgm ask "<question>"` embeds the question, retrieves the nearest
//!    chunks from SQLite ([`sqlite_store`]), and generates the answer
//!    through Ollama ([`ollama`]).
//! 3. `rgm stats` reports the knowledge-base size and active config.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`ask`] | Query entry point and CLI output formatting |
//! | [`config`] | TOML configuration parsing and validation |
//! | [`db`] | SQLite connection pool with WAL mode |
//! | [`extract`] | PDF/plain-text extraction into ordered page texts |
//! | [`ingest`] | File → pages → chunks → engine pipeline |
//! | [`ollama`] | Embedding and generation adapters for a local Ollama |
//! | [`runtime`] | Engine assembly from configuration |
//! | [`sqlite_store`] | `VectorStore` backend over a single SQLite table |
//!
//! ## Configuration
//!
//! Ragmill is configured via a TOML file (default: `./ragmill.toml`).
//! See [`config`] for all options and validation rules.

pub mod ask;
pub mod config;
pub mod db;
pub mod extract;
pub mod ingest;
pub mod ollama;
pub mod runtime;
pub mod sqlite_store;

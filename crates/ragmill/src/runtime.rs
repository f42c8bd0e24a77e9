//! Engine assembly from configuration.
//!
//! Wires the boundary collaborators (SQLite store, Ollama adapters)
//! into a `ragmill-core` [`Engine`]. Every CLI command that touches the
//! knowledge base goes through [`open_engine`].

use std::sync::Arc;

use anyhow::Result;
use sqlx::SqlitePool;

use ragmill_core::{Embedder, Engine};

use crate::config::Config;
use crate::db;
use crate::ollama::{OllamaEmbedder, OllamaGenerator};
use crate::sqlite_store::SqliteStore;

/// An assembled engine plus the handles commands sometimes need directly.
pub struct Runtime {
    pub engine: Engine,
    /// Shared with the engine; the chunker borrows it for sentence
    /// embedding during ingest.
    pub embedder: Arc<dyn Embedder>,
    pub pool: SqlitePool,
}

/// Connect the database and assemble the engine from config.
pub async fn open_engine(config: &Config) -> Result<Runtime> {
    let pool = db::connect(config).await?;
    let store = Arc::new(SqliteStore::new(pool.clone()));

    let embedder: Arc<dyn Embedder> =
        Arc::new(OllamaEmbedder::new(&config.ollama, &config.engine.embedding_model)?);
    let generator = Arc::new(OllamaGenerator::new(&config.ollama)?);

    let engine = Engine::new(
        embedder.clone(),
        generator,
        store,
        config.engine_config(),
    );

    Ok(Runtime {
        engine,
        embedder,
        pool,
    })
}

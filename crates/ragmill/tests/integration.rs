//! Integration tests for the SQLite store and the full ingest/query
//! pipeline over it, using stub Ollama-free ports. No network required.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use ragmill::config::Config;
use ragmill::db;
use ragmill::sqlite_store::SqliteStore;
use ragmill_core::{
    Embedder, Engine, Generator, IngestMetadata, RagError, StoredRecord, VectorStore,
};

fn test_config(dir: &Path) -> Config {
    let body = format!("[db]\npath = \"{}/ragmill.sqlite\"\n", dir.display());
    let config_path = dir.join("ragmill.toml");
    std::fs::write(&config_path, body).unwrap();
    ragmill::config::load_config(&config_path).unwrap()
}

async fn open_store(config: &Config) -> SqliteStore {
    let pool = db::connect(config).await.unwrap();
    SqliteStore::new(pool)
}

fn record(vector: Vec<f32>, text: &str, source: &str, page: i64) -> StoredRecord {
    StoredRecord::new(vector, text, source, page)
}

#[tokio::test]
async fn table_does_not_exist_before_create() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&test_config(tmp.path())).await;
    assert!(!store.table_exists().await.unwrap());
    assert_eq!(store.count_rows().await.unwrap(), 0);
}

#[tokio::test]
async fn create_seeds_and_append_extends() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&test_config(tmp.path())).await;

    store
        .create_table(vec![
            record(vec![1.0, 0.0], "alpha", "a.txt", 0),
            record(vec![0.0, 1.0], "beta", "b.txt", 1),
        ])
        .await
        .unwrap();
    assert!(store.table_exists().await.unwrap());
    assert_eq!(store.count_rows().await.unwrap(), 2);

    store
        .append(vec![record(vec![0.5, 0.5], "gamma", "c.txt", 0)])
        .await
        .unwrap();
    assert_eq!(store.count_rows().await.unwrap(), 3);
}

#[tokio::test]
async fn create_twice_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&test_config(tmp.path())).await;
    store.create_table(vec![]).await.unwrap();
    assert!(matches!(
        store.create_table(vec![]).await,
        Err(RagError::Storage(_))
    ));
}

#[tokio::test]
async fn search_ranks_by_cosine_distance() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&test_config(tmp.path())).await;

    store
        .create_table(vec![
            record(vec![0.0, 1.0], "far away", "far.txt", 0),
            record(vec![1.0, 0.0], "dead on", "near.txt", 0),
            record(vec![0.7, 0.3], "close", "mid.txt", 0),
        ])
        .await
        .unwrap();

    let hits = store.search(&[1.0, 0.0], 2).await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].source, "near.txt");
    assert_eq!(hits[1].source, "mid.txt");
    assert!(hits[0].distance.unwrap() < hits[1].distance.unwrap());
    assert!(hits[0].distance.unwrap() < 1e-6);
}

#[tokio::test]
async fn vectors_survive_the_blob_roundtrip() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&test_config(tmp.path())).await;

    let vector = vec![0.125f32, -3.5, 0.0, 42.0];
    store
        .create_table(vec![record(vector.clone(), "text", "v.txt", 3)])
        .await
        .unwrap();

    // An exact-match query must come back at distance ~0 with intact
    // metadata.
    let hits = store.search(&vector, 1).await.unwrap();
    assert_eq!(hits[0].source, "v.txt");
    assert_eq!(hits[0].page, 3);
    assert_eq!(hits[0].text, "text");
    assert!(hits[0].distance.unwrap().abs() < 1e-6);
}

// ── Full pipeline over SQLite with stub services ────────────────────────

struct AxisEmbedder;

#[async_trait]
impl Embedder for AxisEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        Ok(if text.to_lowercase().contains("cat") {
            vec![1.0, 0.0]
        } else {
            vec![0.0, 1.0]
        })
    }
}

struct CannedGenerator;

#[async_trait]
impl Generator for CannedGenerator {
    async fn complete(&self, _: &str, _: &str, _: f32) -> Result<String, RagError> {
        Ok("Cats are mammals [Source: a.txt]".to_string())
    }
}

#[tokio::test]
async fn engine_round_trip_over_sqlite() {
    let tmp = TempDir::new().unwrap();
    let config = test_config(tmp.path());
    let pool = db::connect(&config).await.unwrap();
    let store = Arc::new(SqliteStore::new(pool));

    let engine = Engine::new(
        Arc::new(AxisEmbedder),
        Arc::new(CannedGenerator),
        store,
        config.engine_config(),
    );

    assert!(matches!(
        engine.query("cats?", None).await,
        Err(RagError::EmptyKnowledgeBase)
    ));

    engine
        .ingest(
            &["Cats are mammals.".to_string()],
            &IngestMetadata::new("a.txt"),
        )
        .await
        .unwrap();
    engine
        .ingest(
            &["Dogs are mammals.".to_string()],
            &IngestMetadata::new("b.txt"),
        )
        .await
        .unwrap();
    assert_eq!(engine.document_count().await.unwrap(), 2);

    let result = engine.query("What are cats?", Some(1)).await.unwrap();
    assert_eq!(result.references.len(), 1);
    assert_eq!(result.references[0].source, "a.txt");
    assert_eq!(result.references[0].snippet, "Cats are mammals.");
    assert!(result.answer.contains("[Source: a.txt]"));
}

//! SQLite-backed [`VectorStore`] implementation.
//!
//! One deployment, one table: `doc_store`, holding each chunk's embedding
//! as a little-endian f32 BLOB next to its text, source, and page. Search
//! loads every stored vector and ranks by cosine distance
//! (`1 - cosine similarity`, ascending) in Rust. The brute-force scan is
//! fine at the single-machine corpus sizes Ragmill targets.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use ragmill_core::embedding::{blob_to_vec, cosine_similarity, vec_to_blob};
use ragmill_core::{RagError, SearchHit, StoredRecord, VectorStore};

/// The single vector table per deployment.
const TABLE_NAME: &str = "doc_store";

/// SQLite implementation of the [`VectorStore`] port.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn insert_records(&self, records: Vec<StoredRecord>) -> Result<(), RagError> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        for record in &records {
            sqlx::query("INSERT INTO doc_store (vector, text, source, page) VALUES (?, ?, ?, ?)")
                .bind(vec_to_blob(&record.vector))
                .bind(&record.text)
                .bind(&record.source)
                .bind(record.page)
                .execute(&mut *tx)
                .await
                .map_err(storage_err)?;
        }

        tx.commit().await.map_err(storage_err)
    }
}

fn storage_err(err: sqlx::Error) -> RagError {
    RagError::Storage(err.to_string())
}

#[async_trait]
impl VectorStore for SqliteStore {
    async fn table_exists(&self) -> Result<bool, RagError> {
        let row = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(TABLE_NAME)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(row.is_some())
    }

    async fn create_table(&self, records: Vec<StoredRecord>) -> Result<(), RagError> {
        if self.table_exists().await? {
            return Err(RagError::Storage(format!(
                "table {TABLE_NAME} already exists"
            )));
        }

        sqlx::query(
            r#"
            CREATE TABLE doc_store (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                vector BLOB NOT NULL,
                text TEXT NOT NULL,
                source TEXT NOT NULL,
                page INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        self.insert_records(records).await
    }

    async fn append(&self, records: Vec<StoredRecord>) -> Result<(), RagError> {
        self.insert_records(records).await
    }

    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>, RagError> {
        let rows = sqlx::query("SELECT vector, text, source, page FROM doc_store")
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;

        let mut hits: Vec<SearchHit> = rows
            .iter()
            .map(|row| {
                let blob: Vec<u8> = row.get("vector");
                let vector = blob_to_vec(&blob);
                SearchHit {
                    text: row.get("text"),
                    source: row.get("source"),
                    page: row.get("page"),
                    distance: Some(1.0 - cosine_similarity(query, &vector)),
                }
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(top_k);

        Ok(hits)
    }

    async fn count_rows(&self) -> Result<usize, RagError> {
        if !self.table_exists().await? {
            return Ok(0);
        }
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM doc_store")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(count as usize)
    }
}

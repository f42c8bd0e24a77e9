//! In-memory [`VectorStore`] implementation for testing.
//!
//! Holds records in a `Vec` behind `std::sync::RwLock`. Search is
//! brute-force cosine distance (`1 - cosine similarity`) over all stored
//! vectors, ascending; that is this backend's native metric. `None`
//! inside the lock means the table has never been created, which keeps
//! the `table_exists` / `create_table` lifecycle observable in tests.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::embedding::cosine_similarity;
use crate::error::RagError;

use super::{SearchHit, StoredRecord, VectorStore};

/// Brute-force in-memory store.
#[derive(Default)]
pub struct InMemoryVectorStore {
    table: RwLock<Option<Vec<StoredRecord>>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn table_exists(&self) -> Result<bool, RagError> {
        Ok(self.table.read().unwrap().is_some())
    }

    async fn create_table(&self, records: Vec<StoredRecord>) -> Result<(), RagError> {
        let mut table = self.table.write().unwrap();
        if table.is_some() {
            return Err(RagError::Storage("table already exists".to_string()));
        }
        *table = Some(records);
        Ok(())
    }

    async fn append(&self, records: Vec<StoredRecord>) -> Result<(), RagError> {
        let mut table = self.table.write().unwrap();
        match table.as_mut() {
            Some(rows) => {
                rows.extend(records);
                Ok(())
            }
            None => Err(RagError::Storage("table does not exist".to_string())),
        }
    }

    async fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>, RagError> {
        let table = self.table.read().unwrap();
        let rows = table
            .as_ref()
            .ok_or_else(|| RagError::Storage("table does not exist".to_string()))?;

        let mut hits: Vec<SearchHit> = rows
            .iter()
            .map(|r| SearchHit {
                text: r.text.clone(),
                source: r.source.clone(),
                page: r.page,
                distance: Some(1.0 - cosine_similarity(query, &r.vector)),
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
        Ok(self
            .table
            .read()
            .unwrap()
            .as_ref()
            .map(Vec::len)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(vector: Vec<f32>, text: &str, source: &str) -> StoredRecord {
        StoredRecord::new(vector, text, source, 0)
    }

    #[tokio::test]
    async fn lifecycle_create_append_count() {
        let store = InMemoryVectorStore::new();
        assert!(!store.table_exists().await.unwrap());
        assert_eq!(store.count_rows().await.unwrap(), 0);

        store
            .create_table(vec![record(vec![1.0, 0.0], "a", "a.txt")])
            .await
            .unwrap();
        assert!(store.table_exists().await.unwrap());
        assert_eq!(store.count_rows().await.unwrap(), 1);

        store
            .append(vec![record(vec![0.0, 1.0], "b", "b.txt")])
            .await
            .unwrap();
        assert_eq!(store.count_rows().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn create_twice_fails() {
        let store = InMemoryVectorStore::new();
        store.create_table(vec![]).await.unwrap();
        assert!(store.create_table(vec![]).await.is_err());
    }

    #[tokio::test]
    async fn search_orders_by_cosine_distance() {
        let store = InMemoryVectorStore::new();
        store
            .create_table(vec![
                record(vec![0.0, 1.0], "far", "far.txt"),
                record(vec![1.0, 0.0], "near", "near.txt"),
            ])
            .await
            .unwrap();

        let hits = store.search(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].source, "near.txt");
        assert!(hits[0].distance.unwrap() < hits[1].distance.unwrap());
    }

    #[tokio::test]
    async fn search_truncates_to_top_k() {
        let store = InMemoryVectorStore::new();
        store
            .create_table(vec![
                record(vec![1.0, 0.0], "a", "a.txt"),
                record(vec![0.9, 0.1], "b", "b.txt"),
                record(vec![0.0, 1.0], "c", "c.txt"),
            ])
            .await
            .unwrap();

        let hits = store.search(&[1.0, 0.0], 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].source, "a.txt");
    }
}

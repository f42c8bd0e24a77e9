//! Retrieval-augmented query engine.
//!
//! [`Engine`] is a stateless per-call orchestrator over the three ports:
//! ingest turns chunks into stored records, query turns a question into a
//! grounded answer with citations. Each logical operation runs start to
//! end on the caller's task; the engine adds no locking around the store,
//! so callers needing per-store mutual exclusion provide it externally.
//!
//! Configuration is an explicit [`EngineConfig`] value passed in at
//! construction and swapped via [`Engine::reload`], never a hidden
//! global. A reload is visible on the next operation.

use std::sync::{Arc, RwLock};

use crate::embedding::Embedder;
use crate::error::RagError;
use crate::generation::Generator;
use crate::models::{EngineConfig, IngestMetadata, QueryResult, Reference};
use crate::store::{SearchHit, StoredRecord, VectorStore};

/// Separates retrieved chunk texts inside the assembled prompt.
const CONTEXT_DELIMITER: &str = "\n---\n";

/// Orchestrates embedding, storage, retrieval, and generation.
pub struct Engine {
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    store: Arc<dyn VectorStore>,
    config: RwLock<EngineConfig>,
}

impl Engine {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
        store: Arc<dyn VectorStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            embedder,
            generator,
            store,
            config: RwLock::new(config),
        }
    }

    /// Swap in a fresh configuration. Visible on the next operation; no
    /// staleness guarantee beyond that.
    pub fn reload(&self, config: EngineConfig) {
        *self.config.write().unwrap() = config;
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> EngineConfig {
        self.config.read().unwrap().clone()
    }

    /// Ingest document chunks into the vector store.
    ///
    /// Embeds each chunk (one call per chunk, in order) and persists a
    /// [`StoredRecord`] per chunk. When `meta.page` is absent, the chunk's
    /// ordinal index is stored as its page (preserved quirk, see
    /// [`IngestMetadata`]).
    ///
    /// The store mutation is create-or-append and not transactional across
    /// chunks: an embedding failure mid-batch leaves nothing persisted,
    /// but a store failure mid-write may leave a partial set, with no
    /// rollback.
    ///
    /// Returns the number of records written (`chunks.len()`).
    ///
    /// # Errors
    ///
    /// [`RagError::EmptyChunks`] for an empty batch,
    /// [`RagError::MissingSource`] for blank metadata, plus anything the
    /// embedder or store surfaces.
    pub async fn ingest(
        &self,
        chunks: &[String],
        meta: &IngestMetadata,
    ) -> Result<usize, RagError> {
        if chunks.is_empty() {
            return Err(RagError::EmptyChunks);
        }
        if meta.source.trim().is_empty() {
            return Err(RagError::MissingSource);
        }

        let mut records = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            let vector = self.embedder.embed(chunk).await?;
            records.push(StoredRecord::new(
                vector,
                chunk.clone(),
                meta.source.clone(),
                meta.page.unwrap_or(i as i64),
            ));
        }

        let written = records.len();
        if self.store.table_exists().await? {
            self.store.append(records).await?;
        } else {
            self.store.create_table(records).await?;
        }

        tracing::info!(source = %meta.source, records = written, "ingested chunks");
        Ok(written)
    }

    /// Answer a question from the knowledge base.
    ///
    /// Embeds the question once, retrieves `top_k` chunks (defaulting to
    /// the configured value; the range is enforced by the boundary, not
    /// here), assembles the augmented prompt, and runs a single
    /// non-streaming completion. References come back in the store's
    /// result order: no re-sorting, no re-scoring.
    ///
    /// # Errors
    ///
    /// [`RagError::EmptyKnowledgeBase`] when nothing has been ingested
    /// yet (checked before any embedding or generation call), plus
    /// anything the ports surface.
    pub async fn query(
        &self,
        question: &str,
        top_k: Option<usize>,
    ) -> Result<QueryResult, RagError> {
        if !self.store.table_exists().await? {
            return Err(RagError::EmptyKnowledgeBase);
        }

        let (model, temperature, default_top_k) = {
            let cfg = self.config.read().unwrap();
            (cfg.generation_model.clone(), cfg.temperature, cfg.top_k)
        };
        let top_k = top_k.unwrap_or(default_top_k);

        let query_vector = self.embedder.embed(question).await?;
        let hits = self.store.search(&query_vector, top_k).await?;
        tracing::debug!(top_k, retrieved = hits.len(), "similarity search complete");

        let prompt = build_prompt(&hits, question);
        let answer = self.generator.complete(&prompt, &model, temperature).await?;

        let references = hits.iter().map(Reference::from_hit).collect();
        Ok(QueryResult { answer, references })
    }

    /// Total number of stored records; 0 when nothing has been ingested.
    pub async fn document_count(&self) -> Result<usize, RagError> {
        if !self.store.table_exists().await? {
            return Ok(0);
        }
        self.store.count_rows().await
    }
}

/// Assemble the context-augmented prompt.
///
/// Retrieved texts in result order, delimiter-separated, then the
/// instruction block, then the verbatim question.
fn build_prompt(hits: &[SearchHit], question: &str) -> String {
    let context = hits
        .iter()
        .map(|h| h.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_DELIMITER);

    format!(
        "Use the provided context to answer the question.\n\
         If the answer is not in the context, say you don't know.\n\
         Provide citations like [Source: filename].\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Question: {question}\n\
         \n\
         Answer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_keeps_result_order_and_question_verbatim() {
        let hits = vec![
            SearchHit {
                text: "First chunk".to_string(),
                source: "a.txt".to_string(),
                page: 0,
                distance: Some(0.1),
            },
            SearchHit {
                text: "Second chunk".to_string(),
                source: "b.txt".to_string(),
                page: 1,
                distance: Some(0.2),
            },
        ];

        let prompt = build_prompt(&hits, "What is this?");
        let first = prompt.find("First chunk").unwrap();
        let second = prompt.find("Second chunk").unwrap();
        assert!(first < second);
        assert!(prompt.contains("\n---\n"));
        assert!(prompt.contains("[Source: filename]"));
        assert!(prompt.contains("Question: What is this?"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn prompt_with_no_hits_has_empty_context() {
        let prompt = build_prompt(&[], "Anything?");
        assert!(prompt.contains("Context:\n\n"));
        assert!(prompt.contains("Question: Anything?"));
    }
}

//! Ingestion pipeline orchestration.
//!
//! Coordinates the full flow for one file: read → extract page texts →
//! chunk each page → embed and persist through the engine. Pages are
//! processed in order; paginated sources keep their page numbers,
//! unpaginated ones fall back to chunk ordinals (see
//! [`ragmill_core::IngestMetadata`]).

use std::path::Path;

use anyhow::{Context, Result};

use ragmill_core::chunk::{self, SemanticChunkParams};
use ragmill_core::IngestMetadata;

use crate::config::Config;
use crate::extract;
use crate::runtime;

/// Which chunker the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkStrategy {
    /// Topic-boundary detection over sentence embeddings.
    Semantic,
    /// Character windows with overlap; no embedding calls while chunking.
    Fixed,
}

/// Ingest one file into the knowledge base.
///
/// `source_override` replaces the filename as the stored source
/// identifier. Returns after printing a human-readable summary.
pub async fn run_ingest(
    config: &Config,
    file: &Path,
    source_override: Option<String>,
    strategy: ChunkStrategy,
) -> Result<()> {
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let pages = extract::extract_pages(file, &bytes)?;
    if pages.is_empty() {
        anyhow::bail!("{} contains no extractable text", file.display());
    }

    let source = source_override.unwrap_or_else(|| {
        file.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string())
    });

    let rt = runtime::open_engine(config).await?;
    let params = SemanticChunkParams {
        threshold: config.chunking.threshold,
        min_chunk_chars: config.chunking.min_chunk_chars,
    };

    let mut chunks_written = 0usize;
    for page in &pages {
        let chunks = match strategy {
            ChunkStrategy::Semantic => {
                chunk::semantic_chunk(&page.text, rt.embedder.as_ref(), &params).await?
            }
            ChunkStrategy::Fixed => chunk::fixed_size_chunk(
                &page.text,
                config.chunking.chunk_size_chars,
                config.chunking.overlap_chars,
            ),
        };
        if chunks.is_empty() {
            continue;
        }

        let mut meta = IngestMetadata::new(&source);
        if let Some(page_no) = page.page {
            meta = meta.with_page(page_no);
        }

        chunks_written += rt.engine.ingest(&chunks, &meta).await?;
    }

    let total = rt.engine.document_count().await?;

    println!("ingest {}", file.display());
    println!("  source: {}", source);
    println!("  pages: {}", pages.len());
    println!("  chunks written: {}", chunks_written);
    println!("  knowledge base total: {}", total);
    println!("ok");

    rt.pool.close().await;
    Ok(())
}

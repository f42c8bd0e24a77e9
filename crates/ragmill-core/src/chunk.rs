//! Topic-boundary and fixed-size text chunkers.
//!
//! [`semantic_chunk`] splits a document at topic shifts: consecutive
//! sentences are embedded and a drop in cosine similarity below the
//! threshold marks a chunk boundary, provided the current chunk has
//! already reached its minimum size. [`fixed_size_chunk`] is the
//! embedding-free fallback: character windows with overlap, snapped back
//! to a sentence boundary when one is available.
//!
//! # Sentence segmentation
//!
//! The default [`PeriodSpaceSplitter`] splits on the literal `". "`
//! delimiter. Known limitation: it mis-splits abbreviations ("Dr. Smith"),
//! decimal-free enumerations, and non-Latin punctuation. Segmentation is a
//! pluggable strategy behind [`SentenceSplitter`] so a stronger segmenter
//! can replace it without touching the boundary logic.
//!
//! All character counts are Unicode scalar counts, never bytes.

use crate::embedding::{cosine_similarity, Embedder};
use crate::error::RagError;

/// Similarity below this starts a new chunk (when the size floor is met).
pub const DEFAULT_THRESHOLD: f32 = 0.7;
/// A chunk never closes before reaching this many characters.
pub const DEFAULT_MIN_CHUNK_CHARS: usize = 100;
/// Window size for [`fixed_size_chunk`].
pub const DEFAULT_CHUNK_SIZE_CHARS: usize = 1000;
/// Overlap between consecutive fixed-size windows.
pub const DEFAULT_OVERLAP_CHARS: usize = 100;

/// Strategy for splitting text into sentences.
pub trait SentenceSplitter: Send + Sync {
    /// Return the trimmed, non-empty sentences of `text`, in order.
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Splits on the literal `". "` delimiter.
///
/// Deliberately simple; see the module docs for what it gets wrong.
pub struct PeriodSpaceSplitter;

impl SentenceSplitter for PeriodSpaceSplitter {
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split(". ")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Tuning for [`semantic_chunk`].
#[derive(Debug, Clone)]
pub struct SemanticChunkParams {
    /// Cosine similarity threshold below which a new chunk starts.
    /// Lower values create larger chunks.
    pub threshold: f32,
    /// Minimum characters per chunk; sentences accumulate until this is
    /// met, even across strong topic shifts.
    pub min_chunk_chars: usize,
}

impl Default for SemanticChunkParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_chunk_chars: DEFAULT_MIN_CHUNK_CHARS,
        }
    }
}

/// Split `text` into semantically coherent chunks using the default
/// sentence splitter.
///
/// See [`semantic_chunk_with`] for the algorithm and error cases.
pub async fn semantic_chunk(
    text: &str,
    embedder: &dyn Embedder,
    params: &SemanticChunkParams,
) -> Result<Vec<String>, RagError> {
    semantic_chunk_with(text, embedder, &PeriodSpaceSplitter, params).await
}

/// Split `text` into semantically coherent chunks with a caller-supplied
/// sentence splitter.
///
/// # Algorithm
///
/// 1. Trim the input; empty input is [`RagError::EmptyInput`].
/// 2. Segment into sentences. At most one sentence: return the trimmed
///    input as a single chunk, with zero embedding calls.
/// 3. Embed every sentence eagerly, one call per sentence, in order;
///    cost scales linearly with sentence count.
/// 4. Walk the sentences keeping a current buffer. For each sentence,
///    compare its embedding with the previous sentence's; when the
///    similarity drops below `threshold` *and* the buffer has at least
///    `min_chunk_chars` characters, close the buffer as a chunk and start
///    a new one. Otherwise the sentence joins the buffer regardless of
///    similarity, so short buffers never split. This guards against
///    degenerate tiny chunks.
/// 5. Flush the remaining buffer as the final chunk (which may be shorter
///    than the floor).
///
/// Closed chunks are their sentences joined with `". "` plus a single
/// trailing period.
///
/// # Errors
///
/// - [`RagError::EmptyInput`] for trimmed-empty text.
/// - [`RagError::DimensionMismatch`] when consecutive sentence embeddings
///   disagree on length.
/// - [`RagError::Embedding`] propagated from the embedder.
pub async fn semantic_chunk_with(
    text: &str,
    embedder: &dyn Embedder,
    splitter: &dyn SentenceSplitter,
    params: &SemanticChunkParams,
) -> Result<Vec<String>, RagError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(RagError::EmptyInput);
    }

    let sentences = splitter.split(trimmed);
    if sentences.len() <= 1 {
        return Ok(vec![trimmed.to_string()]);
    }

    let mut embeddings = Vec::with_capacity(sentences.len());
    for sentence in &sentences {
        embeddings.push(embedder.embed(sentence).await?);
    }

    let mut chunks = Vec::new();
    let mut buffer = vec![sentences[0]];
    let mut buffer_chars = sentences[0].chars().count();

    for i in 1..sentences.len() {
        let (prev, cur) = (&embeddings[i - 1], &embeddings[i]);
        if prev.len() != cur.len() {
            return Err(RagError::DimensionMismatch {
                left: prev.len(),
                right: cur.len(),
            });
        }

        let similarity = cosine_similarity(prev, cur);
        if similarity < params.threshold && buffer_chars >= params.min_chunk_chars {
            // Topic shift with a full enough buffer: close the chunk.
            chunks.push(close_chunk(&buffer));
            buffer = vec![sentences[i]];
            buffer_chars = sentences[i].chars().count();
        } else {
            buffer.push(sentences[i]);
            buffer_chars += sentences[i].chars().count();
        }
    }

    chunks.push(close_chunk(&buffer));

    tracing::debug!(
        sentences = sentences.len(),
        chunks = chunks.len(),
        "semantic chunking complete"
    );
    Ok(chunks)
}

/// Join buffered sentences and ensure exactly one trailing period.
fn close_chunk(sentences: &[&str]) -> String {
    let mut joined = sentences.join(". ");
    if !joined.ends_with('.') {
        joined.push('.');
    }
    joined
}

/// Split `text` into fixed-size character windows with overlap.
///
/// Faster than [`semantic_chunk`] (no embedding calls) at the cost of
/// possible mid-sentence cuts. Empty input yields an empty list (not an
/// error; this differs from `semantic_chunk` on purpose).
///
/// Each window of `chunk_size_chars` characters is trimmed back to end
/// just after the last `". "` found past the window's halfway point, when
/// one exists. The next window starts `overlap_chars` characters before
/// the previous window's end, so consecutive chunks overlap by at most
/// `overlap_chars`, less when a window was shrunk for sentence alignment.
///
/// `overlap_chars` must be smaller than `chunk_size_chars`, or the walk
/// would not advance.
pub fn fixed_size_chunk(text: &str, chunk_size_chars: usize, overlap_chars: usize) -> Vec<String> {
    debug_assert!(
        overlap_chars < chunk_size_chars,
        "overlap must be smaller than the window size"
    );

    if text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < chars.len() {
        // May point past the end; slicing below clamps, but the advance
        // step uses the unclamped value so the final window terminates
        // the walk.
        let mut end = start + chunk_size_chars;

        if end < chars.len() {
            let window = &chars[start..end];
            if let Some(pos) = rfind_period_space(window) {
                if pos > chunk_size_chars / 2 {
                    end = start + pos + 2;
                }
            }
        }

        let slice_end = end.min(chars.len());
        let chunk: String = chars[start..slice_end].iter().collect();
        chunks.push(chunk.trim().to_string());

        // Large overlaps combined with a shrunk window could stall the
        // walk; forgo the overlap in that case rather than loop.
        let next_start = end.saturating_sub(overlap_chars);
        start = if next_start > start { next_start } else { end };
    }

    chunks
}

/// Index of the last `". "` occurrence in `window`, if any.
fn rfind_period_space(window: &[char]) -> Option<usize> {
    (0..window.len().saturating_sub(1))
        .rev()
        .find(|&i| window[i] == '.' && window[i + 1] == ' ')
}

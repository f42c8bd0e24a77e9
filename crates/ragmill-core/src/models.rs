//! Core data contracts: engine configuration, ingest metadata, and
//! query-time result types.

use serde::{Deserialize, Serialize};

use crate::store::SearchHit;

/// Maximum snippet length in Unicode scalar values before truncation.
pub(crate) const SNIPPET_MAX_CHARS: usize = 150;

/// Process-wide engine tuning, loaded once at startup and refreshed via
/// [`crate::engine::Engine::reload`].
///
/// Range validation (temperature in `[0.0, 2.0]`, `top_k` in `[1, 10]`)
/// happens in the boundary layer's config loader; the core trusts the
/// values it is handed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Model id used for answer generation.
    pub generation_model: String,
    /// Model id the embedding adapter was configured with. Recorded here
    /// so the boundary can rebuild the adapter on change; the engine
    /// itself never passes it per-call.
    pub embedding_model: String,
    /// Sampling temperature for generation.
    pub temperature: f32,
    /// Default number of chunks retrieved per query.
    pub top_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generation_model: "llama3.2".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            temperature: 0.7,
            top_k: 3,
        }
    }
}

/// Provenance attached to a batch of chunks at ingest time.
///
/// A blank `source` is treated as missing and rejected. When `page` is
/// absent, each chunk's ordinal index is stored as its page, a documented
/// quirk inherited for compatibility: it conflates "page" and "chunk
/// ordinal" for non-paginated sources.
#[derive(Debug, Clone, Default)]
pub struct IngestMetadata {
    /// Document identifier, e.g. a filename.
    pub source: String,
    /// Explicit origin page, for paginated sources.
    pub page: Option<i64>,
}

impl IngestMetadata {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            page: None,
        }
    }

    /// Attach an explicit page number.
    #[must_use]
    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }
}

/// A citation derived from one retrieved record.
#[derive(Debug, Clone, Serialize)]
pub struct Reference {
    /// Originating document identifier.
    pub source: String,
    /// The record's text, truncated to 150 characters plus `...` when
    /// longer.
    pub snippet: String,
    /// The store's native distance; lower is more similar. `0.0` when
    /// the backend reported none.
    pub score: f32,
}

impl Reference {
    pub(crate) fn from_hit(hit: &SearchHit) -> Self {
        let snippet = if hit.text.chars().count() > SNIPPET_MAX_CHARS {
            let mut s: String = hit.text.chars().take(SNIPPET_MAX_CHARS).collect();
            s.push_str("...");
            s
        } else {
            hit.text.clone()
        };
        Self {
            source: hit.source.clone(),
            snippet,
            score: hit.distance.unwrap_or(0.0),
        }
    }
}

/// The answer to one question, with citations in retrieval order.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    /// The generated answer text.
    pub answer: String,
    /// One reference per retrieved chunk, in the store's result order.
    pub references: Vec<Reference>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(text: &str, distance: Option<f32>) -> SearchHit {
        SearchHit {
            text: text.to_string(),
            source: "doc.txt".to_string(),
            page: 0,
            distance,
        }
    }

    #[test]
    fn short_text_is_not_truncated() {
        let r = Reference::from_hit(&hit("Cats are mammals.", Some(0.1)));
        assert_eq!(r.snippet, "Cats are mammals.");
        assert_eq!(r.score, 0.1);
    }

    #[test]
    fn long_text_truncates_to_153_chars() {
        let text = "x".repeat(200);
        let r = Reference::from_hit(&hit(&text, Some(0.5)));
        assert_eq!(r.snippet.chars().count(), 153);
        assert!(r.snippet.ends_with("..."));
        assert_eq!(&r.snippet[..150], &text[..150]);
    }

    #[test]
    fn exactly_150_chars_is_kept_whole() {
        let text = "y".repeat(150);
        let r = Reference::from_hit(&hit(&text, None));
        assert_eq!(r.snippet, text);
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let text = "é".repeat(200);
        let r = Reference::from_hit(&hit(&text, None));
        assert_eq!(r.snippet.chars().count(), 153);
    }

    #[test]
    fn missing_distance_defaults_to_zero() {
        let r = Reference::from_hit(&hit("text", None));
        assert_eq!(r.score, 0.0);
    }

    #[test]
    fn default_config_matches_shipped_models() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.generation_model, "llama3.2");
        assert_eq!(cfg.embedding_model, "nomic-embed-text");
        assert!((cfg.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(cfg.top_k, 3);
    }
}

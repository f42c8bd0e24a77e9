//! Embedding and generation adapters for a local Ollama instance.
//!
//! [`OllamaEmbedder`] calls `POST /api/embed`; [`OllamaGenerator`] calls
//! `POST /api/generate` with `stream: false`. Requires Ollama to be
//! running with the configured models pulled (e.g.
//! `ollama pull nomic-embed-text`).
//!
//! # Retry Strategy
//!
//! Retry policy lives here at the boundary, never in the core. Transient
//! failures back off exponentially:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use std::time::Duration;

use async_trait::async_trait;

use ragmill_core::{Embedder, Generator, RagError};

use crate::config::OllamaConfig;

/// Embedding adapter for Ollama's `/api/embed` endpoint.
pub struct OllamaEmbedder {
    client: reqwest::Client,
    url: String,
    model: String,
    max_retries: u32,
}

impl OllamaEmbedder {
    pub fn new(config: &OllamaConfig, model: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            model: model.into(),
            max_retries: config.max_retries,
        })
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let body = serde_json::json!({
            "model": self.model,
            "input": [text],
        });

        let json = request_with_retry(
            &self.client,
            &format!("{}/api/embed", self.url),
            &body,
            self.max_retries,
            RagError::Embedding,
        )
        .await?;

        parse_embed_response(&json)
    }
}

/// Extract the first embedding vector from an `/api/embed` response.
fn parse_embed_response(json: &serde_json::Value) -> Result<Vec<f32>, RagError> {
    let first = json
        .get("embeddings")
        .and_then(|e| e.as_array())
        .and_then(|arr| arr.first())
        .and_then(|e| e.as_array())
        .ok_or_else(|| RagError::Embedding("response carried no embedding".to_string()))?;

    Ok(first
        .iter()
        .map(|v| v.as_f64().unwrap_or(0.0) as f32)
        .collect())
}

/// Generation adapter for Ollama's `/api/generate` endpoint.
pub struct OllamaGenerator {
    client: reqwest::Client,
    url: String,
    max_retries: u32,
}

impl OllamaGenerator {
    pub fn new(config: &OllamaConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            max_retries: config.max_retries,
        })
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn complete(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<String, RagError> {
        let body = serde_json::json!({
            "model": model,
            "prompt": prompt,
            "options": { "temperature": temperature },
            "stream": false,
        });

        let json = request_with_retry(
            &self.client,
            &format!("{}/api/generate", self.url),
            &body,
            self.max_retries,
            RagError::Generation,
        )
        .await?;

        json.get("response")
            .and_then(|r| r.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| RagError::Generation("response carried no answer text".to_string()))
    }
}

/// POST `body` to `url`, retrying transient failures with backoff.
///
/// `wrap` picks the error variant, so the embedder and generator surface
/// their own taxonomy entries from the same plumbing.
async fn request_with_retry(
    client: &reqwest::Client,
    url: &str,
    body: &serde_json::Value,
    max_retries: u32,
    wrap: fn(String) -> RagError,
) -> Result<serde_json::Value, RagError> {
    let mut last_err = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = Duration::from_secs(1 << (attempt - 1).min(5));
            tracing::debug!(url, attempt, "retrying Ollama request");
            tokio::time::sleep(delay).await;
        }

        let resp = client.post(url).json(body).send().await;

        match resp {
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    return response.json().await.map_err(|e| wrap(e.to_string()));
                }

                let body_text = response.text().await.unwrap_or_default();
                if status.as_u16() == 429 || status.is_server_error() {
                    last_err = Some(wrap(format!("Ollama error {status}: {body_text}")));
                    continue;
                }

                return Err(wrap(format!("Ollama error {status}: {body_text}")));
            }
            Err(e) => {
                last_err = Some(wrap(format!(
                    "Ollama connection error (is Ollama running at {url}?): {e}"
                )));
                continue;
            }
        }
    }

    Err(last_err.unwrap_or_else(|| wrap("request failed after retries".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_response_parses_the_first_vector() {
        let json = serde_json::json!({ "embeddings": [[0.25, -0.5, 1.0]] });
        assert_eq!(parse_embed_response(&json).unwrap(), vec![0.25, -0.5, 1.0]);
    }

    #[test]
    fn embed_response_without_embeddings_is_an_error() {
        let json = serde_json::json!({ "error": "model not found" });
        assert!(matches!(
            parse_embed_response(&json),
            Err(RagError::Embedding(_))
        ));
    }
}

//! Generation port: a single non-streaming LLM completion.

use async_trait::async_trait;

use crate::error::RagError;

/// Port for language-model completion.
///
/// One prompt in, the full answer text out: no streaming, no retries at
/// this layer. Upstream failures map to [`RagError::Generation`] and
/// propagate immediately so the boundary can decide on retry policy.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Complete `prompt` with the given model at the given sampling
    /// temperature and return the answer text.
    async fn complete(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<String, RagError>;
}

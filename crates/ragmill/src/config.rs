//! TOML configuration parsing and validation.
//!
//! The config file is the boundary collaborator that owns persisted
//! settings; the core only ever sees the [`EngineConfig`] value derived
//! here. Range checks (temperature, top_k) happen in [`load_config`] so
//! the core can trust what it is handed.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use ragmill_core::EngineConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

/// Engine tuning persisted in the config file.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineSection {
    #[serde(default = "default_generation_model")]
    pub generation_model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            generation_model: default_generation_model(),
            embedding_model: default_embedding_model(),
            temperature: default_temperature(),
            top_k: default_top_k(),
        }
    }
}

fn default_generation_model() -> String {
    "llama3.2".to_string()
}
fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_top_k() -> usize {
    3
}

/// Connection settings for the local Ollama instance.
#[derive(Debug, Deserialize, Clone)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: default_ollama_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

// 127.0.0.1 rather than localhost: avoids surprises when OLLAMA_HOST
// binds 0.0.0.0.
fn default_ollama_url() -> String {
    "http://127.0.0.1:11434".to_string()
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_max_retries() -> u32 {
    3
}

/// Chunker tuning.
#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default = "default_min_chunk_chars")]
    pub min_chunk_chars: usize,
    #[serde(default = "default_chunk_size_chars")]
    pub chunk_size_chars: usize,
    #[serde(default = "default_overlap_chars")]
    pub overlap_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            min_chunk_chars: default_min_chunk_chars(),
            chunk_size_chars: default_chunk_size_chars(),
            overlap_chars: default_overlap_chars(),
        }
    }
}

fn default_threshold() -> f32 {
    ragmill_core::chunk::DEFAULT_THRESHOLD
}
fn default_min_chunk_chars() -> usize {
    ragmill_core::chunk::DEFAULT_MIN_CHUNK_CHARS
}
fn default_chunk_size_chars() -> usize {
    ragmill_core::chunk::DEFAULT_CHUNK_SIZE_CHARS
}
fn default_overlap_chars() -> usize {
    ragmill_core::chunk::DEFAULT_OVERLAP_CHARS
}

impl Config {
    /// The value handed to the engine at construction and on reload.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            generation_model: self.engine.generation_model.clone(),
            embedding_model: self.engine.embedding_model.clone(),
            temperature: self.engine.temperature,
            top_k: self.engine.top_k,
        }
    }
}

/// Load and validate the configuration file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if !(0.0..=2.0).contains(&config.engine.temperature) {
        anyhow::bail!("engine.temperature must be in [0.0, 2.0]");
    }

    if !(1..=10).contains(&config.engine.top_k) {
        anyhow::bail!("engine.top_k must be in [1, 10]");
    }

    if config.engine.generation_model.trim().is_empty() {
        anyhow::bail!("engine.generation_model must not be empty");
    }

    if config.engine.embedding_model.trim().is_empty() {
        anyhow::bail!("engine.embedding_model must not be empty");
    }

    if !(0.0..=1.0).contains(&config.chunking.threshold) {
        anyhow::bail!("chunking.threshold must be in [0.0, 1.0]");
    }

    if config.chunking.chunk_size_chars == 0 {
        anyhow::bail!("chunking.chunk_size_chars must be > 0");
    }

    if config.chunking.overlap_chars >= config.chunking.chunk_size_chars {
        anyhow::bail!("chunking.overlap_chars must be smaller than chunking.chunk_size_chars");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let file = write_config("[db]\npath = \"data/ragmill.sqlite\"\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.engine.generation_model, "llama3.2");
        assert_eq!(config.engine.embedding_model, "nomic-embed-text");
        assert!((config.engine.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.engine.top_k, 3);
        assert_eq!(config.ollama.url, "http://127.0.0.1:11434");
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let file = write_config(
            "[db]\npath = \"x.sqlite\"\n[engine]\ntemperature = 2.5\n",
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn out_of_range_top_k_is_rejected() {
        let file = write_config("[db]\npath = \"x.sqlite\"\n[engine]\ntop_k = 0\n");
        assert!(load_config(file.path()).is_err());
        let file = write_config("[db]\npath = \"x.sqlite\"\n[engine]\ntop_k = 11\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn oversized_overlap_is_rejected() {
        let file = write_config(
            "[db]\npath = \"x.sqlite\"\n[chunking]\nchunk_size_chars = 100\noverlap_chars = 100\n",
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn engine_config_mirrors_the_engine_section() {
        let file = write_config(
            "[db]\npath = \"x.sqlite\"\n[engine]\ngeneration_model = \"mistral\"\ntemperature = 0.2\n",
        );
        let config = load_config(file.path()).unwrap();
        let engine_config = config.engine_config();
        assert_eq!(engine_config.generation_model, "mistral");
        assert!((engine_config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(engine_config.top_k, 3);
    }
}

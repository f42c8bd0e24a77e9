//! # Ragmill CLI (`rgm`)
//!
//! The `rgm` binary is the primary interface for Ragmill. It provides
//! commands for database initialization, document ingestion, question
//! answering, and knowledge-base statistics.
//!
//! ## Usage
//!
//! ```bash
//! rgm --config ./ragmill.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rgm init` | Create the SQLite database file |
//! | `rgm ingest <file>` | Chunk, embed, and store a PDF or text file |
//! | `rgm ask "<question>"` | Answer a question with citations |
//! | `rgm stats` | Show record count and active configuration |
//!
//! ## Examples
//!
//! ```bash
//! rgm init
//! rgm ingest ./docs/handbook.pdf
//! rgm ingest ./notes.txt --fixed
//! rgm ask "What is the deployment process?" --top-k 5
//! rgm ask "Summarize the handbook" --json
//! rgm stats
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ragmill::ask;
use ragmill::config;
use ragmill::db;
use ragmill::ingest::{self, ChunkStrategy};
use ragmill::runtime;

/// Ragmill — local-first retrieval-augmented question answering over
/// your documents.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file; see the `config` module docs for every option.
#[derive(Parser)]
#[command(
    name = "rgm",
    about = "Ragmill — local-first retrieval-augmented question answering over your documents",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./ragmill.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Create the SQLite database file.
    ///
    /// The vector table itself is created on first ingest. This command
    /// is idempotent — running it multiple times is safe.
    Init,

    /// Ingest a document into the knowledge base.
    ///
    /// Extracts text (PDF per page, anything else as one plain-text
    /// blob), chunks it, embeds every chunk via Ollama, and stores the
    /// records in SQLite.
    Ingest {
        /// The file to ingest.
        file: PathBuf,

        /// Store this identifier instead of the filename as the source.
        #[arg(long)]
        source: Option<String>,

        /// Use fixed-size windows instead of semantic chunking
        /// (faster; no embedding calls while chunking).
        #[arg(long)]
        fixed: bool,
    },

    /// Answer a question from the ingested documents.
    Ask {
        /// The question to answer.
        question: String,

        /// Number of chunks to retrieve (1-10). Defaults to the
        /// configured value.
        #[arg(long)]
        top_k: Option<usize>,

        /// Emit the answer and references as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show knowledge-base statistics and the active configuration.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let pool = db::connect(&config).await?;
            pool.close().await;
            println!("initialized {}", config.db.path.display());
        }
        Commands::Ingest {
            file,
            source,
            fixed,
        } => {
            let strategy = if fixed {
                ChunkStrategy::Fixed
            } else {
                ChunkStrategy::Semantic
            };
            ingest::run_ingest(&config, &file, source, strategy).await?;
        }
        Commands::Ask {
            question,
            top_k,
            json,
        } => {
            ask::run_ask(&config, &question, top_k, json).await?;
        }
        Commands::Stats => {
            let rt = runtime::open_engine(&config).await?;
            let count = rt.engine.document_count().await?;
            let engine_config = rt.engine.config();
            println!("knowledge base: {} records", count);
            println!("  generation model: {}", engine_config.generation_model);
            println!("  embedding model: {}", engine_config.embedding_model);
            println!("  temperature: {}", engine_config.temperature);
            println!("  top_k: {}", engine_config.top_k);
            rt.pool.close().await;
        }
    }

    Ok(())
}

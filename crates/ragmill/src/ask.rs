//! Query entry point and CLI output formatting.
//!
//! Thin wrapper over [`ragmill_core::Engine::query`]: validates the
//! caller-facing `top_k` range here at the boundary (the core accepts
//! any positive value and trusts its caller), runs the query, and prints
//! the answer with its citations.

use anyhow::Result;

use ragmill_core::QueryResult;

use crate::config::Config;
use crate::runtime;

/// Run a query and return the structured result.
pub async fn ask_question(
    config: &Config,
    question: &str,
    top_k: Option<usize>,
) -> Result<QueryResult> {
    if question.trim().is_empty() {
        anyhow::bail!("question must not be empty");
    }

    if let Some(k) = top_k {
        if !(1..=10).contains(&k) {
            anyhow::bail!("--top-k must be in [1, 10]");
        }
    }

    let rt = runtime::open_engine(config).await?;
    let result = rt.engine.query(question, top_k).await?;
    rt.pool.close().await;
    Ok(result)
}

/// CLI entry point — calls [`ask_question`] and prints the result.
pub async fn run_ask(
    config: &Config,
    question: &str,
    top_k: Option<usize>,
    json: bool,
) -> Result<()> {
    let result = ask_question(config, question, top_k).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", result.answer.trim());
    println!();
    println!("References:");
    for (i, reference) in result.references.iter().enumerate() {
        println!("  {}. {} [{:.4}]", i + 1, reference.source, reference.score);
        println!(
            "     \"{}\"",
            reference.snippet.replace('\n', " ").trim()
        );
    }

    Ok(())
}

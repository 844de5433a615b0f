//! Entity Graph CLI
//!
//! Fetches the configured document, extracts and links its entities, and
//! writes the Turtle graph. No flags; overrides come from `ENTITY_GRAPH_*`
//! environment variables or a `.env` file.
//!
//! Usage:
//!   cargo run --bin entity_graph
//!   RUST_LOG=entity_graph=debug cargo run --bin entity_graph

use anyhow::{Context, Result};
use entity_graph::config::PipelineConfig;
use entity_graph::error::PipelineError;
use entity_graph::pipeline::Pipeline;

/// Lookups shown after the run, served through the run's cache
const EXAMPLE_LOOKUPS: &[&str] = &["Dostoevsky", "Saint Petersburg"];

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = PipelineConfig::from_env();
    let pipeline = Pipeline::from_config(config).context("Failed to initialise pipeline")?;

    let report = match pipeline.run().await {
        Ok(report) => report,
        Err(e @ (PipelineError::Fetch(_) | PipelineError::NoText { .. })) => {
            eprintln!("Failed to retrieve text: {}", e);
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Pipeline run failed"),
    };

    println!("Extracted {} entities", report.entity_count);
    println!("Sample entities:");
    for mention in &report.sample {
        println!("  {}", mention);
    }

    println!("Example lookups:");
    for text in EXAMPLE_LOOKUPS {
        match pipeline.resolver().resolve(text).await {
            Some(id) => println!("  {} -> wd:{}", text, id),
            None => println!("  {} -> not found", text),
        }
    }

    println!(
        "Wrote {} triples ({} linked entities) to {}",
        report.triple_count,
        report.linked_count,
        report.output_path.display()
    );
    Ok(())
}

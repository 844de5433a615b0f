//! Entity Graph - document to knowledge-graph pipeline
//!
//! Downloads a document, extracts named entity mentions, links each mention to a
//! Wikidata item and writes the result as a Turtle graph.
//!
//! ## Call Chain
//!
//! ```text
//! TextSource::fetch ─► EntityExtractor::extract ─► GraphAssembler::assemble ─► turtle::serialize
//!                                                          │
//!                                                          └─► EntityResolver::resolve
//!                                                                  ├─► ResolutionCache
//!                                                                  └─► EntitySearch (SPARQL)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use entity_graph::config::PipelineConfig;
//! use entity_graph::pipeline::Pipeline;
//!
//! # async fn run() -> Result<(), entity_graph::error::PipelineError> {
//! let pipeline = Pipeline::from_config(PipelineConfig::from_env())?;
//! let report = pipeline.run().await?;
//! println!("{} entities", report.entity_count);
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Defaults and environment overrides
pub mod config;

// External collaborators: document text and entity mentions
pub mod extraction;
pub mod source;

// Knowledge-base linking with retry and memoization
pub mod resolver;

// Triples, assembly and Turtle output
pub mod graph;

// Stage orchestration
pub mod pipeline;

#[cfg(test)]
mod http_stub;

pub use error::{FetchError, PipelineError, SearchError};
pub use extraction::{EntityExtractor, EntityMention, PatternEntityExtractor};
pub use graph::{GraphAssembler, OutputGraph};
pub use pipeline::{Pipeline, PipelineReport};
pub use resolver::{EntityResolver, EntitySearch, ResolutionCache, WikidataSearch};
pub use source::{HtmlTextSource, TextSource};

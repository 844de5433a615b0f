//! Pipeline driver
//!
//! fetch → extract → assemble → serialize, strictly in sequence. A fetch that
//! yields no text stops the run before any downstream stage. Retries live only
//! in the resolver.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::extraction::{EntityExtractor, EntityMention, PatternEntityExtractor};
use crate::graph::{turtle, GraphAssembler};
use crate::resolver::{EntityResolver, ResolutionCache, ResolverStats, WikidataSearch};
use crate::source::{HtmlTextSource, TextSource};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub source_url: String,
    pub entity_count: usize,
    /// First mentions in document order
    pub sample: Vec<EntityMention>,
    pub triple_count: usize,
    pub linked_count: usize,
    pub output_path: PathBuf,
    pub resolver_stats: ResolverStats,
}

pub struct Pipeline {
    config: PipelineConfig,
    source: Arc<dyn TextSource>,
    extractor: Arc<dyn EntityExtractor>,
    resolver: Arc<EntityResolver>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        source: Arc<dyn TextSource>,
        extractor: Arc<dyn EntityExtractor>,
        resolver: Arc<EntityResolver>,
    ) -> Self {
        Self {
            config,
            source,
            extractor,
            resolver,
        }
    }

    /// Wire the HTTP source, pattern extractor and Wikidata resolver.
    ///
    /// The resolution cache is created here, empty, and lives as long as the
    /// pipeline.
    pub fn from_config(config: PipelineConfig) -> Result<Self, PipelineError> {
        let source = HtmlTextSource::new(config.content_selector.clone(), &config.user_agent)
            .map_err(PipelineError::Client)?;
        let search = WikidataSearch::new(config.sparql_endpoint.clone(), &config.user_agent)
            .map_err(PipelineError::Client)?;
        let cache = Arc::new(ResolutionCache::new(config.resolver.cache_capacity));
        let resolver = EntityResolver::new(Arc::new(search), cache, config.resolver.clone());

        Ok(Self::new(
            config,
            Arc::new(source),
            Arc::new(PatternEntityExtractor::new()),
            Arc::new(resolver),
        ))
    }

    /// Shared resolver, so callers reuse the run's cache
    pub fn resolver(&self) -> &Arc<EntityResolver> {
        &self.resolver
    }

    pub async fn run(&self) -> Result<PipelineReport, PipelineError> {
        let url = &self.config.source_url;

        tracing::info!(url = %url, "Fetching source text");
        let text = match self.source.fetch(url).await? {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(PipelineError::NoText { url: url.clone() }),
        };

        let mentions = self.extractor.extract(&text);
        tracing::info!(entities = mentions.len(), "Extracted entity mentions");

        let graph = GraphAssembler::new(self.resolver.clone())
            .assemble(&mentions)
            .await;

        let output_path = self.config.output_path.clone();
        std::fs::write(&output_path, turtle::serialize(&graph)).map_err(|source| {
            PipelineError::Io {
                path: output_path.display().to_string(),
                source,
            }
        })?;
        tracing::info!(path = %output_path.display(), triples = graph.len(), "Graph written");

        Ok(PipelineReport {
            source_url: url.clone(),
            entity_count: mentions.len(),
            sample: mentions
                .iter()
                .take(self.config.sample_size)
                .cloned()
                .collect(),
            triple_count: graph.len(),
            linked_count: graph.linked_count(),
            output_path,
            resolver_stats: self.resolver.stats(),
        })
    }
}

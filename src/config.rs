//! Pipeline configuration
//!
//! Every setting has a fixed default. `from_env` applies optional overrides from
//! `ENTITY_GRAPH_*` variables; the binary loads a `.env` file first.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SOURCE_URL: &str = "https://en.wikipedia.org/wiki/Fyodor_Dostoevsky";
pub const DEFAULT_CONTENT_SELECTOR: &str = "div#mw-content-text";
pub const DEFAULT_OUTPUT_PATH: &str = "entities.ttl";
pub const DEFAULT_SPARQL_ENDPOINT: &str = "https://query.wikidata.org/sparql";
pub const DEFAULT_USER_AGENT: &str =
    "entity-graph/0.1 (https://github.com/entity-graph/entity-graph; entity-graph@example.org)";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF_UNIT_MS: u64 = 1000;
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;
pub const DEFAULT_SAMPLE_SIZE: usize = 10;
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Settings for the entity resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Attempts per lookup, including the first
    pub max_retries: u32,
    /// One backoff time unit; failed attempt `i` sleeps `2^i` units
    pub backoff_unit: Duration,
    /// Maximum number of distinct cached mentions
    pub cache_capacity: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_unit: Duration::from_millis(DEFAULT_BACKOFF_UNIT_MS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl ResolverConfig {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

/// Settings for a full pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub source_url: String,
    /// CSS selector of the element holding the document body
    pub content_selector: String,
    pub output_path: PathBuf,
    pub sparql_endpoint: String,
    pub user_agent: String,
    /// Number of mentions printed in the run summary
    pub sample_size: usize,
    pub resolver: ResolverConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            content_selector: DEFAULT_CONTENT_SELECTOR.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            sparql_endpoint: DEFAULT_SPARQL_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            resolver: ResolverConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Defaults with overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("ENTITY_GRAPH_SOURCE_URL") {
            config.source_url = url;
        }
        if let Some(selector) = lookup("ENTITY_GRAPH_CONTENT_SELECTOR") {
            config.content_selector = selector;
        }
        if let Some(path) = lookup("ENTITY_GRAPH_OUTPUT") {
            config.output_path = PathBuf::from(path);
        }
        if let Some(endpoint) = lookup("ENTITY_GRAPH_SPARQL_ENDPOINT") {
            config.sparql_endpoint = endpoint;
        }
        if let Some(agent) = lookup("ENTITY_GRAPH_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(n) = parse_var(&lookup, "ENTITY_GRAPH_MAX_RETRIES") {
            config.resolver.max_retries = n;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "ENTITY_GRAPH_BACKOFF_UNIT_MS") {
            config.resolver.backoff_unit = Duration::from_millis(ms);
        }
        if let Some(n) = parse_var(&lookup, "ENTITY_GRAPH_CACHE_CAPACITY") {
            config.resolver.cache_capacity = n;
        }
        if let Some(n) = parse_var(&lookup, "ENTITY_GRAPH_SAMPLE_SIZE") {
            config.sample_size = n;
        }

        config
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring malformed {}='{}', keeping default", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::from_lookup(|_| None);
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.resolver.max_retries, 3);
        assert_eq!(config.resolver.backoff_unit, Duration::from_secs(1));
        assert_eq!(config.output_path, PathBuf::from("entities.ttl"));
    }

    #[test]
    fn test_overrides() {
        let config = PipelineConfig::from_lookup(lookup_from(&[
            ("ENTITY_GRAPH_SOURCE_URL", "https://example.org/text"),
            ("ENTITY_GRAPH_OUTPUT", "/tmp/out.ttl"),
            ("ENTITY_GRAPH_MAX_RETRIES", "5"),
            ("ENTITY_GRAPH_BACKOFF_UNIT_MS", "10"),
            ("ENTITY_GRAPH_CACHE_CAPACITY", "2"),
        ]));

        assert_eq!(config.source_url, "https://example.org/text");
        assert_eq!(config.output_path, PathBuf::from("/tmp/out.ttl"));
        assert_eq!(config.resolver.max_retries, 5);
        assert_eq!(config.resolver.backoff_unit, Duration::from_millis(10));
        assert_eq!(config.resolver.cache_capacity, 2);
    }

    #[test]
    fn test_malformed_number_keeps_default() {
        let config = PipelineConfig::from_lookup(lookup_from(&[(
            "ENTITY_GRAPH_MAX_RETRIES",
            "three",
        )]));
        assert_eq!(config.resolver.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_resolver_config_builder() {
        let config = ResolverConfig::default()
            .with_max_retries(1)
            .with_backoff_unit(Duration::ZERO)
            .with_cache_capacity(7);

        assert_eq!(config.max_retries, 1);
        assert_eq!(config.backoff_unit, Duration::ZERO);
        assert_eq!(config.cache_capacity, 7);
    }
}

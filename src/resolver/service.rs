//! EntityResolver - memoized knowledge-base lookup with retry
//!
//! Fail-soft: query errors are retried with exponential backoff and, once
//! attempts run out, logged and reported as "not found". Confirmed outcomes
//! (including an empty match) are cached; exhausted failures are not.

use super::cache::{ResolutionCache, ResolutionResult};
use super::normalize::normalize_mention;
use super::search::EntitySearch;
use crate::config::ResolverConfig;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Counters for one resolver instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolverStats {
    /// Search attempts sent to the knowledge base
    pub queries: usize,
    /// Lookups answered from the cache
    pub cache_hits: usize,
    /// Lookups that ran out of attempts
    pub failures: usize,
}

/// Resolves mention text to a canonical knowledge-base identifier
pub struct EntityResolver {
    search: Arc<dyn EntitySearch>,
    cache: Arc<ResolutionCache>,
    config: ResolverConfig,
    queries: AtomicUsize,
    cache_hits: AtomicUsize,
    failures: AtomicUsize,
}

impl EntityResolver {
    pub fn new(
        search: Arc<dyn EntitySearch>,
        cache: Arc<ResolutionCache>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            search,
            cache,
            config,
            queries: AtomicUsize::new(0),
            cache_hits: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        }
    }

    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            queries: self.queries.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    /// Resolve with the configured number of attempts
    pub async fn resolve(&self, mention: &str) -> Option<String> {
        self.resolve_with_retries(mention, self.config.max_retries)
            .await
    }

    /// Resolve `mention`, making at most `max_retries` search attempts.
    ///
    /// Never fails: empty mentions and exhausted retries both yield `None`.
    pub async fn resolve_with_retries(&self, mention: &str, max_retries: u32) -> Option<String> {
        let key = normalize_mention(mention);
        if key.is_empty() {
            return None;
        }

        if let Some(cached) = self.cache.get(&key) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(mention = %key, "Resolution cache hit");
            return cached.identifier;
        }

        for attempt in 0..max_retries {
            self.queries.fetch_add(1, Ordering::Relaxed);

            match self.search.search(&key).await {
                Ok(identifier) => {
                    let result = ResolutionResult {
                        identifier: identifier.clone(),
                    };
                    if !self.cache.insert(key.clone(), result) {
                        tracing::debug!(mention = %key, "Resolution cache full, result not stored");
                    }
                    return identifier;
                }
                Err(e) if attempt + 1 < max_retries => {
                    let delay = self.backoff_delay(attempt);
                    tracing::warn!(
                        mention = %key,
                        attempt = attempt + 1,
                        "Entity search failed, retrying in {:?}: {}",
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    self.failures.fetch_add(1, Ordering::Relaxed);
                    tracing::error!(
                        mention = %key,
                        error = %e,
                        "Entity resolution failed after {} attempts",
                        max_retries
                    );
                }
            }
        }

        None
    }

    /// `2^attempt` backoff units
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.config
            .backoff_unit
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays scripted outcomes, then answers "not found"
    struct ScriptedSearch {
        outcomes: Mutex<Vec<Result<Option<String>, SearchError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSearch {
        fn new(mut outcomes: Vec<Result<Option<String>, SearchError>>) -> Self {
            outcomes.reverse();
            Self {
                outcomes: Mutex::new(outcomes),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EntitySearch for ScriptedSearch {
        async fn search(&self, _text: &str) -> Result<Option<String>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes.lock().unwrap().pop().unwrap_or(Ok(None))
        }
    }

    fn resolver_with(search: Arc<ScriptedSearch>) -> EntityResolver {
        EntityResolver::new(
            search,
            Arc::new(ResolutionCache::new(16)),
            ResolverConfig::default().with_backoff_unit(Duration::ZERO),
        )
    }

    fn failure() -> Result<Option<String>, SearchError> {
        Err(SearchError::Other("connection reset".to_string()))
    }

    #[test]
    fn test_backoff_delay_doubles() {
        let resolver = EntityResolver::new(
            Arc::new(ScriptedSearch::new(vec![])),
            Arc::new(ResolutionCache::new(1)),
            ResolverConfig::default(),
        );
        assert_eq!(resolver.backoff_delay(0), Duration::from_secs(1));
        assert_eq!(resolver.backoff_delay(1), Duration::from_secs(2));
        assert_eq!(resolver.backoff_delay(2), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_cached_after_first_success() {
        let search = Arc::new(ScriptedSearch::new(vec![Ok(Some("Q42".to_string()))]));
        let resolver = resolver_with(search.clone());

        assert_eq!(resolver.resolve("Example").await, Some("Q42".to_string()));
        assert_eq!(resolver.resolve("Example").await, Some("Q42".to_string()));
        assert_eq!(search.calls(), 1);
        assert_eq!(resolver.stats().cache_hits, 1);
    }

    #[tokio::test]
    async fn test_lookup_key_is_normalized() {
        let search = Arc::new(ScriptedSearch::new(vec![Ok(Some("Q656".to_string()))]));
        let resolver = resolver_with(search.clone());

        assert_eq!(
            resolver.resolve("Saint\nPetersburg").await,
            Some("Q656".to_string())
        );
        assert_eq!(
            resolver.resolve("  Saint Petersburg ").await,
            Some("Q656".to_string())
        );
        assert_eq!(search.calls(), 1);
        assert!(resolver.cache().contains("Saint Petersburg"));
    }

    #[tokio::test]
    async fn test_empty_mention_skips_search() {
        let search = Arc::new(ScriptedSearch::new(vec![]));
        let resolver = resolver_with(search.clone());

        assert_eq!(resolver.resolve("").await, None);
        assert_eq!(resolver.resolve(" \n\t ").await, None);
        assert_eq!(search.calls(), 0);
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn test_empty_match_is_cached_without_retry() {
        let search = Arc::new(ScriptedSearch::new(vec![Ok(None)]));
        let resolver = resolver_with(search.clone());

        assert_eq!(resolver.resolve("Xyzzy").await, None);
        assert_eq!(resolver.resolve("Xyzzy").await, None);
        assert_eq!(search.calls(), 1);
        assert_eq!(
            resolver.cache().get("Xyzzy"),
            Some(ResolutionResult::not_found())
        );
    }

    #[tokio::test]
    async fn test_exhausted_failure_is_not_cached() {
        let search = Arc::new(ScriptedSearch::new(vec![
            failure(),
            failure(),
            failure(),
            Ok(Some("Q7".to_string())),
        ]));
        let resolver = resolver_with(search.clone());

        assert_eq!(resolver.resolve("Example").await, None);
        assert_eq!(search.calls(), 3);
        assert!(!resolver.cache().contains("Example"));
        assert_eq!(resolver.stats().failures, 1);

        // Retried fresh on the next call
        assert_eq!(resolver.resolve("Example").await, Some("Q7".to_string()));
        assert_eq!(search.calls(), 4);
    }

    #[tokio::test]
    async fn test_zero_retries_makes_no_attempt() {
        let search = Arc::new(ScriptedSearch::new(vec![Ok(Some("Q1".to_string()))]));
        let resolver = resolver_with(search.clone());

        assert_eq!(resolver.resolve_with_retries("Example", 0).await, None);
        assert_eq!(search.calls(), 0);
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn test_full_cache_requeries_new_keys() {
        let search = Arc::new(ScriptedSearch::new(vec![
            Ok(Some("Q1".to_string())),
            Ok(Some("Q2".to_string())),
            Ok(Some("Q2".to_string())),
        ]));
        let resolver = EntityResolver::new(
            search.clone(),
            Arc::new(ResolutionCache::new(1)),
            ResolverConfig::default().with_backoff_unit(Duration::ZERO),
        );

        assert_eq!(resolver.resolve("a").await, Some("Q1".to_string()));
        assert_eq!(resolver.resolve("b").await, Some("Q2".to_string()));
        assert_eq!(resolver.resolve("b").await, Some("Q2".to_string()));
        assert_eq!(resolver.resolve("a").await, Some("Q1".to_string()));
        assert_eq!(search.calls(), 3);
    }
}

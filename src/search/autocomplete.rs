//! Cached autocomplete wrapper.
//!
//! Each strategy's output is cacheable under its own key namespace with a
//! configurable TTL. A cache hit short-circuits the index call entirely;
//! the cache itself is behind a trait so deployments can substitute a
//! shared key-value service for the in-process default.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use crate::config::CacheConfig;
use crate::search::service::SearchService;

const SUGGEST_KEY: &str = "product:suggestions:";
const NGRAM_KEY: &str = "product:ngram:suggestions:";
const FUZZY_KEY: &str = "product:fuzzy:suggestions:";
const COMBINED_KEY: &str = "product:combined:suggestions:";

/// Get/put/evict view of a suggestion cache with TTL semantics.
#[async_trait]
pub trait SuggestionCache: Send + Sync {
    /// Look up cached suggestions.
    async fn get(&self, key: &str) -> Option<Vec<String>>;

    /// Store suggestions under a key.
    async fn put(&self, key: String, suggestions: Vec<String>);

    /// Drop a cached entry.
    async fn evict(&self, key: &str);
}

/// In-process suggestion cache backed by moka.
pub struct MokaSuggestionCache {
    cache: Cache<String, Arc<Vec<String>>>,
    enabled: bool,
}

impl MokaSuggestionCache {
    /// Create a cache from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(Duration::from_secs(config.ttl_secs))
            .build();

        Self {
            cache,
            enabled: config.enabled,
        }
    }

    /// Create a cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            cache: Cache::builder().max_capacity(0).build(),
            enabled: false,
        }
    }
}

#[async_trait]
impl SuggestionCache for MokaSuggestionCache {
    async fn get(&self, key: &str) -> Option<Vec<String>> {
        if !self.enabled {
            return None;
        }
        self.cache.get(key).await.map(|hit| (*hit).clone())
    }

    async fn put(&self, key: String, suggestions: Vec<String>) {
        if !self.enabled {
            return;
        }
        self.cache.insert(key, Arc::new(suggestions)).await;
    }

    async fn evict(&self, key: &str) {
        self.cache.invalidate(key).await;
    }
}

/// Autocomplete strategies wrapped in a suggestion cache.
pub struct CachedAutocomplete {
    service: Arc<SearchService>,
    cache: Arc<dyn SuggestionCache>,
}

impl CachedAutocomplete {
    /// Wrap a search service with the given cache.
    pub fn new(service: Arc<SearchService>, cache: Arc<dyn SuggestionCache>) -> Self {
        Self { service, cache }
    }

    /// Prefix-completion autocomplete, cached.
    pub async fn autocomplete(&self, text: &str) -> Vec<String> {
        let key = format!("{SUGGEST_KEY}{text}");
        if let Some(hit) = self.cache.get(&key).await {
            return hit;
        }
        let suggestions = self.service.autocomplete(text).await;
        self.cache.put(key, suggestions.clone()).await;
        suggestions
    }

    /// N-gram autocomplete, cached.
    pub async fn ngram_autocomplete(&self, text: &str) -> Vec<String> {
        let key = format!("{NGRAM_KEY}{text}");
        if let Some(hit) = self.cache.get(&key).await {
            return hit;
        }
        let suggestions = self.service.ngram_autocomplete(text).await;
        self.cache.put(key, suggestions.clone()).await;
        suggestions
    }

    /// Fuzzy autocomplete, cached.
    pub async fn fuzzy_autocomplete(&self, text: &str) -> Vec<String> {
        let key = format!("{FUZZY_KEY}{text}");
        if let Some(hit) = self.cache.get(&key).await {
            return hit;
        }
        let suggestions = self.service.fuzzy_autocomplete(text).await;
        self.cache.put(key, suggestions.clone()).await;
        suggestions
    }

    /// Combined cascade autocomplete, cached.
    pub async fn combined_autocomplete(&self, text: &str) -> Vec<String> {
        let key = format!("{COMBINED_KEY}{text}");
        if let Some(hit) = self.cache.get(&key).await {
            return hit;
        }
        let suggestions = self.service.combined_autocomplete(text).await;
        self.cache.put(key, suggestions.clone()).await;
        suggestions
    }
}

//! Search façade: keyword search, similarity, recommendations, autocomplete.
//!
//! Read paths degrade rather than fail: an index outage turns autocomplete
//! into an empty list, never an error to the caller.

use std::sync::Arc;

use tracing::error;

use crate::activity::{history_window_start, top_product_ids};
use crate::catalog::{ActivityStore, ActivityType, ProductReader, ProductResponse};
use crate::config::SearchConfig;
use crate::error::Result;
use crate::index::IndexBackend;
use crate::search::query;
use crate::search::request::{SearchRequest, SearchResult};
use crate::search::results::{hit_names, map_search_outcome, suggestion_texts};

/// The suggester name used by the prefix completion strategy.
const NAME_SUGGESTER: &str = "name_suggest";

/// Composes query construction, the index call, and result mapping.
pub struct SearchService {
    backend: Arc<dyn IndexBackend>,
    products: Arc<dyn ProductReader>,
    activity: Arc<dyn ActivityStore>,
    index: String,
    config: SearchConfig,
}

impl SearchService {
    /// Create a service over the given collaborators.
    pub fn new(
        backend: Arc<dyn IndexBackend>,
        products: Arc<dyn ProductReader>,
        activity: Arc<dyn ActivityStore>,
        index: impl Into<String>,
        config: SearchConfig,
    ) -> Self {
        Self {
            backend,
            products,
            activity,
            index: index.into(),
            config,
        }
    }

    /// Keyword search with filters, facets, and popularity-boosted ranking.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult<ProductResponse>> {
        let body = query::search_body(request);
        let outcome = self.backend.search(&self.index, &body).await?;
        map_search_outcome(&outcome, self.products.as_ref()).await
    }

    /// Products similar to the given one, boosted by shared categories.
    pub async fn similar_products(
        &self,
        product_id: u64,
    ) -> Result<SearchResult<ProductResponse>> {
        let source = self.products.product_response(product_id).await?;
        let category_names: Vec<String> =
            source.categories.iter().map(|c| c.name.clone()).collect();

        let body = query::similar_body(
            &self.index,
            product_id,
            &category_names,
            self.config.similar_limit,
        );
        let outcome = self.backend.search(&self.index, &body).await?;
        map_search_outcome(&outcome, self.products.as_ref()).await
    }

    /// Recommendations seeded by a user's recent activity of one type.
    ///
    /// Only view and purchase histories are supported; any other activity
    /// type resolves to an empty result rather than an error.
    pub async fn user_recommendation(
        &self,
        user_id: u64,
        activity_type: &str,
    ) -> Result<SearchResult<ProductResponse>> {
        let Some(activity_type) = ActivityType::parse(activity_type) else {
            return Ok(SearchResult::empty());
        };

        let history = self
            .activity
            .recent_by_user(user_id, activity_type, history_window_start())
            .await?;
        let seed_ids = top_product_ids(&history, self.config.recommendation_seeds);
        if seed_ids.is_empty() {
            return Ok(SearchResult::empty());
        }

        let body =
            query::recommendation_body(&seed_ids, activity_type, self.config.recommendation_limit);
        let outcome = self.backend.search(&self.index, &body).await?;
        map_search_outcome(&outcome, self.products.as_ref()).await
    }

    /// Prefix-completion autocomplete.
    pub async fn autocomplete(&self, text: &str) -> Vec<String> {
        let body = query::completion_body(text, self.config.suggestion_limit);
        match self.backend.search(&self.index, &body).await {
            Ok(outcome) => suggestion_texts(&outcome, NAME_SUGGESTER),
            Err(err) => {
                error!("Error during autocomplete: {err}");
                Vec::new()
            }
        }
    }

    /// N-gram autocomplete on the dedicated n-gram field.
    pub async fn ngram_autocomplete(&self, text: &str) -> Vec<String> {
        let body = query::ngram_body(text, self.config.suggestion_limit);
        match self.backend.search(&self.index, &body).await {
            Ok(outcome) => hit_names(&outcome),
            Err(err) => {
                error!("Error during ngram autocomplete: {err}");
                Vec::new()
            }
        }
    }

    /// Fuzzy autocomplete on the name field.
    pub async fn fuzzy_autocomplete(&self, text: &str) -> Vec<String> {
        let body = query::fuzzy_body(text, self.config.suggestion_limit);
        match self.backend.search(&self.index, &body).await {
            Ok(outcome) => hit_names(&outcome),
            Err(err) => {
                error!("Error during fuzzy autocomplete: {err}");
                Vec::new()
            }
        }
    }

    /// Cascade of the three strategies, deduplicated and capped.
    ///
    /// Later strategies only run while the accumulated count is short of the
    /// cap; duplicates are removed after concatenation, preserving first
    /// occurrence order.
    pub async fn combined_autocomplete(&self, text: &str) -> Vec<String> {
        let cap = self.config.combined_suggestion_limit;
        let mut results = self.autocomplete(text).await;

        if results.len() < cap {
            results.extend(self.ngram_autocomplete(text).await);
        }
        if results.len() < cap {
            results.extend(self.fuzzy_autocomplete(text).await);
        }

        let mut seen = std::collections::HashSet::new();
        results.retain(|name| seen.insert(name.clone()));
        results.truncate(cap);
        results
    }
}

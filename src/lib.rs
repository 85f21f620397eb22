//! Mercato: product search and ranking engine.
//!
//! Builds relevance-scored queries against an external full-text index,
//! keeps that index synchronized with the canonical product catalog, and
//! serves low-latency autocomplete with cascading fallback strategies.
//!
//! The index is a derived, rebuildable cache: write paths fan out to it
//! asynchronously and any inconsistency is recoverable with a full reindex.

pub mod activity;
pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod search;

pub use activity::{history_window_start, top_product_ids, ActivityTracker};
pub use catalog::{
    ActivityRecord, ActivityStore, ActivityType, Category, CategoryResponse, MemoryActivityStore,
    MemoryProductStore, Product, ProductReader, ProductResponse, ProductStore,
};
pub use config::{CacheConfig, Config, IndexConfig, ReindexConfig, RetryConfig, SearchConfig};
pub use error::{CatalogError, ConfigError, IndexError, MercatoError, Result};
pub use index::{
    BulkFailure, BulkReindexer, BulkReport, CategoryEntry, Hit, HitsEnvelope, HttpIndexBackend,
    IndexBackend, IndexDispatcher, IndexTask, IndexWriter, ProductDocument, ReindexReport,
    SearchOutcome, SuggestEntry, SuggestOption, TotalHits,
};
pub use search::{
    CachedAutocomplete, FacetEntry, MokaSuggestionCache, SearchRequest, SearchResult,
    SearchService, SortOrder, SuggestionCache,
};

//! Search read paths: query construction, execution, and result mapping.
//!
//! # Architecture
//!
//! ```text
//! SearchRequest
//!     │
//!     ▼
//! query (JSON DSL)  ──►  IndexBackend  ──►  SearchOutcome
//!                                               │
//!                                               ▼
//!                                         results mapping
//!                                   (ids resolved via ProductReader)
//!                                               │
//!                                               ▼
//!                                  SearchResult<ProductResponse>
//! ```
//!
//! Autocomplete runs the same loop per strategy, wrapped by
//! [`CachedAutocomplete`] so repeated lookups skip the index.

pub mod query;

mod autocomplete;
mod request;
mod results;
mod service;

pub use autocomplete::{CachedAutocomplete, MokaSuggestionCache, SuggestionCache};
pub use request::{FacetEntry, SearchRequest, SearchResult, SortOrder};
pub use results::{hit_names, map_facets, map_search_outcome, suggestion_texts};
pub use service::SearchService;

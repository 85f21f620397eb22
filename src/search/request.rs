//! Search request and result shapes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A product search request.
///
/// Pages are 1-based; the translation to the index's 0-based offset happens
/// once, in the query builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    /// Free-text query over name and description; empty means unconstrained.
    pub query: String,
    /// Exact category-name filter.
    pub category: Option<String>,
    /// Lower price bound, inclusive.
    pub min_price: Option<f64>,
    /// Upper price bound, inclusive.
    pub max_price: Option<f64>,
    /// Sort field; `_score` sorts by relevance.
    pub sort_by: String,
    /// Sort direction.
    pub sort_order: SortOrder,
    /// 1-based page number.
    pub page: u64,
    /// Page size.
    pub size: u64,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: None,
            min_price: None,
            max_price: None,
            sort_by: "_score".to_string(),
            sort_order: SortOrder::Desc,
            page: 1,
            size: 10,
        }
    }
}

impl SearchRequest {
    /// Create a request for the given query text.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Filter by category name.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the lower price bound.
    pub fn min_price(mut self, price: f64) -> Self {
        self.min_price = Some(price);
        self
    }

    /// Set the upper price bound.
    pub fn max_price(mut self, price: f64) -> Self {
        self.max_price = Some(price);
        self
    }

    /// Set the 1-based page number.
    pub fn page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    /// Set the page size.
    pub fn size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Sort by a field in the given direction.
    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = field.into();
        self.sort_order = order;
        self
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Wire form of the direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Ranked search results with facet breakdowns.
///
/// Item order is the index-returned rank order; callers never re-sort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult<T> {
    /// Resolved items in rank order.
    pub data: Vec<T>,
    /// Total matching documents.
    pub total_hits: u64,
    /// Facet name to ordered bucket entries.
    pub facets: HashMap<String, Vec<FacetEntry>>,
}

impl<T> SearchResult<T> {
    /// A result with no hits and no facets.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total_hits: 0,
            facets: HashMap::new(),
        }
    }
}

impl<T> Default for SearchResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// One facet bucket: a distinct value and its hit count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetEntry {
    pub key: String,
    pub doc_count: u64,
}

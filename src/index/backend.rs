//! Index backend trait and wire types.
//!
//! The index is an opaque external service reached over HTTP; queries are
//! expressed in its native JSON DSL and responses come back in the shapes
//! below. The trait is the seam the rest of the engine is written against,
//! so tests can substitute an in-memory double for the HTTP client.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::index::document::ProductDocument;

/// Abstract index backend.
///
/// All writes are idempotent (upsert/delete by id), so the handle can be
/// shared freely without client-side locking.
#[async_trait]
pub trait IndexBackend: Send + Sync {
    /// Insert or fully replace a document by id.
    async fn index_document(&self, index: &str, id: &str, document: &ProductDocument)
        -> Result<()>;

    /// Delete a document by id. Deleting an absent document is not an error.
    async fn delete_document(&self, index: &str, id: &str) -> Result<()>;

    /// Apply a partial update to a document.
    async fn update_document(&self, index: &str, id: &str, partial: &Value) -> Result<()>;

    /// Upsert a batch of documents in one bulk call.
    ///
    /// Individual document rejections are reported, not raised; the rest of
    /// the batch still commits.
    async fn bulk_upsert(&self, index: &str, documents: &[ProductDocument]) -> Result<BulkReport>;

    /// Execute a search request body against an index.
    async fn search(&self, index: &str, body: &Value) -> Result<SearchOutcome>;
}

/// Per-batch result of a bulk upsert.
#[derive(Debug, Clone, Default)]
pub struct BulkReport {
    /// Documents submitted in the batch.
    pub submitted: usize,
    /// Items the index rejected, with reasons.
    pub failures: Vec<BulkFailure>,
}

impl BulkReport {
    /// Documents that committed.
    pub fn indexed(&self) -> usize {
        self.submitted - self.failures.len()
    }
}

/// A single rejected bulk item.
#[derive(Debug, Clone)]
pub struct BulkFailure {
    /// Document id of the rejected item.
    pub id: String,
    /// Index-reported reason.
    pub reason: String,
}

/// Raw search response from the index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Query execution time reported by the index.
    #[serde(default)]
    pub took: Option<u64>,
    /// Matched hits.
    #[serde(default)]
    pub hits: HitsEnvelope,
    /// Aggregation results, keyed by aggregation name.
    #[serde(default)]
    pub aggregations: Option<Value>,
    /// Suggester results, keyed by suggester name.
    #[serde(default)]
    pub suggest: HashMap<String, Vec<SuggestEntry>>,
}

impl SearchOutcome {
    /// An outcome with no hits, aggregations, or suggestions.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// The hits envelope of a search response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HitsEnvelope {
    /// Total matching documents; the index may omit it.
    #[serde(default)]
    pub total: Option<TotalHits>,
    /// Returned hits in rank order.
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// Total-hit count wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalHits {
    pub value: u64,
}

/// A single search hit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hit {
    /// Document id; may be absent on malformed hits.
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    /// Relevance score.
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    /// Stored document body.
    #[serde(rename = "_source", default)]
    pub source: Option<Value>,
}

impl Hit {
    /// A hit carrying only an id, as write-light tests produce.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            score: None,
            source: None,
        }
    }
}

/// One suggester entry (per input token).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestEntry {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub options: Vec<SuggestOption>,
}

/// A single completion option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestOption {
    pub text: String,
}

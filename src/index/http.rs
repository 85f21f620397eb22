//! HTTP implementation of the index backend.
//!
//! Speaks the index's native JSON DSL against its document, update, bulk,
//! and search endpoints. One long-lived client is shared across all callers.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::index::backend::{BulkFailure, BulkReport, IndexBackend, SearchOutcome};
use crate::index::document::ProductDocument;

/// Index backend reached over HTTP.
pub struct HttpIndexBackend {
    client: Client,
    base_url: String,
}

impl HttpIndexBackend {
    /// Create a backend from configuration.
    pub fn new(config: &IndexConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| IndexError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn send_error(err: reqwest::Error) -> IndexError {
        if err.is_timeout() {
            IndexError::Timeout(err.to_string())
        } else {
            IndexError::Connection(err.to_string())
        }
    }

    async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(IndexError::Status {
            status: status.as_u16(),
            body,
        }
        .into())
    }
}

#[async_trait]
impl IndexBackend for HttpIndexBackend {
    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: &ProductDocument,
    ) -> Result<()> {
        let response = self
            .client
            .put(self.url(&format!("{index}/_doc/{id}")))
            .json(document)
            .send()
            .await
            .map_err(Self::send_error)?;

        Self::expect_success(response).await?;
        debug!("Indexed document {id} into {index}");
        Ok(())
    }

    async fn delete_document(&self, index: &str, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("{index}/_doc/{id}")))
            .send()
            .await
            .map_err(Self::send_error)?;

        // Deleting an already-absent document is a no-op, not a failure.
        if response.status().as_u16() == 404 {
            debug!("Delete of {id} from {index}: document was absent");
            return Ok(());
        }

        Self::expect_success(response).await?;
        debug!("Deleted document {id} from {index}");
        Ok(())
    }

    async fn update_document(&self, index: &str, id: &str, partial: &Value) -> Result<()> {
        let body = serde_json::json!({ "doc": partial });
        let response = self
            .client
            .post(self.url(&format!("{index}/_update/{id}")))
            .json(&body)
            .send()
            .await
            .map_err(Self::send_error)?;

        Self::expect_success(response).await?;
        Ok(())
    }

    async fn bulk_upsert(&self, index: &str, documents: &[ProductDocument]) -> Result<BulkReport> {
        let mut body = String::new();
        for document in documents {
            let action = serde_json::json!({
                "update": { "_index": index, "_id": document.id }
            });
            let payload = serde_json::json!({
                "doc": document,
                "doc_as_upsert": true
            });
            body.push_str(&action.to_string());
            body.push('\n');
            body.push_str(&payload.to_string());
            body.push('\n');
        }

        let response = self
            .client
            .post(self.url("_bulk"))
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(Self::send_error)?;

        let response = Self::expect_success(response).await?;
        let parsed: BulkResponseBody = response
            .json()
            .await
            .map_err(|e| IndexError::Response(e.to_string()))?;

        let failures = parsed
            .items
            .into_iter()
            .filter_map(|mut item| item.remove("update"))
            .filter_map(|item| {
                item.error.map(|error| BulkFailure {
                    id: item.id.unwrap_or_default(),
                    reason: error.reason.unwrap_or_else(|| "unknown".to_string()),
                })
            })
            .collect();

        Ok(BulkReport {
            submitted: documents.len(),
            failures,
        })
    }

    async fn search(&self, index: &str, body: &Value) -> Result<SearchOutcome> {
        let response = self
            .client
            .post(self.url(&format!("{index}/_search")))
            .json(body)
            .send()
            .await
            .map_err(Self::send_error)?;

        let response = Self::expect_success(response).await?;
        response
            .json()
            .await
            .map_err(|e| IndexError::Response(e.to_string()).into())
    }
}

/// Wire shape of a bulk response.
#[derive(Debug, Deserialize)]
struct BulkResponseBody {
    #[serde(default)]
    items: Vec<HashMap<String, BulkItemBody>>,
}

/// A single item within a bulk response, keyed by operation type.
#[derive(Debug, Deserialize)]
struct BulkItemBody {
    #[serde(rename = "_id")]
    id: Option<String>,
    error: Option<BulkItemError>,
}

#[derive(Debug, Deserialize)]
struct BulkItemError {
    reason: Option<String>,
}

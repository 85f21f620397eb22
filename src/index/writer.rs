//! Single-document index writes with bounded retry and async dispatch.
//!
//! The writer keeps the index in step with the canonical store after product
//! and activity writes. Failures never propagate to the caller: the index is
//! a derived cache, so a write that exhausts its retries is logged and
//! dropped rather than rolling anything back.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::catalog::{ActivityType, Product, ProductStore};
use crate::config::{IndexConfig, RetryConfig};
use crate::error::{MercatoError, Result};
use crate::index::backend::IndexBackend;
use crate::index::document::ProductDocument;

/// Writes single documents to the index with bounded retry.
pub struct IndexWriter {
    backend: Arc<dyn IndexBackend>,
    products: Arc<dyn ProductStore>,
    index: String,
    retry: RetryConfig,
}

impl IndexWriter {
    /// Create a writer for the configured index.
    pub fn new(
        backend: Arc<dyn IndexBackend>,
        products: Arc<dyn ProductStore>,
        config: &IndexConfig,
    ) -> Self {
        Self {
            backend,
            products,
            index: config.index.clone(),
            retry: config.retry.clone(),
        }
    }

    /// Insert or replace the document for a product.
    pub async fn upsert(&self, product: &Product) {
        let categories = match self.products.categories_for(product.product_id).await {
            Ok(categories) => categories,
            Err(err) => {
                error!(
                    "Could not resolve categories for product {}: {err}",
                    product.product_id
                );
                return;
            }
        };

        let document = ProductDocument::from_product(product, &categories);
        let id = document.id.clone();
        self.run_with_retry(&format!("index product {id}"), || {
            self.backend
                .index_document(&self.index, &id, &document)
                .boxed()
        })
        .await;
    }

    /// Delete the document for a product.
    pub async fn delete(&self, product_id: u64) {
        let id = product_id.to_string();
        self.run_with_retry(&format!("delete product {id}"), || {
            self.backend.delete_document(&self.index, &id).boxed()
        })
        .await;
    }

    /// Write a freshly computed activity counter into the document.
    ///
    /// Counter-only partial update; the rest of the document is untouched.
    pub async fn update_activity_count(
        &self,
        product_id: u64,
        activity_type: ActivityType,
        count: u64,
    ) {
        let id = product_id.to_string();
        let field = activity_type.counter_field();
        let partial = serde_json::json!({ field: count });
        self.run_with_retry(&format!("update {field} for product {id}"), || {
            self.backend.update_document(&self.index, &id, &partial).boxed()
        })
        .await;
    }

    /// Run an index write, retrying transient failures on a fixed schedule.
    ///
    /// Exhaustion and non-transient failures are logged and swallowed.
    async fn run_with_retry<'a, F>(&'a self, what: &str, operation: F)
    where
        F: Fn() -> BoxFuture<'a, Result<()>>,
    {
        let max_attempts = self.retry.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            match operation().await {
                Ok(()) => {
                    if attempt > 1 {
                        debug!("{what} succeeded on attempt {attempt}");
                    }
                    return;
                }
                Err(MercatoError::Index(err)) if err.is_transient() && attempt < max_attempts => {
                    warn!(
                        "{what} failed (attempt {attempt}/{max_attempts}): {err}, retrying in {}s",
                        self.retry.wait_secs
                    );
                    tokio::time::sleep(self.retry.wait()).await;
                }
                Err(err) => {
                    error!("{what} failed after {attempt} attempt(s): {err}");
                    return;
                }
            }
        }
    }
}

/// A queued index write.
#[derive(Debug, Clone)]
pub enum IndexTask {
    /// Insert or replace the document for a product.
    Upsert(Product),
    /// Delete the document for a product.
    Delete(u64),
    /// Write a recomputed activity counter.
    ActivityCount {
        product_id: u64,
        activity_type: ActivityType,
        count: u64,
    },
}

/// Fire-and-forget front of the [`IndexWriter`].
///
/// Tasks are queued onto an unbounded channel and drained by a background
/// worker, so the request path that triggered an index write never waits on
/// it. Tasks run to completion or retry exhaustion; there is no caller
/// cancellation.
#[derive(Clone)]
pub struct IndexDispatcher {
    tx: mpsc::UnboundedSender<IndexTask>,
}

impl IndexDispatcher {
    /// Spawn the worker and return the dispatch handle.
    pub fn spawn(writer: Arc<IndexWriter>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<IndexTask>();

        tokio::spawn(async move {
            while let Some(task) = rx.recv().await {
                match task {
                    IndexTask::Upsert(product) => writer.upsert(&product).await,
                    IndexTask::Delete(product_id) => writer.delete(product_id).await,
                    IndexTask::ActivityCount {
                        product_id,
                        activity_type,
                        count,
                    } => {
                        writer
                            .update_activity_count(product_id, activity_type, count)
                            .await
                    }
                }
            }
            debug!("Index dispatch worker stopped");
        });

        Self { tx }
    }

    /// Queue an index write without waiting for it.
    pub fn enqueue(&self, task: IndexTask) {
        if self.tx.send(task).is_err() {
            error!("Index dispatch worker is gone; dropping index write");
        }
    }
}

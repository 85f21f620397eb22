//! Full catalog reindexing.
//!
//! Streams every canonical product through a single cursor, maps each one to
//! its document form, and submits fixed-size bulk upserts. The run is
//! idempotent (every write is an upsert keyed by product id), so recovery
//! from any interruption is simply rerunning it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use tracing::{error, info, warn};

use crate::catalog::ProductStore;
use crate::config::{IndexConfig, ReindexConfig};
use crate::error::Result;
use crate::index::backend::IndexBackend;
use crate::index::document::ProductDocument;

/// Outcome of a full reindex run.
#[derive(Debug, Clone)]
pub struct ReindexReport {
    /// Documents successfully indexed.
    pub documents_indexed: u64,
    /// Documents the index rejected.
    pub documents_failed: u64,
    /// Bulk calls issued.
    pub batches: u64,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

/// Rebuilds the index from the canonical catalog.
#[derive(Clone)]
pub struct BulkReindexer {
    backend: Arc<dyn IndexBackend>,
    products: Arc<dyn ProductStore>,
    index: String,
    batch_size: usize,
}

impl BulkReindexer {
    /// Create a reindexer for the configured index.
    pub fn new(
        backend: Arc<dyn IndexBackend>,
        products: Arc<dyn ProductStore>,
        index_config: &IndexConfig,
        reindex_config: &ReindexConfig,
    ) -> Self {
        Self {
            backend,
            products,
            index: index_config.index.clone(),
            batch_size: reindex_config.batch_size.max(1),
        }
    }

    /// Stream the whole catalog into the index in fixed-size bulk batches.
    ///
    /// Individual document rejections are logged and skipped; the run only
    /// aborts if the catalog cursor or a whole bulk call fails.
    pub async fn reindex_all(&self) -> Result<ReindexReport> {
        let started = Instant::now();
        let mut indexed: u64 = 0;
        let mut failed: u64 = 0;
        let mut batches: u64 = 0;
        let mut batch: Vec<ProductDocument> = Vec::with_capacity(self.batch_size);

        let mut products = self.products.stream_all();
        while let Some(product) = products.next().await {
            let product = product?;

            let categories = match self.products.categories_for(product.product_id).await {
                Ok(categories) => categories,
                Err(err) => {
                    warn!(
                        "Skipping product {} during reindex: {err}",
                        product.product_id
                    );
                    failed += 1;
                    continue;
                }
            };

            batch.push(ProductDocument::from_product(&product, &categories));

            if batch.len() >= self.batch_size {
                let (ok, rejected) = self.flush(&batch).await?;
                indexed += ok;
                failed += rejected;
                batches += 1;
                batch.clear();
            }
        }

        if !batch.is_empty() {
            let (ok, rejected) = self.flush(&batch).await?;
            indexed += ok;
            failed += rejected;
            batches += 1;
        }

        let elapsed = started.elapsed();
        info!(
            "Reindex complete. Total documents indexed: {indexed}. Time taken: {} ms",
            elapsed.as_millis()
        );

        Ok(ReindexReport {
            documents_indexed: indexed,
            documents_failed: failed,
            batches,
            elapsed,
        })
    }

    /// Launch a full reindex as a background task.
    ///
    /// Returns as soon as the task is spawned; completion is reported via the
    /// log. This is the admin-trigger entry point.
    pub fn launch(&self) {
        let reindexer = self.clone();
        tokio::spawn(async move {
            if let Err(err) = reindexer.reindex_all().await {
                error!("Reindex run failed: {err}");
            }
        });
    }

    async fn flush(&self, batch: &[ProductDocument]) -> Result<(u64, u64)> {
        let report = self.backend.bulk_upsert(&self.index, batch).await?;
        if !report.failures.is_empty() {
            error!("Error while performing bulk operations");
            for failure in &report.failures {
                error!("Document {}: {}", failure.id, failure.reason);
            }
        }
        Ok((report.indexed() as u64, report.failures.len() as u64))
    }
}

//! Activity tracking and ranking-signal maintenance.
//!
//! Every view and purchase is recorded in the activity store, then the
//! per-product counter is recomputed and queued as a counter-only index
//! update. The recompute-then-write shape makes the index update idempotent,
//! so replays after retries cannot inflate a counter.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracing::debug;

use crate::catalog::{ActivityRecord, ActivityStore, ActivityType};
use crate::error::Result;
use crate::index::{IndexDispatcher, IndexTask};

/// How far back a user's activity history reaches.
const HISTORY_WINDOW_DAYS: i64 = 30;

/// Start of the rolling activity-history window.
pub fn history_window_start() -> DateTime<Utc> {
    Utc::now() - Duration::days(HISTORY_WINDOW_DAYS)
}

/// Group activity records by product and rank by frequency, descending.
///
/// Ties break toward the lower product id so the ranking is stable.
pub fn top_product_ids(records: &[ActivityRecord], limit: usize) -> Vec<u64> {
    let mut counts: HashMap<u64, u64> = HashMap::new();
    for record in records {
        *counts.entry(record.product_id).or_default() += 1;
    }

    let mut ranked: Vec<(u64, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.into_iter().take(limit).map(|(id, _)| id).collect()
}

/// Records user activity and keeps the index's ranking signals current.
pub struct ActivityTracker {
    store: Arc<dyn ActivityStore>,
    dispatcher: IndexDispatcher,
}

impl ActivityTracker {
    /// Create a tracker writing through the given store and dispatcher.
    pub fn new(store: Arc<dyn ActivityStore>, dispatcher: IndexDispatcher) -> Self {
        Self { store, dispatcher }
    }

    /// Record a product view.
    pub async fn track_view(&self, product_id: u64, user_id: u64) -> Result<()> {
        self.track(product_id, user_id, ActivityType::View).await
    }

    /// Record a product purchase.
    pub async fn track_purchase(&self, product_id: u64, user_id: u64) -> Result<()> {
        self.track(product_id, user_id, ActivityType::Purchase).await
    }

    async fn track(&self, product_id: u64, user_id: u64, activity_type: ActivityType) -> Result<()> {
        self.store
            .record(ActivityRecord::now(product_id, user_id, activity_type))
            .await?;

        let count = self.store.count_by_type(product_id, activity_type).await?;
        debug!("Product {product_id} now has {count} {activity_type} events");

        self.dispatcher.enqueue(IndexTask::ActivityCount {
            product_id,
            activity_type,
            count,
        });

        Ok(())
    }

    /// A user's activity of one type within the rolling history window.
    pub async fn recent_history(
        &self,
        user_id: u64,
        activity_type: ActivityType,
    ) -> Result<Vec<ActivityRecord>> {
        self.store
            .recent_by_user(user_id, activity_type, history_window_start())
            .await
    }

    /// Total activity of one type for a product.
    pub async fn activity_count(&self, product_id: u64, activity_type: ActivityType) -> Result<u64> {
        self.store.count_by_type(product_id, activity_type).await
    }

    /// Activity of one type for a product within a date range.
    pub async fn activity_count_in_range(
        &self,
        product_id: u64,
        activity_type: ActivityType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64> {
        self.store
            .count_in_range(product_id, activity_type, start, end)
            .await
    }
}

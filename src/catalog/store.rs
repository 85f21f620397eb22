//! Catalog store traits and in-memory implementations.
//!
//! The engine never talks to the relational store directly; it consumes
//! these traits. The in-memory implementations back tests and local runs.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream};
use parking_lot::RwLock;

use crate::catalog::types::{
    ActivityRecord, ActivityType, Category, CategoryResponse, Product, ProductResponse,
};
use crate::error::{CatalogError, Result};

/// Access to canonical product records.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Look up a single product.
    async fn find_by_id(&self, product_id: u64) -> Result<Product>;

    /// Look up several products; missing ids are omitted.
    async fn find_all_by_id(&self, product_ids: &[u64]) -> Result<Vec<Product>>;

    /// Stream the entire catalog through a single long-lived cursor.
    fn stream_all(&self) -> BoxStream<'_, Result<Product>>;

    /// Categories associated with a product.
    async fn categories_for(&self, product_id: u64) -> Result<Vec<Category>>;
}

/// The product read path used when resolving search hits.
///
/// Implementations may serve from a cache rather than the canonical row;
/// hit relevance lies in id and score, not in the stored document body.
#[async_trait]
pub trait ProductReader: Send + Sync {
    /// Resolve the full response shape for a product.
    async fn product_response(&self, product_id: u64) -> Result<ProductResponse>;
}

/// Access to recorded user activity.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Persist an activity record.
    async fn record(&self, activity: ActivityRecord) -> Result<()>;

    /// Count all activity of one type for a product.
    async fn count_by_type(&self, product_id: u64, activity_type: ActivityType) -> Result<u64>;

    /// Count activity of one type for a product within a date range.
    async fn count_in_range(
        &self,
        product_id: u64,
        activity_type: ActivityType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64>;

    /// A user's activity of one type since the given instant.
    async fn recent_by_user(
        &self,
        user_id: u64,
        activity_type: ActivityType,
        since: DateTime<Utc>,
    ) -> Result<Vec<ActivityRecord>>;
}

/// In-memory product store.
#[derive(Default)]
pub struct MemoryProductStore {
    products: RwLock<HashMap<u64, Product>>,
    categories: RwLock<HashMap<u64, Category>>,
    product_categories: RwLock<HashMap<u64, Vec<u64>>>,
}

impl MemoryProductStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a product with its category associations.
    pub fn insert(&self, product: Product, categories: Vec<Category>) {
        let product_id = product.product_id;
        let category_ids: Vec<u64> = categories.iter().map(|c| c.category_id).collect();

        {
            let mut all = self.categories.write();
            for category in categories {
                all.insert(category.category_id, category);
            }
        }
        self.product_categories.write().insert(product_id, category_ids);
        self.products.write().insert(product_id, product);
    }

    /// Remove a product and its associations.
    pub fn remove(&self, product_id: u64) {
        self.products.write().remove(&product_id);
        self.product_categories.write().remove(&product_id);
    }

    /// Number of stored products.
    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    /// Whether the store holds no products.
    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn find_by_id(&self, product_id: u64) -> Result<Product> {
        self.products
            .read()
            .get(&product_id)
            .cloned()
            .ok_or_else(|| CatalogError::ProductNotFound(product_id).into())
    }

    async fn find_all_by_id(&self, product_ids: &[u64]) -> Result<Vec<Product>> {
        let products = self.products.read();
        Ok(product_ids
            .iter()
            .filter_map(|id| products.get(id).cloned())
            .collect())
    }

    fn stream_all(&self) -> BoxStream<'_, Result<Product>> {
        let mut products: Vec<Product> = self.products.read().values().cloned().collect();
        products.sort_by_key(|p| p.product_id);
        Box::pin(stream::iter(products.into_iter().map(Ok)))
    }

    async fn categories_for(&self, product_id: u64) -> Result<Vec<Category>> {
        let ids = self
            .product_categories
            .read()
            .get(&product_id)
            .cloned()
            .unwrap_or_default();
        let categories = self.categories.read();
        Ok(ids
            .iter()
            .filter_map(|id| categories.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl ProductReader for MemoryProductStore {
    async fn product_response(&self, product_id: u64) -> Result<ProductResponse> {
        let product = self.find_by_id(product_id).await?;
        let categories = self.categories_for(product_id).await?;

        Ok(ProductResponse {
            product_id: product.product_id,
            name: product.name,
            price: product.price,
            description: product.description,
            categories: categories.iter().map(CategoryResponse::from).collect(),
        })
    }
}

/// In-memory activity store.
#[derive(Default)]
pub struct MemoryActivityStore {
    records: RwLock<Vec<ActivityRecord>>,
}

impl MemoryActivityStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl ActivityStore for MemoryActivityStore {
    async fn record(&self, activity: ActivityRecord) -> Result<()> {
        self.records.write().push(activity);
        Ok(())
    }

    async fn count_by_type(&self, product_id: u64, activity_type: ActivityType) -> Result<u64> {
        let records = self.records.read();
        Ok(records
            .iter()
            .filter(|r| r.product_id == product_id && r.activity_type == activity_type)
            .count() as u64)
    }

    async fn count_in_range(
        &self,
        product_id: u64,
        activity_type: ActivityType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64> {
        let records = self.records.read();
        Ok(records
            .iter()
            .filter(|r| {
                r.product_id == product_id
                    && r.activity_type == activity_type
                    && r.created_at >= start
                    && r.created_at <= end
            })
            .count() as u64)
    }

    async fn recent_by_user(
        &self,
        user_id: u64,
        activity_type: ActivityType,
        since: DateTime<Utc>,
    ) -> Result<Vec<ActivityRecord>> {
        let records = self.records.read();
        Ok(records
            .iter()
            .filter(|r| {
                r.user_id == user_id && r.activity_type == activity_type && r.created_at >= since
            })
            .cloned()
            .collect())
    }
}

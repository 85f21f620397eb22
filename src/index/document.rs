//! The denormalized product document held by the index.

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, Product};

/// Flat projection of a product and its categories, as stored in the index.
///
/// Fully replaceable by upsert; only the activity counters are ever patched
/// in place. Field names follow the index mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    /// String form of the canonical product id.
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub weight: f64,
    /// Owning user id.
    pub user_id: u64,
    /// Ranking signal: recorded views.
    pub view_count: u64,
    /// Ranking signal: recorded purchases.
    pub purchase_count: u64,
    /// Embedded category entries for nested matching and facets.
    pub categories: Vec<CategoryEntry>,
    /// Copy of the name routed through the n-gram analyzer.
    pub name_ngram: String,
    /// Completion-suggester input for prefix autocomplete.
    pub name_suggest: String,
}

/// Category entry embedded in a [`ProductDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEntry {
    pub category_id: u64,
    pub name: String,
}

impl ProductDocument {
    /// Project a canonical product and its categories into document form.
    ///
    /// Counters start at zero; they are maintained by partial updates as
    /// activity is recorded, and recover on the next activity event after
    /// a full replace.
    pub fn from_product(product: &Product, categories: &[Category]) -> Self {
        Self {
            id: product.product_id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            stock: product.stock,
            weight: product.weight,
            user_id: product.user_id,
            view_count: 0,
            purchase_count: 0,
            categories: categories
                .iter()
                .map(|c| CategoryEntry {
                    category_id: c.category_id,
                    name: c.name.clone(),
                })
                .collect(),
            name_ngram: product.name.clone(),
            name_suggest: product.name.clone(),
        }
    }
}

//! Canonical catalog types.
//!
//! These mirror the system of record. The index never owns them; it holds a
//! derived projection (see [`crate::index::ProductDocument`]) that is
//! rebuildable from these shapes at any time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A canonical product record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product ID
    pub product_id: u64,
    /// Display name
    pub name: String,
    /// Long-form description
    pub description: String,
    /// Unit price
    pub price: f64,
    /// Units in stock
    pub stock: i64,
    /// Shipping weight
    pub weight: f64,
    /// Owning user ID
    pub user_id: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

/// A canonical category record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID
    pub category_id: u64,
    /// Category name
    pub name: String,
}

/// The read-path product shape returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    /// Product ID
    pub product_id: u64,
    /// Display name
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Long-form description
    pub description: String,
    /// Categories the product belongs to
    pub categories: Vec<CategoryResponse>,
}

/// Category entry within a [`ProductResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponse {
    /// Category ID
    pub category_id: u64,
    /// Category name
    pub name: String,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            category_id: category.category_id,
            name: category.name.clone(),
        }
    }
}

/// User activity kinds that feed the ranking signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    View,
    Purchase,
}

impl ActivityType {
    /// Parse an activity type from its wire form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "VIEW" | "view" => Some(Self::View),
            "PURCHASE" | "purchase" => Some(Self::Purchase),
            _ => None,
        }
    }

    /// Get the activity type as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "VIEW",
            Self::Purchase => "PURCHASE",
        }
    }

    /// The document counter field this activity increments.
    pub fn counter_field(&self) -> &'static str {
        match self {
            Self::View => "viewCount",
            Self::Purchase => "purchaseCount",
        }
    }

    /// The scoring weight applied to this activity's counter.
    ///
    /// Purchases weigh double views.
    pub fn score_factor(&self) -> f64 {
        match self {
            Self::View => 1.0,
            Self::Purchase => 2.0,
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single recorded user interaction with a product.
///
/// Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Product the activity targets
    pub product_id: u64,
    /// Acting user
    pub user_id: u64,
    /// Kind of activity
    pub activity_type: ActivityType,
    /// When the activity happened
    pub created_at: DateTime<Utc>,
}

impl ActivityRecord {
    /// Create a record stamped with the current time.
    pub fn now(product_id: u64, user_id: u64, activity_type: ActivityType) -> Self {
        Self {
            product_id,
            user_id,
            activity_type,
            created_at: Utc::now(),
        }
    }
}

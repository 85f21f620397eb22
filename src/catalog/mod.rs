//! Canonical catalog types and store traits.

mod store;
mod types;

pub use store::{
    ActivityStore, MemoryActivityStore, MemoryProductStore, ProductReader, ProductStore,
};
pub use types::{
    ActivityRecord, ActivityType, Category, CategoryResponse, Product, ProductResponse,
};

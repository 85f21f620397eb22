//! Configuration module.

mod settings;

pub use settings::{CacheConfig, Config, IndexConfig, ReindexConfig, RetryConfig, SearchConfig};

//! Error types for the search engine.

use thiserror::Error;

/// Main error type for engine operations.
#[derive(Error, Debug)]
pub enum MercatoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Errors from the canonical catalog store.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    #[error("Category not found: {0}")]
    CategoryNotFound(u64),

    #[error("Store error: {0}")]
    Store(String),
}

/// Errors from the external search index.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Index returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed index response: {0}")]
    Response(String),
}

impl IndexError {
    /// Whether this failure class is worth retrying.
    ///
    /// Only transport-level failures qualify; a status-code rejection will
    /// not resolve by resending the same request.
    pub fn is_transient(&self) -> bool {
        matches!(self, IndexError::Connection(_) | IndexError::Timeout(_))
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, MercatoError>;

//! Index synchronization: document projection, writes, and bulk rebuilds.
//!
//! The index is a derived, rebuildable cache of the canonical catalog.
//! Write paths fan out here asynchronously; nothing in this module ever
//! rolls back a canonical write.

mod backend;
mod bulk;
mod document;
mod http;
mod writer;

pub use backend::{
    BulkFailure, BulkReport, Hit, HitsEnvelope, IndexBackend, SearchOutcome, SuggestEntry,
    SuggestOption, TotalHits,
};
pub use bulk::{BulkReindexer, ReindexReport};
pub use document::{CategoryEntry, ProductDocument};
pub use http::HttpIndexBackend;
pub use writer::{IndexDispatcher, IndexTask, IndexWriter};

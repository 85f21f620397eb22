//! User activity tracking and ranking signals.

mod tracker;

pub use tracker::{history_window_start, top_product_ids, ActivityTracker};

//! Order accounting
//!
//! - [`Order`]: one sale, open or closed, with its lines and payments
//! - [`DaySummary`]: statistics reduced from one day's closed orders
//! - Value types: payment methods, statuses, splits and lines

pub mod model;
pub mod summary;
pub mod types;


// Re-exports
pub use model::Order;
pub use summary::{DaySummary, compute_day_summary};
pub use types::*;

//! Data models
//!
//! Persisted as JSON documents by the stores in notinha-pos. Every field
//! that a later revision added carries a serde default so older files load.

pub mod config;
pub mod menu;

// Re-exports
pub use config::*;
pub use menu::*;

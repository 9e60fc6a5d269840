//! File persistence
//!
//! Every document is whole-file JSON replaced atomically:
//! - [`ConfigStore`] - `config.json`, including the order counter
//! - [`MenuStore`] - `menu.json`
//! - [`OrderStore`] - one `orders_<date>.json` per day

mod atomic;
mod config;
mod error;
mod menu;
mod orders;

pub use atomic::{atomic_write_json, read_json};
pub use config::ConfigStore;
pub use error::{StorageError, StorageResult};
pub use menu::MenuStore;
pub use orders::OrderStore;

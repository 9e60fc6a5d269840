//! Shared domain types for the notinha POS
//!
//! Pure business logic with no I/O:
//! - [`money`] - BRL formatting and currency input parsing (integer centavos)
//! - [`models`] - menu and persisted configuration records
//! - [`order`] - order aggregate, payment splits and the day summary

pub mod models;
pub mod money;
pub mod order;
pub mod util;

// Re-exports
pub use models::{Config, Menu, MenuItem, PrinterConfig, RestaurantInfo};
pub use money::{format_brl, format_brl_padded, format_date_br, parse_brl};
pub use order::{
    DaySummary, Order, OrderItem, OrderStatus, PaymentMethod, PaymentSplit, compute_day_summary,
};

//! Receipt rendering
//!
//! Pure functions from domain data to ESC/POS bytes:
//! - [`render_receipt`] - customer receipt with prices and payment
//! - [`render_kitchen_ticket`] - items and notes only, no money
//! - [`render_day_summary`] - end-of-day totals by payment method

pub mod kitchen;
pub mod layout;
pub mod receipt;
pub mod summary;
pub mod types;

pub use kitchen::render_kitchen_ticket;
pub use layout::{format_item_line, format_total_line};
pub use receipt::render_receipt;
pub use summary::render_day_summary;
pub use types::{ReceiptData, SummaryReceiptData};

/// Whether the rendered bytes contain `text` as the printer would receive it
#[cfg(test)]
pub(crate) fn contains_text(data: &[u8], text: &str) -> bool {
    let needle = notinha_printer::encode_text(text);
    data.windows(needle.len()).any(|window| window == needle.as_slice())
}

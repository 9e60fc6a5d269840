//! Column layout shared by the renderers

use chrono::{DateTime, Local};
use notinha_printer::{pad_left, pad_right, text_width, truncate_width};

/// Quantity column width
pub const QTY_WIDTH: usize = 5;
/// Price column width
pub const PRICE_WIDTH: usize = 12;

/// `qty | name | price` row
///
/// The name gets whatever the quantity and price columns leave and is
/// truncated, never wrapped.
pub fn format_item_line(qty: &str, name: &str, price: &str, width: usize) -> String {
    let name_width = width.saturating_sub(QTY_WIDTH + PRICE_WIDTH);
    let name = truncate_width(name, name_width);
    format!(
        "{}{}{}",
        pad_right(qty, QTY_WIDTH),
        pad_right(&name, name_width),
        pad_left(price, PRICE_WIDTH)
    )
}

/// Label on the left, value flush right, filling exactly `width` columns
///
/// The value is never truncated; when it does not fit the label padding
/// shrinks to nothing.
pub fn format_total_line(label: &str, value: &str, width: usize) -> String {
    let label_width = width.saturating_sub(text_width(value));
    format!("{}{}", pad_right(label, label_width), value)
}

/// `DD/MM/YYYY HH:MM`
pub fn format_date_time(at: &DateTime<Local>) -> String {
    at.format("%d/%m/%Y %H:%M").to_string()
}

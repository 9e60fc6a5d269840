//! Renderer inputs

use shared::{DaySummary, Order, RestaurantInfo};

/// Everything needed to print one order
#[derive(Debug, Clone, Copy)]
pub struct ReceiptData<'a> {
    pub restaurant: &'a RestaurantInfo,
    pub order: &'a Order,
    /// Paper width in characters; zero means the default
    pub chars_per_line: usize,
}

/// Everything needed to print a day summary
#[derive(Debug, Clone, Copy)]
pub struct SummaryReceiptData<'a> {
    pub restaurant: &'a RestaurantInfo,
    pub summary: &'a DaySummary,
    pub chars_per_line: usize,
}

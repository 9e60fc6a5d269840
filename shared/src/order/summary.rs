//! Day summary
//!
//! Derived from a day's stored orders on demand; never persisted.

use serde::Serialize;
use std::collections::BTreeMap;

use super::model::Order;
use super::types::{OrderStatus, PaymentMethod};

/// Totals for one calendar day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    /// ISO date (`YYYY-MM-DD`)
    pub date: String,
    pub total_orders: usize,
    pub finalized_orders: usize,
    pub cancelled_orders: usize,
    /// Sum of finalized order totals
    pub total_revenue: i64,
    pub by_payment: BTreeMap<PaymentMethod, i64>,
    /// Orders that used each method; a split order counts once per split
    pub orders_by_payment: BTreeMap<PaymentMethod, usize>,
    /// `total_revenue / finalized_orders`, truncated; zero with no sales
    pub average_ticket: i64,
}

impl DaySummary {
    pub fn revenue_for(&self, method: PaymentMethod) -> i64 {
        self.by_payment.get(&method).copied().unwrap_or(0)
    }

    pub fn orders_for(&self, method: PaymentMethod) -> usize {
        self.orders_by_payment.get(&method).copied().unwrap_or(0)
    }
}

/// Reduce a day's orders into a [`DaySummary`]
///
/// Only finalized orders contribute revenue, using each order's effective
/// payment breakdown. Cancelled orders only bump their counter; open orders
/// only count towards the total.
pub fn compute_day_summary(date: &str, orders: &[Order]) -> DaySummary {
    let mut summary = DaySummary {
        date: date.to_string(),
        ..Default::default()
    };

    for order in orders {
        summary.total_orders += 1;
        match order.status {
            OrderStatus::Finalized => {
                summary.finalized_orders += 1;
                summary.total_revenue += order.total();
                for split in order.effective_payments() {
                    *summary.by_payment.entry(split.method).or_default() += split.amount;
                    *summary.orders_by_payment.entry(split.method).or_default() += 1;
                }
            }
            OrderStatus::Cancelled => summary.cancelled_orders += 1,
            OrderStatus::Open => {}
        }
    }

    if summary.finalized_orders > 0 {
        summary.average_ticket = summary.total_revenue / summary.finalized_orders as i64;
    }

    summary
}

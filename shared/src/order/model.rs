//! Order aggregate

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::types::{OrderItem, OrderStatus, PaymentMethod, PaymentSplit};
use crate::models::MenuItem;
use crate::util::{is_zero, null_as_default};

/// A sale, from the first line added until it is finalized or cancelled
///
/// Monetary fields are integer centavos. `subtotal`, `total` and the payment
/// breakdown are derived on every call and never stored, so records written
/// before split payments existed still report correct values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub number: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub table: String,
    /// Flat discount; clamped only when computing the total
    #[serde(default)]
    pub discount: i64,
    /// Primary method. For split orders this mirrors the first split.
    #[serde(default)]
    pub payment: PaymentMethod,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub payments: Vec<PaymentSplit>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub cash_received: i64,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Local>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Local>>,
}

impl Order {
    /// Create an empty open order paid in cash by default
    pub fn new(number: i64) -> Self {
        Self {
            number,
            items: Vec::new(),
            customer: String::new(),
            table: String::new(),
            discount: 0,
            payment: PaymentMethod::Cash,
            payments: Vec::new(),
            cash_received: 0,
            status: OrderStatus::Open,
            created_at: Local::now(),
            closed_at: None,
        }
    }

    /// Add a line, merging into the first line with the same item id and notes
    pub fn add_item(&mut self, item: MenuItem, quantity: i32, notes: impl Into<String>) {
        let notes = notes.into();
        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.item.id == item.id && line.notes == notes)
        {
            line.quantity += quantity;
            return;
        }
        self.items.push(OrderItem {
            item,
            quantity,
            notes,
        });
    }

    /// Remove the line at `index`; out of range is a no-op
    pub fn remove_item(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    /// Set the quantity of a line. Zero or less removes it.
    pub fn update_quantity(&mut self, index: usize, quantity: i32) {
        if quantity <= 0 {
            self.remove_item(index);
        } else if let Some(line) = self.items.get_mut(index) {
            line.quantity = quantity;
        }
    }

    pub fn update_notes(&mut self, index: usize, notes: impl Into<String>) {
        if let Some(line) = self.items.get_mut(index) {
            line.notes = notes.into();
        }
    }

    pub fn subtotal(&self) -> i64 {
        self.items.iter().map(OrderItem::total).sum()
    }

    /// Subtotal minus discount, never below zero
    pub fn total(&self) -> i64 {
        (self.subtotal() - self.discount).max(0)
    }

    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }

    /// Close the order paid with a single method
    pub fn finalize(&mut self, method: PaymentMethod) {
        if !self.ensure_open("finalize") {
            return;
        }
        self.status = OrderStatus::Finalized;
        self.payment = method;
        self.closed_at = Some(Local::now());
    }

    /// Close the order with a payment breakdown
    ///
    /// The primary method is set to the first split's method so readers
    /// that only know a single method still see a sensible value.
    pub fn finalize_split(&mut self, payments: Vec<PaymentSplit>) {
        if !self.ensure_open("finalize") {
            return;
        }
        if let Some(first) = payments.first() {
            self.payment = first.method;
        }
        self.payments = payments;
        self.status = OrderStatus::Finalized;
        self.closed_at = Some(Local::now());
    }

    pub fn cancel(&mut self) {
        if !self.ensure_open("cancel") {
            return;
        }
        self.status = OrderStatus::Cancelled;
        self.closed_at = Some(Local::now());
    }

    fn ensure_open(&self, action: &str) -> bool {
        if !self.is_open() {
            tracing::warn!(
                order_number = self.number,
                status = %self.status,
                action,
                "Ignoring transition on closed order"
            );
            return false;
        }
        true
    }

    pub fn is_split_payment(&self) -> bool {
        self.payments.len() > 1
    }

    /// Payment breakdown used for reports
    ///
    /// Recorded splits when present, otherwise a single split of the primary
    /// method for the full total.
    pub fn effective_payments(&self) -> Vec<PaymentSplit> {
        if self.payments.is_empty() {
            vec![PaymentSplit::new(self.payment, self.total())]
        } else {
            self.payments.clone()
        }
    }

    /// Amount owed in cash. Multiple cash splits are summed.
    fn cash_portion(&self) -> i64 {
        if self.payments.is_empty() {
            return if self.payment.is_cash() {
                self.total()
            } else {
                0
            };
        }
        self.payments
            .iter()
            .filter(|p| p.method.is_cash())
            .map(|p| p.amount)
            .sum()
    }

    pub fn has_cash_payment(&self) -> bool {
        self.cash_portion() > 0
    }

    /// Change to hand back; always zero when no cash is involved
    pub fn cash_change(&self) -> i64 {
        let portion = self.cash_portion();
        if portion == 0 {
            return 0;
        }
        (self.cash_received - portion).max(0)
    }

    /// Local calendar day the order was closed on (`YYYY-MM-DD`)
    pub fn closed_date(&self) -> Option<String> {
        self.closed_at
            .map(|at| at.format("%Y-%m-%d").to_string())
    }
}

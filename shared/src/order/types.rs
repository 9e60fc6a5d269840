//! Value types shared by orders and reports

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::MenuItem;

/// Payment method
///
/// Serialized with the labels the operator sees, which is also the format
/// already present in persisted order files.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "Dinheiro")]
    Cash,
    #[serde(rename = "Cartao")]
    Card,
    #[serde(rename = "Pix")]
    Pix,
}

impl PaymentMethod {
    /// All methods, in display order
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Pix];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Dinheiro",
            PaymentMethod::Card => "Cartao",
            PaymentMethod::Pix => "Pix",
        }
    }

    /// Look up a method by its label (case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(label.trim()))
    }

    pub fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Order lifecycle status
///
/// `Open -> Finalized` or `Open -> Cancelled`; both closed states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "Aberto")]
    Open,
    #[serde(rename = "Finalizado")]
    Finalized,
    #[serde(rename = "Cancelado")]
    Cancelled,
}

impl OrderStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Open => "Aberto",
            OrderStatus::Finalized => "Finalizado",
            OrderStatus::Cancelled => "Cancelado",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One part of a split payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSplit {
    pub method: PaymentMethod,
    /// Amount in centavos
    pub amount: i64,
}

impl PaymentSplit {
    pub fn new(method: PaymentMethod, amount: i64) -> Self {
        Self { method, amount }
    }
}

/// Order line: a menu item snapshot with quantity and free-text notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub item: MenuItem,
    pub quantity: i32,
    #[serde(default)]
    pub notes: String,
}

impl OrderItem {
    /// Unit price times quantity, in centavos
    pub fn total(&self) -> i64 {
        self.item.price * i64::from(self.quantity)
    }
}

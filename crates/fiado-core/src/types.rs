//! # Domain Types
//!
//! Core domain types used throughout Fiado POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Customer     │   │  Transaction    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID v7)   │   │  id (UUID v7)   │   │  id (UUID v7)   │       │
//! │  │  name/category  │   │  name/phone     │   │  customer_id    │       │
//! │  │  price_cents    │   │  balance_cents  │◄──│  total_cents    │       │
//! │  │  stock          │   │  history ───────┼──►│  kind/status    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Insight      │   │ TransactionKind │   │    ShopData     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  kind/priority  │   │  VISTA (paid)   │   │  products       │       │
//! │  │  message/impact │   │  FIADO (credit) │   │  customers      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Wire names of the enums (`VISTA`, `FIADO`, `PAGO`, `PENDENTE`, `REPOR`, ...)
//! are the ones the shop already uses and are what the persisted documents
//! contain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

/// Generates a new entity identifier.
///
/// UUID v7: a millisecond timestamp prefix followed by random bits, so ids
/// sort by creation time and never collide in practice.
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

// =============================================================================
// Product
// =============================================================================

/// A product in the shop catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Category label (e.g. "Grãos e Cereais").
    pub category: String,

    /// Optional longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Sale price in centavos.
    pub price_cents: i64,

    /// Cost price in centavos.
    pub cost_cents: i64,

    /// Units on the shelf.
    pub stock: i64,

    /// Unit label ("Unid", "5kg", "1L").
    pub unit: String,

    /// When the product was last created, edited or sold.
    pub last_updated: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the cost price as Money.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Checks if one unit can be sold.
    #[inline]
    pub fn can_sell(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Payment received; reduces the balance.
    #[serde(rename = "VISTA")]
    Payment,
    /// Credit extended; increases the balance.
    #[serde(rename = "FIADO")]
    Credit,
}

/// Settlement status recorded on a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    #[serde(rename = "PAGO")]
    Paid,
    #[serde(rename = "PENDENTE")]
    Pending,
}

/// A purchased line attached to a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionItem {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

/// An immutable ledger entry, prepended to its customer's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,

    /// Owning customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,

    /// Purchased lines. Ledger flows record totals only, so this is empty.
    #[serde(default)]
    pub items: Vec<TransactionItem>,

    /// Amount paid or credited, in centavos.
    pub total_cents: i64,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    pub status: TransactionStatus,

    pub timestamp: DateTime<Utc>,

    /// Part of a payment that exceeded the balance and was absorbed by the
    /// floor at zero. Always 0 for credits.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub overpayment_cents: i64,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

impl Transaction {
    /// Returns the transaction total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the absorbed overpayment as Money.
    #[inline]
    pub fn overpayment(&self) -> Money {
        Money::from_cents(self.overpayment_cents)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer's credit account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,

    /// Free-form phone; may be empty.
    #[serde(default)]
    pub phone: String,

    /// Outstanding balance in centavos. Never negative.
    pub balance_cents: i64,

    /// Ledger entries, newest first.
    #[serde(default)]
    pub history: Vec<Transaction>,
}

impl Customer {
    /// Returns the balance as Money.
    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_cents(self.balance_cents)
    }

    /// Checks if the customer owes anything.
    #[inline]
    pub fn has_debt(&self) -> bool {
        self.balance_cents > 0
    }

    /// First word of the name, used in compact listings.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    /// Sum of credits minus sum of payments over the whole history.
    ///
    /// Not floored; an overpaid account yields a negative net. Saturates
    /// at the i64 bounds like every plain `Money` sum.
    pub fn history_net(&self) -> Money {
        self.history
            .iter()
            .map(|tx| match tx.kind {
                TransactionKind::Credit => tx.total(),
                TransactionKind::Payment => Money::zero() - tx.total(),
            })
            .sum()
    }

    /// Total absorbed by the zero floor across all payments.
    pub fn total_overpaid(&self) -> Money {
        self.history.iter().map(Transaction::overpayment).sum()
    }

    /// Stored balance minus the history net, in centavos.
    ///
    /// Zero for an account whose balance was built only through recorded
    /// entries. Opening balances carried in without history and floored
    /// overpayments both show up here.
    pub fn unreconciled_cents(&self) -> i64 {
        self.balance_cents.saturating_sub(self.history_net().cents())
    }
}

// =============================================================================
// Insight
// =============================================================================

/// What an insight is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightKind {
    #[serde(rename = "REPOR")]
    Restock,
    #[serde(rename = "TENDENCIA")]
    Trend,
    #[serde(rename = "FINANCEIRO")]
    Financial,
    #[serde(rename = "CONSELHO")]
    Advice,
}

impl InsightKind {
    /// The wire label, also used for display.
    pub const fn label(&self) -> &'static str {
        match self {
            InsightKind::Restock => "REPOR",
            InsightKind::Trend => "TENDENCIA",
            InsightKind::Financial => "FINANCEIRO",
            InsightKind::Advice => "CONSELHO",
        }
    }
}

/// How urgent an insight is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightPriority {
    #[serde(rename = "ALTA")]
    High,
    #[serde(rename = "MEDIA")]
    Medium,
    #[serde(rename = "BAIXA")]
    Low,
}

impl InsightPriority {
    pub const fn label(&self) -> &'static str {
        match self {
            InsightPriority::High => "ALTA",
            InsightPriority::Medium => "MEDIA",
            InsightPriority::Low => "BAIXA",
        }
    }
}

/// A short generated business recommendation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub message: String,
    pub priority: InsightPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
}

// =============================================================================
// Shop Data
// =============================================================================

/// The two top-level collections, owned together.
///
/// Mutations go through the ledger and catalog functions; the app replaces
/// the whole value after each successful write-through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopData {
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
}

impl ShopData {
    pub fn new(products: Vec<Product>, customers: Vec<Customer>) -> Self {
        ShopData {
            products,
            customers,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(kind: TransactionKind, cents: i64, overpaid: i64) -> Transaction {
        Transaction {
            id: new_id(),
            customer_id: Some("c1".to_string()),
            items: Vec::new(),
            total_cents: cents,
            kind,
            status: match kind {
                TransactionKind::Payment => TransactionStatus::Paid,
                TransactionKind::Credit => TransactionStatus::Pending,
            },
            timestamp: Utc::now(),
            overpayment_cents: overpaid,
        }
    }

    #[test]
    fn test_new_id_is_unique_and_time_ordered() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
        assert_eq!(Uuid::parse_str(&a).unwrap().get_version_num(), 7);
    }

    #[test]
    fn test_transaction_wire_names() {
        let json = serde_json::to_value(tx(TransactionKind::Payment, 500, 0)).unwrap();
        assert_eq!(json["type"], "VISTA");
        assert_eq!(json["status"], "PAGO");
        assert!(json.get("overpayment_cents").is_none());

        let json = serde_json::to_value(tx(TransactionKind::Credit, 500, 0)).unwrap();
        assert_eq!(json["type"], "FIADO");
        assert_eq!(json["status"], "PENDENTE");
    }

    #[test]
    fn test_history_net_and_overpaid() {
        let customer = Customer {
            id: "c1".to_string(),
            name: "Ana Paula".to_string(),
            phone: String::new(),
            balance_cents: 0,
            history: vec![
                tx(TransactionKind::Payment, 5000, 1000),
                tx(TransactionKind::Credit, 4000, 0),
            ],
        };

        assert_eq!(customer.history_net().cents(), -1000);
        assert_eq!(customer.total_overpaid().cents(), 1000);
        assert_eq!(customer.first_name(), "Ana");
        assert!(!customer.has_debt());
        assert_eq!(customer.unreconciled_cents(), 1000);
    }

    #[test]
    fn test_insight_wire_format() {
        let insight: Insight = serde_json::from_str(
            r#"{"type":"REPOR","message":"Repor arroz","priority":"ALTA"}"#,
        )
        .unwrap();
        assert_eq!(insight.kind, InsightKind::Restock);
        assert_eq!(insight.priority, InsightPriority::High);
        assert_eq!(insight.impact, None);
    }
}

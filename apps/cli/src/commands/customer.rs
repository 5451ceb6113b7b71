//! # Customer Commands
//!
//! Debt accounts: registration, payments, new credit, history, and the
//! WhatsApp message.
//!
//! ## Ledger Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fiado clientes pagar c1 50                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse_amount("50") ──► 5000 centavos (> 0, "12,50" accepted)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ledger::record_payment on a copy                                       │
//! │       balance 45,50 ──► max(0, 45,50 - 50,00) = 0,00                    │
//! │       history[0] = VISTA / PAGO / 50,00 (excess 4,50 recorded)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write-through (both documents, one transaction) ──► swap               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use fiado_core::ledger::{self, LedgerOutcome};
use fiado_core::receipt::{self, ReceiptLine};
use fiado_core::validation::{parse_amount, validate_quantity};
use fiado_core::{catalog, Customer, CoreError, Transaction, TransactionKind, ValidationError};

use crate::error::ApiError;
use crate::state::{ConfigState, DbState, ShopState};

/// How many entries the history view shows by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Customer as shown to the operator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub balance_cents: i64,
    pub entries: usize,
    pub last_activity: Option<DateTime<Utc>>,
    /// Stored balance minus history net; non-zero means carried-in or
    /// floored amounts.
    pub unreconciled_cents: i64,
}

impl From<&Customer> for CustomerDto {
    fn from(c: &Customer) -> Self {
        CustomerDto {
            id: c.id.clone(),
            name: c.name.clone(),
            phone: c.phone.clone(),
            balance_cents: c.balance_cents,
            entries: c.history.len(),
            last_activity: c.history.first().map(|tx| tx.timestamp),
            unreconciled_cents: c.unreconciled_cents(),
        }
    }
}

/// One ledger entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: String,
    /// `VISTA` or `FIADO`.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub total_cents: i64,
    pub overpayment_cents: i64,
    pub timestamp: DateTime<Utc>,
}

impl From<&Transaction> for TransactionDto {
    fn from(tx: &Transaction) -> Self {
        TransactionDto {
            id: tx.id.clone(),
            kind: tx.kind,
            total_cents: tx.total_cents,
            overpayment_cents: tx.overpayment_cents,
            timestamp: tx.timestamp,
        }
    }
}

/// What a payment or new credit did.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerResponse {
    pub customer_id: String,
    pub customer_name: String,
    pub transaction_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub previous_balance_cents: i64,
    pub new_balance_cents: i64,
    pub overpayment_cents: i64,
}

impl From<LedgerOutcome> for LedgerResponse {
    fn from(o: LedgerOutcome) -> Self {
        LedgerResponse {
            customer_id: o.customer_id,
            customer_name: o.customer_name,
            transaction_id: o.transaction_id,
            kind: o.kind,
            amount_cents: o.amount.cents(),
            previous_balance_cents: o.previous_balance.cents(),
            new_balance_cents: o.new_balance.cents(),
            overpayment_cents: o.overpayment.cents(),
        }
    }
}

/// A customer with the newest part of their history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub customer: CustomerDto,
    pub entries: Vec<TransactionDto>,
}

/// Composed message and the link that opens it in WhatsApp.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub customer_id: String,
    pub text: String,
    pub link: String,
}

// =============================================================================
// Read Side
// =============================================================================

/// Customers matching `query` (name or phone), largest balance first.
pub async fn list_customers(shop: &ShopState, query: &str) -> Result<Vec<CustomerDto>, ApiError> {
    debug!(query = %query, "list_customers command");

    shop.with_shop(|s| {
        ledger::search_customers(&s.customers, query)
            .map(|found| found.into_iter().map(CustomerDto::from).collect::<Vec<_>>())
    })
    .await
    .map_err(ApiError::from)
}

/// A customer and their `limit` newest ledger entries.
pub async fn customer_history(
    shop: &ShopState,
    customer_id: &str,
    limit: usize,
) -> Result<HistoryResponse, ApiError> {
    debug!(customer_id = %customer_id, limit, "customer_history command");

    shop.with_shop(|s| {
        ledger::find_customer(&s.customers, customer_id).map(|c| HistoryResponse {
            customer: CustomerDto::from(c),
            entries: ledger::recent_history(c, limit)
                .iter()
                .map(TransactionDto::from)
                .collect(),
        })
    })
    .await
    .map_err(ApiError::from)
}

// =============================================================================
// Mutations
// =============================================================================

/// Opens a new account at the top of the list.
pub async fn register_customer(
    db: &DbState,
    shop: &ShopState,
    name: &str,
    phone: &str,
) -> Result<CustomerDto, ApiError> {
    debug!(name = %name, "register_customer command");

    let customer = shop
        .apply(db, |s| ledger::register_customer(&mut s.customers, name, phone))
        .await?;

    info!(customer_id = %customer.id, "Customer registered");
    Ok(CustomerDto::from(&customer))
}

/// Records a payment received. `amount` is typed text (`"12,50"`).
pub async fn record_payment(
    db: &DbState,
    shop: &ShopState,
    customer_id: &str,
    amount: &str,
) -> Result<LedgerResponse, ApiError> {
    debug!(customer_id = %customer_id, amount = %amount, "record_payment command");
    let amount = parse_amount(amount)?;

    let outcome = shop
        .apply(db, |s| {
            ledger::record_payment(&mut s.customers, customer_id, amount, Utc::now())
        })
        .await?;

    if outcome.was_overpaid() {
        warn!(
            customer_id = %outcome.customer_id,
            paid = outcome.amount.cents(),
            previous_balance = outcome.previous_balance.cents(),
            excess = outcome.overpayment.cents(),
            "Payment exceeded balance; balance floored at zero"
        );
    }

    info!(
        customer_id = %outcome.customer_id,
        amount = outcome.amount.cents(),
        new_balance = outcome.new_balance.cents(),
        "Payment recorded"
    );
    Ok(outcome.into())
}

/// Records new credit extended. `amount` is typed text.
pub async fn record_debt(
    db: &DbState,
    shop: &ShopState,
    customer_id: &str,
    amount: &str,
) -> Result<LedgerResponse, ApiError> {
    debug!(customer_id = %customer_id, amount = %amount, "record_debt command");
    let amount = parse_amount(amount)?;

    let outcome = shop
        .apply(db, |s| {
            ledger::record_debt(&mut s.customers, customer_id, amount, Utc::now())
        })
        .await?;

    info!(
        customer_id = %outcome.customer_id,
        amount = outcome.amount.cents(),
        new_balance = outcome.new_balance.cents(),
        "Credit recorded"
    );
    Ok(outcome.into())
}

// =============================================================================
// Message
// =============================================================================

/// Composes the balance reminder, or an itemized receipt when `items` is
/// not empty, plus the deep link.
///
/// Each item is `<product id>` or `<product id>:<quantity>`, priced at the
/// product's current sale price. Nothing is sold or stored.
pub async fn compose_message(
    shop: &ShopState,
    config: &ConfigState,
    customer_id: &str,
    items: &[String],
    today: NaiveDate,
) -> Result<MessageResponse, ApiError> {
    debug!(customer_id = %customer_id, items = items.len(), "compose_message command");

    let requested = items
        .iter()
        .map(|item| parse_receipt_item(item))
        .collect::<Result<Vec<_>, _>>()?;

    let (text, phone) = shop
        .with_shop(|s| -> Result<(String, String), CoreError> {
            let customer = ledger::find_customer(&s.customers, customer_id)?;

            let mut lines = Vec::with_capacity(requested.len());
            for (product_id, quantity) in &requested {
                let product = catalog::find_product(&s.products, product_id)?;
                lines.push(ReceiptLine {
                    name: product.name.clone(),
                    quantity: *quantity,
                    unit_price: product.price(),
                });
            }

            let text = receipt::compose_message(&config.store_name, customer, &lines, today)?;
            Ok((text, customer.phone.clone()))
        })
        .await?;

    let link = receipt::whatsapp_link(&phone, &text);
    Ok(MessageResponse {
        customer_id: customer_id.to_string(),
        text,
        link,
    })
}

/// `"3"` → (`"3"`, 1); `"3:2"` → (`"3"`, 2).
fn parse_receipt_item(item: &str) -> Result<(String, i64), ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "item".to_string(),
        reason: reason.to_string(),
    };

    let (id, quantity) = match item.trim().split_once(':') {
        Some((id, qty)) => {
            let qty = qty
                .trim()
                .parse::<i64>()
                .map_err(|_| invalid("quantity must be a whole number"))?;
            (id.trim(), qty)
        }
        None => (item.trim(), 1),
    };

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "item".to_string(),
        });
    }
    validate_quantity(quantity)?;

    Ok((id.to_string(), quantity))
}

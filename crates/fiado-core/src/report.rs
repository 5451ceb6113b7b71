//! # Dashboard Report
//!
//! The numbers shown on the painel, computed from the two collections.
//!
//! ```text
//! ┌──────────────────────────┬──────────────────────────────────────────────┐
//! │ total_receivable         │ Σ balance over all customers                 │
//! │ debtor_count             │ customers with balance > 0                   │
//! │ payments_received        │ Σ VISTA totals over every history            │
//! │ low_stock_count          │ products with stock < threshold              │
//! │ top_debtors              │ five largest balances, first name only       │
//! │ inventory_cost / _value  │ Σ stock × cost  /  Σ stock × price           │
//! └──────────────────────────┴──────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::ledger::total_receivable;
use crate::money::Money;
use crate::types::{Customer, Product, TransactionKind};
use crate::TOP_DEBTORS;

/// One row of the top debtors ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebtorSummary {
    pub customer_id: String,
    pub first_name: String,
    pub balance: Money,
}

/// Dashboard aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardReport {
    pub total_receivable: Money,
    pub debtor_count: usize,
    pub payments_received: Money,
    pub low_stock_count: usize,
    pub top_debtors: Vec<DebtorSummary>,
    pub product_count: usize,
    pub inventory_cost: Money,
    pub inventory_value: Money,
}

impl DashboardReport {
    /// Builds the report. `low_stock_threshold` is exclusive.
    ///
    /// ## Errors
    /// `AmountOverflow` when a sum does not fit in centavos. Only stored
    /// data edited outside the terminal can get there.
    pub fn build(
        products: &[Product],
        customers: &[Customer],
        low_stock_threshold: i64,
    ) -> CoreResult<Self> {
        let payments_received = Money::checked_sum(
            customers
                .iter()
                .flat_map(|c| c.history.iter())
                .filter(|tx| tx.kind == TransactionKind::Payment)
                .map(|tx| tx.total()),
        )
        .ok_or_else(|| CoreError::AmountOverflow("payments received".to_string()))?;

        let mut debtors: Vec<&Customer> = customers.iter().filter(|c| c.has_debt()).collect();
        debtors.sort_by(|a, b| b.balance_cents.cmp(&a.balance_cents));

        let top_debtors = debtors
            .iter()
            .take(TOP_DEBTORS)
            .map(|c| DebtorSummary {
                customer_id: c.id.clone(),
                first_name: c.first_name().to_string(),
                balance: c.balance(),
            })
            .collect();

        Ok(DashboardReport {
            total_receivable: total_receivable(customers)?,
            debtor_count: debtors.len(),
            payments_received,
            low_stock_count: products.iter().filter(|p| p.stock < low_stock_threshold).count(),
            top_debtors,
            product_count: products.len(),
            inventory_cost: shelf_total(products, Product::cost, "inventory cost")?,
            inventory_value: shelf_total(products, Product::price, "inventory value")?,
        })
    }

    /// Sale value minus cost value of what is on the shelf.
    pub fn potential_margin(&self) -> Money {
        self.inventory_value - self.inventory_cost
    }
}

/// Σ stock × `unit` over the catalog.
fn shelf_total(products: &[Product], unit: fn(&Product) -> Money, what: &str) -> CoreResult<Money> {
    products
        .iter()
        .try_fold(Money::zero(), |total, p| {
            unit(p).checked_mul(p.stock).and_then(|line| total.checked_add(line))
        })
        .ok_or_else(|| CoreError::AmountOverflow(what.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ledger, seed, LOW_STOCK_THRESHOLD};
    use chrono::Utc;

    #[test]
    fn test_seed_report() {
        let products = seed::products();
        let customers = seed::customers();
        let report = DashboardReport::build(&products, &customers, LOW_STOCK_THRESHOLD).unwrap();

        assert_eq!(report.total_receivable, Money::from_cents(5750));
        assert_eq!(report.debtor_count, 2);
        assert_eq!(report.payments_received, Money::zero());
        assert_eq!(report.low_stock_count, 0);
        assert_eq!(report.product_count, 5);
        assert_eq!(report.top_debtors.len(), 2);
        assert_eq!(report.top_debtors[0].first_name, "João");
        assert_eq!(report.top_debtors[1].first_name, "Maria");

        // 45×15,00 + 60×5,20 + 30×4,80 + 50×2,90 + 24×3,80
        assert_eq!(report.inventory_cost.cents(), 67500 + 31200 + 14400 + 14500 + 9120);
        assert!(report.potential_margin().is_positive());
    }

    #[test]
    fn test_payments_and_low_stock() {
        let mut products = seed::products();
        products[0].stock = 4;
        products[1].stock = 5;

        let mut customers = seed::customers();
        ledger::record_payment(&mut customers, "c1", Money::from_cents(5000), Utc::now()).unwrap();
        ledger::record_payment(&mut customers, "c2", Money::from_cents(200), Utc::now()).unwrap();
        ledger::record_debt(&mut customers, "c3", Money::from_cents(999), Utc::now()).unwrap();

        let report = DashboardReport::build(&products, &customers, LOW_STOCK_THRESHOLD).unwrap();
        assert_eq!(report.low_stock_count, 1);
        assert_eq!(report.payments_received, Money::from_cents(5200));
        assert_eq!(report.debtor_count, 2);
        assert_eq!(report.top_debtors[0].first_name, "Maria");
        assert_eq!(report.top_debtors[1].first_name, "Ricardo");
    }

    #[test]
    fn test_top_debtors_capped_at_five() {
        let mut customers = Vec::new();
        for i in 0..8 {
            ledger::register_customer(&mut customers, &format!("Cliente {i}"), "").unwrap();
        }
        let ids: Vec<String> = customers.iter().map(|c| c.id.clone()).collect();
        for (i, id) in ids.iter().enumerate() {
            ledger::record_debt(&mut customers, id, Money::from_cents(100 * (i as i64 + 1)), Utc::now())
                .unwrap();
        }

        let report = DashboardReport::build(&[], &customers, LOW_STOCK_THRESHOLD).unwrap();
        assert_eq!(report.top_debtors.len(), 5);
        assert_eq!(report.top_debtors[0].balance, Money::from_cents(800));
        assert_eq!(report.debtor_count, 8);
    }

    #[test]
    fn test_overflowing_inventory_is_an_error() {
        let mut products = seed::products();
        // Rows edited outside the terminal skip the catalog bounds.
        products[0].price_cents = 100_000_000;
        products[0].stock = 100_000_000_000;

        let err = DashboardReport::build(&products, &seed::customers(), LOW_STOCK_THRESHOLD)
            .unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow(_)));
    }

    #[test]
    fn test_overflowing_receivable_is_an_error() {
        let mut customers = seed::customers();
        customers[0].balance_cents = i64::MAX;

        let err = DashboardReport::build(&seed::products(), &customers, LOW_STOCK_THRESHOLD)
            .unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow(_)));
    }
}

//! # Ledger Module
//!
//! Customer credit accounts: registration, payments, new credit, lookup.
//!
//! ## Bookkeeping Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        One Ledger Entry                                 │
//! │                                                                         │
//! │  record_payment(c, amount)            record_debt(c, amount)            │
//! │  ─────────────────────────            ──────────────────────            │
//! │  balance = max(0, balance - amount)   balance = balance + amount        │
//! │  history.insert(0, VISTA / PAGO)      history.insert(0, FIADO/PENDENTE) │
//! │  overpayment = amount - old balance   overpayment = 0                   │
//! │                (when positive)                                          │
//! │                                                                         │
//! │  Both: amount > 0, customer must exist, the entry carries the full      │
//! │  amount typed by the operator.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The floor at zero means a stored balance can stop matching the sum of
//! the history. The absorbed excess is written on the VISTA entry itself
//! (`overpayment_cents`) so the gap is always explainable from the history.
//!
//! Every function mutates the slice it is given; the caller decides when
//! that copy becomes the live state.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{new_id, Customer, Transaction, TransactionKind, TransactionStatus};
use crate::validation::{validate_amount, validate_customer_name, validate_search_query};

// =============================================================================
// Outcome
// =============================================================================

/// What a payment or credit did to an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerOutcome {
    pub customer_id: String,
    pub customer_name: String,
    pub transaction_id: String,
    pub kind: TransactionKind,
    pub amount: Money,
    pub previous_balance: Money,
    pub new_balance: Money,
    /// Part of a payment absorbed by the zero floor.
    pub overpayment: Money,
}

impl LedgerOutcome {
    pub fn was_overpaid(&self) -> bool {
        self.overpayment.is_positive()
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Opens a new account with zero balance and empty history.
///
/// The new customer goes to the front of the collection so it shows up at
/// the top of unsorted listings.
pub fn register_customer(
    customers: &mut Vec<Customer>,
    name: &str,
    phone: &str,
) -> CoreResult<Customer> {
    let name = validate_customer_name(name)?;

    let customer = Customer {
        id: new_id(),
        name,
        phone: phone.trim().to_string(),
        balance_cents: 0,
        history: Vec::new(),
    };

    customers.insert(0, customer.clone());
    Ok(customer)
}

// =============================================================================
// Payments and Credit
// =============================================================================

/// Records a payment received (VISTA).
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use fiado_core::{ledger, seed, Money, TransactionKind};
///
/// let mut customers = seed::customers();
/// let out = ledger::record_payment(&mut customers, "c1", Money::from_cents(5000), Utc::now()).unwrap();
///
/// assert_eq!(out.previous_balance.cents(), 4550);
/// assert_eq!(out.new_balance.cents(), 0);
/// assert_eq!(customers[0].history[0].kind, TransactionKind::Payment);
/// assert_eq!(customers[0].history[0].total_cents, 5000);
/// ```
pub fn record_payment(
    customers: &mut [Customer],
    customer_id: &str,
    amount: Money,
    now: DateTime<Utc>,
) -> CoreResult<LedgerOutcome> {
    apply_entry(customers, customer_id, amount, TransactionKind::Payment, now)
}

/// Records new credit extended (FIADO).
pub fn record_debt(
    customers: &mut [Customer],
    customer_id: &str,
    amount: Money,
    now: DateTime<Utc>,
) -> CoreResult<LedgerOutcome> {
    apply_entry(customers, customer_id, amount, TransactionKind::Credit, now)
}

fn apply_entry(
    customers: &mut [Customer],
    customer_id: &str,
    amount: Money,
    kind: TransactionKind,
    now: DateTime<Utc>,
) -> CoreResult<LedgerOutcome> {
    if customer_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "customer".to_string(),
        }
        .into());
    }
    validate_amount(amount)?;

    let customer = customers
        .iter_mut()
        .find(|c| c.id == customer_id)
        .ok_or_else(|| CoreError::CustomerNotFound(customer_id.to_string()))?;

    let previous = customer.balance();
    let (new_balance, overpayment, status) = match kind {
        TransactionKind::Payment => (
            previous.floor_sub(amount),
            amount.floor_sub(previous),
            TransactionStatus::Paid,
        ),
        TransactionKind::Credit => {
            let balance = previous
                .checked_add(amount)
                .ok_or_else(|| CoreError::AmountOverflow("balance".to_string()))?;
            (balance, Money::zero(), TransactionStatus::Pending)
        }
    };

    let tx = Transaction {
        id: new_id(),
        customer_id: Some(customer.id.clone()),
        items: Vec::new(),
        total_cents: amount.cents(),
        kind,
        status,
        timestamp: now,
        overpayment_cents: overpayment.cents(),
    };
    let transaction_id = tx.id.clone();

    customer.balance_cents = new_balance.cents();
    customer.history.insert(0, tx);

    Ok(LedgerOutcome {
        customer_id: customer.id.clone(),
        customer_name: customer.name.clone(),
        transaction_id,
        kind,
        amount,
        previous_balance: previous,
        new_balance,
        overpayment,
    })
}

// =============================================================================
// Lookup
// =============================================================================

/// Finds a customer by id.
pub fn find_customer<'a>(customers: &'a [Customer], customer_id: &str) -> CoreResult<&'a Customer> {
    customers
        .iter()
        .find(|c| c.id == customer_id)
        .ok_or_else(|| CoreError::CustomerNotFound(customer_id.to_string()))
}

/// Searches customers by name (case-insensitive) or phone substring.
///
/// Results are ordered by balance, largest first. Ties keep collection
/// order. An empty query returns everyone.
pub fn search_customers<'a>(customers: &'a [Customer], query: &str) -> CoreResult<Vec<&'a Customer>> {
    let query = validate_search_query(query)?;
    let needle = query.to_lowercase();

    let mut found: Vec<&Customer> = customers
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle) || c.phone.contains(query.as_str()))
        .collect();

    found.sort_by(|a, b| b.balance_cents.cmp(&a.balance_cents));
    Ok(found)
}

/// The `n` most recent entries of a customer's history.
pub fn recent_history(customer: &Customer, n: usize) -> &[Transaction] {
    let end = n.min(customer.history.len());
    &customer.history[..end]
}

/// Sum of all outstanding balances.
pub fn total_receivable(customers: &[Customer]) -> CoreResult<Money> {
    Money::checked_sum(customers.iter().map(Customer::balance))
        .ok_or_else(|| CoreError::AmountOverflow("total receivable".to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn money(cents: i64) -> Money {
        Money::from_cents(cents)
    }

    #[test]
    fn test_payment_floors_at_zero() {
        let mut customers = seed::customers();
        let out = record_payment(&mut customers, "c1", money(5000), Utc::now()).unwrap();

        let joao = find_customer(&customers, "c1").unwrap();
        assert_eq!(joao.balance_cents, 0);
        assert_eq!(joao.history.len(), 1);
        assert_eq!(joao.history[0].kind, TransactionKind::Payment);
        assert_eq!(joao.history[0].status, TransactionStatus::Paid);
        assert_eq!(joao.history[0].total_cents, 5000);
        assert_eq!(joao.history[0].overpayment_cents, 450);

        assert_eq!(out.previous_balance, money(4550));
        assert_eq!(out.new_balance, Money::zero());
        assert!(out.was_overpaid());
    }

    #[test]
    fn test_partial_payment() {
        let mut customers = seed::customers();
        let out = record_payment(&mut customers, "c2", money(500), Utc::now()).unwrap();

        assert_eq!(out.new_balance, money(700));
        assert!(!out.was_overpaid());
        assert_eq!(find_customer(&customers, "c2").unwrap().history[0].overpayment_cents, 0);
    }

    #[test]
    fn test_debt_adds_unclamped_and_prepends() {
        let mut customers = seed::customers();
        record_debt(&mut customers, "c3", money(1000), Utc::now()).unwrap();
        record_debt(&mut customers, "c3", money(250), Utc::now()).unwrap();

        let ricardo = find_customer(&customers, "c3").unwrap();
        assert_eq!(ricardo.balance_cents, 1250);
        assert_eq!(ricardo.history.len(), 2);
        assert_eq!(ricardo.history[0].total_cents, 250);
        assert_eq!(ricardo.history[0].kind, TransactionKind::Credit);
        assert_eq!(ricardo.history[0].status, TransactionStatus::Pending);
        assert_eq!(ricardo.history_net(), money(1250));
        assert_eq!(ricardo.unreconciled_cents(), 0);
    }

    #[test]
    fn test_rejects_bad_amount_and_missing_customer() {
        let mut customers = seed::customers();
        let before = customers.clone();

        assert!(matches!(
            record_payment(&mut customers, "c1", Money::zero(), Utc::now()),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert!(matches!(
            record_debt(&mut customers, "c1", money(-100), Utc::now()),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            record_debt(&mut customers, "", money(100), Utc::now()),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
        assert!(matches!(
            record_payment(&mut customers, "nope", money(100), Utc::now()),
            Err(CoreError::CustomerNotFound(_))
        ));

        assert_eq!(customers, before);
    }

    #[test]
    fn test_register_customer_goes_first() {
        let mut customers = seed::customers();
        let ana = register_customer(&mut customers, "Ana", "").unwrap();

        assert_eq!(customers[0].id, ana.id);
        assert_eq!(ana.balance_cents, 0);
        assert!(ana.history.is_empty());
        assert_eq!(ana.phone, "");
        assert_eq!(customers.len(), 4);

        assert!(register_customer(&mut customers, "  ", "123").is_err());
        assert_eq!(customers.len(), 4);
    }

    #[test]
    fn test_search_by_name_or_phone_sorted_by_balance() {
        let customers = seed::customers();

        let all = search_customers(&customers, "").unwrap();
        let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["João Silva", "Maria Oliveira", "Ricardo Santos"]);

        let by_name = search_customers(&customers, "MARIA").unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "c2");

        let by_phone = search_customers(&customers, "77776").unwrap();
        assert_eq!(by_phone.len(), 1);
        assert_eq!(by_phone[0].id, "c3");
    }

    #[test]
    fn test_recent_history_and_receivable() {
        let mut customers = seed::customers();
        for cents in [100, 200, 300] {
            record_debt(&mut customers, "c1", money(cents), Utc::now()).unwrap();
        }

        let joao = find_customer(&customers, "c1").unwrap();
        let recent = recent_history(joao, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].total_cents, 300);
        assert_eq!(recent_history(joao, 10).len(), 3);

        assert_eq!(total_receivable(&customers).unwrap(), money(4550 + 600 + 1200));
    }

    #[test]
    fn test_debt_that_would_overflow_the_balance_is_rejected() {
        let mut customers = seed::customers();
        let huge = money(i64::MAX / 2 + 1);

        record_debt(&mut customers, "c3", huge, Utc::now()).unwrap_err();

        // Balances loaded from disk are not bounded by input validation.
        if let Some(ricardo) = customers.iter_mut().find(|c| c.id == "c3") {
            ricardo.balance_cents = i64::MAX - 10;
        }
        let before = customers.clone();

        let err = record_debt(&mut customers, "c3", money(100), Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow(_)));
        assert_eq!(customers, before);

        assert!(matches!(
            total_receivable(&customers),
            Err(CoreError::AmountOverflow(_))
        ));
    }

    #[test]
    fn test_repeated_large_debts_stay_bounded() {
        let mut customers = seed::customers();
        let amount = crate::validation::parse_amount("90000000000000000");
        assert!(matches!(amount, Err(ValidationError::OutOfRange { .. })));

        let max = crate::validation::parse_amount("100000000").unwrap();
        record_debt(&mut customers, "c3", max, Utc::now()).unwrap();
        let out = record_debt(&mut customers, "c3", max, Utc::now()).unwrap();
        assert_eq!(out.new_balance.cents(), 2 * crate::MAX_AMOUNT_CENTS);
    }
}

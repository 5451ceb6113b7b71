//! # Validation Module
//!
//! Input validation for everything the operator types.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Terminal (clap / shell prompt)                               │
//! │  ├── Argument shape (missing args, bad flags)                          │
//! │  └── Immediate feedback                                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Amounts ("12,50" → 1250 centavos, must be > 0)                    │
//! │  ├── Names, prices, stock, PIN format                                  │
//! │  └── Runs before any state is touched                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ledger / catalog functions                                   │
//! │  └── Re-check invariants (balance floor, stock > 0 on sale)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fiado_core::validation::{parse_amount, validate_customer_name};
//!
//! let amount = parse_amount("12,50").unwrap();
//! assert_eq!(amount.cents(), 1250);
//!
//! assert!(validate_customer_name("Ana").is_ok());
//! assert!(validate_customer_name("   ").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{
    MAX_AMOUNT_CENTS, MAX_CUSTOMER_NAME_LEN, MAX_PRODUCT_NAME_LEN, MAX_RECEIPT_QUANTITY,
    MAX_SEARCH_LEN, MAX_STOCK, PIN_LENGTH,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Amount Parsing
// =============================================================================

/// Parses a payment or credit amount typed by the operator.
///
/// ## Rules
/// - Comma or dot decimal separator, at most two decimals
/// - Must be greater than zero and at most [`MAX_AMOUNT_CENTS`]
///
/// ## Flow
/// ```text
/// "12,50" ──► normalize ──► 12.50 ──► 1250 centavos ──► > 0? ──► Ok
///   "abc" ──► InvalidFormat
///    "0"  ──► MustBePositive
/// ```
pub fn parse_amount(text: &str) -> ValidationResult<Money> {
    let amount = Money::parse_decimal("amount", text)?;
    validate_amount(amount)?;
    Ok(amount)
}

/// Requires a ledger amount to be strictly positive and within bounds.
pub fn validate_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }
    if amount.cents() > MAX_AMOUNT_CENTS {
        return Err(out_of_range("amount", 0, MAX_AMOUNT_CENTS));
    }
    Ok(())
}

/// Parses a sale or cost price. Zero is allowed.
pub fn parse_price(field: &str, text: &str) -> ValidationResult<Money> {
    Money::parse_decimal(field, text)
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer name.
///
/// ## Rules
/// - Required (whitespace-only counts as empty)
/// - At most 100 characters
///
/// ## Returns
/// The trimmed name.
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    required_text("name", name, MAX_CUSTOMER_NAME_LEN)
}

/// Validates a product name. Returns the trimmed name.
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    required_text("name", name, MAX_PRODUCT_NAME_LEN)
}

/// Validates a search query.
///
/// Empty is fine (matches everything); returns the trimmed query.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_string())
}

fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in centavos: `0..=MAX_AMOUNT_CENTS`.
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_AMOUNT_CENTS).contains(&cents) {
        return Err(out_of_range(field, 0, MAX_AMOUNT_CENTS));
    }
    Ok(())
}

/// Validates a stock count: `0..=MAX_STOCK`.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if !(0..=MAX_STOCK).contains(&stock) {
        return Err(out_of_range("stock", 0, MAX_STOCK));
    }
    Ok(())
}

/// Validates a receipt line quantity: `1..=MAX_RECEIPT_QUANTITY`.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    if quantity > MAX_RECEIPT_QUANTITY {
        return Err(out_of_range("quantity", 1, MAX_RECEIPT_QUANTITY));
    }
    Ok(())
}

fn out_of_range(field: &str, min: i64, max: i64) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min,
        max,
    }
}

// =============================================================================
// PIN
// =============================================================================

/// Validates the shape of a configured PIN: exactly four ASCII digits.
pub fn validate_pin_format(pin: &str) -> ValidationResult<()> {
    if pin.len() != PIN_LENGTH || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "pin".to_string(),
            reason: format!("must be exactly {} digits", PIN_LENGTH),
        });
    }
    Ok(())
}

/// Compares an entered PIN with the configured one.
///
/// Surrounding whitespace in the entry is ignored. This is a placeholder
/// gate: no hashing, no attempt counting.
pub fn verify_pin(configured: &str, entered: &str) -> bool {
    entered.trim() == configured
}

// =============================================================================
// Unit Tests
// =============================================================================

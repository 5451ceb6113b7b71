//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    45.50 - 0.10 - 0.20 = 45.199999999999996  ❌ WRONG!                  │
//! │                                                                         │
//! │  A fiado balance is touched by dozens of small payments and credits.    │
//! │  Float drift would make "balance equals the sum of its history"         │
//! │  impossible to check.                                                   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    4550 - 10 - 20 = 4520 (exactly R$ 45,20)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fiado_core::money::Money;
//!
//! let balance = Money::from_cents(4550); // R$ 45,50
//! let payment = Money::parse_decimal("amount", "12,50").unwrap();
//!
//! assert_eq!((balance - payment).cents(), 3300);
//! assert_eq!(Money::from_cents(123450).to_string(), "R$ 1.234,50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

use crate::error::ValidationError;
use crate::MAX_AMOUNT_CENTS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in centavos (1/100 of a real).
///
/// ## Design Decisions
/// - **i64 (signed)**: the ledger net (credits minus payments) can go negative
///   even though balances are floored at zero
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serializes as a plain integer**: persisted documents store centavos
/// - **`+` / `-` saturate** at the i64 bounds and never panic; code whose
///   result is stored or shown as a total uses the `checked_*` methods and
///   reports overflow instead
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use fiado_core::money::Money;
    ///
    /// let price = Money::from_cents(2290); // R$ 22,90
    /// assert_eq!(price.cents(), 2290);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole reais portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Subtracts `other`, flooring the result at zero.
    ///
    /// ## Example
    /// ```rust
    /// use fiado_core::money::Money;
    ///
    /// let balance = Money::from_cents(4550);
    /// let paid = Money::from_cents(5000);
    /// assert_eq!(balance.floor_sub(paid), Money::zero());
    /// ```
    #[inline]
    pub fn floor_sub(self, other: Money) -> Money {
        (self - other).max(Money::zero())
    }

    /// Adds `other`; `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Multiplies by a quantity; `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use fiado_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(2290).checked_mul(2), Some(Money::from_cents(4580)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul(self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sums `values`; `None` if any partial sum overflows.
    pub fn checked_sum<I>(values: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        values
            .into_iter()
            .try_fold(Money::zero(), |total, value| total.checked_add(value))
    }

    /// Formats as a plain decimal with a dot separator and two places
    /// (`1234.50`). Used where a machine-like figure is wanted, such as the
    /// insight prompt.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.reais().abs(), self.cents_part())
    }

    /// Parses a user-typed decimal amount into Money.
    ///
    /// ## Grammar
    /// - Surrounding whitespace is ignored
    /// - Digits with at most one decimal separator, `,` or `.`
    /// - At most two digits after the separator
    /// - A comma is normalized to a dot: `"12,50"` reads as 12.50
    /// - At most [`MAX_AMOUNT_CENTS`]; larger values are `OutOfRange`
    ///
    /// ## Example
    /// ```rust
    /// use fiado_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("amount", "12,50").unwrap().cents(), 1250);
    /// assert_eq!(Money::parse_decimal("amount", "7").unwrap().cents(), 700);
    /// assert_eq!(Money::parse_decimal("amount", ",5").unwrap().cents(), 50);
    /// assert!(Money::parse_decimal("amount", "abc").is_err());
    /// assert!(Money::parse_decimal("amount", "1,2,3").is_err());
    /// ```
    pub fn parse_decimal(field: &str, input: &str) -> Result<Money, ValidationError> {
        let text = input.trim();

        if text.is_empty() {
            return Err(ValidationError::Required {
                field: field.to_string(),
            });
        }

        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        let too_large = || ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS,
        };

        let normalized = text.replacen(',', ".", 1);
        let (whole, frac) = normalized
            .split_once('.')
            .unwrap_or((normalized.as_str(), ""));

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("must contain at least one digit"));
        }

        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("must be a number like 12,50"));
        }

        if frac.len() > 2 {
            return Err(invalid("must have at most two decimal places"));
        }

        let whole_cents = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<i64>()
                .ok()
                .and_then(|w| w.checked_mul(100))
                .ok_or_else(too_large)?
        };

        let frac_cents = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("bad decimals"))? * 10,
            _ => frac.parse::<i64>().map_err(|_| invalid("bad decimals"))?,
        };

        match whole_cents.checked_add(frac_cents) {
            Some(cents) if cents <= MAX_AMOUNT_CENTS => Ok(Money(cents)),
            _ => Err(too_large()),
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Brazilian Portuguese display: `R$ 1.234,50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.reais().abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "{}R$ {},{:02}", sign, grouped, self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(4550);
        assert_eq!(money.cents(), 4550);
        assert_eq!(money.reais(), 45);
        assert_eq!(money.cents_part(), 50);
    }

    #[test]
    fn test_display_pt_br() {
        assert_eq!(Money::from_cents(4550).to_string(), "R$ 45,50");
        assert_eq!(Money::from_cents(0).to_string(), "R$ 0,00");
        assert_eq!(Money::from_cents(5).to_string(), "R$ 0,05");
        assert_eq!(Money::from_cents(123450).to_string(), "R$ 1.234,50");
        assert_eq!(Money::from_cents(123456789).to_string(), "R$ 1.234.567,89");
        assert_eq!(Money::from_cents(-550).to_string(), "-R$ 5,50");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(4550).to_decimal_string(), "45.50");
        assert_eq!(Money::from_cents(1200).to_decimal_string(), "12.00");
        assert_eq!(Money::from_cents(-7).to_decimal_string(), "-0.07");
    }

    #[test]
    fn test_floor_sub_clamps_at_zero() {
        let balance = Money::from_cents(4550);
        assert_eq!(balance.floor_sub(Money::from_cents(5000)), Money::zero());
        assert_eq!(balance.floor_sub(Money::from_cents(550)).cents(), 4000);
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);
        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!(a.checked_mul(3), Some(Money::from_cents(3000)));

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_parse_comma_decimal() {
        assert_eq!(Money::parse_decimal("amount", "12,50").unwrap().cents(), 1250);
        assert_eq!(Money::parse_decimal("amount", " 12.5 ").unwrap().cents(), 1250);
        assert_eq!(Money::parse_decimal("amount", "12,").unwrap().cents(), 1200);
        assert_eq!(Money::parse_decimal("amount", "0,05").unwrap().cents(), 5);
        assert_eq!(Money::parse_decimal("amount", "50").unwrap().cents(), 5000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Money::parse_decimal("amount", ""),
            Err(ValidationError::Required { .. })
        ));
        for bad in ["abc", "12a", "-5", "1,2,3", "1.2.3", ".", "1,234.50", "1.999"] {
            assert!(
                matches!(
                    Money::parse_decimal("amount", bad),
                    Err(ValidationError::InvalidFormat { .. })
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_amounts_above_the_limit() {
        let limit = format!("{}", MAX_AMOUNT_CENTS / 100);
        assert_eq!(
            Money::parse_decimal("amount", &limit).unwrap().cents(),
            MAX_AMOUNT_CENTS
        );

        for huge in ["100000000,01", "90000000000000000", "99999999999999999999"] {
            assert!(
                matches!(
                    Money::parse_decimal("amount", huge),
                    Err(ValidationError::OutOfRange { .. })
                ),
                "{huge} should be out of range"
            );
        }
    }

    #[test]
    fn test_checked_ops_report_overflow() {
        let big = Money::from_cents(i64::MAX - 1);
        assert_eq!(big.checked_add(Money::from_cents(1)), Some(Money::from_cents(i64::MAX)));
        assert_eq!(big.checked_add(Money::from_cents(2)), None);
        assert_eq!(Money::from_cents(9_000_000_000).checked_mul(9_000_000_000), None);

        assert_eq!(
            Money::checked_sum([Money::from_cents(10), Money::from_cents(5)]),
            Some(Money::from_cents(15))
        );
        assert_eq!(Money::checked_sum([big, big]), None);
    }

    #[test]
    fn test_plain_ops_saturate() {
        let big = Money::from_cents(i64::MAX);
        assert_eq!((big + Money::from_cents(1)).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - Money::from_cents(1)).cents(), i64::MIN);
    }
}

//! # Receipt / Message Composer
//!
//! Builds the text sent to a customer over WhatsApp and the deep link that
//! carries it.
//!
//! ## Message Shapes
//! ```text
//! No items (balance reminder)          With items (itemized receipt)
//! ───────────────────────────          ─────────────────────────────
//! *MERCADINHO DAVI* 🛒                  *MERCADINHO DAVI* 🛒
//!
//! Olá João Silva!                      Olá João Silva!
//! Seu saldo atualizado em              Sua compra em 19/10/2026:
//! 19/10/2026 é de *R$ 45.50*.          2x Arroz Tipo 1 - R$ 45.80
//!                                      Total da compra: *R$ 45.80*
//! Qualquer dúvida, estamos à
//! disposição!                          Seu saldo acumulado é de *R$ 91.30*.
//!
//!                                      Qualquer dúvida, estamos à
//!                                      disposição!
//! ```

use chrono::NaiveDate;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Customer;

/// Base of the messaging deep link.
pub const WHATSAPP_BASE_URL: &str = "https://wa.me";

/// One purchased line on an itemized receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl ReceiptLine {
    pub fn line_total(&self) -> CoreResult<Money> {
        self.unit_price
            .checked_mul(self.quantity)
            .ok_or_else(|| CoreError::AmountOverflow(format!("line total of {}", self.name)))
    }
}

/// Composes the message for `customer` as of `date`.
///
/// An empty `items` slice gives the balance reminder; otherwise the lines
/// are listed with their purchase total before the accumulated balance.
///
/// ## Errors
/// `AmountOverflow` when a line or the purchase total does not fit.
pub fn compose_message(
    store_name: &str,
    customer: &Customer,
    items: &[ReceiptLine],
    date: NaiveDate,
) -> CoreResult<String> {
    let date = date.format("%d/%m/%Y");
    let balance = customer.balance().to_decimal_string();
    let mut text = format!("*{}* 🛒\n\nOlá {}!\n", store_name, customer.name);

    if items.is_empty() {
        text.push_str(&format!(
            "Seu saldo atualizado em {} é de *R$ {}*.\n",
            date, balance
        ));
    } else {
        text.push_str(&format!("Sua compra em {}:\n", date));
        let mut total = Money::zero();
        for line in items {
            let line_total = line.line_total()?;
            total = total
                .checked_add(line_total)
                .ok_or_else(|| CoreError::AmountOverflow("purchase total".to_string()))?;
            text.push_str(&format!(
                "{}x {} - R$ {}\n",
                line.quantity,
                line.name,
                line_total.to_decimal_string()
            ));
        }
        text.push_str(&format!(
            "Total da compra: *R$ {}*\n\nSeu saldo acumulado é de *R$ {}*.\n",
            total.to_decimal_string(),
            balance
        ));
    }

    text.push_str("\nQualquer dúvida, estamos à disposição!");
    Ok(text)
}

/// Keeps only the ASCII digits of a phone number.
pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Builds `https://wa.me/<digits>?text=<percent-encoded text>`.
///
/// A phone with no digits yields an empty path segment; the messaging app
/// then asks who to send to.
///
/// ## Example
/// ```rust
/// use fiado_core::receipt::whatsapp_link;
///
/// let link = whatsapp_link("+55 (11) 99999-8888", "Olá João!");
/// assert_eq!(link, "https://wa.me/5511999998888?text=Ol%C3%A1%20Jo%C3%A3o%21");
/// ```
pub fn whatsapp_link(phone: &str, text: &str) -> String {
    format!(
        "{}/{}?text={}",
        WHATSAPP_BASE_URL,
        phone_digits(phone),
        urlencoding::encode(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_balance_reminder() {
        let joao = seed::customers().remove(0);
        let text = compose_message("MERCADINHO DAVI", &joao, &[], date()).unwrap();

        assert_eq!(
            text,
            "*MERCADINHO DAVI* 🛒\n\nOlá João Silva!\nSeu saldo atualizado em 19/10/2026 é de *R$ 45.50*.\n\nQualquer dúvida, estamos à disposição!"
        );
    }

    #[test]
    fn test_itemized_receipt() {
        let joao = seed::customers().remove(0);
        let items = vec![
            ReceiptLine {
                name: "Arroz Tipo 1".to_string(),
                quantity: 2,
                unit_price: Money::from_cents(2290),
            },
            ReceiptLine {
                name: "Leite Integral".to_string(),
                quantity: 1,
                unit_price: Money::from_cents(550),
            },
        ];
        let text = compose_message("MERCADINHO DAVI", &joao, &items, date()).unwrap();

        assert!(text.contains("Sua compra em 19/10/2026:\n"));
        assert!(text.contains("2x Arroz Tipo 1 - R$ 45.80\n"));
        assert!(text.contains("1x Leite Integral - R$ 5.50\n"));
        assert!(text.contains("Total da compra: *R$ 51.30*"));
        assert!(text.contains("Seu saldo acumulado é de *R$ 45.50*."));
        assert!(text.ends_with("estamos à disposição!"));
    }

    #[test]
    fn test_overflowing_line_is_an_error() {
        let joao = seed::customers().remove(0);
        let items = vec![ReceiptLine {
            name: "Arroz Tipo 1".to_string(),
            quantity: 9_000_000_000_000_000_000,
            unit_price: Money::from_cents(2290),
        }];

        let err = compose_message("MERCADINHO DAVI", &joao, &items, date()).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow(_)));
    }

    #[test]
    fn test_overflowing_purchase_total_is_an_error() {
        let joao = seed::customers().remove(0);
        let line = ReceiptLine {
            name: "Arroz Tipo 1".to_string(),
            quantity: 1,
            unit_price: Money::from_cents(i64::MAX),
        };

        let err = compose_message("MERCADINHO DAVI", &joao, &[line.clone(), line], date())
            .unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow(_)));
    }

    #[test]
    fn test_link_strips_non_digits() {
        assert_eq!(phone_digits("+55 (11) 9999-8888"), "551199998888");

        let link = whatsapp_link("+5511999998888", "a b\nc");
        assert_eq!(link, "https://wa.me/5511999998888?text=a%20b%0Ac");
    }

    #[test]
    fn test_link_with_empty_phone() {
        let link = whatsapp_link("", "oi");
        assert_eq!(link, "https://wa.me/?text=oi");
    }
}

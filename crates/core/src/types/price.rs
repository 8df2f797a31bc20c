//! Monetary amounts using decimal arithmetic.
//!
//! The Storefront API returns `MoneyV2` objects with the amount as a decimal
//! string (`"19.99"`) and an ISO 4217 currency code. [`Money`] deserializes
//! that shape directly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount with currency information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code (e.g., "USD").
    pub currency_code: String,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Format for display (e.g., "$19.99", "€5.00", "12.00 CHF").
    #[must_use]
    pub fn display(&self) -> String {
        let amount = self.amount.round_dp(2);
        match currency_symbol(&self.currency_code) {
            Some(symbol) => format!("{symbol}{amount:.2}"),
            None => format!("{amount:.2} {}", self.currency_code),
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// Symbol for the currencies the storefront sells in.
fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" | "CAD" | "AUD" | "NZD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

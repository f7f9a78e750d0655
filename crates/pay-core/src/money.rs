//! # Money Types
//!
//! Currency and price handling for checkout preferences.
//! Amounts are rounded through the smallest currency unit so every
//! price sent to the provider carries at most the currency's decimals.

use serde::{Deserialize, Serialize};

/// Currencies accepted by Mercado Pago (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Brazilian real
    BRL,
    /// Argentine peso
    ARS,
    /// Mexican peso
    MXN,
    /// Chilean peso
    CLP,
    /// Colombian peso
    COP,
    /// Peruvian sol
    PEN,
    /// Uruguayan peso
    UYU,
}

impl Currency {
    /// Returns the ISO 4217 currency code, as Mercado Pago expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::BRL => "BRL",
            Currency::ARS => "ARS",
            Currency::MXN => "MXN",
            Currency::CLP => "CLP",
            Currency::COP => "COP",
            Currency::PEN => "PEN",
            Currency::UYU => "UYU",
        }
    }

    /// Returns the number of decimal places for this currency
    /// (CLP has 0 decimals, the others have 2)
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::CLP => 0,
            _ => 2,
        }
    }

    /// Convert a decimal amount to the smallest currency unit (centavos, etc.)
    pub fn to_smallest_unit(&self, amount: f64) -> i64 {
        let multiplier = 10_f64.powi(self.decimal_places() as i32);
        (amount * multiplier).round() as i64
    }

    /// Like [`Currency::to_smallest_unit`], but `None` when the amount
    /// does not fit in an `i64`
    pub fn checked_smallest_unit(&self, amount: f64) -> Option<i64> {
        let multiplier = 10_f64.powi(self.decimal_places() as i32);
        let scaled = (amount * multiplier).round();
        // i64::MAX as f64 rounds up to 2^63, which is out of range
        if scaled.is_finite() && scaled >= i64::MIN as f64 && scaled < i64::MAX as f64 {
            Some(scaled as i64)
        } else {
            None
        }
    }

    /// Convert from smallest unit back to decimal
    pub fn from_smallest_unit(&self, amount: i64) -> f64 {
        let divisor = 10_f64.powi(self.decimal_places() as i32);
        amount as f64 / divisor
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::BRL
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (centavos for BRL)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Price {
    /// Create a new price from decimal amount, rounding half away from zero
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self {
            amount: currency.to_smallest_unit(amount),
            currency,
        }
    }

    /// Create a price, or `None` when the amount is out of range
    pub fn checked(amount: f64, currency: Currency) -> Option<Self> {
        currency
            .checked_smallest_unit(amount)
            .map(|amount| Self { amount, currency })
    }

    /// Multiply by a quantity, `None` on overflow
    pub fn checked_mul(&self, quantity: u32) -> Option<Self> {
        self.amount.checked_mul(quantity as i64).map(|amount| Self {
            amount,
            currency: self.currency,
        })
    }

    /// Get the decimal amount
    pub fn as_decimal(&self) -> f64 {
        self.currency.from_smallest_unit(self.amount)
    }

    /// Format for display (e.g., "R$ 10.00")
    pub fn display(&self) -> String {
        let symbol = match self.currency {
            Currency::BRL => "R$ ",
            Currency::PEN => "S/ ",
            Currency::UYU => "$U ",
            _ => "$",
        };
        if self.currency.decimal_places() == 0 {
            format!("{}{}", symbol, self.amount)
        } else {
            format!("{}{:.2}", symbol, self.as_decimal())
        }
    }
}

/// Round a decimal amount to the currency's precision.
///
/// Rounds in `f64`, so amounts beyond the `i64` range keep their value.
pub fn round_amount(amount: f64, currency: Currency) -> f64 {
    let multiplier = 10_f64.powi(currency.decimal_places() as i32);
    let scaled = amount * multiplier;
    if scaled.is_finite() {
        scaled.round() / multiplier
    } else {
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_conversion() {
        let brl = Currency::BRL;
        assert_eq!(brl.to_smallest_unit(10.99), 1099);
        assert_eq!(brl.from_smallest_unit(1099), 10.99);

        let clp = Currency::CLP;
        assert_eq!(clp.to_smallest_unit(1000.4), 1000);
        assert_eq!(clp.from_smallest_unit(1000), 1000.0);
    }

    #[test]
    fn test_round_amount() {
        assert_eq!(round_amount(19.999, Currency::BRL), 20.0);
        assert_eq!(round_amount(10.0, Currency::BRL), 10.0);
        assert_eq!(round_amount(5.555, Currency::BRL), 5.56);
        assert_eq!(round_amount(0.0, Currency::BRL), 0.0);
        assert_eq!(round_amount(1499.6, Currency::CLP), 1500.0);
    }

    #[test]
    fn test_round_amount_beyond_i64_range() {
        assert_eq!(round_amount(1e20, Currency::BRL), 1e20);
        assert_eq!(round_amount(6e16, Currency::BRL), 6e16);
        assert_eq!(round_amount(f64::MAX, Currency::BRL), f64::MAX);
    }

    #[test]
    fn test_checked_price() {
        assert_eq!(Price::checked(10.99, Currency::BRL).map(|p| p.amount), Some(1099));
        assert!(Price::checked(1e20, Currency::BRL).is_none());

        let price = Price::checked(6e16, Currency::BRL).unwrap();
        assert_eq!(price.checked_mul(1).map(|p| p.amount), Some(6_000_000_000_000_000_000));
        assert!(price.checked_mul(2).is_none());
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::new(29.9, Currency::BRL).display(), "R$ 29.90");
        assert_eq!(Price::new(1500.0, Currency::CLP).display(), "$1500");
    }

    #[test]
    fn test_currency_wire_format() {
        assert_eq!(serde_json::to_string(&Currency::BRL).unwrap(), "\"BRL\"");
        let parsed: Currency = serde_json::from_str("\"ARS\"").unwrap();
        assert_eq!(parsed, Currency::ARS);
        assert_eq!(Currency::default().to_string(), "BRL");
    }
}

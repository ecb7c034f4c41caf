//! Type-safe price representation using decimal arithmetic.
//!
//! Cart totals are money math; `f64` rounding is not acceptable there, so
//! amounts are `rust_decimal::Decimal` end to end.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero price in the default currency.
    #[must_use]
    pub fn zero() -> Self {
        Self::new(Decimal::ZERO, CurrencyCode::default())
    }

    /// Whether the amount is negative.
    ///
    /// Catalog and cart prices must be non-negative; a negative amount coming
    /// off the wire is rejected during conversion, not stored.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Multiply by a quantity (line total for a cart entry).
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

impl std::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.amount + rhs.amount, self.currency_code)
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), std::ops::Add::add)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    RUB,
}

impl CurrencyCode {
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::RUB => "₽",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn usd(amount: &str) -> Price {
        Price::new(amount.parse().unwrap(), CurrencyCode::USD)
    }

    #[test]
    fn test_times() {
        assert_eq!(usd("19.99").times(3).amount, "59.97".parse().unwrap());
    }

    #[test]
    fn test_sum() {
        let total: Price = [usd("100").times(2), usd("50").times(1)].into_iter().sum();
        assert_eq!(total.amount, Decimal::from(250));
    }

    #[test]
    fn test_is_negative() {
        assert!(usd("-1").is_negative());
        assert!(!usd("0").is_negative());
        assert!(!usd("12.50").is_negative());
    }

    #[test]
    fn test_display() {
        assert_eq!(usd("19.9").display(), "$19.90");
    }
}

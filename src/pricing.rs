//! Pricing
//!
//! Monetary helpers shared by the cart and order engines. Amounts are [`Decimal`]s in major
//! currency units and are rounded half away from zero at every aggregation step.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Subtotal at or above which delivery is free.
pub const FREE_DELIVERY_THRESHOLD: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

/// Flat delivery fee charged below the threshold.
pub const DELIVERY_FEE: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Errors raised while resolving display currencies.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The ISO currency code is not known.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Delivery pricing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    /// Subtotal at or above which delivery is free.
    pub free_delivery_threshold: Decimal,

    /// Flat fee charged below the threshold.
    pub delivery_fee: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            free_delivery_threshold: FREE_DELIVERY_THRESHOLD,
            delivery_fee: DELIVERY_FEE,
        }
    }
}

impl PricingConfig {
    /// Delivery fee owed for a (pre-discount) subtotal. Callers skip this for empty carts.
    pub fn delivery_fee_for(&self, subtotal: Decimal) -> Decimal {
        if self.qualifies_for_free_delivery(subtotal) {
            Decimal::ZERO
        } else {
            self.delivery_fee
        }
    }

    /// Whether the subtotal reaches the free-delivery threshold.
    pub fn qualifies_for_free_delivery(&self, subtotal: Decimal) -> bool {
        subtotal >= self.free_delivery_threshold
    }

    /// How much more needs to be spent before delivery is free.
    pub fn remaining_for_free_delivery(&self, subtotal: Decimal) -> Decimal {
        if self.qualifies_for_free_delivery(subtotal) {
            Decimal::ZERO
        } else {
            round_cents(self.free_delivery_threshold - subtotal)
        }
    }
}

/// Round to cents, half away from zero.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to one decimal place, half away from zero.
pub fn round_tenths(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// `points` percent of `amount`, rounded to cents.
pub fn percent_of(amount: Decimal, points: Decimal) -> Decimal {
    let fraction = Percentage::from(points / Decimal::ONE_HUNDRED);

    round_cents(fraction * amount)
}

/// Unit price times quantity, rounded to cents.
pub fn line_price(unit_price: Decimal, quantity: u32) -> Decimal {
    round_cents(unit_price * Decimal::from(quantity))
}

/// Look up an ISO 4217 currency for display.
///
/// # Errors
///
/// Returns [`PricingError::UnknownCurrency`] if the code is not an ISO currency.
pub fn currency(code: &str) -> Result<&'static Currency, PricingError> {
    iso::find(&code.trim().to_ascii_uppercase())
        .ok_or_else(|| PricingError::UnknownCurrency(code.to_string()))
}

/// Attach a currency to an amount for display.
pub fn to_money(amount: Decimal, currency: &'static Currency) -> Money<'static, Currency> {
    Money::from_decimal(amount, currency)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EGP;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn round_cents_is_half_away_from_zero() {
        assert_eq!(round_cents(Decimal::new(1_005, 3)), Decimal::new(101, 2));
        assert_eq!(round_cents(Decimal::new(1_004, 3)), Decimal::new(100, 2));
        assert_eq!(round_cents(Decimal::new(-1_005, 3)), Decimal::new(-101, 2));
    }

    #[test]
    fn round_tenths_of_average() {
        let average = Decimal::from(14) / Decimal::from(3);

        assert_eq!(round_tenths(average), Decimal::new(47, 1));
        assert_eq!(round_tenths(Decimal::new(45, 2)), Decimal::new(5, 1));
    }

    #[test]
    fn percent_of_rounds_to_cents() {
        assert_eq!(
            percent_of(Decimal::ONE_HUNDRED, Decimal::TEN),
            Decimal::new(1_000, 2)
        );
        assert_eq!(
            percent_of(Decimal::new(3_333, 2), Decimal::new(15, 0)),
            Decimal::new(500, 2)
        );
    }

    #[test]
    fn line_price_multiplies_and_rounds() {
        assert_eq!(line_price(Decimal::new(8_999, 2), 3), Decimal::new(26_997, 2));
        assert_eq!(line_price(Decimal::new(3_335, 3), 1), Decimal::new(334, 2));
    }

    #[test]
    fn delivery_fee_threshold() {
        let pricing = PricingConfig::default();

        assert_eq!(pricing.delivery_fee_for(Decimal::new(19_999, 2)), DELIVERY_FEE);
        assert_eq!(pricing.delivery_fee_for(FREE_DELIVERY_THRESHOLD), Decimal::ZERO);
        assert_eq!(pricing.delivery_fee_for(Decimal::from(250)), Decimal::ZERO);
    }

    #[test]
    fn remaining_for_free_delivery() {
        let pricing = PricingConfig::default();

        assert_eq!(
            pricing.remaining_for_free_delivery(Decimal::new(15_050, 2)),
            Decimal::new(4_950, 2)
        );
        assert_eq!(
            pricing.remaining_for_free_delivery(Decimal::from(201)),
            Decimal::ZERO
        );
    }

    #[test]
    fn resolves_currency_codes() -> TestResult {
        assert_eq!(currency("egp")?, EGP);
        assert_eq!(
            currency("XXXX"),
            Err(PricingError::UnknownCurrency("XXXX".to_string()))
        );

        Ok(())
    }

    #[test]
    fn to_money_keeps_amount() {
        let money = to_money(Decimal::new(4_000, 2), EGP);

        assert_eq!(money.amount(), &Decimal::new(4_000, 2));
    }
}

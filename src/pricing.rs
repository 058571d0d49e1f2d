//! Pricing
//!
//! Totals are kept at full precision; rounding to minor units only happens when a value is
//! turned into [`Money`] for presentation.

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::cart::CartLine;

/// Errors that can occur while calculating prices.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PricingError {
    /// A line total or running total does not fit in a decimal.
    #[error("price is too large to calculate")]
    Overflow,
}

/// Price of `quantity` units at `price` each.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product does not fit in a decimal.
pub fn line_total(price: Decimal, quantity: u32) -> Result<Decimal, PricingError> {
    price
        .checked_mul(Decimal::from(quantity))
        .ok_or(PricingError::Overflow)
}

/// Add `quantity` units at `price` each to a running total.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the line or the new total does not fit in a decimal.
pub fn add_line(total: Decimal, price: Decimal, quantity: u32) -> Result<Decimal, PricingError> {
    total
        .checked_add(line_total(price, quantity)?)
        .ok_or(PricingError::Overflow)
}

/// Calculates the total price of a list of cart lines.
///
/// An empty list totals zero.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if any line or the running total does not fit in a
/// decimal.
pub fn total_price(lines: &[CartLine]) -> Result<Decimal, PricingError> {
    lines
        .iter()
        .try_fold(Decimal::ZERO, |total, line| add_line(total, line.price, line.quantity))
}

/// Round an amount to the currency's minor units, half away from zero.
pub fn round_to_minor(amount: Decimal, currency: &'static Currency) -> Decimal {
    amount.round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert an amount into displayable money, rounded to the currency's minor units.
pub fn to_money(amount: Decimal, currency: &'static Currency) -> Money<'static, Currency> {
    Money::from_decimal(round_to_minor(amount, currency), currency)
}

//! USD-pivot conversion over a loaded rate table

use crate::core::rates::RateTable;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Display;

/// Currency codes offered for selection, in display order.
pub const ALLOWED_CURRENCIES: [&str; 7] = ["USD", "KZT", "EUR", "CNY", "THB", "TRY", "RUB"];

/// Why a conversion produced no result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionSkipped {
    #[error("Amount is not a finite number")]
    InvalidAmount,

    #[error("Both currencies must be selected")]
    MissingSelection,

    #[error("No usable rate for currency: {0}")]
    UnknownCurrency(String),
}

/// A successful conversion, paired with the inputs that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub amount: String,
    pub from: String,
    pub to: String,
    pub value: f64,
}

impl Display for Conversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} = {} {}", self.amount, self.from, self.value, self.to)
    }
}

/// Filters the allow-list down to the codes present in `rates`, keeping allow-list order.
pub fn available_currencies(rates: &RateTable) -> Vec<&'static str> {
    ALLOWED_CURRENCIES
        .iter()
        .copied()
        .filter(|code| rates.contains(code))
        .collect()
}

/// Rounds to two fractional digits, halves away from zero.
pub fn round_to_cents(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        // Outside Decimal's range cents are below f64 precision anyway
        .unwrap_or_else(|| (value * 100.0).round() / 100.0)
}

fn usable_rate(rates: &RateTable, code: &str) -> Result<f64, ConversionSkipped> {
    match rates.get(code) {
        Some(rate) if rate.is_finite() && rate > 0.0 => Ok(rate),
        _ => Err(ConversionSkipped::UnknownCurrency(code.to_string())),
    }
}

pub fn try_convert(
    amount: &str,
    from: &str,
    to: &str,
    rates: &RateTable,
) -> Result<f64, ConversionSkipped> {
    let amount: f64 = amount
        .trim()
        .parse()
        .map_err(|_| ConversionSkipped::InvalidAmount)?;
    if !amount.is_finite() {
        return Err(ConversionSkipped::InvalidAmount);
    }
    if from.is_empty() || to.is_empty() {
        return Err(ConversionSkipped::MissingSelection);
    }

    let from_rate = usable_rate(rates, from)?;
    let to_rate = usable_rate(rates, to)?;

    let usd_amount = amount / from_rate;
    Ok(round_to_cents(usd_amount * to_rate))
}

/// Converts `amount` from one currency to another, or `None` when the inputs are unusable.
pub fn convert(amount: &str, from: &str, to: &str, rates: &RateTable) -> Option<f64> {
    try_convert(amount, from, to, rates).ok()
}

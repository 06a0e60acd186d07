//! Pip arithmetic and lot sizes

use crate::currency::CurrencyPair;
use crate::rates::conversion_rate;
use crate::{round_to, MathError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pip counts are reported to a tenth of a pip (one pipette)
const PIP_PRECISION: u32 = 1;

/// Standardised position sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LotSize {
    Standard,
    Mini,
    Micro,
    Nano,
}

impl LotSize {
    /// All lot sizes from largest to smallest
    pub const ALL: [LotSize; 4] = [LotSize::Standard, LotSize::Mini, LotSize::Micro, LotSize::Nano];

    /// Base-currency units in one lot
    pub fn units(self) -> f64 {
        match self {
            LotSize::Standard => 100_000.0,
            LotSize::Mini => 10_000.0,
            LotSize::Micro => 1_000.0,
            LotSize::Nano => 100.0,
        }
    }

    /// Convert a number of base-currency units into lots of this size
    pub fn lots_from_units(self, units: f64) -> f64 {
        units / self.units()
    }

    /// Convert a number of lots of this size into base-currency units
    pub fn units_from_lots(self, lots: f64) -> f64 {
        lots * self.units()
    }
}

impl fmt::Display for LotSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LotSize::Standard => "standard",
            LotSize::Mini => "mini",
            LotSize::Micro => "micro",
            LotSize::Nano => "nano",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for LotSize {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(LotSize::Standard),
            "mini" => Ok(LotSize::Mini),
            "micro" => Ok(LotSize::Micro),
            "nano" => Ok(LotSize::Nano),
            other => Err(MathError::InvalidInput(format!("Unknown lot size '{}'", other))),
        }
    }
}

/// Absolute distance between two prices in pips
///
/// # Examples
///
/// ```
/// use forex_math::pips::pip_difference;
/// use forex_math::CurrencyPair;
///
/// let eurusd: CurrencyPair = "EUR/USD".parse().unwrap();
/// assert_eq!(pip_difference(1.1050, 1.1000, &eurusd), 50.0);
///
/// let usdjpy: CurrencyPair = "USD/JPY".parse().unwrap();
/// assert_eq!(pip_difference(110.00, 110.50, &usdjpy), 50.0);
/// ```
pub fn pip_difference(price_a: f64, price_b: f64, pair: &CurrencyPair) -> f64 {
    round_to((price_a - price_b).abs() / pair.pip_size(), PIP_PRECISION)
}

/// Signed distance from `from` to `to` in pips; positive when `to` is higher
pub fn signed_pips(from: f64, to: f64, pair: &CurrencyPair) -> f64 {
    round_to((to - from) / pair.pip_size(), PIP_PRECISION)
}

/// Price `pips` away from `price` (negative pips move down)
pub fn offset_price(price: f64, pips: f64, pair: &CurrencyPair) -> f64 {
    pair.round_price(price + pips * pair.pip_size())
}

/// Value of one pip for a position of `units`, in the pair's quote currency
pub fn pip_value_in_quote(units: f64, pair: &CurrencyPair) -> f64 {
    units * pair.pip_size()
}

/// Value of one pip for `lots` standard lots, in `account_currency`
///
/// `exchange_rate` converts quote currency into account currency and is
/// only needed when the two differ.
pub fn pip_value(
    pair: &CurrencyPair,
    lots: f64,
    account_currency: &str,
    exchange_rate: Option<f64>,
) -> Result<f64> {
    if !lots.is_finite() || lots < 0.0 {
        return Err(MathError::InvalidInput(
            "Lot size must be a non-negative number".to_string(),
        ));
    }

    let rate = conversion_rate(&pair.quote, account_currency, exchange_rate)?;
    let units = LotSize::Standard.units_from_lots(lots);
    Ok(pip_value_in_quote(units, pair) * rate)
}

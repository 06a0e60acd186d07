//! # Forex Math
//!
//! Closed-form calculations behind a suite of forex trading calculators.
//! Every calculator is a pure function: it takes an input struct, returns a
//! result struct, and keeps no state between calls.
//!
//! - [`compounding`]: compound growth with contributions, withdrawals and tax
//! - [`fibonacci`]: retracement and extension levels
//! - [`pips`]: pip difference, pip value and lot sizes
//! - [`pivots`]: Standard, Woodie, Camarilla and DeMark pivot points
//! - [`position`]: position sizing from account risk
//! - [`profit_loss`]: signed pips, P/L and ROI of a closed trade
//! - [`margin`]: required margin and margin level
//! - [`risk_reward`]: stop-loss and take-profit levels
//!
//! ## Example
//!
//! ```
//! use forex_math::pips::pip_difference;
//! use forex_math::CurrencyPair;
//!
//! let pair: CurrencyPair = "EUR/USD".parse().unwrap();
//! assert_eq!(pip_difference(1.1050, 1.1000, &pair), 50.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Shared reference data and helpers
pub mod currency;
pub mod input;
pub mod rates;
pub mod settings;

// Calculator modules
pub mod compounding;
pub mod fibonacci;
pub mod margin;
pub mod pips;
pub mod pivots;
pub mod position;
pub mod profit_loss;
pub mod risk_reward;

pub use currency::{Currency, CurrencyPair};
pub use rates::{RateSource, RateTable};
pub use settings::CalculatorSettings;

/// Errors that can occur in forex calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("No exchange rate available from {from} to {to}")]
    MissingExchangeRate { from: String, to: String },

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for forex math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Side of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// `1.0` for long, `-1.0` for short
    pub fn sign(self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

impl FromStr for Direction {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" | "buy" => Ok(Direction::Long),
            "short" | "sell" => Ok(Direction::Short),
            other => Err(MathError::InvalidInput(format!(
                "Unknown trade direction '{}'",
                other
            ))),
        }
    }
}

/// Rejects NaN and infinite results so callers never receive them silently.
pub(crate) fn ensure_finite(value: f64, what: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MathError::CalculationError(format!(
            "{} is not a finite number ({})",
            what, value
        )))
    }
}

/// Round `value` to `decimals` decimal places.
pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite(1.5, "value").unwrap(), 1.5);
        assert!(matches!(
            ensure_finite(f64::NAN, "value"),
            Err(MathError::CalculationError(_))
        ));
        assert!(ensure_finite(f64::INFINITY, "value").is_err());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(49.99999999, 1), 50.0);
        assert_eq!(round_to(2.5, 0), 3.0);
    }

    #[test]
    fn test_direction() {
        assert_eq!(Direction::Long.sign(), 1.0);
        assert_eq!(Direction::Short.sign(), -1.0);
        assert_eq!("Sell".parse::<Direction>().unwrap(), Direction::Short);
        assert_eq!(Direction::Long.to_string(), "long");
        assert!("flat".parse::<Direction>().is_err());
    }

    #[test]
    fn test_error_display() {
        let err = MathError::MissingExchangeRate {
            from: "USD".to_string(),
            to: "EUR".to_string(),
        };
        assert_eq!(err.to_string(), "No exchange rate available from USD to EUR");

        let err = MathError::InvalidInput("Leverage must be greater than zero".to_string());
        assert!(err.to_string().contains("Leverage must be greater than zero"));
    }
}

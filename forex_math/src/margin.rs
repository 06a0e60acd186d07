//! Margin requirements

use crate::currency::CurrencyPair;
use crate::{ensure_finite, MathError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inputs for [`margin`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginInput {
    pub pair: CurrencyPair,
    /// Position size in base-currency units
    pub units: f64,
    /// Leverage as a multiple, e.g. 100 for 1:100
    pub leverage: f64,
    /// Price of one unit of the base currency in account currency
    pub exchange_rate: f64,
    /// Balance the margin level is measured against
    pub account_balance: f64,
}

/// Result of [`margin`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    /// Notional value of the position in account currency
    pub position_value: f64,
    pub required_margin: f64,
    /// Balance left after the margin is set aside
    pub free_margin: f64,
    /// Balance as a percentage of required margin; `None` for an empty position
    pub margin_level_percent: Option<f64>,
}

/// Compute the margin a leveraged position ties up
///
/// # Examples
///
/// ```
/// use forex_math::margin::{margin, MarginInput};
///
/// let input = MarginInput {
///     pair: "EUR/USD".parse().unwrap(),
///     units: 100_000.0,
///     leverage: 100.0,
///     exchange_rate: 1.2,
///     account_balance: 5_000.0,
/// };
/// let result = margin(&input).unwrap();
///
/// assert!((result.required_margin - 1_200.0).abs() < 1e-9);
/// assert!((result.free_margin - 3_800.0).abs() < 1e-9);
/// ```
pub fn margin(input: &MarginInput) -> Result<Margin> {
    if !input.leverage.is_finite() || input.leverage <= 0.0 {
        return Err(MathError::InvalidInput(
            "Leverage must be greater than zero".to_string(),
        ));
    }
    if !input.units.is_finite() || input.units < 0.0 {
        return Err(MathError::InvalidInput(
            "Position size cannot be negative".to_string(),
        ));
    }
    if !input.exchange_rate.is_finite() || input.exchange_rate <= 0.0 {
        return Err(MathError::InvalidInput(
            "Exchange rate must be greater than zero".to_string(),
        ));
    }
    if !input.account_balance.is_finite() {
        return Err(MathError::InvalidInput(
            "Account balance must be a finite number".to_string(),
        ));
    }

    let position_value = input.units * input.exchange_rate;
    let required_margin = ensure_finite(position_value / input.leverage, "Required margin")?;
    let margin_level_percent = if required_margin > 0.0 {
        Some(input.account_balance / required_margin * 100.0)
    } else {
        None
    };

    debug!(
        pair = %input.pair,
        position_value,
        required_margin,
        "Computed margin"
    );

    Ok(Margin {
        position_value,
        required_margin,
        free_margin: input.account_balance - required_margin,
        margin_level_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn standard_lot(leverage: f64) -> MarginInput {
        MarginInput {
            pair: "EUR/USD".parse().unwrap(),
            units: 100_000.0,
            leverage,
            exchange_rate: 1.1,
            account_balance: 5_000.0,
        }
    }

    #[test]
    fn test_standard_lot_at_100x() {
        let result = margin(&standard_lot(100.0)).unwrap();

        assert_relative_eq!(result.position_value, 110_000.0, max_relative = 1e-12);
        assert_relative_eq!(result.required_margin, 1_100.0, max_relative = 1e-12);
        assert_relative_eq!(result.free_margin, 3_900.0, max_relative = 1e-12);
        assert_relative_eq!(
            result.margin_level_percent.unwrap(),
            5_000.0 / 1_100.0 * 100.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_higher_leverage_needs_less_margin() {
        let low = margin(&standard_lot(30.0)).unwrap();
        let high = margin(&standard_lot(500.0)).unwrap();
        assert!(high.required_margin < low.required_margin);
    }

    #[test]
    fn test_zero_leverage_rejected() {
        assert!(matches!(
            margin(&standard_lot(0.0)),
            Err(MathError::InvalidInput(_))
        ));
        assert!(margin(&standard_lot(-10.0)).is_err());
    }

    #[test]
    fn test_empty_position() {
        let mut input = standard_lot(100.0);
        input.units = 0.0;
        let result = margin(&input).unwrap();

        assert_eq!(result.required_margin, 0.0);
        assert_eq!(result.margin_level_percent, None);
        assert_eq!(result.free_margin, 5_000.0);
    }
}

//! Position sizing
//!
//! Sizes a position so that hitting the stop loses exactly the amount the
//! trader chose to risk:
//!
//! `units = risk_amount / (stop_loss_pips * pip_size * quote_to_account_rate)`
//!
//! Risk can be entered as a percentage of balance or a fixed amount, and the
//! stop as a pip distance or a price. The `toggled` helpers convert between
//! the two representations the way a form does when the user flips the
//! mode: from the displayed value, rounded for display. Flipping twice is
//! not guaranteed to give the original number back.

use crate::currency::CurrencyPair;
use crate::pips::{offset_price, pip_difference, LotSize};
use crate::rates::conversion_rate;
use crate::{ensure_finite, round_to, Direction, MathError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How much of the account is put at risk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RiskInput {
    /// Percentage of the account balance
    Percent(f64),
    /// Fixed amount in account currency
    Amount(f64),
}

impl RiskInput {
    /// Risk in account currency for a given balance
    pub fn amount(self, balance: f64) -> f64 {
        match self {
            RiskInput::Percent(percent) => balance * percent / 100.0,
            RiskInput::Amount(amount) => amount,
        }
    }

    /// The same risk expressed in the other mode, rounded for display
    pub fn toggled(self, balance: f64) -> RiskInput {
        match self {
            RiskInput::Percent(percent) => {
                RiskInput::Amount(risk_percent_to_amount(balance, percent))
            }
            RiskInput::Amount(amount) => RiskInput::Percent(risk_amount_to_percent(balance, amount)),
        }
    }
}

/// Where the stop sits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StopLossInput {
    /// Distance from entry in pips
    Pips(f64),
    /// Absolute stop price
    Price(f64),
}

impl StopLossInput {
    /// Stop distance in pips from `entry_price`
    pub fn pips(self, entry_price: f64, pair: &CurrencyPair) -> f64 {
        match self {
            StopLossInput::Pips(pips) => pips,
            StopLossInput::Price(price) => stop_price_to_pips(entry_price, price, pair),
        }
    }

    /// The same stop expressed in the other mode, rounded for display
    pub fn toggled(
        self,
        entry_price: f64,
        direction: Direction,
        pair: &CurrencyPair,
    ) -> StopLossInput {
        match self {
            StopLossInput::Pips(pips) => {
                StopLossInput::Price(stop_pips_to_price(entry_price, pips, direction, pair))
            }
            StopLossInput::Price(price) => {
                StopLossInput::Pips(stop_price_to_pips(entry_price, price, pair))
            }
        }
    }
}

/// Risk amount for `percent` of `balance`, rounded to cents
pub fn risk_percent_to_amount(balance: f64, percent: f64) -> f64 {
    round_to(balance * percent / 100.0, 2)
}

/// Percentage of `balance` that `amount` represents, rounded to two decimals
///
/// A zero balance yields 0%.
pub fn risk_amount_to_percent(balance: f64, amount: f64) -> f64 {
    if balance == 0.0 {
        return 0.0;
    }
    round_to(amount / balance * 100.0, 2)
}

/// Stop price `pips` away from entry on the losing side of `direction`
pub fn stop_pips_to_price(
    entry_price: f64,
    pips: f64,
    direction: Direction,
    pair: &CurrencyPair,
) -> f64 {
    offset_price(entry_price, -direction.sign() * pips, pair)
}

/// Distance between entry and a stop price in pips
pub fn stop_price_to_pips(entry_price: f64, stop_price: f64, pair: &CurrencyPair) -> f64 {
    pip_difference(entry_price, stop_price, pair)
}

/// Inputs for [`position_size`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSizeInput {
    pub account_balance: f64,
    pub risk: RiskInput,
    pub stop_loss: StopLossInput,
    pub entry_price: f64,
    pub pair: CurrencyPair,
    pub account_currency: String,
    /// Quote-to-account rate; not needed when they are the same currency
    pub exchange_rate: Option<f64>,
}

/// Result of [`position_size`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSize {
    pub units: f64,
    pub standard_lots: f64,
    pub mini_lots: f64,
    pub micro_lots: f64,
    /// Amount lost if the stop is hit, in account currency
    pub risk_amount: f64,
    pub stop_loss_pips: f64,
    /// Value of one pip for the sized position, in account currency
    pub pip_value: f64,
}

/// Size a position from account risk and stop distance
///
/// Rejects a zero, negative or non-finite stop distance and a non-positive
/// risk amount instead of returning an infinite or meaningless size.
///
/// # Examples
///
/// ```
/// use forex_math::position::{position_size, PositionSizeInput, RiskInput, StopLossInput};
///
/// let input = PositionSizeInput {
///     account_balance: 10_000.0,
///     risk: RiskInput::Percent(1.0),
///     stop_loss: StopLossInput::Pips(50.0),
///     entry_price: 1.1000,
///     pair: "EUR/USD".parse().unwrap(),
///     account_currency: "USD".to_string(),
///     exchange_rate: None,
/// };
/// let size = position_size(&input).unwrap();
///
/// assert_eq!(size.risk_amount, 100.0);
/// assert!((size.standard_lots - 0.2).abs() < 1e-9);
/// ```
pub fn position_size(input: &PositionSizeInput) -> Result<PositionSize> {
    if !input.account_balance.is_finite() || input.account_balance < 0.0 {
        return Err(MathError::InvalidInput(
            "Account balance cannot be negative".to_string(),
        ));
    }
    if let RiskInput::Percent(percent) = input.risk {
        if !(percent > 0.0 && percent <= 100.0) {
            return Err(MathError::InvalidInput(
                "Risk percentage must be between 0 and 100".to_string(),
            ));
        }
    }
    if let StopLossInput::Price(_) = input.stop_loss {
        if !input.entry_price.is_finite() || input.entry_price <= 0.0 {
            return Err(MathError::InvalidInput(
                "Entry price must be greater than zero".to_string(),
            ));
        }
    }

    let risk_amount = input.risk.amount(input.account_balance);
    if !risk_amount.is_finite() || risk_amount <= 0.0 {
        return Err(MathError::InvalidInput(
            "Risk amount must be greater than zero".to_string(),
        ));
    }

    let stop_loss_pips = input.stop_loss.pips(input.entry_price, &input.pair);
    if !stop_loss_pips.is_finite() || stop_loss_pips <= 0.0 {
        return Err(MathError::InvalidInput(
            "Stop loss distance must be greater than zero".to_string(),
        ));
    }

    let rate = conversion_rate(
        &input.pair.quote,
        &input.account_currency,
        input.exchange_rate,
    )?;
    let pip_value_per_unit = input.pair.pip_size() * rate;
    let units = ensure_finite(
        risk_amount / (stop_loss_pips * pip_value_per_unit),
        "Position size",
    )?;

    debug!(
        pair = %input.pair,
        risk_amount,
        stop_loss_pips,
        units,
        "Sized position"
    );

    Ok(PositionSize {
        units,
        standard_lots: LotSize::Standard.lots_from_units(units),
        mini_lots: LotSize::Mini.lots_from_units(units),
        micro_lots: LotSize::Micro.lots_from_units(units),
        risk_amount,
        stop_loss_pips,
        pip_value: units * pip_value_per_unit,
    })
}

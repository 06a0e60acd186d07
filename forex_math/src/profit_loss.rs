//! Profit and loss of a closed trade

use crate::currency::CurrencyPair;
use crate::pips::{pip_value, signed_pips, LotSize};
use crate::{ensure_finite, Direction, MathError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inputs for [`profit_loss`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitLossInput {
    pub entry_price: f64,
    pub exit_price: f64,
    /// Position size in standard lots
    pub lots: f64,
    pub pair: CurrencyPair,
    pub account_currency: String,
    pub direction: Direction,
    /// Quote-to-account rate; not needed when they are the same currency
    pub exchange_rate: Option<f64>,
}

/// Result of [`profit_loss`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitLoss {
    /// Pips gained (positive) or lost (negative)
    pub pips: f64,
    /// Profit or loss in account currency
    pub profit_loss: f64,
    /// P/L as a percentage of the position's notional value at entry
    pub roi_percent: f64,
}

/// Compute signed pips, P/L and ROI
pub fn profit_loss(input: &ProfitLossInput) -> Result<ProfitLoss> {
    if !input.entry_price.is_finite() || !input.exit_price.is_finite() {
        return Err(MathError::InvalidInput(
            "Entry and exit prices must be finite numbers".to_string(),
        ));
    }

    let pips = input.direction.sign() * signed_pips(input.entry_price, input.exit_price, &input.pair);
    let value_per_pip = pip_value(
        &input.pair,
        input.lots,
        &input.account_currency,
        input.exchange_rate,
    )?;
    let profit_loss = ensure_finite(pips * value_per_pip, "Profit/loss")?;

    let notional = LotSize::Standard.units_from_lots(input.lots) * input.entry_price;
    let roi_percent = if notional == 0.0 {
        0.0
    } else {
        ensure_finite(profit_loss / notional * 100.0, "ROI")?
    };

    debug!(pair = %input.pair, pips, profit_loss, "Computed profit/loss");

    Ok(ProfitLoss {
        pips,
        profit_loss,
        roi_percent,
    })
}

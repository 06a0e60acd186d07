//! Stop-loss and take-profit levels
//!
//! Places a stop and a target around an entry and reports what each would
//! be worth in account currency.

use crate::currency::CurrencyPair;
use crate::pips::{offset_price, pip_value};
use crate::{round_to, Direction, MathError, Result};
use serde::{Deserialize, Serialize};

/// How far the target sits from entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TakeProfitInput {
    /// Distance in pips
    Pips(f64),
    /// Multiple of the stop distance, e.g. `2.0` for 1:2
    RiskReward(f64),
}

/// Inputs for [`risk_reward`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRewardInput {
    pub entry_price: f64,
    pub direction: Direction,
    pub pair: CurrencyPair,
    /// Position size in standard lots
    pub lots: f64,
    pub stop_loss_pips: f64,
    pub take_profit: TakeProfitInput,
    pub account_currency: String,
    /// Quote-to-account rate; not needed when they are the same currency
    pub exchange_rate: Option<f64>,
}

/// Result of [`risk_reward`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskReward {
    pub stop_loss_price: f64,
    pub take_profit_price: f64,
    pub stop_loss_pips: f64,
    pub take_profit_pips: f64,
    /// Reward divided by risk
    pub risk_reward_ratio: f64,
    /// Amount lost at the stop, in account currency (positive)
    pub potential_loss: f64,
    /// Amount won at the target, in account currency
    pub potential_profit: f64,
}

/// Place stop-loss and take-profit levels
pub fn risk_reward(input: &RiskRewardInput) -> Result<RiskReward> {
    if !input.stop_loss_pips.is_finite() || input.stop_loss_pips <= 0.0 {
        return Err(MathError::InvalidInput(
            "Stop loss distance must be greater than zero".to_string(),
        ));
    }
    if !input.entry_price.is_finite() || input.entry_price <= 0.0 {
        return Err(MathError::InvalidInput(
            "Entry price must be greater than zero".to_string(),
        ));
    }

    let take_profit_pips = match input.take_profit {
        TakeProfitInput::Pips(pips) => pips,
        TakeProfitInput::RiskReward(ratio) => round_to(input.stop_loss_pips * ratio, 1),
    };
    if !take_profit_pips.is_finite() || take_profit_pips <= 0.0 {
        return Err(MathError::InvalidInput(
            "Take profit distance must be greater than zero".to_string(),
        ));
    }

    let sign = input.direction.sign();
    let value_per_pip = pip_value(
        &input.pair,
        input.lots,
        &input.account_currency,
        input.exchange_rate,
    )?;

    Ok(RiskReward {
        stop_loss_price: offset_price(input.entry_price, -sign * input.stop_loss_pips, &input.pair),
        take_profit_price: offset_price(input.entry_price, sign * take_profit_pips, &input.pair),
        stop_loss_pips: input.stop_loss_pips,
        take_profit_pips,
        risk_reward_ratio: take_profit_pips / input.stop_loss_pips,
        potential_loss: input.stop_loss_pips * value_per_pip,
        potential_profit: take_profit_pips * value_per_pip,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn setup(direction: Direction, take_profit: TakeProfitInput) -> RiskRewardInput {
        RiskRewardInput {
            entry_price: 1.2000,
            direction,
            pair: "GBP/USD".parse().unwrap(),
            lots: 1.0,
            stop_loss_pips: 30.0,
            take_profit,
            account_currency: "USD".to_string(),
            exchange_rate: None,
        }
    }

    #[test]
    fn test_long_levels() {
        let result = risk_reward(&setup(Direction::Long, TakeProfitInput::Pips(60.0))).unwrap();

        assert_eq!(result.stop_loss_price, 1.197);
        assert_eq!(result.take_profit_price, 1.206);
        assert_relative_eq!(result.risk_reward_ratio, 2.0);
        assert_relative_eq!(result.potential_loss, 300.0, max_relative = 1e-12);
        assert_relative_eq!(result.potential_profit, 600.0, max_relative = 1e-12);
    }

    #[test]
    fn test_short_levels_from_ratio() {
        let result =
            risk_reward(&setup(Direction::Short, TakeProfitInput::RiskReward(1.5))).unwrap();

        assert_eq!(result.take_profit_pips, 45.0);
        assert_eq!(result.stop_loss_price, 1.203);
        assert_eq!(result.take_profit_price, 1.1955);
    }

    #[test]
    fn test_zero_distances_rejected() {
        let mut input = setup(Direction::Long, TakeProfitInput::Pips(60.0));
        input.stop_loss_pips = 0.0;
        assert!(risk_reward(&input).is_err());

        let input = setup(Direction::Long, TakeProfitInput::RiskReward(0.0));
        assert!(risk_reward(&input).is_err());
    }
}

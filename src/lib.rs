//! # Pipwise
//!
//! `pipwise` bundles the forex calculators from [`forex_math`] behind a
//! single crate, with a catalogue of the suite and plain-text reports for
//! each result. The `pipwise` binary exposes every calculator on the
//! command line; its argument parsing and dispatch live in [`cli`].
//!
//! ## Example
//!
//! ```
//! use pipwise::Calculator;
//!
//! let calculator: Calculator = "pivots".parse().unwrap();
//! assert_eq!(calculator.name(), "Pivot Points");
//! assert_eq!(Calculator::ALL.len(), 8);
//! ```

use std::fmt;
use std::str::FromStr;

pub mod cli;
pub mod report;

pub use forex_math;
pub use forex_math::{CalculatorSettings, CurrencyPair, Direction, MathError, RateTable};
pub use report::Report;

/// A calculator in the suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Calculator {
    Compounding,
    Fibonacci,
    PipDifference,
    PivotPoints,
    PositionSize,
    ProfitLoss,
    Margin,
    StopLossTakeProfit,
}

impl Calculator {
    /// Every calculator, in menu order
    pub const ALL: [Calculator; 8] = [
        Calculator::Compounding,
        Calculator::Fibonacci,
        Calculator::PipDifference,
        Calculator::PivotPoints,
        Calculator::PositionSize,
        Calculator::ProfitLoss,
        Calculator::Margin,
        Calculator::StopLossTakeProfit,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Calculator::Compounding => "Compounding",
            Calculator::Fibonacci => "Fibonacci Retracement",
            Calculator::PipDifference => "Pip Difference",
            Calculator::PivotPoints => "Pivot Points",
            Calculator::PositionSize => "Position Size",
            Calculator::ProfitLoss => "Profit/Loss",
            Calculator::Margin => "Margin",
            Calculator::StopLossTakeProfit => "Stop Loss / Take Profit",
        }
    }

    /// One-line summary shown in listings
    pub fn description(self) -> &'static str {
        match self {
            Calculator::Compounding => {
                "Grow a balance with periodic returns, contributions, withdrawals and tax"
            }
            Calculator::Fibonacci => "Retracement and extension levels for a price swing",
            Calculator::PipDifference => "Distance between two prices in pips, and pip value",
            Calculator::PivotPoints => "Standard, Woodie, Camarilla and DeMark pivot levels",
            Calculator::PositionSize => "Lot size that risks a set share of the account",
            Calculator::ProfitLoss => "Pips, profit and ROI of a closed trade",
            Calculator::Margin => "Margin required to open a leveraged position",
            Calculator::StopLossTakeProfit => "Stop and target prices with risk:reward",
        }
    }

    /// Command-line subcommand name
    pub fn slug(self) -> &'static str {
        match self {
            Calculator::Compounding => "compound",
            Calculator::Fibonacci => "fibonacci",
            Calculator::PipDifference => "pips",
            Calculator::PivotPoints => "pivots",
            Calculator::PositionSize => "position",
            Calculator::ProfitLoss => "profit",
            Calculator::Margin => "margin",
            Calculator::StopLossTakeProfit => "stops",
        }
    }
}

impl fmt::Display for Calculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Calculator {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Calculator::ALL
            .iter()
            .copied()
            .find(|c| c.slug().eq_ignore_ascii_case(wanted) || c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MathError::InvalidInput(format!("Unknown calculator '{}'", wanted)))
    }
}

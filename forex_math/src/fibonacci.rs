//! Fibonacci retracement and extension levels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::MathError;

/// Retracement ratios, in percent of the swing
pub const RETRACEMENT_LEVELS: [f64; 7] = [0.0, 23.6, 38.2, 50.0, 61.8, 78.6, 100.0];

/// Extension ratios, in percent of the swing
pub const EXTENSION_LEVELS: [f64; 3] = [161.8, 200.0, 261.8];

/// Direction of the swing being measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Uptrend,
    Downtrend,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Uptrend => write!(f, "uptrend"),
            Trend::Downtrend => write!(f, "downtrend"),
        }
    }
}

impl FromStr for Trend {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "uptrend" | "long" => Ok(Trend::Uptrend),
            "down" | "downtrend" | "short" => Ok(Trend::Downtrend),
            other => Err(MathError::InvalidInput(format!("Unknown trend '{}'", other))),
        }
    }
}

/// A single level: the ratio in percent and the price it maps to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FibonacciLevel {
    pub level: f64,
    pub price: f64,
}

/// Result of [`fibonacci_levels`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibonacciLevels {
    pub retracements: Vec<FibonacciLevel>,
    pub extensions: Vec<FibonacciLevel>,
}

impl FibonacciLevels {
    /// Price at a retracement ratio, if that ratio is in the table
    pub fn retracement(&self, level: f64) -> Option<f64> {
        find_level(&self.retracements, level)
    }

    /// Price at an extension ratio, if that ratio is in the table
    pub fn extension(&self, level: f64) -> Option<f64> {
        find_level(&self.extensions, level)
    }
}

fn find_level(levels: &[FibonacciLevel], level: f64) -> Option<f64> {
    levels
        .iter()
        .find(|l| (l.level - level).abs() < 1e-9)
        .map(|l| l.price)
}

/// Compute retracement and extension levels for a swing from `low` to `high`
///
/// In an uptrend retracements are measured down from the high and
/// extensions project up from the low; a downtrend mirrors both. Inputs are
/// not validated: an inverted swing simply yields mirrored levels.
pub fn fibonacci_levels(high: f64, low: f64, trend: Trend) -> FibonacciLevels {
    let range = high - low;

    let retracement_price = |ratio: f64| match trend {
        Trend::Uptrend => high - range * ratio,
        Trend::Downtrend => low + range * ratio,
    };
    let extension_price = |ratio: f64| match trend {
        Trend::Uptrend => low + range * ratio,
        Trend::Downtrend => high - range * ratio,
    };

    let retracements = RETRACEMENT_LEVELS
        .iter()
        .map(|&level| FibonacciLevel {
            level,
            price: retracement_price(level / 100.0),
        })
        .collect();

    let extensions = EXTENSION_LEVELS
        .iter()
        .map(|&level| FibonacciLevel {
            level,
            price: extension_price(level / 100.0),
        })
        .collect();

    FibonacciLevels {
        retracements,
        extensions,
    }
}

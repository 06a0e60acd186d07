//! Pivot point calculations
//!
//! Four methods are supported:
//! - Standard (floor) pivots
//! - Woodie pivots, weighting the close twice
//! - Camarilla pivots, narrow bands around the close
//! - DeMark pivots, a single band chosen by the candle's direction

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Camarilla band multiplier applied to the range
const CAMARILLA_FACTOR: f64 = 1.1;

/// Pivot point formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PivotMethod {
    Standard,
    Woodie,
    Camarilla,
    DeMark,
}

impl PivotMethod {
    pub const ALL: [PivotMethod; 4] = [
        PivotMethod::Standard,
        PivotMethod::Woodie,
        PivotMethod::Camarilla,
        PivotMethod::DeMark,
    ];

    /// Whether the method needs the period's open price
    pub fn requires_open(self) -> bool {
        matches!(self, PivotMethod::DeMark)
    }
}

impl fmt::Display for PivotMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PivotMethod::Standard => "standard",
            PivotMethod::Woodie => "woodie",
            PivotMethod::Camarilla => "camarilla",
            PivotMethod::DeMark => "demark",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PivotMethod {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "floor" | "classic" => Ok(PivotMethod::Standard),
            "woodie" | "woodies" => Ok(PivotMethod::Woodie),
            "camarilla" => Ok(PivotMethod::Camarilla),
            "demark" => Ok(PivotMethod::DeMark),
            other => Err(MathError::InvalidInput(format!(
                "Unknown pivot method '{}'",
                other
            ))),
        }
    }
}

/// Prior-period prices the pivots are derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PivotInput {
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Only used by [`PivotMethod::DeMark`]
    pub open: Option<f64>,
}

impl PivotInput {
    pub fn new(high: f64, low: f64, close: f64) -> Self {
        Self {
            high,
            low,
            close,
            open: None,
        }
    }

    pub fn with_open(mut self, open: f64) -> Self {
        self.open = Some(open);
        self
    }
}

/// Pivot and its bands, nearest band first
///
/// Standard and Woodie produce three bands, Camarilla four and DeMark one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotPoints {
    pub method: PivotMethod,
    pub pivot: f64,
    pub resistance: Vec<f64>,
    pub support: Vec<f64>,
}

impl PivotPoints {
    /// Resistance level `n` (1-based), e.g. `r(1)` for R1
    pub fn r(&self, n: usize) -> Option<f64> {
        n.checked_sub(1).and_then(|i| self.resistance.get(i).copied())
    }

    /// Support level `n` (1-based), e.g. `s(1)` for S1
    pub fn s(&self, n: usize) -> Option<f64> {
        n.checked_sub(1).and_then(|i| self.support.get(i).copied())
    }
}

/// Compute pivot points for one period
///
/// The ordering of high, low and close is not checked.
///
/// # Examples
///
/// ```
/// use forex_math::pivots::{pivot_points, PivotInput, PivotMethod};
///
/// let input = PivotInput::new(110.0, 100.0, 105.0);
/// let points = pivot_points(&input, PivotMethod::Standard).unwrap();
///
/// assert_eq!(points.pivot, 105.0);
/// assert_eq!(points.r(1), Some(110.0));
/// assert_eq!(points.s(1), Some(100.0));
///
/// // DeMark needs the period's open
/// assert!(pivot_points(&input, PivotMethod::DeMark).is_err());
/// ```
pub fn pivot_points(input: &PivotInput, method: PivotMethod) -> Result<PivotPoints> {
    let PivotInput {
        high, low, close, ..
    } = *input;
    let range = high - low;

    let points = match method {
        PivotMethod::Standard => floor_bands(method, (high + low + close) / 3.0, high, low),
        PivotMethod::Woodie => floor_bands(method, (high + low + 2.0 * close) / 4.0, high, low),
        PivotMethod::Camarilla => {
            let band = |divisor: f64| range * CAMARILLA_FACTOR / divisor;
            let divisors = [12.0, 6.0, 4.0, 2.0];

            PivotPoints {
                method,
                pivot: (high + low + close) / 3.0,
                resistance: divisors.iter().map(|&d| close + band(d)).collect(),
                support: divisors.iter().map(|&d| close - band(d)).collect(),
            }
        }
        PivotMethod::DeMark => {
            let open = input.open.ok_or_else(|| {
                MathError::InvalidInput("DeMark pivots require the open price".to_string())
            })?;

            let x = if close > open {
                high + 2.0 * low + close
            } else {
                2.0 * high + low + close
            };

            PivotPoints {
                method,
                pivot: x / 4.0,
                resistance: vec![x / 2.0 - low],
                support: vec![x / 2.0 - high],
            }
        }
    };

    trace!(%method, pivot = points.pivot, "Computed pivot points");
    Ok(points)
}

fn floor_bands(method: PivotMethod, pivot: f64, high: f64, low: f64) -> PivotPoints {
    let range = high - low;
    PivotPoints {
        method,
        pivot,
        resistance: vec![2.0 * pivot - low, pivot + range, pivot + 2.0 * range],
        support: vec![2.0 * pivot - high, pivot - range, pivot - 2.0 * range],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_standard_worked_example() {
        let points = pivot_points(&PivotInput::new(1.2, 1.19, 1.195), PivotMethod::Standard).unwrap();

        assert_relative_eq!(points.pivot, 1.195, epsilon = 1e-12);
        assert_relative_eq!(points.resistance[0], 1.2, epsilon = 1e-12);
        assert_relative_eq!(points.support[0], 1.19, epsilon = 1e-12);
        assert_relative_eq!(points.r(2).unwrap(), 1.205, epsilon = 1e-12);
        assert_relative_eq!(points.s(3).unwrap(), 1.175, epsilon = 1e-12);
    }

    #[test]
    fn test_woodie_weights_close() {
        let points = pivot_points(&PivotInput::new(110.0, 100.0, 108.0), PivotMethod::Woodie).unwrap();

        assert_relative_eq!(points.pivot, 106.5, epsilon = 1e-12);
        assert_relative_eq!(points.r(1).unwrap(), 113.0, epsilon = 1e-12);
        assert_relative_eq!(points.s(1).unwrap(), 103.0, epsilon = 1e-12);
        assert_relative_eq!(points.r(3).unwrap(), 126.5, epsilon = 1e-12);
    }

    #[test]
    fn test_camarilla_bands_around_close() {
        let points =
            pivot_points(&PivotInput::new(112.0, 100.0, 106.0), PivotMethod::Camarilla).unwrap();

        assert_eq!(points.resistance.len(), 4);
        assert_relative_eq!(points.pivot, 106.0, epsilon = 1e-12);
        assert_relative_eq!(points.r(1).unwrap(), 107.1, epsilon = 1e-9);
        assert_relative_eq!(points.r(2).unwrap(), 108.2, epsilon = 1e-9);
        assert_relative_eq!(points.r(3).unwrap(), 109.3, epsilon = 1e-9);
        assert_relative_eq!(points.r(4).unwrap(), 112.6, epsilon = 1e-9);
        assert_relative_eq!(points.s(1).unwrap(), 104.9, epsilon = 1e-9);
    }

    #[rstest]
    #[case(105.0, 104.0, 110.0 + 200.0 + 105.0)]
    #[case(104.0, 105.0, 220.0 + 100.0 + 104.0)]
    #[case(104.0, 104.0, 220.0 + 100.0 + 104.0)]
    fn test_demark_branches(#[case] close: f64, #[case] open: f64, #[case] x: f64) {
        let input = PivotInput::new(110.0, 100.0, close).with_open(open);
        let points = pivot_points(&input, PivotMethod::DeMark).unwrap();

        assert_relative_eq!(points.pivot, x / 4.0, epsilon = 1e-12);
        assert_eq!(points.resistance, vec![x / 2.0 - 100.0]);
        assert_eq!(points.support, vec![x / 2.0 - 110.0]);
        assert_eq!(points.r(2), None);
    }

    #[test]
    fn test_demark_requires_open() {
        let result = pivot_points(&PivotInput::new(110.0, 100.0, 105.0), PivotMethod::DeMark);
        assert!(matches!(result, Err(MathError::InvalidInput(_))));
    }

    #[test]
    fn test_r_zero_is_none() {
        let points = pivot_points(&PivotInput::new(2.0, 1.0, 1.5), PivotMethod::Standard).unwrap();
        assert_eq!(points.r(0), None);
        assert_eq!(points.s(0), None);
    }

    #[rstest]
    #[case("Standard", PivotMethod::Standard)]
    #[case("classic", PivotMethod::Standard)]
    #[case("WOODIE", PivotMethod::Woodie)]
    #[case("camarilla", PivotMethod::Camarilla)]
    #[case("DeMark", PivotMethod::DeMark)]
    fn test_method_parsing(#[case] text: &str, #[case] expected: PivotMethod) {
        assert_eq!(text.parse::<PivotMethod>().unwrap(), expected);
        assert_eq!(expected.to_string().parse::<PivotMethod>().unwrap(), expected);
    }
}

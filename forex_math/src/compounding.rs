//! Compound growth calculator
//!
//! Simulates an account period by period: interest accrues every return
//! period, is taxed and capitalised on the compounding schedule, and
//! contributions and withdrawals land on their own schedules.

use crate::{ensure_finite, MathError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upper bound on simulated periods (e.g. daily returns for ~2700 years)
pub const MAX_PERIODS: usize = 1_000_000;

/// Inputs for [`compound_growth`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundGrowthInput {
    /// Starting balance
    pub principal: f64,
    /// Nominal annual rate of return, in percent
    pub rate_percent: f64,
    /// Return periods per year (12 = monthly). Zero is treated as 1.
    pub frequency: u32,
    /// Duration in years; fractional years are allowed
    pub years: f64,
    /// Amount added on each contribution date
    pub contribution: f64,
    /// Contributions per year. Zero is treated as 1.
    pub contribution_frequency: u32,
    /// Amount taken out on each withdrawal date
    pub withdrawal: f64,
    /// Withdrawals per year. Zero is treated as 1.
    pub withdrawal_frequency: u32,
    /// Tax charged on positive interest when it is capitalised, in percent
    pub tax_rate_percent: f64,
    /// Capitalisations per year; `None` means the same as `frequency`
    pub compounding_frequency: Option<u32>,
}

impl CompoundGrowthInput {
    /// Growth of a lump sum with no cash flows or tax
    pub fn new(principal: f64, rate_percent: f64, frequency: u32, years: f64) -> Self {
        Self {
            principal,
            rate_percent,
            frequency,
            years,
            contribution: 0.0,
            contribution_frequency: frequency,
            withdrawal: 0.0,
            withdrawal_frequency: frequency,
            tax_rate_percent: 0.0,
            compounding_frequency: None,
        }
    }

    /// Add a periodic contribution
    pub fn with_contributions(mut self, amount: f64, per_year: u32) -> Self {
        self.contribution = amount;
        self.contribution_frequency = per_year;
        self
    }

    /// Add a periodic withdrawal
    pub fn with_withdrawals(mut self, amount: f64, per_year: u32) -> Self {
        self.withdrawal = amount;
        self.withdrawal_frequency = per_year;
        self
    }

    /// Tax interest at `percent` when it is capitalised
    pub fn with_tax_rate(mut self, percent: f64) -> Self {
        self.tax_rate_percent = percent;
        self
    }

    /// Capitalise interest `per_year` times instead of every return period
    pub fn with_compounding_frequency(mut self, per_year: u32) -> Self {
        self.compounding_frequency = Some(per_year);
        self
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("Principal", self.principal),
            ("Rate", self.rate_percent),
            ("Years", self.years),
            ("Contribution", self.contribution),
            ("Withdrawal", self.withdrawal),
            ("Tax rate", self.tax_rate_percent),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(MathError::InvalidInput(format!(
                    "{} must be a finite number",
                    name
                )));
            }
        }

        if self.principal < 0.0 {
            return Err(MathError::InvalidInput(
                "Principal cannot be negative".to_string(),
            ));
        }
        if self.contribution < 0.0 || self.withdrawal < 0.0 {
            return Err(MathError::InvalidInput(
                "Contribution and withdrawal amounts cannot be negative".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.tax_rate_percent) {
            return Err(MathError::InvalidInput(
                "Tax rate must be between 0 and 100".to_string(),
            ));
        }
        if self.rate_percent <= -100.0 {
            return Err(MathError::InvalidInput(
                "Rate must be greater than -100%".to_string(),
            ));
        }

        Ok(())
    }
}

/// Balance at the end of a year (or at the final, possibly partial, period)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub year: f64,
    pub balance: f64,
}

/// One simulated period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodBreakdown {
    /// 1-based period index
    pub period: usize,
    /// Net interest capitalised in this period (zero between capitalisations)
    pub earnings: f64,
    /// Balance after interest and cash flows
    pub balance: f64,
}

/// Result of [`compound_growth`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundGrowth {
    pub end_balance: f64,
    /// Interest earned after tax
    pub total_earnings: f64,
    pub growth_series: Vec<GrowthPoint>,
    pub breakdown: Vec<PeriodBreakdown>,
    pub total_contributions: f64,
    pub total_withdrawals: f64,
    pub total_taxes_paid: f64,
    /// Rule-of-72 estimate; `None` when the effective rate is not positive
    pub time_to_double_months: Option<f64>,
    pub effective_annual_rate_percent: f64,
}

/// Events falling in return period `period` (1-based) for a schedule that
/// runs `per_year` times a year over `periods_per_year` return periods
///
/// Counts how many schedule dates the period crosses, so schedules that are
/// finer than the return period or do not divide it keep their yearly total.
fn events_in_period(period: usize, periods_per_year: u32, per_year: u32) -> u64 {
    let n = u64::from(periods_per_year.max(1));
    let f = u64::from(per_year.max(1));
    let p = period as u64;
    p * f / n - (p - 1) * f / n
}

/// Effective annual rate in percent for a nominal rate capitalised `per_year` times
///
/// # Examples
///
/// ```
/// use forex_math::compounding::effective_annual_rate;
///
/// let ear = effective_annual_rate(12.0, 4);
/// assert!((ear - 12.550881).abs() < 1e-6);
/// ```
pub fn effective_annual_rate(rate_percent: f64, per_year: u32) -> f64 {
    let per_year = f64::from(per_year.max(1));
    let rate_per_period = rate_percent / 100.0 / per_year;
    (per_year * rate_per_period.ln_1p()).exp_m1() * 100.0
}

/// Rule-of-72 doubling time in months for an annual rate in percent
pub fn rule_of_72_months(annual_rate_percent: f64) -> Option<f64> {
    if annual_rate_percent > 0.0 && annual_rate_percent.is_finite() {
        Some(72.0 / annual_rate_percent * 12.0)
    } else {
        None
    }
}

/// Simulate compound growth
///
/// # Examples
///
/// ```
/// use forex_math::compounding::{compound_growth, CompoundGrowthInput};
///
/// let input = CompoundGrowthInput::new(1_000.0, 10.0, 1, 2.0).with_contributions(100.0, 1);
/// let result = compound_growth(&input).unwrap();
///
/// assert_eq!(result.total_contributions, 200.0);
/// assert!((result.end_balance - 1_420.0).abs() < 1e-9);
/// ```
pub fn compound_growth(input: &CompoundGrowthInput) -> Result<CompoundGrowth> {
    input.validate()?;

    let n = input.frequency.max(1);
    // Interest cannot be capitalised more often than it accrues
    let c = input.compounding_frequency.unwrap_or(n).clamp(1, n);

    let total_periods = (n as f64 * input.years.max(0.0)).floor() as usize;
    if total_periods > MAX_PERIODS {
        return Err(MathError::InvalidInput(format!(
            "Too many periods to simulate: {} (maximum {})",
            total_periods, MAX_PERIODS
        )));
    }

    let rate_per_period = input.rate_percent / 100.0 / n as f64;
    let tax_rate = input.tax_rate_percent / 100.0;

    debug!(
        total_periods,
        periods_per_year = n,
        capitalisations_per_year = c,
        contribution_frequency = input.contribution_frequency,
        withdrawal_frequency = input.withdrawal_frequency,
        "Simulating compound growth"
    );

    let mut balance = input.principal;
    let mut pending_interest = 0.0;
    let mut total_earnings = 0.0;
    let mut total_contributions = 0.0;
    let mut total_withdrawals = 0.0;
    let mut total_taxes_paid = 0.0;
    let mut breakdown = Vec::with_capacity(total_periods);
    let mut growth_series = Vec::with_capacity(total_periods / n as usize + 1);

    for period in 1..=total_periods {
        pending_interest += balance * rate_per_period;

        let mut earnings = 0.0;
        if events_in_period(period, n, c) > 0 || period == total_periods {
            let tax = if pending_interest > 0.0 {
                pending_interest * tax_rate
            } else {
                0.0
            };
            earnings = pending_interest - tax;
            balance += earnings;
            total_earnings += earnings;
            total_taxes_paid += tax;
            pending_interest = 0.0;
        }

        if input.contribution > 0.0 {
            let count = events_in_period(period, n, input.contribution_frequency);
            let added = input.contribution * count as f64;
            balance += added;
            total_contributions += added;
        }

        if input.withdrawal > 0.0 {
            let count = events_in_period(period, n, input.withdrawal_frequency);
            let taken = (input.withdrawal * count as f64).min(balance.max(0.0));
            balance -= taken;
            total_withdrawals += taken;
        }

        // Losses can push the balance below zero only through a negative rate
        balance = balance.max(0.0);

        breakdown.push(PeriodBreakdown {
            period,
            earnings,
            balance,
        });

        if period % n as usize == 0 || period == total_periods {
            growth_series.push(GrowthPoint {
                year: period as f64 / n as f64,
                balance,
            });
        }
    }

    let effective_annual_rate_percent = effective_annual_rate(input.rate_percent, c);

    Ok(CompoundGrowth {
        end_balance: ensure_finite(balance, "End balance")?,
        total_earnings,
        growth_series,
        breakdown,
        total_contributions,
        total_withdrawals,
        total_taxes_paid,
        time_to_double_months: rule_of_72_months(effective_annual_rate_percent),
        effective_annual_rate_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_matches_closed_form() {
        let input = CompoundGrowthInput::new(1_000.0, 5.0, 12, 10.0);
        let result = compound_growth(&input).unwrap();

        let expected = 1_000.0 * (1.0 + 0.05 / 12.0f64).powi(120);
        assert_relative_eq!(result.end_balance, expected, max_relative = 1e-10);
        assert_relative_eq!(result.total_earnings, expected - 1_000.0, max_relative = 1e-9);
        assert_eq!(result.breakdown.len(), 120);
        assert_eq!(result.growth_series.len(), 10);
        assert_eq!(result.growth_series[9].year, 10.0);
    }

    #[test]
    fn test_zero_frequency_floors_to_one() {
        let input = CompoundGrowthInput::new(100.0, 10.0, 0, 2.0);
        let result = compound_growth(&input).unwrap();

        assert_eq!(result.breakdown.len(), 2);
        assert_relative_eq!(result.end_balance, 121.0, epsilon = 1e-9);
    }

    #[test]
    fn test_partial_final_year_recorded() {
        let input = CompoundGrowthInput::new(100.0, 12.0, 12, 1.5);
        let result = compound_growth(&input).unwrap();

        assert_eq!(result.breakdown.len(), 18);
        assert_eq!(result.growth_series.len(), 2);
        assert_eq!(result.growth_series[1].year, 1.5);
        assert_eq!(result.growth_series[1].balance, result.end_balance);
    }

    #[test]
    fn test_contributions_and_tax() {
        let input = CompoundGrowthInput::new(1_000.0, 10.0, 12, 1.0)
            .with_contributions(100.0, 12)
            .with_tax_rate(20.0);
        let result = compound_growth(&input).unwrap();

        assert_eq!(result.total_contributions, 1_200.0);
        assert!(result.total_taxes_paid > 0.0);
        assert_relative_eq!(
            result.total_taxes_paid,
            result.total_earnings / 4.0,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            result.end_balance,
            1_000.0 + 1_200.0 + result.total_earnings,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_withdrawals_clamp_at_zero() {
        let input = CompoundGrowthInput::new(1_000.0, 0.0, 12, 2.0).with_withdrawals(300.0, 4);
        let result = compound_growth(&input).unwrap();

        assert_eq!(result.end_balance, 0.0);
        assert_eq!(result.total_withdrawals, 1_000.0);
        assert!(result.breakdown.iter().all(|p| p.balance >= 0.0));
    }

    #[test]
    fn test_quarterly_compounding_of_monthly_returns() {
        let input =
            CompoundGrowthInput::new(1_000.0, 12.0, 12, 1.0).with_compounding_frequency(4);
        let result = compound_growth(&input).unwrap();

        // Simple interest within each quarter, capitalised four times
        let expected = 1_000.0 * 1.03f64.powi(4);
        assert_relative_eq!(result.end_balance, expected, max_relative = 1e-12);
        assert_eq!(result.breakdown[0].earnings, 0.0);
        assert!(result.breakdown[2].earnings > 0.0);
        assert_relative_eq!(result.effective_annual_rate_percent, 12.550881, epsilon = 1e-6);
    }

    #[test]
    fn test_weekly_contributions_on_monthly_returns() {
        let input = CompoundGrowthInput::new(0.0, 0.0, 12, 1.0).with_contributions(100.0, 52);
        let result = compound_growth(&input).unwrap();

        assert_eq!(result.total_contributions, 5_200.0);
        assert_eq!(result.end_balance, 5_200.0);
        // 52 weeks over 12 months land as four or five per month
        assert!(result.breakdown.windows(2).all(|w| {
            let added = w[1].balance - w[0].balance;
            added == 400.0 || added == 500.0
        }));
    }

    #[test]
    fn test_contributions_that_do_not_divide_the_year() {
        let input = CompoundGrowthInput::new(0.0, 0.0, 12, 2.0).with_contributions(100.0, 5);
        let result = compound_growth(&input).unwrap();
        assert_eq!(result.total_contributions, 1_000.0);

        let input = CompoundGrowthInput::new(5_000.0, 0.0, 12, 1.0).with_withdrawals(10.0, 365);
        let result = compound_growth(&input).unwrap();
        assert_eq!(result.total_withdrawals, 3_650.0);
        assert_eq!(result.end_balance, 1_350.0);
    }

    #[test]
    fn test_compounding_faster_than_returns_is_capped() {
        let input =
            CompoundGrowthInput::new(1_000.0, 12.0, 1, 1.0).with_compounding_frequency(12);
        let result = compound_growth(&input).unwrap();

        assert_relative_eq!(result.end_balance, 1_120.0, epsilon = 1e-9);
        assert_relative_eq!(result.effective_annual_rate_percent, 12.0, epsilon = 1e-9);
        assert_relative_eq!(result.time_to_double_months.unwrap(), 72.0, epsilon = 1e-9);
    }

    #[test]
    fn test_effective_rate_for_huge_frequencies() {
        let continuous = (0.05f64.exp() - 1.0) * 100.0;
        assert_relative_eq!(
            effective_annual_rate(5.0, 3_000_000_000),
            continuous,
            max_relative = 1e-6
        );
        assert_relative_eq!(effective_annual_rate(5.0, u32::MAX), continuous, max_relative = 1e-6);
    }

    #[test]
    fn test_events_in_period_spreads_schedule() {
        let counts: Vec<u64> = (1..=12).map(|p| events_in_period(p, 12, 5)).collect();
        assert_eq!(counts.iter().sum::<u64>(), 5);
        assert!(counts.iter().all(|&c| c <= 1));
        assert_eq!((1..=12).map(|p| events_in_period(p, 12, 12)).sum::<u64>(), 12);
        assert_eq!(events_in_period(1, 1, 0), 1);
    }

    #[test]
    fn test_effective_rate_and_doubling_time() {
        let result = compound_growth(&CompoundGrowthInput::new(1_000.0, 12.0, 12, 1.0)).unwrap();
        let ear = (1.01f64.powi(12) - 1.0) * 100.0;

        assert_relative_eq!(result.effective_annual_rate_percent, ear, epsilon = 1e-9);
        assert_relative_eq!(
            result.time_to_double_months.unwrap(),
            72.0 / ear * 12.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_zero_rate_never_doubles() {
        let result = compound_growth(&CompoundGrowthInput::new(500.0, 0.0, 1, 3.0)).unwrap();
        assert_eq!(result.end_balance, 500.0);
        assert_eq!(result.time_to_double_months, None);
    }

    #[test]
    fn test_zero_years_returns_principal() {
        let result = compound_growth(&CompoundGrowthInput::new(500.0, 8.0, 12, 0.0)).unwrap();
        assert_eq!(result.end_balance, 500.0);
        assert!(result.breakdown.is_empty());
        assert!(result.growth_series.is_empty());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(compound_growth(&CompoundGrowthInput::new(-1.0, 5.0, 12, 1.0)).is_err());
        assert!(compound_growth(&CompoundGrowthInput::new(f64::NAN, 5.0, 12, 1.0)).is_err());
        assert!(
            compound_growth(&CompoundGrowthInput::new(1.0, 5.0, 12, 1.0).with_tax_rate(120.0))
                .is_err()
        );
        assert!(compound_growth(&CompoundGrowthInput::new(1.0, 5.0, 365, 10_000.0)).is_err());
    }
}

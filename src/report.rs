//! Plain-text rendering of calculator results

use forex_math::compounding::CompoundGrowth;
use forex_math::currency::{format_currency, format_price};
use forex_math::fibonacci::FibonacciLevels;
use forex_math::margin::Margin;
use forex_math::pivots::PivotPoints;
use forex_math::position::PositionSize;
use forex_math::profit_loss::ProfitLoss;
use forex_math::risk_reward::RiskReward;
use forex_math::CurrencyPair;
use serde::Serialize;
use std::fmt::Write;

/// What a report needs to know to format numbers
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub account_currency: String,
    pub pair: Option<CurrencyPair>,
}

impl ReportContext {
    pub fn new(account_currency: &str) -> Self {
        Self {
            account_currency: account_currency.to_string(),
            pair: None,
        }
    }

    pub fn with_pair(mut self, pair: CurrencyPair) -> Self {
        self.pair = Some(pair);
        self
    }

    fn money(&self, amount: f64) -> String {
        format_currency(amount, &self.account_currency)
    }

    fn price(&self, price: f64) -> String {
        match &self.pair {
            Some(pair) => format_price(price, pair),
            None => format!("{:.5}", price),
        }
    }
}

/// A result that can be rendered as a human-readable report
pub trait Report {
    fn render(&self, ctx: &ReportContext) -> String;
}

/// Pip distance plus the value of one pip, for the `pips` calculator
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipSummary {
    pub pips: f64,
    pub lots: f64,
    pub pip_value: f64,
    pub total_value: f64,
}

impl Report for PipSummary {
    fn render(&self, ctx: &ReportContext) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Pip difference: {:.1}", self.pips);
        let _ = writeln!(out, "Pip value ({} lots): {}", self.lots, ctx.money(self.pip_value));
        let _ = writeln!(out, "Total value: {}", ctx.money(self.total_value));
        out
    }
}

impl Report for CompoundGrowth {
    fn render(&self, ctx: &ReportContext) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "End balance: {}", ctx.money(self.end_balance));
        let _ = writeln!(out, "Total earnings: {}", ctx.money(self.total_earnings));
        let _ = writeln!(out, "Total contributions: {}", ctx.money(self.total_contributions));
        let _ = writeln!(out, "Total withdrawals: {}", ctx.money(self.total_withdrawals));
        let _ = writeln!(out, "Taxes paid: {}", ctx.money(self.total_taxes_paid));
        let _ = writeln!(
            out,
            "Effective annual rate: {:.2}%",
            self.effective_annual_rate_percent
        );
        match self.time_to_double_months {
            Some(months) => {
                let _ = writeln!(out, "Time to double: {:.1} months", months);
            }
            None => {
                let _ = writeln!(out, "Time to double: never");
            }
        }
        if !self.growth_series.is_empty() {
            let _ = writeln!(out, "Year  Balance");
            for point in &self.growth_series {
                let _ = writeln!(out, "{:<5} {}", format_year(point.year), ctx.money(point.balance));
            }
        }
        out
    }
}

fn format_year(year: f64) -> String {
    if year.fract() == 0.0 {
        format!("{}", year)
    } else {
        format!("{:.2}", year)
    }
}

impl Report for FibonacciLevels {
    fn render(&self, ctx: &ReportContext) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Retracements");
        for level in &self.retracements {
            let _ = writeln!(out, "  {:>6.1}%  {}", level.level, ctx.price(level.price));
        }
        let _ = writeln!(out, "Extensions");
        for level in &self.extensions {
            let _ = writeln!(out, "  {:>6.1}%  {}", level.level, ctx.price(level.price));
        }
        out
    }
}

impl Report for PivotPoints {
    fn render(&self, ctx: &ReportContext) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Method: {}", self.method);
        for (i, level) in self.resistance.iter().enumerate().rev() {
            let _ = writeln!(out, "R{}: {}", i + 1, ctx.price(*level));
        }
        let _ = writeln!(out, "PP: {}", ctx.price(self.pivot));
        for (i, level) in self.support.iter().enumerate() {
            let _ = writeln!(out, "S{}: {}", i + 1, ctx.price(*level));
        }
        out
    }
}

impl Report for PositionSize {
    fn render(&self, ctx: &ReportContext) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Risk amount: {}", ctx.money(self.risk_amount));
        let _ = writeln!(out, "Stop loss: {:.1} pips", self.stop_loss_pips);
        let _ = writeln!(out, "Units: {:.0}", self.units);
        let _ = writeln!(out, "Standard lots: {:.2}", self.standard_lots);
        let _ = writeln!(out, "Mini lots: {:.2}", self.mini_lots);
        let _ = writeln!(out, "Micro lots: {:.2}", self.micro_lots);
        let _ = writeln!(out, "Pip value: {}", ctx.money(self.pip_value));
        out
    }
}

impl Report for ProfitLoss {
    fn render(&self, ctx: &ReportContext) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Pips: {:+.1}", self.pips);
        let _ = writeln!(out, "Profit/Loss: {}", ctx.money(self.profit_loss));
        let _ = writeln!(out, "ROI: {:+.2}%", self.roi_percent);
        out
    }
}

impl Report for Margin {
    fn render(&self, ctx: &ReportContext) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Position value: {}", ctx.money(self.position_value));
        let _ = writeln!(out, "Required margin: {}", ctx.money(self.required_margin));
        let _ = writeln!(out, "Free margin: {}", ctx.money(self.free_margin));
        match self.margin_level_percent {
            Some(level) => {
                let _ = writeln!(out, "Margin level: {:.2}%", level);
            }
            None => {
                let _ = writeln!(out, "Margin level: n/a");
            }
        }
        out
    }
}

impl Report for RiskReward {
    fn render(&self, ctx: &ReportContext) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Stop loss: {} ({:.1} pips)",
            ctx.price(self.stop_loss_price),
            self.stop_loss_pips
        );
        let _ = writeln!(
            out,
            "Take profit: {} ({:.1} pips)",
            ctx.price(self.take_profit_price),
            self.take_profit_pips
        );
        let _ = writeln!(out, "Risk:reward: 1:{:.2}", self.risk_reward_ratio);
        let _ = writeln!(out, "Potential loss: {}", ctx.money(self.potential_loss));
        let _ = writeln!(out, "Potential profit: {}", ctx.money(self.potential_profit));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forex_math::fibonacci::{fibonacci_levels, Trend};
    use forex_math::pivots::{pivot_points, PivotInput, PivotMethod};

    fn eurusd_ctx() -> ReportContext {
        ReportContext::new("USD").with_pair("EUR/USD".parse().unwrap())
    }

    #[test]
    fn test_profit_loss_report() {
        let result = ProfitLoss {
            pips: 50.0,
            profit_loss: 500.0,
            roi_percent: 0.4545,
        };
        let text = result.render(&eurusd_ctx());

        assert!(text.contains("Pips: +50.0"));
        assert!(text.contains("Profit/Loss: $500.00"));
        assert!(text.contains("ROI: +0.45%"));
    }

    #[test]
    fn test_pivot_report_orders_levels() {
        let points =
            pivot_points(&PivotInput::new(1.2, 1.19, 1.195), PivotMethod::Standard).unwrap();
        let text = points.render(&eurusd_ctx());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Method: standard");
        assert!(lines[1].starts_with("R3:"));
        assert_eq!(lines[3], "R1: 1.20000");
        assert_eq!(lines[4], "PP: 1.19500");
        assert!(lines[7].starts_with("S3:"));
    }

    #[test]
    fn test_fibonacci_report_without_pair() {
        let text = fibonacci_levels(100.0, 50.0, Trend::Uptrend).render(&ReportContext::new("USD"));
        assert!(text.contains("  50.0%  75.00000"));
        assert!(text.contains("Extensions"));
    }

    #[test]
    fn test_margin_report_empty_position() {
        let result = Margin {
            position_value: 0.0,
            required_margin: 0.0,
            free_margin: 1_000.0,
            margin_level_percent: None,
        };
        let text = result.render(&ReportContext::new("EUR"));
        assert!(text.contains("Free margin: €1,000.00"));
        assert!(text.contains("Margin level: n/a"));
    }

    #[test]
    fn test_format_year() {
        assert_eq!(format_year(3.0), "3");
        assert_eq!(format_year(1.5), "1.50");
    }
}

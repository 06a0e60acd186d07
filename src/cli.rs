//! Command-line front end
//!
//! Argument definitions and dispatch for the `pipwise` binary. Results are
//! written to any [`Write`] so the same path serves stdout and tests.

use crate::report::{PipSummary, Report, ReportContext};
use crate::{Calculator, CalculatorSettings, CurrencyPair, Direction, RateTable};
use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use forex_math::compounding::{compound_growth, CompoundGrowthInput};
use forex_math::fibonacci::{fibonacci_levels, Trend};
use forex_math::input::parse_lenient;
use forex_math::margin::{margin, MarginInput};
use forex_math::pips::{pip_difference, pip_value, LotSize};
use forex_math::pivots::{pivot_points, PivotInput, PivotMethod};
use forex_math::position::{position_size, PositionSizeInput, RiskInput, StopLossInput};
use forex_math::profit_loss::{profit_loss, ProfitLossInput};
use forex_math::risk_reward::{risk_reward, RiskRewardInput, TakeProfitInput};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Forex trading calculators
#[derive(Parser, Debug)]
#[command(name = "pipwise")]
#[command(about = "Forex calculators: compounding, Fibonacci, pips, pivots, sizing, P/L, margin")]
pub struct Cli {
    /// Settings file with default account currency, pair, balance and leverage
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the available calculators
    List,
    /// Compound growth with contributions, withdrawals and tax
    Compound(CompoundArgs),
    /// Fibonacci retracement and extension levels
    Fibonacci(FibonacciArgs),
    /// Pip difference between two prices and pip value
    Pips(PipsArgs),
    /// Pivot points for the next period
    Pivots(PivotArgs),
    /// Position size from account risk
    Position(PositionArgs),
    /// Profit/loss of a closed trade
    Profit(ProfitArgs),
    /// Required margin for a position
    Margin(MarginArgs),
    /// Stop-loss and take-profit levels
    Stops(StopsArgs),
}

/// Numbers are read leniently, like a form field: "1,000" and "2%" both work
fn number(text: &str) -> Result<f64, String> {
    Ok(parse_lenient(text))
}

#[derive(Args, Debug)]
pub struct CompoundArgs {
    #[arg(long, value_parser = number)]
    principal: f64,
    /// Annual rate in percent
    #[arg(long, value_parser = number)]
    rate: f64,
    /// Return periods per year
    #[arg(long, default_value_t = 12)]
    frequency: u32,
    #[arg(long, value_parser = number)]
    years: f64,
    #[arg(long, value_parser = number, default_value = "0")]
    contribution: f64,
    #[arg(long)]
    contribution_frequency: Option<u32>,
    #[arg(long, value_parser = number, default_value = "0")]
    withdrawal: f64,
    #[arg(long)]
    withdrawal_frequency: Option<u32>,
    /// Tax on interest in percent
    #[arg(long, value_parser = number, default_value = "0")]
    tax_rate: f64,
    /// Capitalisations per year (defaults to the return frequency)
    #[arg(long)]
    compounding_frequency: Option<u32>,
    /// Include the per-period breakdown in text output
    #[arg(long)]
    breakdown: bool,
}

#[derive(Args, Debug)]
pub struct FibonacciArgs {
    #[arg(long, value_parser = number)]
    high: f64,
    #[arg(long, value_parser = number)]
    low: f64,
    /// up or down
    #[arg(long, default_value = "up")]
    trend: Trend,
    #[arg(long)]
    pair: Option<CurrencyPair>,
}

#[derive(Args, Debug)]
pub struct PipsArgs {
    #[arg(long, value_parser = number)]
    price_a: f64,
    #[arg(long, value_parser = number)]
    price_b: f64,
    #[arg(long)]
    pair: Option<CurrencyPair>,
    #[arg(long, value_parser = number, default_value = "1")]
    lots: f64,
    #[arg(long)]
    account_currency: Option<String>,
    /// Quote-to-account exchange rate
    #[arg(long, value_parser = number)]
    rate: Option<f64>,
}

#[derive(Args, Debug)]
pub struct PivotArgs {
    #[arg(long, value_parser = number)]
    high: f64,
    #[arg(long, value_parser = number)]
    low: f64,
    #[arg(long, value_parser = number)]
    close: f64,
    /// Required by the DeMark method
    #[arg(long, value_parser = number)]
    open: Option<f64>,
    /// standard, woodie, camarilla or demark
    #[arg(long, default_value = "standard")]
    method: PivotMethod,
    #[arg(long)]
    pair: Option<CurrencyPair>,
}

#[derive(Args, Debug)]
pub struct PositionArgs {
    #[arg(long, value_parser = number)]
    balance: Option<f64>,
    /// Risk as a percentage of balance
    #[arg(long, value_parser = number, conflicts_with = "risk_amount")]
    risk_percent: Option<f64>,
    /// Risk as a fixed amount
    #[arg(long, value_parser = number)]
    risk_amount: Option<f64>,
    /// Stop distance in pips
    #[arg(long, value_parser = number, conflicts_with = "stop_price")]
    stop_pips: Option<f64>,
    /// Stop price
    #[arg(long, value_parser = number)]
    stop_price: Option<f64>,
    #[arg(long, value_parser = number)]
    entry: f64,
    #[arg(long)]
    pair: Option<CurrencyPair>,
    #[arg(long)]
    account_currency: Option<String>,
    #[arg(long, value_parser = number)]
    rate: Option<f64>,
}

#[derive(Args, Debug)]
pub struct ProfitArgs {
    #[arg(long, value_parser = number)]
    entry: f64,
    #[arg(long, value_parser = number)]
    exit: f64,
    #[arg(long, value_parser = number, default_value = "1")]
    lots: f64,
    #[arg(long, default_value = "long")]
    direction: Direction,
    #[arg(long)]
    pair: Option<CurrencyPair>,
    #[arg(long)]
    account_currency: Option<String>,
    #[arg(long, value_parser = number)]
    rate: Option<f64>,
}

#[derive(Args, Debug)]
pub struct MarginArgs {
    /// Position size in standard lots
    #[arg(long, value_parser = number, default_value = "1")]
    lots: f64,
    #[arg(long, value_parser = number)]
    leverage: Option<f64>,
    /// Base-to-account price; defaults to 1 when base is the account currency
    #[arg(long, value_parser = number)]
    rate: Option<f64>,
    #[arg(long, value_parser = number)]
    balance: Option<f64>,
    #[arg(long)]
    pair: Option<CurrencyPair>,
    #[arg(long)]
    account_currency: Option<String>,
}

#[derive(Args, Debug)]
pub struct StopsArgs {
    #[arg(long, value_parser = number)]
    entry: f64,
    #[arg(long, default_value = "long")]
    direction: Direction,
    #[arg(long, value_parser = number)]
    stop_pips: f64,
    /// Target distance in pips
    #[arg(long, value_parser = number, conflicts_with = "risk_reward")]
    take_profit_pips: Option<f64>,
    /// Target as a multiple of the stop distance
    #[arg(long, value_parser = number, default_value = "2")]
    risk_reward: f64,
    #[arg(long, value_parser = number, default_value = "1")]
    lots: f64,
    #[arg(long)]
    pair: Option<CurrencyPair>,
    #[arg(long)]
    account_currency: Option<String>,
    #[arg(long, value_parser = number)]
    rate: Option<f64>,
}

/// Load settings, run one command and write its result to `out`
///
/// Calculator errors come back as [`MathError`](crate::MathError) inside the
/// `anyhow::Error`, so the binary exits non-zero on invalid input.
pub fn run<W: Write>(cli: Cli, out: &mut W) -> anyhow::Result<()> {
    let settings = match &cli.config {
        Some(path) => CalculatorSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => CalculatorSettings::default(),
    };
    debug!(?settings, "Using settings");

    let mut rates = settings.rate_table()?;
    let output = Output { json: cli.json };
    dispatch(cli.command, &settings, &mut rates, &output, out)
}

struct Output {
    json: bool,
}

impl Output {
    fn emit<T, W>(&self, out: &mut W, result: &T, ctx: &ReportContext) -> anyhow::Result<()>
    where
        T: Serialize + Report,
        W: Write,
    {
        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(result)?)?;
        } else {
            write!(out, "{}", result.render(ctx))?;
        }
        Ok(())
    }
}

/// An explicit rate wins; otherwise ask the configured rate table
fn resolve_rate(
    rates: &mut RateTable,
    from: &str,
    to: &str,
    supplied: Option<f64>,
) -> Option<f64> {
    supplied.or_else(|| rates.get(from, to))
}

fn pair_or_default(
    pair: Option<CurrencyPair>,
    settings: &CalculatorSettings,
) -> anyhow::Result<CurrencyPair> {
    match pair {
        Some(pair) => Ok(pair),
        None => Ok(settings.pair()?),
    }
}

fn dispatch<W: Write>(
    command: Command,
    settings: &CalculatorSettings,
    rates: &mut RateTable,
    output: &Output,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Command::List => {
            for calculator in Calculator::ALL {
                writeln!(
                    out,
                    "{:<10} {:<24} {}",
                    calculator.slug(),
                    calculator.name(),
                    calculator.description()
                )?;
            }
        }
        Command::Compound(args) => {
            let mut input =
                CompoundGrowthInput::new(args.principal, args.rate, args.frequency, args.years)
                .with_contributions(
                    args.contribution,
                    args.contribution_frequency.unwrap_or(args.frequency),
                )
                .with_withdrawals(
                    args.withdrawal,
                    args.withdrawal_frequency.unwrap_or(args.frequency),
                )
                .with_tax_rate(args.tax_rate);
            if let Some(per_year) = args.compounding_frequency {
                input = input.with_compounding_frequency(per_year);
            }

            let result = compound_growth(&input)?;
            let ctx = ReportContext::new(&settings.account_currency);
            output.emit(out, &result, &ctx)?;

            if args.breakdown && !output.json {
                writeln!(out, "Period  Earnings  Balance")?;
                for row in &result.breakdown {
                    writeln!(out, "{:<7} {:<9.2} {:.2}", row.period, row.earnings, row.balance)?;
                }
            }
        }
        Command::Fibonacci(args) => {
            let result = fibonacci_levels(args.high, args.low, args.trend);
            let mut ctx = ReportContext::new(&settings.account_currency);
            if let Some(pair) = args.pair {
                ctx = ctx.with_pair(pair);
            }
            output.emit(out, &result, &ctx)?;
        }
        Command::Pips(args) => {
            let pair = pair_or_default(args.pair, settings)?;
            let account = args
                .account_currency
                .unwrap_or_else(|| settings.account_currency.clone());

            let rate = resolve_rate(rates, &pair.quote, &account, args.rate);

            let pips = pip_difference(args.price_a, args.price_b, &pair);
            let value = pip_value(&pair, args.lots, &account, rate)?;
            let summary = PipSummary {
                pips,
                lots: args.lots,
                pip_value: value,
                total_value: value * pips,
            };
            output.emit(out, &summary, &ReportContext::new(&account).with_pair(pair))?;
        }
        Command::Pivots(args) => {
            let mut input = PivotInput::new(args.high, args.low, args.close);
            if let Some(open) = args.open {
                input = input.with_open(open);
            }
            let result = pivot_points(&input, args.method)?;
            let pair = pair_or_default(args.pair, settings)?;
            output.emit(out, &result, &ReportContext::new(&settings.account_currency).with_pair(pair))?;
        }
        Command::Position(args) => {
            let pair = pair_or_default(args.pair, settings)?;
            let account = args
                .account_currency
                .unwrap_or_else(|| settings.account_currency.clone());
            let risk = match (args.risk_percent, args.risk_amount) {
                (_, Some(amount)) => RiskInput::Amount(amount),
                (Some(percent), None) => RiskInput::Percent(percent),
                (None, None) => RiskInput::Percent(settings.risk_percent),
            };
            let stop_loss = match (args.stop_pips, args.stop_price) {
                (Some(pips), _) => StopLossInput::Pips(pips),
                (None, Some(price)) => StopLossInput::Price(price),
                (None, None) => bail!("either --stop-pips or --stop-price is required"),
            };

            let input = PositionSizeInput {
                account_balance: args.balance.unwrap_or(settings.account_balance),
                risk,
                stop_loss,
                entry_price: args.entry,
                pair: pair.clone(),
                account_currency: account.clone(),
                exchange_rate: resolve_rate(rates, &pair.quote, &account, args.rate),
            };
            let result = position_size(&input)?;
            info!(units = result.units, "Position sized");
            output.emit(out, &result, &ReportContext::new(&account).with_pair(pair))?;
        }
        Command::Profit(args) => {
            let pair = pair_or_default(args.pair, settings)?;
            let account = args
                .account_currency
                .unwrap_or_else(|| settings.account_currency.clone());
            let input = ProfitLossInput {
                entry_price: args.entry,
                exit_price: args.exit,
                lots: args.lots,
                pair: pair.clone(),
                account_currency: account.clone(),
                direction: args.direction,
                exchange_rate: resolve_rate(rates, &pair.quote, &account, args.rate),
            };
            let result = profit_loss(&input)?;
            output.emit(out, &result, &ReportContext::new(&account).with_pair(pair))?;
        }
        Command::Margin(args) => {
            let pair = pair_or_default(args.pair, settings)?;
            let account = args
                .account_currency
                .unwrap_or_else(|| settings.account_currency.clone());
            let exchange_rate = match resolve_rate(rates, &pair.base, &account, args.rate) {
                Some(rate) => rate,
                None => bail!("--rate is required to price {} in {}", pair.base, account),
            };

            let input = MarginInput {
                pair: pair.clone(),
                units: LotSize::Standard.units_from_lots(args.lots),
                leverage: args.leverage.unwrap_or(settings.leverage),
                exchange_rate,
                account_balance: args.balance.unwrap_or(settings.account_balance),
            };
            let result = margin(&input)?;
            output.emit(out, &result, &ReportContext::new(&account).with_pair(pair))?;
        }
        Command::Stops(args) => {
            let pair = pair_or_default(args.pair, settings)?;
            let account = args
                .account_currency
                .unwrap_or_else(|| settings.account_currency.clone());
            let take_profit = match args.take_profit_pips {
                Some(pips) => TakeProfitInput::Pips(pips),
                None => TakeProfitInput::RiskReward(args.risk_reward),
            };
            let input = RiskRewardInput {
                entry_price: args.entry,
                direction: args.direction,
                pair: pair.clone(),
                lots: args.lots,
                stop_loss_pips: args.stop_pips,
                take_profit,
                account_currency: account.clone(),
                exchange_rate: resolve_rate(rates, &pair.quote, &account, args.rate),
            };
            let result = risk_reward(&input)?;
            output.emit(out, &result, &ReportContext::new(&account).with_pair(pair))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MathError;
    use serde_json::Value;
    use tempfile::NamedTempFile;

    fn run_args(args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("pipwise").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        run(cli, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn invalid_input(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<MathError>(), Some(MathError::InvalidInput(_)))
    }

    #[test]
    fn test_list_prints_every_calculator() {
        let text = run_args(&["list"]).unwrap();
        assert_eq!(text.lines().count(), Calculator::ALL.len());
        assert!(text.lines().any(|line| line.starts_with("stops")));
    }

    #[test]
    fn test_json_flag_emits_result_struct() {
        let text =
            run_args(&["--json", "pips", "--price-a", "1.1050", "--price-b", "1.1000"]).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["pips"].as_f64(), Some(50.0));
        assert_eq!(value["pip_value"].as_f64(), Some(10.0));
        assert_eq!(value["total_value"].as_f64(), Some(500.0));
    }

    #[test]
    fn test_text_output_without_json_flag() {
        let text = run_args(&["profit", "--entry", "1.1000", "--exit", "1.1050"]).unwrap();
        assert!(text.contains("Pips: +50.0"));
        assert!(serde_json::from_str::<Value>(&text).is_err());
    }

    #[test]
    fn test_invalid_input_is_an_error() {
        let err = run_args(&["margin", "--leverage", "0", "--rate", "1.1"]).unwrap_err();
        assert!(invalid_input(&err));

        let err = run_args(&["position", "--entry", "1.1", "--stop-pips", "0"]).unwrap_err();
        assert!(invalid_input(&err));

        let err = run_args(&[
            "pivots", "--high", "1.2", "--low", "1.1", "--close", "1.15", "--method", "demark",
        ])
        .unwrap_err();
        assert!(invalid_input(&err));
    }

    #[test]
    fn test_missing_rate_is_an_error() {
        let err = run_args(&[
            "pips", "--pair", "USD/JPY", "--price-a", "150.5", "--price-b", "150",
        ])
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MathError>(),
            Some(MathError::MissingExchangeRate { .. })
        ));
    }

    #[test]
    fn test_configured_rates_fill_in_missing_rate() {
        let mut config = NamedTempFile::new().unwrap();
        write!(config, r#"{{"rates": {{"USD/JPY": 125.0}}, "rate_ttl_secs": 60}}"#).unwrap();
        let path = config.path().to_str().unwrap();

        let text = run_args(&[
            "--config", path, "--json", "pips", "--pair", "USD/JPY", "--price-a", "150.5",
            "--price-b", "150",
        ])
        .unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        // one pip of 100,000 USD/JPY is 1,000 yen, or $8 at 125 yen per dollar
        assert_eq!(value["pips"].as_f64(), Some(50.0));
        assert!((value["pip_value"].as_f64().unwrap() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let mut config = NamedTempFile::new().unwrap();
        write!(config, r#"{{"rate_ttl_secs": 0}}"#).unwrap();
        let path = config.path().to_str().unwrap();

        assert!(run_args(&["--config", path, "list"]).is_err());
    }
}

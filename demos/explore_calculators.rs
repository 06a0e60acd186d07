// Walks through every calculator in the suite with a sample trade
use forex_math::compounding::{compound_growth, CompoundGrowthInput};
use forex_math::fibonacci::{fibonacci_levels, Trend};
use forex_math::margin::{margin, MarginInput};
use forex_math::pips::{pip_difference, pip_value};
use forex_math::pivots::{pivot_points, PivotInput, PivotMethod};
use forex_math::position::{position_size, PositionSizeInput, RiskInput, StopLossInput};
use forex_math::profit_loss::{profit_loss, ProfitLossInput};
use forex_math::risk_reward::{risk_reward, RiskRewardInput, TakeProfitInput};
use pipwise::report::{PipSummary, Report, ReportContext};
use pipwise::{Calculator, CurrencyPair, Direction};

fn main() -> anyhow::Result<()> {
    println!("Exploring the Pipwise calculators\n");

    for calculator in Calculator::ALL {
        println!("- {}: {}", calculator.name(), calculator.description());
    }

    let pair: CurrencyPair = "EUR/USD".parse()?;
    let ctx = ReportContext::new("USD").with_pair(pair.clone());

    section(Calculator::Compounding);
    let growth = compound_growth(
        &CompoundGrowthInput::new(10_000.0, 8.0, 12, 5.0).with_contributions(250.0, 12),
    )?;
    print!("{}", growth.render(&ctx));

    section(Calculator::Fibonacci);
    print!("{}", fibonacci_levels(1.1200, 1.0800, Trend::Uptrend).render(&ctx));

    section(Calculator::PipDifference);
    let pips = pip_difference(1.1050, 1.1000, &pair);
    let value = pip_value(&pair, 1.0, "USD", None)?;
    let summary = PipSummary {
        pips,
        lots: 1.0,
        pip_value: value,
        total_value: pips * value,
    };
    print!("{}", summary.render(&ctx));

    section(Calculator::PivotPoints);
    let ohlc = PivotInput::new(1.1050, 1.0950, 1.1020).with_open(1.0980);
    for method in PivotMethod::ALL {
        print!("{}", pivot_points(&ohlc, method)?.render(&ctx));
    }

    section(Calculator::PositionSize);
    let size = position_size(&PositionSizeInput {
        account_balance: 10_000.0,
        risk: RiskInput::Percent(1.0),
        stop_loss: StopLossInput::Pips(30.0),
        entry_price: 1.1000,
        pair: pair.clone(),
        account_currency: "USD".to_string(),
        exchange_rate: None,
    })?;
    print!("{}", size.render(&ctx));

    section(Calculator::ProfitLoss);
    let pnl = profit_loss(&ProfitLossInput {
        entry_price: 1.1000,
        exit_price: 1.1050,
        lots: size.standard_lots,
        pair: pair.clone(),
        account_currency: "USD".to_string(),
        direction: Direction::Long,
        exchange_rate: None,
    })?;
    print!("{}", pnl.render(&ctx));

    section(Calculator::Margin);
    let required = margin(&MarginInput {
        pair: pair.clone(),
        units: size.units,
        leverage: 100.0,
        exchange_rate: 1.1000,
        account_balance: 10_000.0,
    })?;
    print!("{}", required.render(&ctx));

    section(Calculator::StopLossTakeProfit);
    let stops = risk_reward(&RiskRewardInput {
        entry_price: 1.1000,
        direction: Direction::Long,
        pair,
        lots: size.standard_lots,
        stop_loss_pips: 30.0,
        take_profit: TakeProfitInput::RiskReward(2.0),
        account_currency: "USD".to_string(),
        exchange_rate: None,
    })?;
    print!("{}", stops.render(&ctx));

    println!("\nDone exploring");
    Ok(())
}

fn section(calculator: Calculator) {
    println!("\n=== {} ===", calculator.name());
}

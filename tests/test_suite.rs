use pipwise::forex_math::margin::{margin, MarginInput};
use pipwise::forex_math::position::{position_size, PositionSizeInput, RiskInput, StopLossInput};
use pipwise::forex_math::risk_reward::{risk_reward, RiskRewardInput, TakeProfitInput};
use pipwise::report::{PipSummary, Report, ReportContext};
use pipwise::{CalculatorSettings, Calculator, CurrencyPair, Direction};
use pretty_assertions::assert_eq;

fn settings() -> CalculatorSettings {
    CalculatorSettings::from_json_str(
        r#"{"account_currency": "USD", "default_pair": "GBP/USD", "account_balance": 20000}"#,
    )
    .unwrap()
}

#[test]
fn test_settings_drive_position_report() {
    let settings = settings();
    let pair = settings.pair().unwrap();

    let size = position_size(&PositionSizeInput {
        account_balance: settings.account_balance,
        risk: RiskInput::Percent(settings.risk_percent),
        stop_loss: StopLossInput::Pips(40.0),
        entry_price: 1.2500,
        pair: pair.clone(),
        account_currency: settings.account_currency.clone(),
        exchange_rate: None,
    })
    .unwrap();

    let text = size.render(&ReportContext::new(&settings.account_currency).with_pair(pair));
    assert!(text.contains("Risk amount: $200.00"));
    assert!(text.contains("Units: 50000"));
    assert!(text.contains("Standard lots: 0.50"));
    assert!(text.contains("Pip value: $5.00"));
}

#[test]
fn test_stops_report() {
    let pair: CurrencyPair = "USD/JPY".parse().unwrap();
    let result = risk_reward(&RiskRewardInput {
        entry_price: 150.0,
        direction: Direction::Short,
        pair: pair.clone(),
        lots: 1.0,
        stop_loss_pips: 50.0,
        take_profit: TakeProfitInput::Pips(100.0),
        account_currency: "JPY".to_string(),
        exchange_rate: None,
    })
    .unwrap();

    let text = result.render(&ReportContext::new("JPY").with_pair(pair));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Stop loss: 150.500 (50.0 pips)");
    assert_eq!(lines[1], "Take profit: 149.000 (100.0 pips)");
    assert_eq!(lines[2], "Risk:reward: 1:2.00");
    assert_eq!(lines[3], "Potential loss: ¥50,000");
}

#[test]
fn test_results_serialize_to_json() {
    let result = margin(&MarginInput {
        pair: "EUR/USD".parse().unwrap(),
        units: 10_000.0,
        leverage: 50.0,
        exchange_rate: 1.0,
        account_balance: 1_000.0,
    })
    .unwrap();

    let json = serde_json::to_value(result).unwrap();
    assert_eq!(json["required_margin"], 200.0);
    assert_eq!(json["margin_level_percent"], 500.0);

    let summary = PipSummary {
        pips: 12.5,
        lots: 1.0,
        pip_value: 10.0,
        total_value: 125.0,
    };
    assert_eq!(serde_json::to_value(summary).unwrap()["total_value"], 125.0);
}

#[test]
fn test_catalogue_matches_cli_slugs() {
    let slugs: Vec<&str> = Calculator::ALL.iter().map(|c| c.slug()).collect();
    assert_eq!(
        slugs,
        vec!["compound", "fibonacci", "pips", "pivots", "position", "profit", "margin", "stops"]
    );
}

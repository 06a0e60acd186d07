//! Calculator defaults
//!
//! Values a front end pre-fills into calculator forms. Loaded from a JSON
//! file; every field is optional and falls back to [`Default`].

use crate::currency::{normalize_code, CurrencyPair};
use crate::rates::{RateTable, MAX_TTL_SECS};
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Default inputs shared across calculators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorSettings {
    /// Currency balances and P/L are reported in
    pub account_currency: String,
    /// Pair selected when a calculator opens
    pub default_pair: String,
    /// Account balance used by position sizing and margin
    pub account_balance: f64,
    /// Percentage of balance risked per trade
    pub risk_percent: f64,
    /// Leverage used by the margin calculator (e.g. 100 for 1:100)
    pub leverage: f64,
    /// Seconds a cached exchange rate stays valid
    pub rate_ttl_secs: i64,
    /// Known exchange rates keyed by pair, e.g. `"USD/JPY": 150.0`
    pub rates: BTreeMap<String, f64>,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        Self {
            account_currency: "USD".to_string(),
            default_pair: "EUR/USD".to_string(),
            account_balance: 10_000.0,
            risk_percent: 1.0,
            leverage: 100.0,
            rate_ttl_secs: 300,
            rates: BTreeMap::new(),
        }
    }
}

impl CalculatorSettings {
    /// Parse settings from a JSON document and validate them
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| MathError::Config(format!("Invalid settings JSON: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading calculator settings");

        let contents = fs::read_to_string(path).map_err(|e| {
            MathError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    /// Serialise to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MathError::Config(format!("Failed to serialise settings: {}", e)))
    }

    /// Check that every field holds a usable value
    pub fn validate(&self) -> Result<()> {
        normalize_code(&self.account_currency)
            .map_err(|_| MathError::Config(format!(
                "Unknown account currency '{}'",
                self.account_currency
            )))?;
        self.pair()?;

        if !self.account_balance.is_finite() || self.account_balance < 0.0 {
            return Err(MathError::Config(
                "Account balance cannot be negative".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.risk_percent) {
            return Err(MathError::Config(
                "Risk percent must be between 0 and 100".to_string(),
            ));
        }
        if !self.leverage.is_finite() || self.leverage <= 0.0 {
            return Err(MathError::Config(
                "Leverage must be greater than zero".to_string(),
            ));
        }
        if !(1..=MAX_TTL_SECS).contains(&self.rate_ttl_secs) {
            return Err(MathError::Config(format!(
                "Rate TTL must be between 1 and {} seconds",
                MAX_TTL_SECS
            )));
        }
        self.rate_table()?;

        Ok(())
    }

    /// A rate table with the configured TTL, seeded with the configured rates
    pub fn rate_table(&self) -> Result<RateTable> {
        let mut table = RateTable::with_ttl_secs(self.rate_ttl_secs)
            .map_err(|e| MathError::Config(e.to_string()))?;
        for (pair, &rate) in &self.rates {
            let parsed: CurrencyPair = pair
                .parse()
                .map_err(|_| MathError::Config(format!("Unknown rate pair '{}'", pair)))?;
            table
                .insert(&parsed.base, &parsed.quote, rate)
                .map_err(|e| MathError::Config(format!("Rate for {}: {}", pair, e)))?;
        }
        Ok(table)
    }

    /// The default pair, parsed
    pub fn pair(&self) -> Result<CurrencyPair> {
        self.default_pair
            .parse()
            .map_err(|_| MathError::Config(format!("Unknown default pair '{}'", self.default_pair)))
    }
}

//! Currency and currency pair reference data
//!
//! Static tables of supported currencies and pairs, pip-size lookup and
//! display formatting shared by every calculator.

use crate::{round_to, MathError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A currency the calculators know how to display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

/// Supported account and quote currencies
pub const CURRENCIES: &[Currency] = &[
    Currency { code: "USD", name: "US Dollar", symbol: "$" },
    Currency { code: "EUR", name: "Euro", symbol: "€" },
    Currency { code: "GBP", name: "British Pound", symbol: "£" },
    Currency { code: "JPY", name: "Japanese Yen", symbol: "¥" },
    Currency { code: "AUD", name: "Australian Dollar", symbol: "A$" },
    Currency { code: "CAD", name: "Canadian Dollar", symbol: "C$" },
    Currency { code: "CHF", name: "Swiss Franc", symbol: "CHF" },
    Currency { code: "NZD", name: "New Zealand Dollar", symbol: "NZ$" },
    Currency { code: "CNY", name: "Chinese Yuan", symbol: "CN¥" },
    Currency { code: "HKD", name: "Hong Kong Dollar", symbol: "HK$" },
    Currency { code: "SGD", name: "Singapore Dollar", symbol: "S$" },
    Currency { code: "SEK", name: "Swedish Krona", symbol: "kr" },
    Currency { code: "NOK", name: "Norwegian Krone", symbol: "kr" },
    Currency { code: "MXN", name: "Mexican Peso", symbol: "MX$" },
    Currency { code: "ZAR", name: "South African Rand", symbol: "R" },
];

/// Pairs offered in pair pickers: majors first, then crosses
pub const PAIRS: &[(&str, &str)] = &[
    ("EUR", "USD"),
    ("GBP", "USD"),
    ("USD", "JPY"),
    ("USD", "CHF"),
    ("AUD", "USD"),
    ("USD", "CAD"),
    ("NZD", "USD"),
    ("EUR", "GBP"),
    ("EUR", "JPY"),
    ("EUR", "CHF"),
    ("EUR", "AUD"),
    ("EUR", "CAD"),
    ("GBP", "JPY"),
    ("GBP", "CHF"),
    ("AUD", "JPY"),
    ("AUD", "NZD"),
    ("CAD", "JPY"),
    ("CHF", "JPY"),
    ("NZD", "JPY"),
    ("USD", "SGD"),
    ("USD", "HKD"),
    ("USD", "MXN"),
    ("USD", "ZAR"),
];

/// Look up a currency by its ISO code, ignoring case
pub fn find_currency(code: &str) -> Option<&'static Currency> {
    CURRENCIES
        .iter()
        .find(|currency| currency.code.eq_ignore_ascii_case(code.trim()))
}

/// Normalise a currency code to upper case, requiring three ASCII letters
pub fn normalize_code(code: &str) -> Result<String> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(MathError::UnknownCurrency(code.to_string()));
    }
    Ok(code.to_ascii_uppercase())
}

/// A tradable pair, quoted as units of `quote` per one unit of `base`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: String,
    pub quote: String,
    pub pip_decimal_places: u32,
}

impl CurrencyPair {
    /// Create a pair from two currency codes
    pub fn new(base: &str, quote: &str) -> Result<Self> {
        let base = normalize_code(base)?;
        let quote = normalize_code(quote)?;
        if base == quote {
            return Err(MathError::InvalidInput(format!(
                "Pair legs must differ, got {}/{}",
                base, quote
            )));
        }

        let pip_decimal_places = if base == "JPY" || quote == "JPY" { 2 } else { 4 };

        Ok(Self {
            base,
            quote,
            pip_decimal_places,
        })
    }

    /// Size of one pip in quote currency (0.01 for JPY pairs, 0.0001 otherwise)
    pub fn pip_size(&self) -> f64 {
        match self.pip_decimal_places {
            2 => 0.01,
            4 => 0.0001,
            places => 10f64.powi(-(places as i32)),
        }
    }

    /// Whether either leg is the Japanese yen
    pub fn is_jpy(&self) -> bool {
        self.base == "JPY" || self.quote == "JPY"
    }

    /// Whether the pair appears in the built-in pair list
    pub fn is_listed(&self) -> bool {
        PAIRS
            .iter()
            .any(|&(base, quote)| base == self.base && quote == self.quote)
    }

    /// Decimal places used when displaying a price of this pair
    pub fn price_decimals(&self) -> u32 {
        self.pip_decimal_places + 1
    }

    /// Round a price to the pair's display precision
    pub fn round_price(&self, price: f64) -> f64 {
        round_to(price, self.price_decimals())
    }

    /// The pair in `BASE/QUOTE` form
    pub fn name(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for CurrencyPair {
    type Err = MathError;

    /// Accepts `EUR/USD`, `EURUSD`, `eur-usd` and `EUR_USD`
    fn from_str(s: &str) -> Result<Self> {
        let cleaned: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '/' | '-' | '_' | ' '))
            .collect();

        if cleaned.len() != 6 || !cleaned.is_ascii() {
            return Err(MathError::InvalidInput(format!(
                "Cannot parse currency pair '{}'",
                s
            )));
        }

        let (base, quote) = cleaned.split_at(3);
        CurrencyPair::new(base, quote)
    }
}

/// All pairs from [`PAIRS`]
pub fn all_pairs() -> Vec<CurrencyPair> {
    PAIRS
        .iter()
        .filter_map(|&(base, quote)| CurrencyPair::new(base, quote).ok())
        .collect()
}

/// Number of decimal places used for amounts in `code`
pub fn currency_decimals(code: &str) -> u32 {
    if code.eq_ignore_ascii_case("JPY") {
        0
    } else {
        2
    }
}

/// Format a monetary amount with the currency's symbol and thousands separators
///
/// Unknown codes are prefixed with the code itself, e.g. `PLN 1,000.00`.
pub fn format_currency(amount: f64, code: &str) -> String {
    let decimals = currency_decimals(code);
    let prefix = match find_currency(code) {
        Some(currency) if !currency.symbol.ends_with(char::is_alphabetic) => {
            currency.symbol.to_string()
        }
        Some(currency) => format!("{} ", currency.symbol),
        None => format!("{} ", code.trim().to_ascii_uppercase()),
    };

    let sign = if amount < 0.0 && round_to(amount.abs(), decimals) != 0.0 {
        "-"
    } else {
        ""
    };

    format!("{}{}{}", sign, prefix, group_thousands(amount.abs(), decimals))
}

/// Format a price at the pair's display precision
pub fn format_price(price: f64, pair: &CurrencyPair) -> String {
    format!("{:.*}", pair.price_decimals() as usize, price)
}

fn group_thousands(value: f64, decimals: u32) -> String {
    let formatted = format!("{:.*}", decimals as usize, value);
    let (integer, fraction) = match formatted.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{}.{}", grouped, fraction),
        None => grouped,
    }
}

//! Exchange-rate lookup
//!
//! Calculators never fetch rates themselves. They take an optional rate
//! from the caller and resolve it with [`conversion_rate`]. Callers that
//! want caching keep a [`RateTable`] and pass it around explicitly.

use crate::currency::normalize_code;
use crate::{MathError, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Resolve the multiplier that converts an amount in `from` into `to`
///
/// Identical currencies convert at exactly 1 regardless of `supplied`.
/// Otherwise the supplied rate is used as-is; there is no cross-rate or
/// inversion logic here.
pub fn conversion_rate(from: &str, to: &str, supplied: Option<f64>) -> Result<f64> {
    if from.trim().eq_ignore_ascii_case(to.trim()) {
        return Ok(1.0);
    }

    match supplied {
        Some(rate) if rate.is_finite() && rate > 0.0 => Ok(rate),
        Some(rate) => Err(MathError::InvalidInput(format!(
            "Exchange rate from {} to {} must be positive, got {}",
            from, to, rate
        ))),
        None => Err(MathError::MissingExchangeRate {
            from: from.to_string(),
            to: to.to_string(),
        }),
    }
}

/// Longest TTL a table accepts, one week
pub const MAX_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Something that can produce a live rate on a cache miss
pub trait RateSource {
    /// Units of `to` received for one unit of `from`
    fn fetch_rate(&self, from: &str, to: &str) -> Result<f64>;
}

#[derive(Debug, Clone, Copy)]
struct RateEntry {
    rate: f64,
    stored_at: DateTime<Utc>,
}

/// Exchange rates keyed by currency pair, each valid for a fixed TTL
#[derive(Debug, Clone)]
pub struct RateTable {
    entries: HashMap<(String, String), RateEntry>,
    ttl: Duration,
}

impl Default for RateTable {
    fn default() -> Self {
        Self::new(Duration::minutes(5))
    }
}

impl RateTable {
    /// Create an empty table whose entries expire after `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Create an empty table with a TTL given in seconds
    ///
    /// The TTL must lie in `1..=MAX_TTL_SECS`.
    pub fn with_ttl_secs(secs: i64) -> Result<Self> {
        if !(1..=MAX_TTL_SECS).contains(&secs) {
            return Err(MathError::InvalidInput(format!(
                "Rate TTL must be between 1 and {} seconds, got {}",
                MAX_TTL_SECS, secs
            )));
        }
        let ttl = Duration::try_seconds(secs).ok_or_else(|| {
            MathError::InvalidInput(format!("Rate TTL of {} seconds is out of range", secs))
        })?;
        Ok(Self::new(ttl))
    }

    /// Time-to-live applied to every entry
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store a rate observed now
    pub fn insert(&mut self, from: &str, to: &str, rate: f64) -> Result<()> {
        self.insert_at(from, to, rate, Utc::now())
    }

    /// Store a rate observed at `stored_at`
    pub fn insert_at(
        &mut self,
        from: &str,
        to: &str,
        rate: f64,
        stored_at: DateTime<Utc>,
    ) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(MathError::InvalidInput(format!(
                "Exchange rate must be positive, got {}",
                rate
            )));
        }

        let key = (normalize_code(from)?, normalize_code(to)?);
        debug!(from = %key.0, to = %key.1, rate, "Storing exchange rate");
        self.entries.insert(key, RateEntry { rate, stored_at });
        Ok(())
    }

    /// Look up a fresh rate, evicting it if it has expired
    pub fn get(&mut self, from: &str, to: &str) -> Option<f64> {
        self.get_at(from, to, Utc::now())
    }

    /// Look up a rate as of `now`
    ///
    /// Falls back to the inverse of a fresh reverse quote.
    pub fn get_at(&mut self, from: &str, to: &str, now: DateTime<Utc>) -> Option<f64> {
        let from = normalize_code(from).ok()?;
        let to = normalize_code(to).ok()?;
        if from == to {
            return Some(1.0);
        }

        if let Some(rate) = self.fresh(&from, &to, now) {
            debug!(%from, %to, "Rate table hit");
            return Some(rate);
        }

        if let Some(rate) = self.fresh(&to, &from, now) {
            debug!(%from, %to, "Rate table hit on inverse quote");
            return Some(1.0 / rate);
        }

        debug!(%from, %to, "Rate table miss");
        None
    }

    /// Look up a rate, asking `source` on a miss and caching what it returns
    pub fn get_or_fetch<S: RateSource + ?Sized>(
        &mut self,
        from: &str,
        to: &str,
        source: &S,
    ) -> Result<f64> {
        if let Some(rate) = self.get(from, to) {
            return Ok(rate);
        }

        let rate = source.fetch_rate(from, to)?;
        self.insert(from, to, rate)?;
        Ok(rate)
    }

    /// Drop every expired entry
    pub fn evict_expired(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.signed_duration_since(entry.stored_at) < ttl);
    }

    /// Number of stored entries, fresh or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn fresh(&mut self, from: &str, to: &str, now: DateTime<Utc>) -> Option<f64> {
        let key = (from.to_string(), to.to_string());
        let entry = *self.entries.get(&key)?;

        if now.signed_duration_since(entry.stored_at) < self.ttl {
            Some(entry.rate)
        } else {
            debug!(%from, %to, "Evicting expired exchange rate");
            self.entries.remove(&key);
            None
        }
    }
}

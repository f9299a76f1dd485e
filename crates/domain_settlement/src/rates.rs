//! Exchange rate providers
//!
//! The engine consumes rates, it never sources them: each payment freezes a
//! snapshot at creation time and historical payments are never re-quoted.
//! Providers own the failure and staleness policy behind the `RateProvider`
//! trait, so the engine is testable with a fixed-rate stub and carries no
//! process-wide rate state of its own.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use thiserror::Error;

use core_kernel::{ExchangeRate, MoneyError};

/// Where a rate quote came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    /// An operator-entered override
    Manual,
    /// A live fetch from the upstream source
    Auto,
    /// The last good fetch, still within the staleness window
    Cached,
    /// The configured last-resort rate
    Fallback,
}

/// A rate snapshot with its provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuote {
    /// The positive exchange rate
    pub rate: ExchangeRate,
    /// How the rate was obtained
    pub source: RateSource,
    /// When the rate was obtained
    pub fetched_at: DateTime<Utc>,
}

/// Errors raised while obtaining a rate
#[derive(Debug, Error)]
pub enum RateError {
    /// Every rung of the provider's ladder failed
    #[error("No exchange rate available: {0}")]
    Unavailable(String),

    /// The upstream produced a non-positive rate
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A supplier of the current exchange rate
pub trait RateProvider: Send + Sync {
    /// Returns the current rate with its provenance
    fn current_rate(&self) -> Result<RateQuote, RateError>;
}

/// A provider that always returns the same quote
///
/// The test stub the engine's design calls for; also useful as the innermost
/// fallback of a layered provider.
#[derive(Debug, Clone)]
pub struct StaticRateProvider {
    rate: ExchangeRate,
    source: RateSource,
}

impl StaticRateProvider {
    /// Creates a provider pinned to `rate`
    pub fn new(rate: ExchangeRate, source: RateSource) -> Self {
        Self { rate, source }
    }
}

impl RateProvider for StaticRateProvider {
    fn current_rate(&self) -> Result<RateQuote, RateError> {
        Ok(RateQuote {
            rate: self.rate,
            source: self.source,
            fetched_at: Utc::now(),
        })
    }
}

/// Callback that fetches a fresh rate from the upstream source
pub type FetchFn = Box<dyn Fn() -> Result<ExchangeRate, RateError> + Send + Sync>;

/// A provider with the full fallback ladder
///
/// Resolution order: manual override, then a live fetch (refreshing the
/// cache on success), then the cached last-good rate while it is within the
/// staleness window, then the configured fallback rate. `Unavailable` only
/// when every rung fails.
pub struct LayeredRateProvider {
    manual_override: RwLock<Option<ExchangeRate>>,
    fetcher: Option<FetchFn>,
    cache: RwLock<Option<(ExchangeRate, DateTime<Utc>)>>,
    staleness_window: Duration,
    fallback: Option<ExchangeRate>,
}

impl LayeredRateProvider {
    /// Creates a provider with the given staleness window and no rungs
    /// configured yet
    pub fn new(staleness_window: Duration) -> Self {
        Self {
            manual_override: RwLock::new(None),
            fetcher: None,
            cache: RwLock::new(None),
            staleness_window,
            fallback: None,
        }
    }

    /// Installs the live fetch callback
    pub fn with_fetcher(mut self, fetcher: FetchFn) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Installs the last-resort rate
    pub fn with_fallback(mut self, fallback: ExchangeRate) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Sets an operator override that wins over every other rung
    pub fn set_manual_override(&self, rate: ExchangeRate) {
        *self
            .manual_override
            .write()
            .expect("rate override lock poisoned") = Some(rate);
    }

    /// Clears the operator override
    pub fn clear_manual_override(&self) {
        *self
            .manual_override
            .write()
            .expect("rate override lock poisoned") = None;
    }

    fn cached_quote(&self) -> Option<RateQuote> {
        let cache = self.cache.read().expect("rate cache lock poisoned");
        let (rate, fetched_at) = (*cache)?;
        if Utc::now() - fetched_at <= self.staleness_window {
            Some(RateQuote {
                rate,
                source: RateSource::Cached,
                fetched_at,
            })
        } else {
            None
        }
    }
}

impl RateProvider for LayeredRateProvider {
    fn current_rate(&self) -> Result<RateQuote, RateError> {
        if let Some(rate) = *self
            .manual_override
            .read()
            .expect("rate override lock poisoned")
        {
            return Ok(RateQuote {
                rate,
                source: RateSource::Manual,
                fetched_at: Utc::now(),
            });
        }

        if let Some(fetcher) = &self.fetcher {
            match fetcher() {
                Ok(rate) => {
                    let now = Utc::now();
                    *self.cache.write().expect("rate cache lock poisoned") = Some((rate, now));
                    return Ok(RateQuote {
                        rate,
                        source: RateSource::Auto,
                        fetched_at: now,
                    });
                }
                Err(err) => {
                    tracing::warn!(error = %err, "live rate fetch failed, falling back");
                }
            }
        }

        if let Some(quote) = self.cached_quote() {
            return Ok(quote);
        }

        if let Some(rate) = self.fallback {
            return Ok(RateQuote {
                rate,
                source: RateSource::Fallback,
                fetched_at: Utc::now(),
            });
        }

        Err(RateError::Unavailable(
            "no override, fetch failed, cache stale or empty, no fallback configured".to_string(),
        ))
    }
}

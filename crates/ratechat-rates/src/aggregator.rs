//! Day-window aggregation over a [`RateSource`].

use std::sync::Arc;

use chrono::{Days, Local, NaiveDate};
use futures::future::join_all;
use ratechat_core::constants::{DATE_FORMAT, MAX_DAYS};
use ratechat_core::{CurrencySet, DailyRates, ExchangeError, ExchangeResult, FetchError, RateMap};
use tracing::{debug, warn};

use crate::extract::extract_rates;
use crate::source::RateSource;

/// Counter of per-day fetch failures, labelled by `kind`.
pub const RATE_FETCH_FAILURES_TOTAL: &str = "rate_fetch_failures_total";

/// Collects rates for the `num_days` most recent days, today included.
#[derive(Clone)]
pub struct RangeAggregator {
    source: Arc<dyn RateSource>,
}

impl RangeAggregator {
    /// Aggregate over `source`.
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self { source }
    }

    /// Collect relative to the local calendar date.
    pub async fn collect(
        &self,
        num_days: u64,
        currencies: &CurrencySet,
    ) -> Result<ExchangeResult, ExchangeError> {
        self.collect_from(Local::now().date_naive(), num_days, currencies)
            .await
    }

    /// Collect relative to `today`.
    ///
    /// More than [`MAX_DAYS`] is rejected before any fetch. Days are fetched
    /// concurrently, one call each, and returned most recent first; failed
    /// days and days with no matching currency are left out.
    pub async fn collect_from(
        &self,
        today: NaiveDate,
        num_days: u64,
        currencies: &CurrencySet,
    ) -> Result<ExchangeResult, ExchangeError> {
        if num_days > MAX_DAYS {
            return Err(ExchangeError::max_days(num_days));
        }

        let dates: Vec<String> = (0..num_days)
            .map_while(|i| today.checked_sub_days(Days::new(i)))
            .map(|d| d.format(DATE_FORMAT).to_string())
            .collect();

        let days = join_all(dates.iter().map(|date| self.fetch_day(date, currencies))).await;

        let mut result = ExchangeResult::new();
        for (date, outcome) in dates.into_iter().zip(days) {
            match outcome {
                Ok(rates) if rates.is_empty() => {
                    debug!(date, "no requested currency on this day");
                }
                Ok(rates) => result.push(DailyRates { date, rates }),
                Err(err) => {
                    warn!(date, kind = err.kind(), error = %err, "skipping day");
                    metrics::counter!(RATE_FETCH_FAILURES_TOTAL, "kind" => err.kind()).increment(1);
                }
            }
        }
        Ok(result)
    }

    async fn fetch_day(&self, date: &str, currencies: &CurrencySet) -> Result<RateMap, FetchError> {
        let payload = self.source.fetch(date).await?;
        extract_rates(&payload, currencies)
    }
}

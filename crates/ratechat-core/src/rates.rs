//! Exchange-rate result types.
//!
//! An [`ExchangeResult`] is the reply to one `exchange` command: one
//! [`DailyRates`] entry per day that matched at least one currency, most
//! recent day first.
//!
//! # Wire format
//!
//! Each day serializes as a single-key object keyed by its date:
//!
//! ```json
//! [
//!   { "17.10.2026": { "EUR": { "sale": 45.1, "purchase": 44.9 } } },
//!   { "16.10.2026": { "USD": { "sale": 41.5, "purchase": 41.2 } } }
//! ]
//! ```

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// National-bank sale and purchase rate for one currency on one day.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    /// `saleRateNB` from the upstream payload.
    pub sale: f64,
    /// `purchaseRateNB` from the upstream payload.
    pub purchase: f64,
}

/// Matched rates for one day, keyed by currency code.
pub type RateMap = BTreeMap<String, CurrencyRate>;

/// Rates matched for a single date.
#[derive(Clone, Debug, PartialEq)]
pub struct DailyRates {
    /// Date in `DD.MM.YYYY` form.
    pub date: String,
    /// Currencies present upstream for this date. Missing ones are omitted.
    pub rates: RateMap,
}

impl Serialize for DailyRates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.date, &self.rates)?;
        map.end()
    }
}

/// Aggregated reply to one exchange query, most recent day first.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExchangeResult {
    days: Vec<DailyRates>,
}

impl ExchangeResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a day. Callers push in descending date order.
    pub fn push(&mut self, day: DailyRates) {
        self.days.push(day);
    }

    /// Days in reply order.
    pub fn days(&self) -> &[DailyRates] {
        &self.days
    }

    /// Number of days that produced at least one rate.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether no day produced a rate.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Serialize to the JSON wire format.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl IntoIterator for ExchangeResult {
    type Item = DailyRates;
    type IntoIter = std::vec::IntoIter<DailyRates>;

    fn into_iter(self) -> Self::IntoIter {
        self.days.into_iter()
    }
}

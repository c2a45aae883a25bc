//! Upstream API section.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Upstream exchange-rate API settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExchangeSettings {
    /// Endpoint queried with `?date=DD.MM.YYYY`.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl ExchangeSettings {
    /// Per-request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.privatbank.ua/p24api/exchange_rates".to_string(),
            timeout_ms: 10_000,
        }
    }
}

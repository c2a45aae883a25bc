//! `reqwest` client for the PrivatBank archive endpoint.

use std::time::Duration;

use async_trait::async_trait;
use ratechat_core::FetchError;
use ratechat_core::constants::{NAME, VERSION};
use serde_json::Value;
use tracing::debug;

use crate::source::RateSource;

/// Production endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.privatbank.ua/p24api/exchange_rates";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`RateSource`] backed by `GET <base_url>?date=DD.MM.YYYY`.
#[derive(Clone, Debug)]
pub struct PrivatBankClient {
    client: reqwest::Client,
    base_url: String,
}

impl PrivatBankClient {
    /// Client for `base_url` with a per-request `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(format!("{NAME}/{VERSION}"))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }

    /// Endpoint this client calls.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for PrivatBankClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }
}

fn request_error(e: &reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport {
            detail: e.to_string(),
        }
    }
}

#[async_trait]
impl RateSource for PrivatBankClient {
    async fn fetch(&self, date: &str) -> Result<Value, FetchError> {
        debug!(date, url = %self.base_url, "fetching exchange rates");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("date", date)])
            .send()
            .await
            .map_err(|e| request_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| request_error(&e))?;
        serde_json::from_str(&body)
            .map_err(|e| FetchError::malformed(format!("body is not JSON: {e}")))
    }
}

//! Error hierarchy for the exchange pipeline.
//!
//! [`FetchError`] covers faults of a single day's fetch; the aggregator logs
//! and skips them. [`ExchangeError`] covers faults of the whole query and is
//! surfaced to the requesting client.

use thiserror::Error;

use crate::constants::MAX_DAYS;

/// Failure fetching or decoding one day's upstream payload.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Upstream answered with a non-2xx status.
    #[error("upstream returned HTTP {status}")]
    Upstream {
        /// HTTP status code.
        status: u16,
    },

    /// The request did not complete within the configured timeout.
    #[error("upstream request timed out")]
    Timeout,

    /// Connection-level failure (DNS, refused, reset, TLS).
    #[error("transport error: {detail}")]
    Transport {
        /// Underlying error text.
        detail: String,
    },

    /// Body was not JSON, or a matched rate was not numeric.
    #[error("malformed payload: {detail}")]
    MalformedPayload {
        /// What was wrong with the payload.
        detail: String,
    },
}

impl FetchError {
    /// Build a [`FetchError::MalformedPayload`].
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedPayload {
            detail: detail.into(),
        }
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Upstream { .. } => "upstream",
            Self::Timeout => "timeout",
            Self::Transport { .. } => "transport",
            Self::MalformedPayload { .. } => "malformed",
        }
    }
}

/// Failure of an exchange query as a whole.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExchangeError {
    /// More than [`MAX_DAYS`] days were requested.
    #[error("requested {requested} days, maximum is {max}")]
    MaxDaysExceeded {
        /// Day count the caller asked for.
        requested: u64,
        /// The ceiling in force.
        max: u64,
    },
}

impl ExchangeError {
    /// Reject `requested` days against the [`MAX_DAYS`] ceiling.
    pub fn max_days(requested: u64) -> Self {
        Self::MaxDaysExceeded {
            requested,
            max: MAX_DAYS,
        }
    }
}

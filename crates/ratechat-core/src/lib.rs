//! # ratechat-core
//!
//! Foundation types shared by every ratechat crate:
//!
//! - **Constants**: the day ceiling, mandatory currencies, wire date format
//! - **Branded IDs**: [`ConnectionId`] newtype for live client connections
//! - **Rates**: [`CurrencyRate`], [`DailyRates`], [`ExchangeResult`]
//! - **Queries**: [`CurrencySet`] and [`ExchangeQuery`]
//! - **Errors**: [`FetchError`] (per-day faults) and [`ExchangeError`] (preconditions)

#![deny(unsafe_code)]

pub mod constants;
pub mod errors;
pub mod ids;
pub mod query;
pub mod rates;

pub use errors::{ExchangeError, FetchError};
pub use ids::ConnectionId;
pub use query::{CurrencySet, ExchangeQuery};
pub use rates::{CurrencyRate, DailyRates, ExchangeResult, RateMap};

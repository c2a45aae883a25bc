//! # ratechat-rates
//!
//! Historical exchange rates from the PrivatBank `p24api/exchange_rates`
//! endpoint.
//!
//! - [`RateSource`]: one outbound call per date, returning the raw JSON
//!   payload or a typed [`FetchError`](ratechat_core::FetchError)
//! - [`PrivatBankClient`]: the `reqwest` implementation
//! - [`extract_rates`]: picks the requested currencies out of a payload
//! - [`RangeAggregator`]: drives a source across a day window, enforcing the
//!   day ceiling and skipping failed days

#![deny(unsafe_code)]

pub mod aggregator;
pub mod client;
pub mod extract;
pub mod source;

pub use aggregator::RangeAggregator;
pub use client::PrivatBankClient;
pub use extract::extract_rates;
pub use source::RateSource;

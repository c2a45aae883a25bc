//! The outbound rate capability.

use async_trait::async_trait;
use ratechat_core::FetchError;
use serde_json::Value;

/// Fetches the raw upstream payload for a single date.
///
/// Implementations make exactly one outbound call per invocation and never
/// retry. A non-2xx answer or an expired timeout is a failure, never "no
/// data".
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch the payload for `date` (`DD.MM.YYYY`).
    async fn fetch(&self, date: &str) -> Result<Value, FetchError>;
}

//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]`, so a settings
//! file may name only the fields it changes. Each type implements
//! [`Default`] with production values.

mod exchange;
mod logging;
mod server;

pub use exchange::*;
pub use logging::*;
pub use server::*;

use serde::{Deserialize, Serialize};

/// Root settings type for the relay.
///
/// # JSON Format
///
/// ```json
/// {
///   "server": { "port": 9000 },
///   "exchange": { "timeoutMs": 5000 },
///   "logging": { "level": "debug" }
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelaySettings {
    /// Listener and connection limits.
    pub server: ServerSettings,
    /// Upstream exchange-rate API.
    pub exchange: ExchangeSettings,
    /// Diagnostics and the command log.
    pub logging: LoggingSettings,
}

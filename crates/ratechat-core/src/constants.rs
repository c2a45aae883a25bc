//! Package-level constants.

/// Current version of ratechat (sourced from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name.
pub const NAME: &str = "ratechat";

/// Maximum number of days a single exchange query may span.
pub const MAX_DAYS: u64 = 10;

/// Day count used when an `exchange` command does not name one.
pub const DEFAULT_DAYS: u64 = 1;

/// Currencies included in every exchange query, in reply order.
pub const MANDATORY_CURRENCIES: [&str; 2] = ["EUR", "USD"];

/// Date format used on the wire and in upstream requests (`DD.MM.YYYY`).
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Leading token that turns a frame into an exchange command.
pub const EXCHANGE_COMMAND: &str = "exchange";

/// Reply sent to a client that asks for more than [`MAX_DAYS`] days.
pub const MAX_DAYS_MESSAGE: &str = "Maximum number of days to display is 10";

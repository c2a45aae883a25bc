//! Inbound frame classification.

use ratechat_core::ExchangeQuery;
use ratechat_core::constants::{DEFAULT_DAYS, EXCHANGE_COMMAND};

/// What a client frame asks the relay to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    /// Chat text, relayed verbatim to every other client.
    Broadcast(String),
    /// `exchange [num_days] [currency...]`.
    Exchange(ExchangeQuery),
}

/// Classify one text frame.
///
/// A frame is a command only when the text itself starts with `exchange`,
/// followed by whitespace or nothing; leading whitespace makes it chat. A
/// following all-digit token is the day count (saturating at `u64::MAX`);
/// otherwise the count is 1 and that token starts the currency list.
pub fn classify(text: &str) -> Frame {
    let Some(rest) = command_args(text) else {
        return Frame::Broadcast(text.to_string());
    };

    let mut tokens = rest.split_whitespace().peekable();
    let num_days = match tokens.peek() {
        Some(tok) if is_day_count(tok) => {
            let days = parse_days(tok);
            let _ = tokens.next();
            days
        }
        _ => DEFAULT_DAYS,
    };

    Frame::Exchange(ExchangeQuery::new(num_days, tokens))
}

fn command_args(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(EXCHANGE_COMMAND)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

fn is_day_count(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

fn parse_days(token: &str) -> u64 {
    token.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    })
}

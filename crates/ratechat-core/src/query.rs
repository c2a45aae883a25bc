//! Exchange query model.

use serde::{Deserialize, Serialize};

use crate::constants::MANDATORY_CURRENCIES;

/// Ordered, duplicate-free set of currency codes.
///
/// Always starts with the mandatory `EUR` and `USD`; extras follow in the
/// order they were first given. Codes are normalized to ASCII uppercase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencySet(Vec<String>);

impl CurrencySet {
    /// Mandatory currencies plus `extras`, duplicates collapsed.
    pub fn with_extras<I, S>(extras: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self(Vec::with_capacity(MANDATORY_CURRENCIES.len()));
        for code in MANDATORY_CURRENCIES {
            set.insert(code);
        }
        for code in extras {
            set.insert(code.as_ref());
        }
        set
    }

    fn insert(&mut self, code: &str) {
        let code = code.trim().to_ascii_uppercase();
        if !code.is_empty() && !self.0.contains(&code) {
            self.0.push(code);
        }
    }

    /// Codes in query order.
    pub fn codes(&self) -> &[String] {
        &self.0
    }

    /// Whether `code` (case-insensitive) is part of the set.
    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|c| c.eq_ignore_ascii_case(code))
    }

    /// Number of codes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set holds no codes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate codes in query order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl Default for CurrencySet {
    fn default() -> Self {
        Self::with_extras(std::iter::empty::<&str>())
    }
}

impl<'a> IntoIterator for &'a CurrencySet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A parsed `exchange` request.
///
/// `num_days` is stored as given; the ceiling is enforced by the aggregator
/// so an oversized request is rejected rather than truncated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeQuery {
    /// Number of days to look back, today included.
    pub num_days: u64,
    /// Currencies to extract for each day.
    pub currencies: CurrencySet,
}

impl ExchangeQuery {
    /// Build a query for `num_days` with the mandatory currencies plus `extras`.
    pub fn new<I, S>(num_days: u64, extras: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            num_days,
            currencies: CurrencySet::with_extras(extras),
        }
    }
}

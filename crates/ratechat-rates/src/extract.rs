//! Currency extraction from an upstream payload.

use ratechat_core::{CurrencyRate, CurrencySet, FetchError, RateMap};
use serde_json::Value;

/// Pick the requested currencies out of `payload`.
///
/// The payload carries `exchangeRate: [{currency, saleRateNB,
/// purchaseRateNB}, ...]`. For each requested code the first matching record
/// wins. A missing `exchangeRate` or an unmatched code yields no entry rather
/// than an error. Records without a `currency` (the base-currency row) are
/// skipped. Rates may be JSON numbers or numeric strings; anything else on a
/// matched record is [`FetchError::MalformedPayload`].
pub fn extract_rates(payload: &Value, currencies: &CurrencySet) -> Result<RateMap, FetchError> {
    let mut rates = RateMap::new();

    let records = match payload.get("exchangeRate") {
        None | Some(Value::Null) => return Ok(rates),
        Some(Value::Array(records)) => records,
        Some(_) => return Err(FetchError::malformed("exchangeRate is not an array")),
    };

    for code in currencies {
        let Some(record) = records
            .iter()
            .find(|r| record_currency(r).is_some_and(|c| c.eq_ignore_ascii_case(code)))
        else {
            continue;
        };
        let rate = CurrencyRate {
            sale: rate_field(record, "saleRateNB", code)?,
            purchase: rate_field(record, "purchaseRateNB", code)?,
        };
        let _ = rates.insert(code.clone(), rate);
    }

    Ok(rates)
}

fn record_currency(record: &Value) -> Option<&str> {
    record.get("currency").and_then(Value::as_str)
}

fn rate_field(record: &Value, field: &str, code: &str) -> Result<f64, FetchError> {
    let value = match record.get(field) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value
        .filter(|v| v.is_finite())
        .ok_or_else(|| FetchError::malformed(format!("{code}: {field} is missing or not numeric")))
}

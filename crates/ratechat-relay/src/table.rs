//! Plain-text rendering of an exchange result.

use std::fmt::Write;

use ratechat_core::ExchangeResult;

const HEADERS: [&str; 4] = ["Date", "Currency", "Purchase", "Sale"];

/// Render `result` as a `Date | Currency | Purchase | Sale` table.
///
/// One row per day and currency, days in result order. Rates are printed
/// with two decimals.
pub fn render(result: &ExchangeResult) -> String {
    let rows: Vec<[String; 4]> = result
        .days()
        .iter()
        .flat_map(|day| {
            day.rates.iter().map(move |(code, rate)| {
                [
                    day.date.clone(),
                    code.clone(),
                    format!("{:.2}", rate.purchase),
                    format!("{:.2}", rate.sale),
                ]
            })
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", line.join(" | ").trim_end());
}

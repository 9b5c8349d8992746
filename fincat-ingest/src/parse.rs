//! Field-level parsing: `DD/MM/YYYY` dates and amount strings with embedded currency.

use std::sync::LazyLock;

use chrono::NaiveDate;
use fincat_core::{Currency, CurrencySignal};
use regex::Regex;

use crate::error::{ParseError, Result};

static CURRENCY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"GBP|GBR|EUR|USD").expect("currency code pattern"));
static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("leading number pattern")
});

/// Amount column value after cleaning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedAmount {
    /// Always finite; 0.0 when the text could not be parsed
    pub amount: f64,
    pub signal: CurrencySignal,
}

impl ParsedAmount {
    pub fn currency(&self) -> Currency {
        self.signal.currency()
    }
}

/// Parse a `DD/MM/YYYY` date. Single-digit day/month are accepted and a
/// trailing time-of-day (`01/03/2024 14:02`) is ignored.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    match NaiveDate::parse_and_remainder(s, "%d/%m/%Y") {
        Ok((date, rest)) if rest.is_empty() || rest.starts_with(char::is_whitespace) => Ok(date),
        _ => Err(ParseError::InvalidDate(s.to_string())),
    }
}

/// `YYYY-MM` month key for a parsed date
pub fn extract_month(date: NaiveDate) -> String {
    fincat_core::month_key(date)
}

/// Find a currency symbol or code anywhere in `s`. Symbols are checked
/// before codes.
pub fn detect_currency(s: &str) -> Option<Currency> {
    if s.contains('£') {
        return Some(Currency::Gbp);
    }
    if s.contains('€') {
        return Some(Currency::Eur);
    }
    if s.contains('$') {
        return Some(Currency::Usd);
    }
    if s.contains("GBP") || s.contains("GBR") {
        return Some(Currency::Gbp);
    }
    if s.contains("EUR") {
        return Some(Currency::Eur);
    }
    if s.contains("USD") {
        return Some(Currency::Usd);
    }
    None
}

/// Parse an amount column value such as `-£1,045.00`, `12.50 EUR` or `(3.20)`.
///
/// With no symbol or code present the currency is assumed to be GBP. The
/// leading number is used and trailing text (`12.50 CR`, `12.50-`) is
/// ignored. Text that does not start with a number after cleaning yields `0.0` with
/// [`CurrencySignal::ParseFailed`]; empty values and a bare `-` are zero
/// without being a failure.
pub fn parse_amount(s: &str) -> ParsedAmount {
    let signal = match detect_currency(s) {
        Some(c) => CurrencySignal::Detected(c),
        None => CurrencySignal::AssumedDefault,
    };

    let stripped: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '£' | '€' | '$' | '"' | ','))
        .collect();
    let cleaned = CURRENCY_CODE.replace_all(&stripped, "");

    if cleaned.is_empty() || cleaned == "-" {
        return ParsedAmount { amount: 0.0, signal };
    }

    let (negate, number) = match cleaned.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, &*cleaned),
    };

    let parsed = LEADING_NUMBER.find(number).and_then(|m| {
        let rest = &number[m.end()..];
        if !rest.is_empty() {
            tracing::debug!(raw = s, ignored = rest, "trailing text after amount");
        }
        m.as_str().parse::<f64>().ok()
    });

    match parsed {
        Some(v) if v.is_finite() => ParsedAmount {
            amount: if negate { -v } else { v },
            signal,
        },
        _ => {
            tracing::debug!(raw = s, cleaned = %cleaned, "amount is not a number");
            ParsedAmount {
                amount: 0.0,
                signal: CurrencySignal::ParseFailed,
            }
        }
    }
}

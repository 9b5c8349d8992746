//! Currencies, where a transaction's currency came from, and fixed GBP conversion.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies recognised in statement exports
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Currency {
    #[serde(rename = "GBP")]
    Gbp,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Currency {
    /// Map a symbol or 3-letter code to a currency.
    ///
    /// `GBR` shows up in card exports as a country suffix and is treated as GBP.
    pub fn from_token(token: &str) -> Currency {
        match token {
            "£" | "GBP" | "GBR" => Currency::Gbp,
            "€" | "EUR" => Currency::Eur,
            "$" | "USD" => Currency::Usd,
            _ => Currency::Unknown,
        }
    }

    /// 3-letter code used in report output
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Gbp => "GBP",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// How a transaction's currency was arrived at.
///
/// `AssumedDefault` means no symbol or code was present and GBP was assumed;
/// `ParseFailed` is the only route to [`Currency::Unknown`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CurrencySignal {
    Detected(Currency),
    AssumedDefault,
    ParseFailed,
}

impl CurrencySignal {
    pub fn currency(&self) -> Currency {
        match self {
            CurrencySignal::Detected(c) => *c,
            CurrencySignal::AssumedDefault => Currency::Gbp,
            CurrencySignal::ParseFailed => Currency::Unknown,
        }
    }

    pub fn is_assumed(&self) -> bool {
        matches!(self, CurrencySignal::AssumedDefault)
    }
}

/// Fixed approximate rates into GBP. No live lookup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConversionRates {
    #[serde(default = "default_eur")]
    pub eur_to_gbp: f64,
    #[serde(default = "default_usd")]
    pub usd_to_gbp: f64,
}

fn default_eur() -> f64 {
    0.86
}

fn default_usd() -> f64 {
    0.79
}

impl Default for ConversionRates {
    fn default() -> Self {
        Self {
            eur_to_gbp: default_eur(),
            usd_to_gbp: default_usd(),
        }
    }
}

impl ConversionRates {
    /// Convert an amount to GBP. Unknown-currency amounts are already zeroed at
    /// parse time and pass through unchanged.
    pub fn to_gbp(&self, amount: f64, currency: Currency) -> f64 {
        match currency {
            Currency::Eur => amount * self.eur_to_gbp,
            Currency::Usd => amount * self.usd_to_gbp,
            Currency::Gbp | Currency::Unknown => amount,
        }
    }
}

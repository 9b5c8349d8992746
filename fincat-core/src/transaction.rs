//! Transaction record shared by the loader, categoriser and exporters

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::currency::{Currency, CurrencySignal};
use crate::period::month_key;

/// Category assigned when no keyword matches
pub const UNCATEGORISED: &str = "Uncategorised";

/// Category whose AMEX/"payment received" rows are card repayments
pub const CREDIT_CARD_CATEGORY: &str = "Credit card";

/// Sign convention of the export a transaction came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SignConvention {
    /// Negative means spend (most bank exports)
    #[default]
    #[serde(rename = "spend-negative")]
    SpendNegative,
    /// Positive means spend (AMEX exports)
    #[serde(rename = "spend-positive")]
    SpendPositive,
}

/// Origin × content classification that decides the effective sign of an amount.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TransactionKind {
    pub convention: SignConvention,
    /// Set by categorisation for credit-card repayments/credits
    pub card_repayment: bool,
}

impl TransactionKind {
    /// The single sign rule: each of "spend-positive export" and "card
    /// repayment" flips the raw amount once.
    pub fn sign(&self) -> f64 {
        let mut sign = 1.0;
        if self.convention == SignConvention::SpendPositive {
            sign = -sign;
        }
        if self.card_repayment {
            sign = -sign;
        }
        sign
    }
}

/// One parsed statement row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    /// `YYYY-MM`, fixed at construction
    pub month_key: String,
    /// Short label derived from the source filename
    pub file_origin: String,
    pub description: String,
    /// Secondary text from a "Name" column, empty when absent
    pub name: String,
    /// Tertiary text from a "Transfers" column, empty when absent
    pub transfers: String,
    /// Amount exactly as exported, always finite
    pub raw_amount: f64,
    pub kind: TransactionKind,
    pub currency: Currency,
    pub currency_signal: CurrencySignal,
    /// Empty until categorised
    pub category: String,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        file_origin: impl Into<String>,
        description: impl Into<String>,
        raw_amount: f64,
        currency_signal: CurrencySignal,
    ) -> Self {
        let raw_amount = if raw_amount.is_finite() { raw_amount } else { 0.0 };
        Self {
            date,
            month_key: month_key(date),
            file_origin: file_origin.into(),
            description: description.into(),
            name: String::new(),
            transfers: String::new(),
            raw_amount,
            kind: TransactionKind::default(),
            currency: currency_signal.currency(),
            currency_signal,
            category: String::new(),
        }
    }

    pub fn with_convention(mut self, convention: SignConvention) -> Self {
        self.kind.convention = convention;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_transfers(mut self, transfers: impl Into<String>) -> Self {
        self.transfers = transfers.into();
        self
    }

    /// Signed amount after applying the transaction kind's sign rule
    pub fn amount(&self) -> f64 {
        self.raw_amount * self.kind.sign()
    }

    /// Get the absolute amount
    pub fn abs_amount(&self) -> f64 {
        self.raw_amount.abs()
    }

    /// Category for reporting: never empty
    pub fn category_or_default(&self) -> &str {
        if self.category.is_empty() {
            UNCATEGORISED
        } else {
            &self.category
        }
    }
}

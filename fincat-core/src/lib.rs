//! fincat-core: transaction model, currencies and period keys shared by the pipeline crates

pub mod currency;
pub mod period;
pub mod transaction;

pub use currency::{ConversionRates, Currency, CurrencySignal};
pub use period::{month_key, week_key, week_start};
pub use transaction::{
    SignConvention, Transaction, TransactionKind, CREDIT_CARD_CATEGORY, UNCATEGORISED,
};

//! fincat-finance: keyword categorisation, reports, pivoted exports and the run orchestrator

pub mod categorise;
pub mod config;
pub mod error;
pub mod export;
pub mod keywords;
pub mod processor;
pub mod report;

pub use categorise::{CategorisationStats, Categoriser, MatchStrategy};
pub use config::ProcessorConfig;
pub use error::PipelineError;
pub use export::{DataExporter, ExportOptions, Pivot, Period, MONTHLY_SUMMARY_FILE, WEEKLY_SUMMARY_FILE};
pub use keywords::{load_keywords, parse_keywords, KeywordRule, KeywordRules};
pub use processor::{FinanceProcessor, RunSummary};
pub use report::{ReportGenerator, FULL_REPORT_FILE};

//! End-to-end run: keywords, load, categorise, report, export.

use std::path::PathBuf;

use fincat_ingest::DataLoader;
use serde::Serialize;
use tracing::{error, info};

use crate::categorise::{CategorisationStats, Categoriser};
use crate::config::ProcessorConfig;
use crate::error::{PipelineError, Result};
use crate::export::DataExporter;
use crate::keywords::load_keywords;
use crate::report::{ensure_dir, ReportGenerator};

/// What a run did, for display or `--json`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunSummary {
    pub keywords: usize,
    pub transactions: usize,
    pub categorisation: CategorisationStats,
    pub files_written: Vec<PathBuf>,
}

pub struct FinanceProcessor {
    config: ProcessorConfig,
}

impl FinanceProcessor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Run the whole pipeline once. Any error is logged and returned.
    pub fn run(&self) -> Result<RunSummary> {
        self.run_inner().inspect_err(|e| error!("processing failed: {e}"))
    }

    fn run_inner(&self) -> Result<RunSummary> {
        let cfg = &self.config;
        ensure_dir(&cfg.input_dir)?;
        ensure_dir(&cfg.output_dir)?;

        let rules = load_keywords(&cfg.keyword_file)?;
        let keywords = rules.len();

        let mut txns = DataLoader::new(&cfg.input_dir).load_and_preprocess()?;
        if txns.is_empty() {
            return Err(PipelineError::NoTransactions {
                path: cfg.input_dir.clone(),
            });
        }

        let categoriser = Categoriser::new(rules, cfg.match_strategy);
        let categorisation = categoriser.categorise_all(&mut txns);
        info!(
            matched = categorisation.matched,
            uncategorised = categorisation.uncategorised,
            repayments = categorisation.repayments,
            "categorised transactions"
        );

        let mut files_written = vec![ReportGenerator::new(&cfg.output_dir).generate_full_report(&txns)?];

        let exported = DataExporter::new(&cfg.output_dir, cfg.exports)
            .with_rates(cfg.rates)
            .with_total_row(cfg.summary_total_row)
            .export(&txns)?;
        for path in exported {
            if !files_written.contains(&path) {
                files_written.push(path);
            }
        }

        info!(transactions = txns.len(), files = files_written.len(), "processing complete");
        Ok(RunSummary {
            keywords,
            transactions: txns.len(),
            categorisation,
            files_written,
        })
    }
}

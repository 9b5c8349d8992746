//! Flat per-transaction report.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use fincat_core::Transaction;
use tracing::info;

use crate::error::{PipelineError, Result};

/// File name of the full categorised-transactions report
pub const FULL_REPORT_FILE: &str = "categorised_transactions.csv";

const FULL_REPORT_HEADER: [&str; 7] = [
    "Date",
    "Month",
    "FileOrigin",
    "Description",
    "Amount",
    "Currency",
    "Category",
];

/// Two decimals, never `-0.00`
pub fn format_amount(value: f64) -> String {
    let s = format!("{value:.2}");
    if s == "-0.00" { "0.00".to_string() } else { s }
}

/// Render the full report into memory; `dest` is the file it is bound for
pub fn render_full_report(txns: &[Transaction], dest: &Path) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(FULL_REPORT_HEADER)?;

    for txn in txns {
        wtr.write_record([
            txn.date.format("%d/%m/%Y").to_string().as_str(),
            txn.month_key.as_str(),
            txn.file_origin.as_str(),
            txn.description.as_str(),
            format_amount(txn.abs_amount()).as_str(),
            txn.currency.code(),
            txn.category_or_default(),
        ])?;
    }

    finish_csv(wtr, dest)
}

/// Flush a CSV writer, naming `dest` if that fails
pub(crate) fn finish_csv<W: Write>(wtr: csv::Writer<W>, dest: &Path) -> Result<W> {
    wtr.into_inner().map_err(|e| PipelineError::Write {
        path: dest.to_path_buf(),
        source: e.into_error(),
    })
}

/// Write a rendered file in one go
pub(crate) fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| PipelineError::Directory {
        path: path.to_path_buf(),
        source,
    })
}

pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write `categorised_transactions.csv` and return its path
    pub fn generate_full_report(&self, txns: &[Transaction]) -> Result<PathBuf> {
        ensure_dir(&self.output_dir)?;
        let path = self.output_dir.join(FULL_REPORT_FILE);
        let bytes = render_full_report(txns, &path)?;
        write_output(&path, &bytes)?;
        info!(file = %path.display(), rows = txns.len(), "wrote full report");
        Ok(path)
    }
}

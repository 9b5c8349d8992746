//! Pivoted period summaries and the full-dataset export.
//!
//! Summaries have one row per category and one column per period (month or
//! Monday-aligned week). Cells hold the signed amount converted to GBP.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use fincat_core::{week_key, ConversionRates, Transaction};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::report::{
    ensure_dir, finish_csv, format_amount, render_full_report, write_output, FULL_REPORT_FILE,
};

pub const MONTHLY_SUMMARY_FILE: &str = "monthly_summary.csv";
pub const WEEKLY_SUMMARY_FILE: &str = "weekly_summary.csv";

/// Label of the optional column-sum row
pub const TOTAL_ROW: &str = "Total";

/// Which files an export writes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportOptions {
    #[serde(default = "default_true")]
    pub monthly: bool,
    #[serde(default)]
    pub weekly: bool,
    #[serde(default = "default_true")]
    pub full: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            monthly: true,
            weekly: false,
            full: true,
        }
    }
}

impl ExportOptions {
    pub fn any(&self) -> bool {
        self.monthly || self.weekly || self.full
    }
}

/// Period granularity of a pivoted summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Month,
    Week,
}

impl Period {
    fn key(&self, txn: &Transaction) -> String {
        match self {
            // month_key is fixed when the transaction is built
            Period::Month => txn.month_key.clone(),
            Period::Week => week_key(txn.date),
        }
    }

    fn file_name(&self) -> &'static str {
        match self {
            Period::Month => MONTHLY_SUMMARY_FILE,
            Period::Week => WEEKLY_SUMMARY_FILE,
        }
    }
}

/// Category × period table of GBP totals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pivot {
    pub periods: BTreeSet<String>,
    pub rows: BTreeMap<String, BTreeMap<String, f64>>,
}

impl Pivot {
    pub fn build(txns: &[Transaction], period: Period, rates: &ConversionRates) -> Self {
        let mut pivot = Pivot::default();
        for txn in txns {
            let key = period.key(txn);
            let gbp = rates.to_gbp(txn.amount(), txn.currency);
            *pivot
                .rows
                .entry(txn.category_or_default().to_string())
                .or_default()
                .entry(key.clone())
                .or_insert(0.0) += gbp;
            pivot.periods.insert(key);
        }
        pivot
    }

    /// Cell value, zero where the category had nothing in that period
    pub fn cell(&self, category: &str, period: &str) -> f64 {
        self.rows
            .get(category)
            .and_then(|cols| cols.get(period))
            .copied()
            .unwrap_or(0.0)
    }

    fn column_total(&self, period: &str) -> f64 {
        self.rows.values().filter_map(|cols| cols.get(period)).sum()
    }

    /// Render as CSV; `dest` is the file it is bound for
    pub fn render(&self, total_row: bool, dest: &Path) -> Result<Vec<u8>> {
        let mut wtr = csv::Writer::from_writer(Vec::new());

        let mut header = vec!["Category".to_string()];
        header.extend(self.periods.iter().cloned());
        wtr.write_record(&header)?;

        for category in self.rows.keys() {
            let mut record = vec![category.clone()];
            record.extend(self.periods.iter().map(|p| format_amount(self.cell(category, p))));
            wtr.write_record(&record)?;
        }

        if total_row {
            let mut record = vec![TOTAL_ROW.to_string()];
            record.extend(self.periods.iter().map(|p| format_amount(self.column_total(p))));
            wtr.write_record(&record)?;
        }

        finish_csv(wtr, dest)
    }
}

/// Writes the summaries and full export selected by [`ExportOptions`]
pub struct DataExporter {
    output_dir: PathBuf,
    options: ExportOptions,
    rates: ConversionRates,
    total_row: bool,
}

impl DataExporter {
    pub fn new(output_dir: impl Into<PathBuf>, options: ExportOptions) -> Self {
        Self {
            output_dir: output_dir.into(),
            options,
            rates: ConversionRates::default(),
            total_row: false,
        }
    }

    pub fn with_rates(mut self, rates: ConversionRates) -> Self {
        self.rates = rates;
        self
    }

    pub fn with_total_row(mut self, total_row: bool) -> Self {
        self.total_row = total_row;
        self
    }

    /// Write every enabled output and return the written paths
    pub fn export(&self, txns: &[Transaction]) -> Result<Vec<PathBuf>> {
        ensure_dir(&self.output_dir)?;

        if !self.options.any() {
            warn!("no export type selected, nothing written");
            return Ok(Vec::new());
        }

        let mut written = Vec::new();
        if self.options.monthly {
            written.push(self.export_summary(txns, Period::Month)?);
        }
        if self.options.weekly {
            written.push(self.export_summary(txns, Period::Week)?);
        }
        if self.options.full {
            let path = self.output_dir.join(FULL_REPORT_FILE);
            write_output(&path, &render_full_report(txns, &path)?)?;
            info!(file = %path.display(), "exported full dataset");
            written.push(path);
        }
        Ok(written)
    }

    fn export_summary(&self, txns: &[Transaction], period: Period) -> Result<PathBuf> {
        let pivot = Pivot::build(txns, period, &self.rates);
        let path = self.output_dir.join(period.file_name());
        let bytes = pivot.render(self.total_row, &path)?;
        write_output(&path, &bytes)?;
        info!(
            file = %path.display(),
            categories = pivot.rows.len(),
            periods = pivot.periods.len(),
            "exported summary"
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fincat_core::{Currency, CurrencySignal};
    use std::fs;

    fn txn(y: i32, m: u32, d: u32, amount: f64, currency: Currency, category: &str) -> Transaction {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let signal = if currency == Currency::Gbp {
            CurrencySignal::AssumedDefault
        } else {
            CurrencySignal::Detected(currency)
        };
        let mut t = Transaction::new(date, "Monzo", "X", amount, signal);
        t.category = category.to_string();
        t
    }

    fn read_rows(bytes: &[u8]) -> Vec<Vec<String>> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(false).from_reader(bytes);
        rdr.records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect()
    }

    #[test]
    fn test_monthly_mixed_currency_sum() {
        let txns = vec![
            txn(2024, 3, 4, 10.0, Currency::Eur, "Food"),
            txn(2024, 3, 20, 20.0, Currency::Gbp, "Food"),
        ];
        let pivot = Pivot::build(&txns, Period::Month, &ConversionRates::default());
        let rows = read_rows(&pivot.render(false, Path::new("monthly_summary.csv")).unwrap());
        assert_eq!(rows, vec![vec!["Category", "2024-03"], vec!["Food", "28.60"]]);
    }

    #[test]
    fn test_missing_cells_are_zero_and_sorted() {
        let txns = vec![
            txn(2024, 4, 1, -5.0, Currency::Gbp, "Transport"),
            txn(2024, 3, 1, -2.0, Currency::Usd, "Coffee"),
            txn(2024, 3, 2, 0.0, Currency::Unknown, ""),
        ];
        let pivot = Pivot::build(&txns, Period::Month, &ConversionRates::default());
        let rows = read_rows(&pivot.render(false, Path::new("monthly_summary.csv")).unwrap());
        assert_eq!(rows[0], vec!["Category", "2024-03", "2024-04"]);
        assert_eq!(rows[1], vec!["Coffee", "-1.58", "0.00"]);
        assert_eq!(rows[2], vec!["Transport", "0.00", "-5.00"]);
        assert_eq!(rows[3], vec!["Uncategorised", "0.00", "0.00"]);
    }

    #[test]
    fn test_sunday_buckets_into_previous_monday() {
        // 2024-03-10 is a Sunday
        let txns = vec![
            txn(2024, 3, 10, 1.0, Currency::Gbp, "Food"),
            txn(2024, 3, 4, 2.0, Currency::Gbp, "Food"),
        ];
        let pivot = Pivot::build(&txns, Period::Week, &ConversionRates::default());
        assert_eq!(pivot.periods.iter().collect::<Vec<_>>(), ["2024-03-04"]);
        assert_eq!(pivot.cell("Food", "2024-03-04"), 3.0);
    }

    #[test]
    fn test_total_row() {
        let txns = vec![
            txn(2024, 3, 1, 1.5, Currency::Gbp, "A"),
            txn(2024, 3, 2, 2.5, Currency::Gbp, "B"),
        ];
        let pivot = Pivot::build(&txns, Period::Month, &ConversionRates::default());
        let rows = read_rows(&pivot.render(true, Path::new("monthly_summary.csv")).unwrap());
        assert_eq!(rows.last().unwrap(), &vec!["Total", "4.00"]);
    }

    #[test]
    fn test_summary_is_idempotent() {
        let txns = vec![txn(2024, 3, 1, 9.99, Currency::Usd, "A")];
        let rates = ConversionRates::default();
        let dest = Path::new("monthly_summary.csv");
        let first = Pivot::build(&txns, Period::Month, &rates).render(false, dest).unwrap();
        let second = Pivot::build(&txns, Period::Month, &rates).render(false, dest).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_export_writes_selected_files() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions {
            monthly: true,
            weekly: true,
            full: false,
        };
        let txns = vec![txn(2024, 3, 1, 1.0, Currency::Gbp, "A")];
        let written = DataExporter::new(dir.path(), options).export(&txns).unwrap();
        assert_eq!(
            written,
            vec![dir.path().join(MONTHLY_SUMMARY_FILE), dir.path().join(WEEKLY_SUMMARY_FILE)]
        );
        assert!(!dir.path().join(FULL_REPORT_FILE).exists());
    }

    #[test]
    fn test_no_flags_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let options = ExportOptions {
            monthly: false,
            weekly: false,
            full: false,
        };
        let txns = vec![txn(2024, 3, 1, 1.0, Currency::Gbp, "A")];
        let written = DataExporter::new(&out, options).export(&txns).unwrap();
        assert!(written.is_empty());
        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_custom_rates() {
        let txns = vec![txn(2024, 3, 1, 10.0, Currency::Eur, "A")];
        let rates = ConversionRates {
            eur_to_gbp: 0.5,
            usd_to_gbp: 1.0,
        };
        let pivot = Pivot::build(&txns, Period::Month, &rates);
        assert_eq!(pivot.cell("A", "2024-03"), 5.0);
    }
}

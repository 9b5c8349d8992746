//! Load every `.csv` export in a directory into typed transactions.
//!
//! Column positions are sniffed per file from its header, so exports from
//! different banks can sit side by side. Problems are contained as narrowly
//! as possible: a bad row is skipped, a file without the required columns
//! is skipped, and only an unreadable directory fails the load.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use fincat_core::{Currency, CurrencySignal, SignConvention, Transaction};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::csv_line::{parse_header, parse_line, CsvColumns};
use crate::error::{ParseError, Result};
use crate::parse::{parse_amount, parse_date};

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));
static DESCRIPTION_CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(GBR|GBP|EUR|USD)\b").expect("currency token pattern"));
static ALPHANUMERIC_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{7,}$").expect("reference pattern"));

/// Filename tokens that carry no information about the account
const ORIGIN_NOISE: &[&str] = &["-", "Data", "Export"];

/// Loads statement exports from a single directory
pub struct DataLoader {
    directory: PathBuf,
}

impl DataLoader {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Parse every top-level `.csv` file, in file-name order, and return all
    /// transactions concatenated. An empty result is not an error here.
    pub fn load_and_preprocess(&self) -> Result<Vec<Transaction>> {
        let files = self.csv_files()?;
        if files.is_empty() {
            warn!(dir = %self.directory.display(), "no .csv files found");
        }

        let mut all = Vec::new();
        for path in &files {
            match load_file(path) {
                Ok(mut txns) => {
                    info!(file = %path.display(), count = txns.len(), "loaded statement");
                    all.append(&mut txns);
                }
                Err(e) => warn!(file = %path.display(), error = %e, "skipping file"),
            }
        }

        if all.is_empty() {
            warn!(dir = %self.directory.display(), "no transactions found in CSV files");
        }
        Ok(all)
    }

    fn csv_files(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.directory).map_err(|source| ParseError::Directory {
            path: self.directory.clone(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension() == Some(OsStr::new("csv")) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Parse one export file. A file whose header lacks a date, description or
/// amount column yields no transactions.
pub fn load_file(path: &Path) -> Result<Vec<Transaction>> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    let mut lines = text.lines();

    let Some(header) = lines.next() else {
        warn!(file = %path.display(), "empty file");
        return Ok(Vec::new());
    };

    let cols = parse_header(header);
    if !cols.has_required() {
        warn!(
            file = %path.display(),
            missing = ?cols.missing(),
            "required columns not found"
        );
        return Ok(Vec::new());
    }

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let origin = file_origin(&filename);

    let mut txns = Vec::new();
    for (idx, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = parse_line(line);
        match build_transaction(&fields, &cols, &origin) {
            Ok(txn) => txns.push(txn),
            // +2: one for the header, one for 1-based line numbers
            Err(e) => warn!(file = %path.display(), line = idx + 2, error = %e, "skipping row"),
        }
    }

    Ok(txns)
}

/// Short account label from an export filename.
///
/// `"Amex - Data Export.csv"` becomes `"Amex"`.
pub fn file_origin(basename: &str) -> String {
    basename
        .split(' ')
        .map(|part| part.strip_suffix(".csv").unwrap_or(part))
        .filter(|part| !part.is_empty() && !ORIGIN_NOISE.contains(part))
        .collect::<Vec<_>>()
        .join(" ")
}

/// AMEX exports record spend as positive amounts
pub fn sign_convention(file_origin: &str) -> SignConvention {
    let origin = file_origin.to_lowercase();
    if origin.contains("amex") || origin.contains("american express") {
        SignConvention::SpendPositive
    } else {
        SignConvention::SpendNegative
    }
}

/// Clean a raw description: drop quotes, cut at the first comma, collapse
/// whitespace, and pull out an embedded currency code.
pub fn clean_description(raw: &str) -> (String, Option<Currency>) {
    let unquoted = raw.replace('"', "");
    let head = unquoted.split(',').next().unwrap_or_default();
    let description = collapse_whitespace(head);

    match DESCRIPTION_CURRENCY.captures(&description) {
        Some(caps) => {
            let currency = Currency::from_token(&caps[1]);
            let stripped = DESCRIPTION_CURRENCY.replace_all(&description, "");
            (collapse_whitespace(&stripped), Some(currency))
        }
        None => (description, None),
    }
}

fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

/// Bank references ("401234567", "T 1253 000070", "FPX9A7QZ2") carry no
/// merchant text.
///
/// Used only when the row has a name: besides an empty description, a
/// purely numeric one, one with more than five digits, or a single
/// alphanumeric token of seven or more characters is replaced by the name.
fn looks_like_reference(description: &str) -> bool {
    let compact: String = description
        .chars()
        .filter(|c| *c != ' ' && *c != '.')
        .collect();
    let numeric = !compact.is_empty() && compact.chars().all(|c| c.is_ascii_digit());
    numeric
        || description.chars().filter(char::is_ascii_digit).count() > 5
        || ALPHANUMERIC_REFERENCE.is_match(description)
}

/// Build a transaction from one tokenized data row
pub fn build_transaction(fields: &[String], cols: &CsvColumns, origin: &str) -> Result<Transaction> {
    let needed = cols.min_fields();
    if fields.len() < needed {
        return Err(ParseError::TooFewFields {
            found: fields.len(),
            needed,
        });
    }
    let field = |col: Option<usize>| col.and_then(|i| fields.get(i)).map(String::as_str);

    let date = parse_date(field(cols.date).unwrap_or_default())?;
    let (mut description, desc_currency) = clean_description(field(cols.description).unwrap_or_default());
    let parsed = parse_amount(field(cols.amount).unwrap_or_default());

    // A currency named in the description beats anything in the amount
    // field, unless the amount itself could not be parsed
    let signal = match (desc_currency, parsed.signal) {
        (_, CurrencySignal::ParseFailed) => CurrencySignal::ParseFailed,
        (Some(c), _) => CurrencySignal::Detected(c),
        (None, signal) => signal,
    };

    let name = field(cols.name).unwrap_or_default();
    if !name.is_empty() && (description.is_empty() || looks_like_reference(&description)) {
        debug!(from = %description, to = name, "using name as description");
        description = name.to_string();
    }

    Ok(Transaction::new(date, origin, description, parsed.amount, signal)
        .with_convention(sign_convention(origin))
        .with_name(name)
        .with_transfers(field(cols.transfers).unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn cols() -> CsvColumns {
        parse_header("Date,Description,Amount,Name")
    }

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_file_origin() {
        assert_eq!(file_origin("Amex - Data Export.csv"), "Amex");
        assert_eq!(file_origin("Monzo Data Export - March.csv"), "Monzo March");
        assert_eq!(file_origin("statement.csv"), "statement");
        assert_eq!(file_origin("American Express.csv"), "American Express");
    }

    #[test]
    fn test_sign_convention_case_insensitive() {
        assert_eq!(sign_convention("Amex"), SignConvention::SpendPositive);
        assert_eq!(sign_convention("AMERICAN EXPRESS Gold"), SignConvention::SpendPositive);
        assert_eq!(sign_convention("Monzo"), SignConvention::SpendNegative);
    }

    #[test]
    fn test_clean_description_strips_currency_token() {
        let (desc, cur) = clean_description("  TESCO   STORES GBR ");
        assert_eq!(desc, "TESCO STORES");
        assert_eq!(cur, Some(Currency::Gbp));
    }

    #[test]
    fn test_clean_description_truncates_at_comma() {
        let (desc, cur) = clean_description("\"PRET A MANGER, LONDON EUR\"");
        assert_eq!(desc, "PRET A MANGER");
        assert_eq!(cur, None);
    }

    #[test]
    fn test_clean_description_token_must_be_whole_word() {
        let (desc, cur) = clean_description("EUROSTAR INTL");
        assert_eq!(desc, "EUROSTAR INTL");
        assert_eq!(cur, None);
    }

    #[test]
    fn test_build_amex_row() {
        let t = build_transaction(
            &row(&["01/03/2024", "TESCO STORES GBR", "-£45.00", ""]),
            &cols(),
            "Amex",
        )
        .unwrap();
        assert_eq!(t.description, "TESCO STORES");
        assert_eq!(t.currency, Currency::Gbp);
        assert_eq!(t.currency_signal, CurrencySignal::Detected(Currency::Gbp));
        assert_eq!(t.raw_amount, -45.0);
        assert_eq!(t.amount(), 45.0);
        assert_eq!(t.month_key, "2024-03");
    }

    #[test]
    fn test_description_currency_overrides_amount() {
        let t = build_transaction(&row(&["01/03/2024", "CAFE EUR", "$3.00", ""]), &cols(), "Revolut")
            .unwrap();
        assert_eq!(t.currency, Currency::Eur);
        assert_eq!(t.amount(), 3.0);
    }

    #[test]
    fn test_name_fills_empty_or_reference_description() {
        let t = build_transaction(&row(&["02/03/2024", "", "-5", "Joe Bloggs"]), &cols(), "Monzo")
            .unwrap();
        assert_eq!(t.description, "Joe Bloggs");
        assert_eq!(t.name, "Joe Bloggs");

        let t = build_transaction(
            &row(&["02/03/2024", "401234567", "-5", "Landlord Ltd"]),
            &cols(),
            "Monzo",
        )
        .unwrap();
        assert_eq!(t.description, "Landlord Ltd");
    }

    #[test]
    fn test_alphanumeric_reference_replaced_by_name() {
        let t = build_transaction(
            &row(&["02/03/2024", "FPX9A7QZ2", "-5", "Joe Bloggs"]),
            &cols(),
            "Monzo",
        )
        .unwrap();
        assert_eq!(t.description, "Joe Bloggs");

        // merchant text with spaces is kept
        let t = build_transaction(
            &row(&["02/03/2024", "PRET A MANGER", "-5", "Pret"]),
            &cols(),
            "Monzo",
        )
        .unwrap();
        assert_eq!(t.description, "PRET A MANGER");

        // short tokens are not references
        let t = build_transaction(&row(&["02/03/2024", "GYM24", "-5", "Gym"]), &cols(), "Monzo").unwrap();
        assert_eq!(t.description, "GYM24");
    }

    #[test]
    fn test_unparseable_amount_keeps_failure_over_description_currency() {
        let t = build_transaction(&row(&["01/03/2024", "CAFE EUR", "n/a", ""]), &cols(), "Revolut")
            .unwrap();
        assert_eq!(t.currency_signal, CurrencySignal::ParseFailed);
        assert_eq!(t.currency, Currency::Unknown);
        assert_eq!(t.raw_amount, 0.0);
        assert_eq!(t.description, "CAFE");
    }

    #[test]
    fn test_name_column_optional_in_row() {
        let t = build_transaction(&row(&["02/03/2024", "GYM", "-30"]), &cols(), "Monzo").unwrap();
        assert!(t.name.is_empty());
        assert_eq!(t.description, "GYM");
    }

    #[test]
    fn test_too_few_fields() {
        let err = build_transaction(&row(&["02/03/2024", "GYM"]), &cols(), "Monzo").unwrap_err();
        assert!(matches!(err, ParseError::TooFewFields { found: 2, needed: 3 }));
    }

    #[test]
    fn test_bad_date_is_error() {
        let err = build_transaction(&row(&["2024-03-02", "GYM", "-30"]), &cols(), "Monzo").unwrap_err();
        assert!(matches!(err, ParseError::InvalidDate(_)));
    }

    #[test]
    fn test_load_directory_skips_bad_rows_and_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Monzo Data Export.csv"),
            "Date,Name,Amount,Description\n\
             01/03/2024,Tesco,-12.50,TESCO METRO\n\
             not-a-date,X,-1,BAD\n\
             \n\
             03/03/2024,Cafe,€4.20,\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.csv"), "Reference,Memo\nabc,def\n").unwrap();
        fs::write(dir.path().join("ignored.txt"), "Date,Description,Amount\n01/03/2024,X,1\n").unwrap();

        let txns = DataLoader::new(dir.path()).load_and_preprocess().unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].file_origin, "Monzo");
        assert_eq!(txns[0].description, "TESCO METRO");
        assert_eq!(txns[1].description, "Cafe");
        assert_eq!(txns[1].currency, Currency::Eur);
        assert_eq!(txns[1].date, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
    }

    #[test]
    fn test_load_empty_directory_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let txns = DataLoader::new(dir.path()).load_and_preprocess().unwrap();
        assert!(txns.is_empty());
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataLoader::new(dir.path().join("nope")).load_and_preprocess().unwrap_err();
        assert!(matches!(err, ParseError::Directory { .. }));
    }
}

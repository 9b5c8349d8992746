use std::path::PathBuf;

use fincat_core::ConversionRates;
use serde::{Deserialize, Serialize};

use crate::categorise::MatchStrategy;
use crate::export::ExportOptions;

/// Everything one pipeline run needs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessorConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_keyword_file")]
    pub keyword_file: PathBuf,
    #[serde(default)]
    pub match_strategy: MatchStrategy,
    /// Append a `Total` row to the period summaries
    #[serde(default)]
    pub summary_total_row: bool,
    #[serde(default)]
    pub exports: ExportOptions,
    #[serde(default)]
    pub rates: ConversionRates,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("files_to_categorise")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("files_categorised")
}

fn default_keyword_file() -> PathBuf {
    PathBuf::from("categorisation_keywords.csv")
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            keyword_file: default_keyword_file(),
            match_strategy: MatchStrategy::default(),
            summary_total_row: false,
            exports: ExportOptions::default(),
            rates: ConversionRates::default(),
        }
    }
}

impl ProcessorConfig {
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        keyword_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            keyword_file: keyword_file.into(),
            ..Self::default()
        }
    }

    pub fn with_exports(mut self, exports: ExportOptions) -> Self {
        self.exports = exports;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ProcessorConfig::default();
        assert_eq!(cfg.input_dir, PathBuf::from("files_to_categorise"));
        assert_eq!(cfg.output_dir, PathBuf::from("files_categorised"));
        assert_eq!(cfg.keyword_file, PathBuf::from("categorisation_keywords.csv"));
        assert!(cfg.exports.monthly && cfg.exports.full && !cfg.exports.weekly);
        assert_eq!(cfg.match_strategy, MatchStrategy::LongestKeyword);
        assert!(!cfg.summary_total_row);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let cfg: ProcessorConfig =
            serde_json::from_str(r#"{"input_dir": "in", "match_strategy": "first-defined"}"#).unwrap();
        assert_eq!(cfg.input_dir, PathBuf::from("in"));
        assert_eq!(cfg.output_dir, PathBuf::from("files_categorised"));
        assert_eq!(cfg.match_strategy, MatchStrategy::FirstDefined);
        assert_eq!(cfg.rates.eur_to_gbp, 0.86);
    }
}

use std::path::PathBuf;

use fincat_ingest::ParseError;
use thiserror::Error;

/// Errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("could not open keyword mapping file {}: {source}", path.display())]
    KeywordFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no keywords loaded from {}", path.display())]
    NoKeywords { path: PathBuf },

    #[error("failed to load transactions: {0}")]
    Load(#[from] ParseError),

    #[error("no transaction data found in {}", path.display())]
    NoTransactions { path: PathBuf },

    #[error("cannot create directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

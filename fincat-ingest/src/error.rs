use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid date '{0}' (expected DD/MM/YYYY)")]
    InvalidDate(String),

    #[error("row has {found} fields, need at least {needed}")]
    TooFewFields { found: usize, needed: usize },

    #[error("cannot read directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ParseError>;

//! fincat-ingest: CSV tokenizing, header sniffing, field parsing and directory loading.

pub mod csv_line;
pub mod error;
pub mod loader;
pub mod parse;

pub use csv_line::{parse_header, parse_line, CsvColumns};
pub use error::ParseError;
pub use loader::{file_origin, DataLoader};
pub use parse::{extract_month, parse_amount, parse_date, ParsedAmount};

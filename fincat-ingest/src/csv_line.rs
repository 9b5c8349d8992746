//! Quote-aware line tokenizer and header sniffing for statement exports.
//!
//! This is deliberately looser than RFC 4180: quote characters only toggle
//! whether commas split, and are dropped from the output. `""` escapes get
//! no special treatment.

const FIELD_WHITESPACE: &[char] = &[' ', '\t', '\r', '\n'];

/// Column positions sniffed from a header row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CsvColumns {
    pub date: Option<usize>,
    pub description: Option<usize>,
    pub amount: Option<usize>,
    pub name: Option<usize>,
    pub transfers: Option<usize>,
}

impl CsvColumns {
    /// Date, description and amount are all required to load a file
    pub fn has_required(&self) -> bool {
        self.date.is_some() && self.description.is_some() && self.amount.is_some()
    }

    /// Minimum field count a data row needs for the required columns
    pub fn min_fields(&self) -> usize {
        [self.date, self.description, self.amount]
            .into_iter()
            .flatten()
            .max()
            .map_or(0, |i| i + 1)
    }

    /// Names of required columns that were not found
    pub fn missing(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.date.is_none() {
            out.push("date");
        }
        if self.description.is_none() {
            out.push("description");
        }
        if self.amount.is_none() {
            out.push("amount");
        }
        out
    }
}

/// Split a line on commas outside double quotes, dropping the quotes and
/// trimming each field.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim_matches(FIELD_WHITESPACE).to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim_matches(FIELD_WHITESPACE).to_string());

    fields
}

/// Sniff column roles from a header line by substring match.
///
/// Each field is checked against the roles in order (date, description,
/// amount, name, transfers) and takes the first role it matches. When
/// several fields match the same role, the leftmost wins.
pub fn parse_header(header_line: &str) -> CsvColumns {
    let header_line = header_line.strip_prefix('\u{feff}').unwrap_or(header_line);
    let mut cols = CsvColumns::default();

    for (i, raw) in parse_line(header_line).iter().enumerate() {
        let field: String = raw
            .to_lowercase()
            .chars()
            .filter(|c| *c != '"' && *c != ' ')
            .collect();

        let slot = if field.contains("date") {
            &mut cols.date
        } else if field.contains("description")
            || field.contains("merchant")
            || field.contains("details")
        {
            &mut cols.description
        } else if field.contains("amount") || field.contains("value") {
            &mut cols.amount
        } else if field.contains("name") {
            &mut cols.name
        } else if field.contains("transfer") {
            &mut cols.transfers
        } else {
            continue;
        };

        if slot.is_none() {
            *slot = Some(i);
        }
    }

    cols
}

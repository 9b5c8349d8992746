//! Keyword mapping file: `category,keyword` rows after a header line.

use std::fs;
use std::path::Path;

use fincat_ingest::parse_line;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};

/// One lower-cased keyword and the category it maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    pub keyword: String,
    pub category: String,
}

/// Keyword rules in the order they were first defined
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordRules {
    rules: Vec<KeywordRule>,
}

impl KeywordRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule. The keyword is lower-cased; a repeated keyword keeps its
    /// original position and takes the newer category. Empty keywords or
    /// categories are ignored.
    pub fn insert(&mut self, keyword: &str, category: &str) {
        let keyword = keyword.trim().to_lowercase();
        let category = category.trim();
        if keyword.is_empty() || category.is_empty() {
            return;
        }

        match self.rules.iter_mut().find(|r| r.keyword == keyword) {
            Some(existing) => existing.category = category.to_string(),
            None => self.rules.push(KeywordRule {
                keyword,
                category: category.to_string(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeywordRule> {
        self.rules.iter()
    }

    /// Category for an exact keyword, if defined
    pub fn get(&self, keyword: &str) -> Option<&str> {
        let keyword = keyword.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.keyword == keyword)
            .map(|r| r.category.as_str())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for KeywordRules {
    /// Build from `(keyword, category)` pairs
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut rules = KeywordRules::new();
        for (keyword, category) in iter {
            rules.insert(keyword, category);
        }
        rules
    }
}

/// Parse keyword file contents. The first line is always treated as a header.
pub fn parse_keywords(text: &str) -> KeywordRules {
    let mut rules = KeywordRules::new();
    for line in text.lines().skip(1) {
        let fields = parse_line(line);
        if fields.len() < 2 {
            continue;
        }
        if fields[0].is_empty() || fields[1].is_empty() {
            debug!(line = line, "ignoring keyword row with an empty field");
            continue;
        }
        rules.insert(&fields[1], &fields[0]);
    }
    rules
}

/// Load the keyword mapping file. Fails if it cannot be read or defines no
/// keywords.
pub fn load_keywords(path: &Path) -> Result<KeywordRules> {
    let bytes = fs::read(path).map_err(|source| PipelineError::KeywordFileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let rules = parse_keywords(&String::from_utf8_lossy(&bytes));

    if rules.is_empty() {
        return Err(PipelineError::NoKeywords {
            path: path.to_path_buf(),
        });
    }

    info!(file = %path.display(), count = rules.len(), "loaded keywords");
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_header_and_lowercases() {
        let rules = parse_keywords("Category,Keyword\nGroceries,TESCO\nTransport,tfl,extra\n");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.get("tesco"), Some("Groceries"));
        assert_eq!(rules.get("TFL"), Some("Transport"));
    }

    #[test]
    fn test_header_skipped_even_if_it_looks_like_data() {
        let rules = parse_keywords("Groceries,tesco\nTransport,tfl\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.get("tesco"), None);
    }

    #[test]
    fn test_last_write_wins_keeps_position() {
        let rules = parse_keywords("c,k\nFood,pret\nShops,boots\nCoffee,PRET\n");
        let order: Vec<_> = rules.iter().map(|r| (r.keyword.as_str(), r.category.as_str())).collect();
        assert_eq!(order, vec![("pret", "Coffee"), ("boots", "Shops")]);
    }

    #[test]
    fn test_short_and_empty_rows_ignored() {
        let rules = parse_keywords("c,k\nlonely\n,orphan\nEmpty,\nBills,\"octopus, energy\"\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.get("octopus, energy"), Some("Bills"));
    }

    #[test]
    fn test_from_pairs() {
        let rules: KeywordRules = [("Tesco", "Groceries"), ("tfl", "Transport")].into_iter().collect();
        assert_eq!(rules.get("tesco"), Some("Groceries"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_keywords(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::KeywordFileUnreadable { .. }));
    }

    #[test]
    fn test_load_header_only_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.csv");
        fs::write(&path, "Category,Keyword\n").unwrap();
        let err = load_keywords(&path).unwrap_err();
        assert!(matches!(err, PipelineError::NoKeywords { .. }));
    }
}

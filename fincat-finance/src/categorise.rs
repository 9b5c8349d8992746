//! Keyword categorisation of loaded transactions.
//!
//! Matching is a case-insensitive substring search: description first, then
//! name, then transfers. When several keywords match the same text the
//! winner is picked by [`MatchStrategy`], never by hash order.

use std::str::FromStr;

use fincat_core::{Transaction, CREDIT_CARD_CATEGORY, UNCATEGORISED};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::keywords::KeywordRules;

/// How to choose between several matching keywords
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    /// Longest matching keyword; equal lengths go to the earlier rule
    #[default]
    LongestKeyword,
    /// First rule in keyword-file order
    FirstDefined,
}

impl FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "longest" | "longest-keyword" => Ok(MatchStrategy::LongestKeyword),
            "first" | "first-defined" => Ok(MatchStrategy::FirstDefined),
            other => Err(format!("unknown match strategy '{other}' (expected longest or first)")),
        }
    }
}

/// Counts from one categorisation pass
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct CategorisationStats {
    pub matched: usize,
    pub uncategorised: usize,
    pub repayments: usize,
}

/// Credit-card repayments show up as spend in the source data: a
/// "Credit card" row whose description mentions AMEX or a received payment.
pub fn is_card_repayment(category: &str, description: &str) -> bool {
    if category != CREDIT_CARD_CATEGORY {
        return false;
    }
    let desc = description.to_lowercase();
    desc.contains("amex") || desc.contains("payment received")
}

pub struct Categoriser {
    rules: KeywordRules,
    strategy: MatchStrategy,
}

impl Categoriser {
    pub fn new(rules: KeywordRules, strategy: MatchStrategy) -> Self {
        Self { rules, strategy }
    }

    /// Category of the winning keyword found in `text`, if any
    pub fn find_category(&self, text: &str) -> Option<&str> {
        if text.is_empty() {
            return None;
        }
        let text = text.to_lowercase();
        let mut matches = self.rules.iter().filter(|r| text.contains(r.keyword.as_str()));

        let winner = match self.strategy {
            MatchStrategy::FirstDefined => matches.next(),
            // strict `>` keeps the earlier rule on equal lengths
            MatchStrategy::LongestKeyword => matches.reduce(|best, rule| {
                if rule.keyword.len() > best.keyword.len() {
                    rule
                } else {
                    best
                }
            }),
        };
        winner.map(|r| r.category.as_str())
    }

    /// Assign a category in place and mark card repayments.
    ///
    /// Running this twice on the same transaction gives the same result.
    pub fn categorise(&self, txn: &mut Transaction) {
        let category = [&txn.description, &txn.name, &txn.transfers]
            .into_iter()
            .find_map(|text| self.find_category(text))
            .unwrap_or(UNCATEGORISED)
            .to_string();

        txn.kind.card_repayment = is_card_repayment(&category, &txn.description);
        if txn.kind.card_repayment {
            debug!(description = %txn.description, "credit card repayment");
        }
        txn.category = category;
    }

    /// Categorise every transaction in place
    pub fn categorise_all(&self, txns: &mut [Transaction]) -> CategorisationStats {
        let mut stats = CategorisationStats::default();
        for txn in txns.iter_mut() {
            self.categorise(txn);
            if txn.category == UNCATEGORISED {
                stats.uncategorised += 1;
            } else {
                stats.matched += 1;
            }
            if txn.kind.card_repayment {
                stats.repayments += 1;
            }
        }
        stats
    }
}

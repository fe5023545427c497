//! Workout text parsing.
//!
//! Turns one line of free text into the ordered set records of an entry:
//! segment into clauses, run each clause through the rules, and concatenate
//! the results in clause order.

use crate::aliases::{default_aliases, AliasTable};
use crate::rules::{default_rules, RuleSet};
use crate::segment::segment_with;
use crate::{Entry, SetRecord};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Parse a line of workout text using the built-in rules and aliases
///
/// Never fails: unrecognised clauses become bare records, and empty or
/// delimiter-only input yields no records.
pub fn parse(text: &str) -> Vec<SetRecord> {
    parse_with(text, default_rules(), default_aliases())
}

/// Parse with an explicit rule set and alias table
pub fn parse_with(text: &str, rules: &RuleSet, aliases: &AliasTable) -> Vec<SetRecord> {
    let clauses = segment_with(text, rules, aliases);
    let mut records = Vec::new();
    let mut fallbacks = 0;

    for clause in &clauses {
        let outcome = rules.match_clause(clause, aliases);
        if outcome.is_fallback() {
            fallbacks += 1;
        }
        records.extend(outcome.into_records());
    }

    tracing::debug!(
        "Parsed {} clauses into {} records ({} unrecognised)",
        clauses.len(),
        records.len(),
        fallbacks
    );

    records
}

impl Entry {
    /// Parse `raw_text` into a new entry stamped at `logged_at`
    pub fn new(raw_text: impl Into<String>, logged_at: DateTime<Utc>) -> Self {
        let raw_text = raw_text.into();
        let sets = parse(&raw_text);
        Self {
            id: Uuid::new_v4(),
            logged_at,
            raw_text,
            sets,
        }
    }
}

//! Ordered grammar rules for a single clause.
//!
//! Each rule is a pattern plus a handler that expands the match into one or
//! more set records. Rules are tried in order and the first one that matches
//! wins. Several patterns overlap, so the order below is load-bearing:
//!
//! 1. `<exercise> <N>x<R>@<weight>[unit]`  N sets of R reps
//! 2. `<exercise> <weight>[unit] x <R>`   one set
//! 3. `<exercise> <weight>[unit] <R1,R2,...>`  one set per listed rep count
//! 4. `<exercise> <weight>x<R>x<N>`  weight in kg, N sets of R reps
//! 5. `<run|walk|cycle> <distance><km|k|m> [mm:ss]`  one cardio record
//!
//! A clause that no rule accepts becomes a fallback record holding only the
//! alias-resolved clause text.

use crate::aliases::{default_aliases, AliasTable};
use crate::units::{distance_to_km, normalize_unit, parse_clock, to_kg};
use crate::SetRecord;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Largest set count a single clause may expand into
pub const MAX_SETS_PER_CLAUSE: usize = 1000;

/// Name of the `<weight> <R1,R2,...>` rule
pub const REP_LIST_RULE: &str = "weight_rep_list";

const WEIGHT: &str = r"(?P<wt>[0-9]+(?:\.[0-9]+)?)\s*(?P<wunit>kg|kgs|lb|lbs)?";

/// Cached default rule set
static DEFAULT_RULES: Lazy<RuleSet> = Lazy::new(RuleSet::standard);

/// Get a reference to the cached default rule set
pub fn default_rules() -> &'static RuleSet {
    &DEFAULT_RULES
}

/// Match a clause against the default rules and built-in aliases
pub fn match_clause(clause: &str) -> ClauseOutcome {
    DEFAULT_RULES.match_clause(clause, default_aliases())
}

/// Result of running the rules over one clause
#[derive(Clone, Debug, PartialEq)]
pub enum ClauseOutcome {
    /// A rule matched; records are in expansion order
    Matched {
        rule: &'static str,
        records: Vec<SetRecord>,
    },
    /// Nothing matched; the clause is kept as a bare record
    Fallback(SetRecord),
}

impl ClauseOutcome {
    pub fn into_records(self) -> Vec<SetRecord> {
        match self {
            ClauseOutcome::Matched { records, .. } => records,
            ClauseOutcome::Fallback(record) => vec![record],
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ClauseOutcome::Fallback(_))
    }
}

type Handler = fn(&Captures<'_>, &AliasTable) -> Option<Vec<SetRecord>>;

/// One grammar rule: a pattern and the expansion applied to its captures
///
/// A handler returning `None` (e.g. a number too large to represent) means
/// the rule does not apply and the next rule is tried.
pub struct Rule {
    name: &'static str,
    pattern: Regex,
    handler: Handler,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, handler: Handler) -> Self {
        let pattern = Regex::new(pattern).expect("built-in rule patterns are covered by tests");
        Self {
            name,
            pattern,
            handler,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, clause: &str, aliases: &AliasTable) -> Option<Vec<SetRecord>> {
        let caps = self.pattern.captures(clause)?;
        (self.handler)(&caps, aliases)
    }
}

/// Fixed, ordered list of rules with first-match-wins semantics
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// The standard rule list, in priority order
    pub fn standard() -> Self {
        let rules = vec![
            Rule::new(
                "sets_x_reps_at_weight",
                &format!(r"^(?P<ex>.+?)\s+(?P<sets>[0-9]+)x(?P<reps>[0-9]+)\s*@\s*{WEIGHT}$"),
                sets_x_reps_at_weight,
            ),
            Rule::new(
                "weight_x_reps",
                &format!(r"^(?P<ex>.+?)\s+{WEIGHT}\s*x\s*(?P<reps>[0-9]+)$"),
                weight_x_reps,
            ),
            Rule::new(
                REP_LIST_RULE,
                &format!(r"^(?P<ex>.+?)\s+{WEIGHT}\s+(?P<list>(?:[0-9]+\s*,\s*)*[0-9]+)$"),
                weight_rep_list,
            ),
            Rule::new(
                "weight_x_reps_x_sets",
                r"^(?P<ex>.+?)\s+(?P<wt>[0-9]+(?:\.[0-9]+)?)x(?P<reps>[0-9]+)x(?P<sets>[0-9]+)$",
                weight_x_reps_x_sets,
            ),
            Rule::new(
                "cardio_distance",
                r"^(?P<ex>run|walk|cycle)\s+(?P<dist>[0-9]+(?:\.[0-9]+)?)\s*(?P<dunit>km|k|m)(?:\s+(?P<time>[0-9]{1,2}:[0-9]{2}))?$",
                cardio_distance,
            ),
        ];
        Self { rules }
    }

    /// Rule names in priority order
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(Rule::name).collect()
    }

    /// Try each rule in order against the lowercased clause
    pub fn match_clause(&self, clause: &str, aliases: &AliasTable) -> ClauseOutcome {
        match self.first_match(clause, aliases) {
            Some((rule, records)) => {
                tracing::trace!(
                    "Clause {:?} matched rule {} ({} records)",
                    clause,
                    rule,
                    records.len()
                );
                ClauseOutcome::Matched { rule, records }
            }
            None => {
                tracing::debug!("No rule matched clause {:?}, keeping it as a note", clause);
                ClauseOutcome::Fallback(SetRecord::fallback(aliases.canonical(clause)))
            }
        }
    }

    /// True if `clause` would be claimed by the rep-list rule
    ///
    /// Used by the segmenter to decide whether a comma continues a rep list.
    pub fn matches_rep_list(&self, clause: &str, aliases: &AliasTable) -> bool {
        matches!(
            self.first_match(clause, aliases),
            Some((REP_LIST_RULE, _))
        )
    }

    fn first_match(
        &self,
        clause: &str,
        aliases: &AliasTable,
    ) -> Option<(&'static str, Vec<SetRecord>)> {
        let lowered = clause.to_lowercase();
        self.rules
            .iter()
            .find_map(|rule| rule.apply(&lowered, aliases).map(|records| (rule.name, records)))
    }
}

// ============================================================================
// Handlers
// ============================================================================

fn sets_x_reps_at_weight(caps: &Captures<'_>, aliases: &AliasTable) -> Option<Vec<SetRecord>> {
    let sets = set_count(&caps["sets"])?;
    let reps = caps["reps"].parse().ok()?;
    let weight_kg = weight_kg(caps)?;
    let record = SetRecord::strength(aliases.canonical(&caps["ex"]), reps, weight_kg);
    Some(vec![record; sets])
}

fn weight_x_reps(caps: &Captures<'_>, aliases: &AliasTable) -> Option<Vec<SetRecord>> {
    let reps = caps["reps"].parse().ok()?;
    let weight_kg = weight_kg(caps)?;
    Some(vec![SetRecord::strength(
        aliases.canonical(&caps["ex"]),
        reps,
        weight_kg,
    )])
}

fn weight_rep_list(caps: &Captures<'_>, aliases: &AliasTable) -> Option<Vec<SetRecord>> {
    let weight_kg = weight_kg(caps)?;
    let exercise = aliases.canonical(&caps["ex"]);
    caps["list"]
        .split(',')
        .map(|reps| {
            let reps = reps.trim().parse().ok()?;
            Some(SetRecord::strength(exercise.clone(), reps, weight_kg))
        })
        .collect()
}

fn weight_x_reps_x_sets(caps: &Captures<'_>, aliases: &AliasTable) -> Option<Vec<SetRecord>> {
    // No unit suffix in this notation; the weight is kilograms.
    let weight_kg: f64 = caps["wt"].parse().ok()?;
    let reps = caps["reps"].parse().ok()?;
    let sets = set_count(&caps["sets"])?;
    let record = SetRecord::strength(aliases.canonical(&caps["ex"]), reps, weight_kg);
    Some(vec![record; sets])
}

fn cardio_distance(caps: &Captures<'_>, aliases: &AliasTable) -> Option<Vec<SetRecord>> {
    let distance: f64 = caps["dist"].parse().ok()?;
    let distance_km = distance_to_km(distance, &caps["dunit"]);
    let duration_sec = match caps.name("time") {
        Some(time) => Some(parse_clock(time.as_str())?),
        None => None,
    };
    Some(vec![SetRecord::cardio(
        aliases.canonical(&caps["ex"]),
        distance_km,
        duration_sec,
    )])
}

fn weight_kg(caps: &Captures<'_>) -> Option<f64> {
    let value: f64 = caps["wt"].parse().ok()?;
    let unit = caps
        .name("wunit")
        .map(|unit| normalize_unit(unit.as_str()))
        .unwrap_or_default();
    Some(to_kg(value, unit))
}

/// Parse a set count, refusing zero and anything past the expansion bound
fn set_count(token: &str) -> Option<usize> {
    let sets: usize = token.parse().ok()?;
    (1..=MAX_SETS_PER_CLAUSE).contains(&sets).then_some(sets)
}

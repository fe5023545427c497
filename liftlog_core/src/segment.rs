//! Clause segmentation.
//!
//! A line of workout text is split into independent clauses on `,`, `|` and
//! `;`. Pieces are trimmed and empty pieces dropped.
//!
//! A comma followed by nothing but a number may continue a rep list
//! ("squat 100 8,8,6"). The number is re-attached only when the joined
//! clause is one the rep-list rule would claim, so a clause that already
//! parses on its own ("bench 60 x 10, 10") is never swallowed.

use crate::aliases::{default_aliases, AliasTable};
use crate::rules::{default_rules, RuleSet};

const DELIMITERS: [char; 3] = [',', '|', ';'];

/// Split `text` into ordered, trimmed, non-empty clauses
pub fn segment(text: &str) -> Vec<String> {
    segment_with(text, default_rules(), default_aliases())
}

/// Split `text`, deciding rep-list continuations against `rules`
pub fn segment_with(text: &str, rules: &RuleSet, aliases: &AliasTable) -> Vec<String> {
    let mut clauses: Vec<String> = Vec::new();
    let mut start = 0;
    let mut delimiter_before: Option<char> = None;

    for (i, c) in text.char_indices() {
        if DELIMITERS.contains(&c) {
            push_piece(&mut clauses, &text[start..i], delimiter_before, rules, aliases);
            delimiter_before = Some(c);
            start = i + c.len_utf8();
        }
    }
    push_piece(&mut clauses, &text[start..], delimiter_before, rules, aliases);

    clauses
}

fn push_piece(
    clauses: &mut Vec<String>,
    piece: &str,
    delimiter_before: Option<char>,
    rules: &RuleSet,
    aliases: &AliasTable,
) {
    let piece = piece.trim();
    if piece.is_empty() {
        return;
    }

    if delimiter_before == Some(',') && is_bare_number(piece) {
        if let Some(last) = clauses.last_mut() {
            let joined = format!("{},{}", last, piece);
            if rules.matches_rep_list(&joined, aliases) {
                *last = joined;
                return;
            }
        }
    }

    clauses.push(piece.to_string());
}

fn is_bare_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_all_delimiters() {
        assert_eq!(
            segment("bench press 3x10@60kg, run 5km | stretching; dl 100x5x3"),
            vec!["bench press 3x10@60kg", "run 5km", "stretching", "dl 100x5x3"]
        );
    }

    #[test]
    fn test_no_delimiter_yields_single_trimmed_clause() {
        assert_eq!(segment("  bp 60kg x 10  "), vec!["bp 60kg x 10"]);
    }

    #[test]
    fn test_empty_and_delimiter_only_inputs() {
        assert!(segment("").is_empty());
        assert!(segment("   ").is_empty());
        assert!(segment(",,|;  ;").is_empty());
    }

    #[test]
    fn test_empty_pieces_dropped_order_kept() {
        assert_eq!(segment("a,, b ;|c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_rep_list_reattached() {
        assert_eq!(segment("squat 100 8,8,6"), vec!["squat 100 8,8,6"]);
        assert_eq!(segment("squat 100 8, 8, 6"), vec!["squat 100 8,8,6"]);
        assert_eq!(
            segment("squat 100 8,8,6, bench 60 10,9"),
            vec!["squat 100 8,8,6", "bench 60 10,9"]
        );
    }

    #[test]
    fn test_numbers_after_pipe_or_semicolon_stay_separate() {
        assert_eq!(segment("squat 100 8|8"), vec!["squat 100 8", "8"]);
        assert_eq!(segment("squat 100 8;8"), vec!["squat 100 8", "8"]);
    }

    #[test]
    fn test_complete_clause_is_not_merged_into_rep_list() {
        assert_eq!(segment("bench 60 x 10, 10"), vec!["bench 60 x 10", "10"]);
        assert_eq!(segment("bench 60kg x 10, 8"), vec!["bench 60kg x 10", "8"]);
        assert_eq!(segment("stretching, 5"), vec!["stretching", "5"]);
    }

    #[test]
    fn test_segment_with_explicit_rule_set() {
        let aliases = AliasTable::from_pairs([("rdl", "romanian deadlift")]);
        assert_eq!(
            segment_with("RDL 80 8, 8", default_rules(), &aliases),
            vec!["RDL 80 8,8"]
        );
    }

    #[test]
    fn test_number_after_non_numeric_clause_stays_separate() {
        assert_eq!(segment("bench 3x10@60kg, 5"), vec!["bench 3x10@60kg", "5"]);
        assert_eq!(segment("dl 100x5x3, 5"), vec!["dl 100x5x3", "5"]);
    }
}

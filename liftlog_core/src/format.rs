//! Human-readable rendering of set records.
//!
//! Records are grouped by exercise in order of first appearance. A group of
//! identical strength sets collapses to one line (`3×10 @ 60 kg`); any other
//! group lists its sets one per line. A tonnage line closes the summary when
//! there was any loaded volume.

use crate::units::{format_quantity, to_display};
use crate::{MassUnit, SetRecord};
use std::collections::HashMap;

const LOGGED_BULLET: &str = "✅";
const LAST_BULLET: &str = "🕘";
const TONNAGE_BULLET: &str = "📦";

/// Render records as the confirmation shown after logging
pub fn format(records: &[SetRecord], unit: MassUnit) -> String {
    let mut lines = render_groups(records, unit, LOGGED_BULLET);
    if let Some(line) = tonnage_line(records, unit) {
        lines.push(line);
    }
    lines.join("\n")
}

/// Render a previous session's records, without the tonnage line
pub fn format_last(records: &[SetRecord], unit: MassUnit) -> String {
    render_groups(records, unit, LAST_BULLET).join("\n")
}

/// Group records by exercise, keeping the order each exercise first appears
pub fn group_by_exercise(records: &[SetRecord]) -> Vec<(&str, Vec<&SetRecord>)> {
    let mut groups: Vec<(&str, Vec<&SetRecord>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let exercise = record.exercise.as_str();
        match index.get(exercise) {
            Some(&i) => groups[i].1.push(record),
            None => {
                index.insert(exercise, groups.len());
                groups.push((exercise, vec![record]));
            }
        }
    }

    groups
}

/// Sum of `reps * weight_kg` over records carrying both
pub fn tonnage_kg(records: &[SetRecord]) -> f64 {
    records.iter().filter_map(SetRecord::volume_kg).sum()
}

/// `(reps, weight_kg)` shared by every set of the group, if there is one
///
/// Every record must carry both reps and weight, and all of them must agree.
fn compact_form(group: &[&SetRecord]) -> Option<(u32, f64)> {
    let first = group.first()?;
    let reps = first.reps?;
    let weight_kg = first.weight_kg?;

    group
        .iter()
        .all(|r| r.reps == Some(reps) && r.weight_kg == Some(weight_kg))
        .then_some((reps, weight_kg))
}

fn render_groups(records: &[SetRecord], unit: MassUnit, bullet: &str) -> Vec<String> {
    let mut lines = Vec::new();

    for (exercise, group) in group_by_exercise(records) {
        let title = title_case(exercise);

        if let Some((reps, weight_kg)) = compact_form(&group) {
            lines.push(format!(
                "{} {}: {}×{} @ {} {}",
                bullet,
                title,
                group.len(),
                reps,
                format_quantity(to_display(weight_kg, unit)),
                unit
            ));
            continue;
        }

        for record in group {
            let mut parts = Vec::new();
            if let Some(reps) = record.reps {
                parts.push(format!("{} reps", reps));
            }
            if let Some(weight_kg) = record.weight_kg {
                parts.push(format!(
                    "@ {} {}",
                    format_quantity(to_display(weight_kg, unit)),
                    unit
                ));
            }
            let detail = if parts.is_empty() {
                "logged".to_string()
            } else {
                parts.join(" ")
            };
            lines.push(format!("{} {}: {}", bullet, title, detail));
        }
    }

    lines
}

fn tonnage_line(records: &[SetRecord], unit: MassUnit) -> Option<String> {
    let tonnage = tonnage_kg(records);
    if tonnage <= 0.0 {
        return None;
    }
    Some(format!(
        "{} Tonnage: {} {}·reps",
        TONNAGE_BULLET,
        format_quantity(to_display(tonnage, unit)),
        unit
    ))
}

/// Capitalise the first letter of each word for display
pub fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

//! Session history queries: the last session and period summaries.

use crate::aliases::canonical;
use crate::format::{format_last, title_case, tonnage_kg};
use crate::units::{format_quantity, to_display};
use crate::{Entry, MassUnit, SetRecord, SummaryRange};
use chrono::{DateTime, Datelike, Duration, Utc};

/// Aggregate figures for the entries inside one summary range
#[derive(Clone, Debug, PartialEq)]
pub struct PeriodSummary {
    pub range: SummaryRange,
    pub sessions: usize,
    pub tonnage_kg: f64,
    /// Heaviest single stored weight in range, with its exercise
    pub top_lift: Option<(String, f64)>,
}

impl PeriodSummary {
    /// Render as a single line in the display unit
    ///
    /// Only the weekly summary reports a top lift.
    pub fn render(&self, unit: MassUnit) -> String {
        let mut line = format!(
            "📅 {} | Sessions: {} | Tonnage: {} {}·reps",
            self.range.label(),
            self.sessions,
            format_quantity(to_display(self.tonnage_kg, unit)),
            unit
        );

        if self.range == SummaryRange::Week {
            let top = match &self.top_lift {
                Some((exercise, weight_kg)) => format!(
                    "{} {} {}",
                    title_case(exercise),
                    format_quantity(to_display(*weight_kg, unit)),
                    unit
                ),
                None => "-".to_string(),
            };
            line.push_str(&format!(" | Top: {}", top));
        }

        line
    }
}

/// True if `logged_at` falls inside `range` as seen at `now`
pub fn in_range(logged_at: DateTime<Utc>, range: SummaryRange, now: DateTime<Utc>) -> bool {
    match range {
        SummaryRange::Today => logged_at.date_naive() == now.date_naive(),
        SummaryRange::Week => logged_at >= now - Duration::days(7),
        SummaryRange::Month => {
            logged_at.year() == now.year() && logged_at.month() == now.month()
        }
    }
}

/// Summarize the entries that fall inside `range`
pub fn summarize(entries: &[Entry], range: SummaryRange, now: DateTime<Utc>) -> PeriodSummary {
    let in_scope: Vec<&Entry> = entries
        .iter()
        .filter(|e| in_range(e.logged_at, range, now))
        .collect();

    let sets: Vec<SetRecord> = in_scope
        .iter()
        .flat_map(|e| e.sets.iter().cloned())
        .collect();

    let mut top_lift: Option<(String, f64)> = None;
    for set in &sets {
        if let Some(weight_kg) = set.weight_kg {
            let heavier = match &top_lift {
                Some((_, best)) => weight_kg > *best,
                None => true,
            };
            if heavier {
                top_lift = Some((set.exercise.clone(), weight_kg));
            }
        }
    }

    tracing::debug!(
        "Summarized {} of {} entries for {:?}",
        in_scope.len(),
        entries.len(),
        range
    );

    PeriodSummary {
        range,
        sessions: in_scope.len(),
        tonnage_kg: tonnage_kg(&sets),
        top_lift,
    }
}

/// Records of the most recent session, optionally for one exercise only
///
/// With an exercise, the most recent entry containing that exercise (after
/// alias resolution) is chosen and only its sets of that exercise returned.
/// On equal timestamps the later entry wins.
pub fn last_session(entries: &[Entry], exercise: Option<&str>) -> Option<Vec<SetRecord>> {
    let exercise = exercise.map(canonical);

    let latest = entries
        .iter()
        .filter(|e| match &exercise {
            Some(name) => e.has_exercise(name),
            None => !e.sets.is_empty(),
        })
        .fold(None::<&Entry>, |best, e| match best {
            Some(b) if b.logged_at > e.logged_at => Some(b),
            _ => Some(e),
        })?;

    let sets = latest
        .sets
        .iter()
        .filter(|s| exercise.as_deref().map_or(true, |name| s.exercise == name))
        .cloned()
        .collect();
    Some(sets)
}

/// Render the most recent session for display
pub fn render_last(entries: &[Entry], exercise: Option<&str>, unit: MassUnit) -> String {
    match last_session(entries, exercise) {
        Some(sets) => format_last(&sets, unit),
        None => "No previous sessions found.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry_at(text: &str, logged_at: DateTime<Utc>) -> Entry {
        Entry::new(text, logged_at)
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_in_range() {
        let now = fixed_now();
        let this_morning = Utc.with_ymd_and_hms(2024, 3, 15, 7, 0, 0).unwrap();
        let yesterday = now - Duration::days(1);
        let last_month = Utc.with_ymd_and_hms(2024, 2, 28, 12, 0, 0).unwrap();

        assert!(in_range(this_morning, SummaryRange::Today, now));
        assert!(!in_range(yesterday, SummaryRange::Today, now));
        assert!(in_range(yesterday, SummaryRange::Week, now));
        assert!(!in_range(now - Duration::days(8), SummaryRange::Week, now));
        assert!(in_range(yesterday, SummaryRange::Month, now));
        assert!(!in_range(last_month, SummaryRange::Month, now));
    }

    #[test]
    fn test_weekly_summary() {
        let now = fixed_now();
        let entries = vec![
            entry_at("bench press 3x10@60kg", now - Duration::days(1)),
            entry_at("squat 100x5x2, run 5km", now - Duration::days(3)),
            entry_at("deadlift 200x1x1", now - Duration::days(10)),
        ];

        let summary = summarize(&entries, SummaryRange::Week, now);
        assert_eq!(summary.sessions, 2);
        assert_eq!(summary.tonnage_kg, 2800.0);
        assert_eq!(summary.top_lift, Some(("squat".to_string(), 100.0)));
        assert_eq!(
            summary.render(MassUnit::Kg),
            "📅 Week | Sessions: 2 | Tonnage: 2800 kg·reps | Top: Squat 100 kg"
        );
    }

    #[test]
    fn test_today_summary_has_no_top_lift() {
        let now = fixed_now();
        let entries = vec![
            entry_at("bp 60kg x 10", now - Duration::hours(1)),
            entry_at("bp 60kg x 10", now - Duration::days(2)),
        ];

        let summary = summarize(&entries, SummaryRange::Today, now);
        assert_eq!(summary.sessions, 1);
        assert_eq!(
            summary.render(MassUnit::Lb),
            "📅 Today | Sessions: 1 | Tonnage: 1322.77 lb·reps"
        );
    }

    #[test]
    fn test_empty_week_summary() {
        let summary = summarize(&[], SummaryRange::Week, fixed_now());
        assert_eq!(summary.sessions, 0);
        assert_eq!(
            summary.render(MassUnit::Kg),
            "📅 Week | Sessions: 0 | Tonnage: 0 kg·reps | Top: -"
        );
    }

    #[test]
    fn test_top_lift_ties_keep_first_seen() {
        let now = fixed_now();
        let entries = vec![entry_at("squat 100 5, deadlift 100 5", now)];
        let summary = summarize(&entries, SummaryRange::Week, now);
        assert_eq!(summary.top_lift, Some(("squat".to_string(), 100.0)));
    }

    #[test]
    fn test_last_session() {
        let now = fixed_now();
        let entries = vec![
            entry_at("squat 100 8,8,6", now - Duration::days(2)),
            entry_at("bench 3x10@60, run 5km", now - Duration::days(1)),
        ];

        let last = last_session(&entries, None).unwrap();
        assert_eq!(last.len(), 4);
        assert_eq!(
            render_last(&entries, None, MassUnit::Kg),
            "🕘 Bench Press: 3×10 @ 60 kg\n🕘 Run: logged"
        );
    }

    #[test]
    fn test_last_session_for_exercise_uses_aliases() {
        let now = fixed_now();
        let entries = vec![
            entry_at("bp 60kg x 10, squat 100 5", now - Duration::days(2)),
            entry_at("squat 110 5", now - Duration::days(1)),
        ];

        let last = last_session(&entries, Some("Bench")).unwrap();
        assert_eq!(last, vec![SetRecord::strength("bench press", 10, 60.0)]);

        let squat = last_session(&entries, Some("squats")).unwrap();
        assert_eq!(squat, vec![SetRecord::strength("squat", 5, 110.0)]);
    }

    #[test]
    fn test_last_session_none() {
        assert!(last_session(&[], None).is_none());
        assert_eq!(
            render_last(&[], Some("squat"), MassUnit::Kg),
            "No previous sessions found."
        );
    }
}

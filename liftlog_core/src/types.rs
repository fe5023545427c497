//! Core domain types for the workout log.
//!
//! This module defines the fundamental types used throughout the system:
//! - Set records (strength, cardio and bare fallback sets)
//! - Entries (one submitted line of text and the sets parsed from it)
//! - Display units and summary ranges

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Unit Types
// ============================================================================

/// Mass unit used for input tokens and for display
///
/// Stored weights are always kilograms; `Lb` only ever appears at the edges.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MassUnit {
    #[default]
    Kg,
    Lb,
}

impl MassUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            MassUnit::Kg => "kg",
            MassUnit::Lb => "lb",
        }
    }
}

impl fmt::Display for MassUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Set Records
// ============================================================================

/// The atomic unit of a logged exercise set
///
/// A record is populated as one of three shapes by the parser:
/// - strength: `reps` and/or `weight_kg`
/// - cardio: `distance_km` and/or `duration_sec`
/// - fallback: exercise name only
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetRecord {
    /// Canonical (lowercase, alias-resolved) exercise name
    pub exercise: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,

    /// Weight in kilograms, whatever unit it was entered in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_sec: Option<u32>,
}

impl SetRecord {
    /// A strength set of `reps` at `weight_kg`
    pub fn strength(exercise: impl Into<String>, reps: u32, weight_kg: f64) -> Self {
        Self {
            exercise: exercise.into(),
            reps: Some(reps),
            weight_kg: Some(weight_kg),
            distance_km: None,
            duration_sec: None,
        }
    }

    /// A cardio effort over `distance_km`, optionally timed
    pub fn cardio(
        exercise: impl Into<String>,
        distance_km: f64,
        duration_sec: Option<u32>,
    ) -> Self {
        Self {
            exercise: exercise.into(),
            reps: None,
            weight_kg: None,
            distance_km: Some(distance_km),
            duration_sec,
        }
    }

    /// A bare record carrying only the exercise name
    pub fn fallback(exercise: impl Into<String>) -> Self {
        Self {
            exercise: exercise.into(),
            reps: None,
            weight_kg: None,
            distance_km: None,
            duration_sec: None,
        }
    }

    /// `reps * weight_kg` when both are present
    pub fn volume_kg(&self) -> Option<f64> {
        match (self.reps, self.weight_kg) {
            (Some(reps), Some(weight)) => Some(f64::from(reps) * weight),
            _ => None,
        }
    }

    /// True if neither strength nor cardio fields are populated
    pub fn is_bare(&self) -> bool {
        self.reps.is_none()
            && self.weight_kg.is_none()
            && self.distance_km.is_none()
            && self.duration_sec.is_none()
    }
}

// ============================================================================
// Entries
// ============================================================================

/// One submitted line of workout text together with its parsed sets
///
/// Built once per submission and never mutated afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub logged_at: DateTime<Utc>,
    pub raw_text: String,
    pub sets: Vec<SetRecord>,
}

impl Entry {
    /// True if any set in this entry is for `exercise` (already canonical)
    pub fn has_exercise(&self, exercise: &str) -> bool {
        self.sets.iter().any(|s| s.exercise == exercise)
    }
}

// ============================================================================
// Summary Types
// ============================================================================

/// Time window for period summaries
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SummaryRange {
    Today,
    #[default]
    Week,
    Month,
}

impl SummaryRange {
    /// Parse a range token; anything unrecognised means the past week
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "today" => SummaryRange::Today,
            "month" => SummaryRange::Month,
            _ => SummaryRange::Week,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SummaryRange::Today => "Today",
            SummaryRange::Week => "Week",
            SummaryRange::Month => "Month",
        }
    }
}

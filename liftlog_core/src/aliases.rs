//! Exercise-name alias table.
//!
//! Maps informal synonyms ("bp", "dl", "bike") to the canonical exercise name
//! used for storage and grouping. The built-in table is constructed once and
//! shared read-only for the life of the process.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cached built-in alias table
static DEFAULT_ALIASES: Lazy<AliasTable> = Lazy::new(AliasTable::builtin);

/// Get a reference to the cached built-in alias table
pub fn default_aliases() -> &'static AliasTable {
    &DEFAULT_ALIASES
}

/// Resolve `name` against the built-in alias table
pub fn canonical(name: &str) -> String {
    DEFAULT_ALIASES.canonical(name)
}

/// Immutable synonym -> canonical name mapping
#[derive(Clone, Debug)]
pub struct AliasTable {
    map: HashMap<String, String>,
}

impl AliasTable {
    /// Build a table from `(synonym, canonical)` pairs
    ///
    /// Synonyms are lowercased and trimmed on the way in.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let map = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().trim().to_lowercase(), v.into()))
            .collect();
        Self { map }
    }

    /// The built-in vocabulary
    pub fn builtin() -> Self {
        Self::from_pairs([
            ("bp", "bench press"),
            ("bench", "bench press"),
            ("bench press", "bench press"),
            ("ohp", "overhead press"),
            ("press", "overhead press"),
            ("dl", "deadlift"),
            ("deadlift", "deadlift"),
            ("squat", "squat"),
            ("squats", "squat"),
            ("row", "barbell row"),
            ("run", "run"),
            ("walk", "walk"),
            ("cycle", "cycle"),
            ("bike", "cycle"),
        ])
    }

    /// Lowercase and trim `name`, then map it through the table
    ///
    /// Names with no entry come back lowercased and trimmed.
    pub fn canonical(&self, name: &str) -> String {
        let key = name.trim().to_lowercase();
        match self.map.get(&key) {
            Some(canonical) => canonical.clone(),
            None => key,
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Validate the table so that resolution is idempotent
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (synonym, target) in &self.map {
            if synonym.is_empty() {
                errors.push(format!("Alias for '{}' has empty synonym", target));
            }
            if target.is_empty() || target.trim().to_lowercase() != *target {
                errors.push(format!(
                    "Alias '{}' maps to non-canonical name '{}'",
                    synonym, target
                ));
            }
            if let Some(next) = self.map.get(target) {
                if next != target {
                    errors.push(format!(
                        "Alias '{}' maps to '{}', which itself maps to '{}'",
                        synonym, target, next
                    ));
                }
            }
        }

        errors.sort();
        errors
    }
}

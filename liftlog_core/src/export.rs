//! CSV export of stored sets.
//!
//! One row per set, numbered within its entry. The export file is replaced
//! atomically so a reader never sees a half-written file.

use crate::{Entry, Error, Result};
use std::path::Path;
use tempfile::NamedTempFile;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    entry_id: String,
    logged_at: String,
    exercise: &'a str,
    set_index: usize,
    reps: Option<u32>,
    weight_kg: Option<f64>,
    distance_km: Option<f64>,
    duration_sec: Option<u32>,
}

/// Write every set of `entries` to `csv_path`, replacing any previous export
///
/// Returns the number of rows written.
pub fn export_sets_csv(entries: &[Entry], csv_path: &Path) -> Result<usize> {
    let parent = match csv_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        Some(_) => Path::new("."),
        None => {
            return Err(Error::Other(format!(
                "export path {:?} has no parent",
                csv_path
            )))
        }
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(temp.as_file());

    let mut count = 0;
    for entry in entries {
        let entry_id = entry.id.to_string();
        let logged_at = entry.logged_at.to_rfc3339();
        for (i, set) in entry.sets.iter().enumerate() {
            writer.serialize(CsvRow {
                entry_id: entry_id.clone(),
                logged_at: logged_at.clone(),
                exercise: &set.exercise,
                set_index: i + 1,
                reps: set.reps,
                weight_kg: set.weight_kg,
                distance_km: set.distance_km,
                duration_sec: set.duration_sec,
            })?;
            count += 1;
        }
    }

    writer.flush()?;
    drop(writer);
    temp.as_file().sync_all()?;
    temp.persist(csv_path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Exported {} sets to {:?}", count, csv_path);
    Ok(count)
}

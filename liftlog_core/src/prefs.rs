//! User preference persistence with file locking.
//!
//! Holds the preferred display unit. Saved atomically; a missing or corrupt
//! file loads as defaults.

use crate::units::normalize_unit;
use crate::{Error, MassUnit, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Persisted user preferences
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Prefs {
    /// Display unit chosen by the user, if any
    #[serde(default)]
    pub unit: Option<MassUnit>,
}

impl Prefs {
    /// The unit to display in, given the configured default
    pub fn display_unit(&self, default_unit: MassUnit) -> MassUnit {
        self.unit.unwrap_or(default_unit)
    }

    /// Load preferences from a file with shared locking
    ///
    /// Returns defaults if the file doesn't exist or can't be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No preferences file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open preferences {:?}: {}. Using defaults.",
                    path,
                    e
                );
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock preferences {:?}: {}. Using defaults.",
                path,
                e
            );
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;

        if let Err(e) = read {
            tracing::warn!(
                "Failed to read preferences {:?}: {}. Using defaults.",
                path,
                e
            );
            return Ok(Self::default());
        }

        match serde_json::from_str::<Prefs>(&contents) {
            Ok(prefs) => {
                tracing::debug!("Loaded preferences from {:?}", path);
                Ok(prefs)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse preferences {:?}: {}. Using defaults.",
                    path,
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save preferences atomically (temp file, fsync, rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().ok_or_else(|| {
            Error::Config(format!("preferences path {:?} has no parent", path))
        })?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved preferences to {:?}", path);
        Ok(())
    }

    /// Load, modify and save back
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut Prefs),
    {
        let mut prefs = Self::load(path)?;
        f(&mut prefs);
        prefs.save(path)?;
        Ok(prefs)
    }
}

/// Persist a unit token as the display preference
///
/// The token goes through [`normalize_unit`], so anything unrecognised is
/// stored as kilograms. Returns the unit stored.
pub fn set_unit(path: &Path, token: &str) -> Result<MassUnit> {
    let unit = normalize_unit(token);
    Prefs::update(path, |prefs| prefs.unit = Some(unit))?;
    tracing::info!("Display unit set to {}", unit);
    Ok(unit)
}

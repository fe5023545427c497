//! Entry journal.
//!
//! Entries are appended to a JSONL (JSON Lines) file. Undo rewrites the file
//! atomically by renaming a new copy over it, so locks are taken on a sibling
//! `<journal>.lock` file that survives the rename rather than on the journal
//! itself. Appends and undo hold it exclusively; reads hold it shared.

use crate::{Entry, Error, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Entry sink trait for persisting entries
pub trait EntrySink {
    fn append(&mut self, entry: &Entry) -> Result<()>;
}

/// JSONL-based entry journal with file locking
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    /// Create a new journal for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

/// Path of the lock file guarding `journal`
pub fn lock_path(journal: &Path) -> PathBuf {
    let mut name = journal.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

fn open_lock(journal: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(lock_path(journal))?;
    Ok(file)
}

impl EntrySink for JsonlJournal {
    fn append(&mut self, entry: &Entry) -> Result<()> {
        self.ensure_parent_dir()?;

        let lock = open_lock(&self.path)?;
        lock.lock_exclusive()?;

        // Opened under the lock so an undo cannot rename the file away
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        lock.unlock()?;

        tracing::debug!("Appended entry {} to journal", entry.id);
        Ok(())
    }
}

/// Read all entries from a journal file
///
/// A missing file reads as empty. Lines that fail to parse are skipped.
pub fn read_entries(path: &Path) -> Result<Vec<Entry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let lock = open_lock(path)?;
    lock.lock_shared()?;

    let file = File::open(path)?;
    let entries = read_lines(&file)?
        .iter()
        .enumerate()
        .filter_map(|(line_num, line)| parse_line(line_num, line))
        .collect::<Vec<_>>();

    lock.unlock()?;
    tracing::debug!("Read {} entries from journal", entries.len());
    Ok(entries)
}

/// Remove the most recently logged entry
///
/// The most recent entry is the one with the latest `logged_at`; on a tie
/// the later line wins. Other lines, including unparseable ones, are kept
/// verbatim. Returns the removed entry, or `None` if there was nothing to
/// remove.
pub fn remove_last_entry(path: &Path) -> Result<Option<Entry>> {
    if !path.exists() {
        return Ok(None);
    }

    let lock = open_lock(path)?;
    lock.lock_exclusive()?;

    let lines = read_lines(&File::open(path)?)?;
    let mut newest: Option<(usize, Entry)> = None;
    for (line_num, line) in lines.iter().enumerate() {
        if let Some(entry) = parse_line(line_num, line) {
            let newer = match &newest {
                Some((_, current)) => entry.logged_at >= current.logged_at,
                None => true,
            };
            if newer {
                newest = Some((line_num, entry));
            }
        }
    }

    let Some((removed_line, removed)) = newest else {
        lock.unlock()?;
        return Ok(None);
    };

    let parent = path
        .parent()
        .ok_or_else(|| Error::Journal(format!("journal path {:?} has no parent", path)))?;
    let temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        for (line_num, line) in lines.iter().enumerate() {
            if line_num == removed_line || line.trim().is_empty() {
                continue;
            }
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    lock.unlock()?;

    tracing::info!("Removed entry {} from journal", removed.id);
    Ok(Some(removed))
}

fn read_lines(file: &File) -> Result<Vec<String>> {
    let reader = BufReader::new(file);
    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line?);
    }
    Ok(lines)
}

fn parse_line(line_num: usize, line: &str) -> Option<Entry> {
    if line.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Entry>(line) {
        Ok(entry) => Some(entry),
        Err(e) => {
            tracing::warn!("Failed to parse entry at line {}: {}", line_num + 1, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn journal_in(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("journal").join("entries.jsonl")
    }

    #[test]
    fn test_append_and_read_single_entry() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = journal_in(&temp_dir);

        let entry = Entry::new("bench press 3x10@60kg", Utc::now());
        let entry_id = entry.id;

        let mut journal = JsonlJournal::new(&path);
        journal.append(&entry).unwrap();

        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, entry_id);
        assert_eq!(entries[0].sets, entry.sets);
    }

    #[test]
    fn test_append_multiple_entries_keeps_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = journal_in(&temp_dir);
        let mut journal = JsonlJournal::new(&path);

        for text in ["bp 60kg x 10", "squat 100 8,8,6", "run 5km 25:30"] {
            journal.append(&Entry::new(text, Utc::now())).unwrap();
        }

        let entries = read_entries(&path).unwrap();
        let texts: Vec<_> = entries.iter().map(|e| e.raw_text.as_str()).collect();
        assert_eq!(texts, vec!["bp 60kg x 10", "squat 100 8,8,6", "run 5km 25:30"]);
    }

    #[test]
    fn test_read_missing_journal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let entries = read_entries(&temp_dir.path().join("nonexistent.jsonl")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = journal_in(&temp_dir);
        let mut journal = JsonlJournal::new(&path);
        journal.append(&Entry::new("stretching", Utc::now())).unwrap();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{ not json").unwrap();
        writeln!(file).unwrap();

        journal.append(&Entry::new("dl 100x5x3", Utc::now())).unwrap();

        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_remove_last_entry() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = journal_in(&temp_dir);
        let mut journal = JsonlJournal::new(&path);

        let now = Utc::now();
        journal
            .append(&Entry::new("bp 60kg x 10", now - Duration::hours(2)))
            .unwrap();
        journal.append(&Entry::new("squat 100 5", now)).unwrap();

        let removed = remove_last_entry(&path).unwrap().unwrap();
        assert_eq!(removed.raw_text, "squat 100 5");

        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].raw_text, "bp 60kg x 10");
    }

    #[test]
    fn test_remove_picks_latest_timestamp_not_last_line() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = journal_in(&temp_dir);
        let mut journal = JsonlJournal::new(&path);

        let now = Utc::now();
        journal.append(&Entry::new("newest", now)).unwrap();
        journal
            .append(&Entry::new("backfilled", now - Duration::days(1)))
            .unwrap();

        let removed = remove_last_entry(&path).unwrap().unwrap();
        assert_eq!(removed.raw_text, "newest");
    }

    #[test]
    fn test_remove_keeps_corrupt_lines() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = journal_in(&temp_dir);
        let mut journal = JsonlJournal::new(&path);
        journal.append(&Entry::new("stretching", Utc::now())).unwrap();

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{ not json").unwrap();

        remove_last_entry(&path).unwrap().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "{ not json\n");
        assert!(remove_last_entry(&path).unwrap().is_none());
    }

    #[test]
    fn test_remove_from_empty_or_missing_journal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = journal_in(&temp_dir);
        assert!(remove_last_entry(&path).unwrap().is_none());

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        File::create(&path).unwrap();
        assert!(remove_last_entry(&path).unwrap().is_none());
    }

    #[test]
    fn test_lock_file_sits_beside_journal() {
        let path = Path::new("/data/journal/entries.jsonl");
        assert_eq!(lock_path(path), Path::new("/data/journal/entries.jsonl.lock"));
    }

    #[test]
    fn test_concurrent_append_and_undo_lose_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = journal_in(&temp_dir);
        let mut journal = JsonlJournal::new(&path);

        for i in 0..50 {
            journal
                .append(&Entry::new(format!("seed {}", i), Utc::now()))
                .unwrap();
        }

        let append_path = path.clone();
        let appender = std::thread::spawn(move || {
            let mut journal = JsonlJournal::new(append_path);
            for i in 0..400 {
                journal
                    .append(&Entry::new(format!("bench {}x1@60", i % 10 + 1), Utc::now()))
                    .unwrap();
            }
        });

        let undo_path = path.clone();
        let remover = std::thread::spawn(move || {
            for _ in 0..40 {
                assert!(remove_last_entry(&undo_path).unwrap().is_some());
            }
        });

        appender.join().expect("appender panicked");
        remover.join().expect("remover panicked");

        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 50 + 400 - 40);
    }
}

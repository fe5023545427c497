#![forbid(unsafe_code)]

//! Core domain model and business logic for the liftlog workout journal.
//!
//! This crate provides:
//! - Domain types (set records, entries, units)
//! - Free-text workout parsing (segmenting, alias resolution, grammar rules)
//! - Compact summaries with tonnage
//! - Persistence (entry journal, preferences, CSV export)
//! - Session history and period summaries

pub mod types;
pub mod error;
pub mod units;
pub mod aliases;
pub mod segment;
pub mod rules;
pub mod parser;
pub mod format;
pub mod summary;
pub mod config;
pub mod logging;
pub mod journal;
pub mod prefs;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use aliases::{canonical, AliasTable};
pub use units::{normalize_unit, to_display, to_kg};
pub use parser::parse;
pub use format::{format, format_last};
pub use summary::{last_session, render_last, summarize, PeriodSummary};
pub use config::Config;
pub use journal::{read_entries, remove_last_entry, EntrySink, JsonlJournal};
pub use prefs::{set_unit, Prefs};
pub use export::export_sets_csv;

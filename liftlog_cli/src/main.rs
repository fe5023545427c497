use clap::{Parser, Subcommand};
use liftlog_core::config::DataConfig;
use liftlog_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Free-text workout logger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a workout, e.g. `liftlog log "bench press 3x10@60kg, run 5km 25:30"`
    Log {
        /// Workout text (multiple arguments are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Parse and show the summary without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Set the display unit (kg or lb)
    Unit {
        unit: String,
    },

    /// Show the most recent session
    Last {
        /// Only this exercise (aliases accepted)
        #[arg(long)]
        exercise: Option<String>,
    },

    /// Show sessions and tonnage for a period (today, week, month)
    Summary {
        #[arg(long, default_value = "week")]
        range: String,
    },

    /// Remove the most recently logged entry
    Undo,

    /// Export all stored sets to CSV
    Export {
        /// Output file (defaults to sets.csv in the data directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    liftlog_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Commands::Log { text, dry_run } => cmd_log(&data_dir, &text.join(" "), dry_run, &config),
        Commands::Unit { unit } => cmd_unit(&data_dir, &unit),
        Commands::Last { exercise } => cmd_last(&data_dir, exercise.as_deref(), &config),
        Commands::Summary { range } => cmd_summary(&data_dir, &range, &config),
        Commands::Undo => cmd_undo(&data_dir),
        Commands::Export { output } => cmd_export(&data_dir, output),
    }
}

fn display_unit(data_dir: &Path, config: &Config) -> Result<MassUnit> {
    let prefs = Prefs::load(&DataConfig::prefs_path(data_dir))?;
    Ok(prefs.display_unit(config.display.default_unit))
}

fn cmd_log(data_dir: &Path, text: &str, dry_run: bool, config: &Config) -> Result<()> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::Input("text required".into()));
    }

    let entry = Entry::new(text, chrono::Utc::now());
    let unit = display_unit(data_dir, config)?;

    if dry_run {
        println!("{}", format(&entry.sets, unit));
        println!("\n[Dry run - not logging entry]");
        return Ok(());
    }

    let mut journal = JsonlJournal::new(DataConfig::journal_path(data_dir));
    journal.append(&entry)?;
    tracing::debug!("Logged entry {} with {} sets", entry.id, entry.sets.len());

    println!("{}", format(&entry.sets, unit));
    Ok(())
}

fn cmd_unit(data_dir: &Path, token: &str) -> Result<()> {
    let unit = set_unit(&DataConfig::prefs_path(data_dir), token)?;
    println!("✓ Unit set to {}", unit);
    Ok(())
}

fn cmd_last(data_dir: &Path, exercise: Option<&str>, config: &Config) -> Result<()> {
    let entries = read_entries(&DataConfig::journal_path(data_dir))?;
    let unit = display_unit(data_dir, config)?;
    println!("{}", render_last(&entries, exercise, unit));
    Ok(())
}

fn cmd_summary(data_dir: &Path, range: &str, config: &Config) -> Result<()> {
    let entries = read_entries(&DataConfig::journal_path(data_dir))?;
    let unit = display_unit(data_dir, config)?;
    let summary = summarize(&entries, SummaryRange::from_token(range), chrono::Utc::now());
    println!("{}", summary.render(unit));
    Ok(())
}

fn cmd_undo(data_dir: &Path) -> Result<()> {
    match remove_last_entry(&DataConfig::journal_path(data_dir))? {
        Some(entry) => {
            println!("↩ Last entry removed.");
            println!("  {}", entry.raw_text);
        }
        None => println!("Nothing to undo."),
    }
    Ok(())
}

fn cmd_export(data_dir: &Path, output: Option<PathBuf>) -> Result<()> {
    let entries = read_entries(&DataConfig::journal_path(data_dir))?;
    let csv_path = output.unwrap_or_else(|| DataConfig::export_path(data_dir));

    let count = export_sets_csv(&entries, &csv_path)?;

    println!("✓ Exported {} sets from {} entries", count, entries.len());
    println!("  CSV: {}", csv_path.display());
    Ok(())
}

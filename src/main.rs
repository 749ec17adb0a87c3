mod commands;
mod render;
mod utils;

use agenda_core::config::AgendaConfig;
use agenda_core::event::Category;
use agenda_core::window::View;
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::EventFields;

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Plan your days: recurring events, conflict checks and reminders")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new event
    Add {
        /// Event title
        title: String,

        #[command(flatten)]
        fields: EventFields,
    },
    /// Show events in a month, week or day
    List {
        #[arg(short, long, default_value = "week")]
        view: View,

        /// Any day inside the period to show (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Only show events matching every word
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long)]
        category: Option<Category>,
    },
    /// Change an event, one occurrence or a whole series
    Edit {
        id: String,

        /// Start of the occurrence to edit (defaults to the first one)
        #[arg(long)]
        on: Option<String>,

        /// Apply to every instance of the series
        #[arg(long)]
        all: bool,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        #[command(flatten)]
        fields: EventFields,
    },
    /// Reschedule an event to a new start time
    Move {
        id: String,

        /// New start (e.g. "2025-03-20T15:00")
        to: String,
    },
    /// Delete an event or a whole series
    Delete {
        id: String,

        /// Delete every instance of the series
        #[arg(long)]
        all: bool,
    },
    /// Write every event to calendar-events-<date>.json
    Export {
        /// Directory to write into (defaults to the current directory)
        #[arg(long)]
        dir: Option<std::path::PathBuf>,
    },
    /// Add events from an exported JSON file
    Import { file: std::path::PathBuf },
    /// Push events to the configured external calendar
    Sync,
    /// Watch for upcoming events and print reminders until interrupted
    Remind,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = AgendaConfig::load()?;

    match cli.command {
        Commands::Add { title, fields } => commands::add::run(&config, title, fields),
        Commands::List {
            view,
            date,
            search,
            category,
        } => commands::list::run(&config, view, date.as_deref(), search, category).await,
        Commands::Edit {
            id,
            on,
            all,
            title,
            fields,
        } => commands::edit::run(&config, &id, on.as_deref(), all, title, fields),
        Commands::Move { id, to } => commands::move_event::run(&config, &id, &to),
        Commands::Delete { id, all } => commands::delete::run(&config, &id, all),
        Commands::Export { dir } => commands::export::run(&config, dir),
        Commands::Import { file } => commands::import::run(&config, &file),
        Commands::Sync => commands::sync::run(&config).await,
        Commands::Remind => commands::remind::run(&config).await,
    }
}

/// Log to stderr, filtered by `AGENDA_LOG` (warnings only by default).
fn init_logging() {
    let filter = EnvFilter::try_from_env("AGENDA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

use agenda_core::config::AgendaConfig;
use agenda_core::sync::{MockSync, SyncOutcome, sync_calendar};
use anyhow::Result;
use owo_colors::OwoColorize;

use super::open_scheduler;
use crate::utils::tui;

pub async fn run(config: &AgendaConfig) -> Result<()> {
    let scheduler = open_scheduler(config)?;
    let events = scheduler.store().events();

    let target = config.sync_provider();
    let label = match &target {
        Some(provider) => format!("Syncing with {}", provider.name()),
        None => "Syncing".to_string(),
    };

    let spinner = tui::create_spinner(label);
    let outcome = match &target {
        Some(provider) => sync_calendar(provider, events).await,
        None => sync_calendar(&MockSync, events).await,
    };
    spinner.finish_and_clear();

    match outcome {
        SyncOutcome::Synced { message, events } => {
            let count = events.map(|e| e.len()).unwrap_or_default();
            println!("{} {}", message.green(), format!("({count} events)").dimmed());
        }
        SyncOutcome::Failed { message } => println!("{}", message.red()),
    }
    Ok(())
}

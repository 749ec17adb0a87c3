use agenda_core::config::AgendaConfig;
use agenda_core::store::EditScope;
use anyhow::Result;
use owo_colors::OwoColorize;

use super::open_scheduler;
use crate::render::pluralize;

pub fn run(config: &AgendaConfig, id: &str, all: bool) -> Result<()> {
    let mut scheduler = open_scheduler(config)?;

    let selected = scheduler.occurrence(id, None)?;
    let scope = if all {
        EditScope::AllInstances
    } else {
        EditScope::ThisInstance
    };
    let removed = scheduler.delete(&selected, scope)?;

    println!(
        "{} {} ({} {})",
        "Deleted".red(),
        selected.event.title.bold(),
        removed,
        pluralize("event", removed)
    );
    Ok(())
}

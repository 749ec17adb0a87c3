use agenda_core::config::AgendaConfig;
use agenda_core::event::EventDraft;
use agenda_core::store::EditScope;
use anyhow::{Result, bail};
use owo_colors::OwoColorize;

use super::{EventFields, open_scheduler, parse_when};

pub fn run(config: &AgendaConfig, title: String, mut fields: EventFields) -> Result<()> {
    let Some(start) = fields.start.take() else {
        bail!("A start time is required, e.g. --start 2025-03-20T15:00");
    };

    let mut draft = EventDraft::new(title, parse_when(&start)?);
    fields.apply(&mut draft)?;

    let mut scheduler = open_scheduler(config)?;
    let event = scheduler.try_save(&draft, None, EditScope::default())?;

    println!(
        "{} {} {}",
        "Created".green(),
        event.title.bold(),
        event.date.format("%a %b %-d %H:%M").dimmed()
    );
    println!("  {}", event.id.dimmed());
    Ok(())
}

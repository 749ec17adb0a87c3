use agenda_core::config::AgendaConfig;
use anyhow::Result;
use owo_colors::OwoColorize;

use super::{open_scheduler, parse_when};

pub fn run(config: &AgendaConfig, id: &str, to: &str) -> Result<()> {
    let new_date = parse_when(to)?;

    let mut scheduler = open_scheduler(config)?;
    let event = scheduler.try_move(id, new_date)?;

    println!(
        "{} {} to {}",
        "Moved".green(),
        event.title.bold(),
        event.date.format("%a %b %-d %H:%M")
    );
    Ok(())
}

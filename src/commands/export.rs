use std::path::PathBuf;

use agenda_core::config::AgendaConfig;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use super::open_scheduler;

pub fn run(config: &AgendaConfig, dir: Option<PathBuf>) -> Result<()> {
    let scheduler = open_scheduler(config)?;
    let today = chrono::Local::now().date_naive();
    let export = scheduler.export(today)?;

    let path = dir.unwrap_or_else(|| PathBuf::from(".")).join(&export.file_name);
    std::fs::write(&path, &export.contents)
        .with_context(|| format!("Could not write {}", path.display()))?;

    println!(
        "{} {} events to {}",
        "Exported".green(),
        scheduler.store().len(),
        path.display()
    );
    Ok(())
}

use std::path::Path;

use agenda_core::config::AgendaConfig;
use anyhow::{Context, Result};

use super::open_scheduler;
use crate::render::Render;

pub fn run(config: &AgendaConfig, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Could not read {}", file.display()))?;

    let mut scheduler = open_scheduler(config)?;
    let report = scheduler.import(&text)?;

    println!("{}", report.render());
    Ok(())
}

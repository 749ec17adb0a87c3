use std::collections::HashSet;

use agenda_core::config::AgendaConfig;
use agenda_core::event::Event;
use agenda_core::reminder::ReminderPoll;
use agenda_core::scheduler::Scheduler;
use agenda_core::storage::FileStorage;
use anyhow::Result;
use owo_colors::OwoColorize;
use tokio::sync::mpsc;
use tracing::warn;

use crate::render::Render;

pub async fn run(config: &AgendaConfig) -> Result<()> {
    let interval = config.reminder_interval()?;
    let storage = FileStorage::new(config.data_path());

    // Re-read on every sweep so edits made from other shells are picked up
    let source = move || -> Vec<Event> {
        match Scheduler::open(storage.clone()) {
            Ok(scheduler) => scheduler.store().events().to_vec(),
            Err(e) => {
                warn!("Could not load events for reminders: {}", e);
                Vec::new()
            }
        }
    };
    let clock = || chrono::Local::now().naive_local();

    let (tx, mut rx) = mpsc::channel(16);
    let poll = ReminderPoll::spawn(interval, source, clock, tx);

    println!(
        "{}",
        format!(
            "Watching for reminders every {}. Press Ctrl-C to stop.",
            humantime::format_duration(interval)
        )
        .dimmed()
    );

    let mut shown = HashSet::new();
    loop {
        tokio::select! {
            batch = rx.recv() => match batch {
                Some(reminders) => {
                    for reminder in reminders {
                        // Each occurrence is announced once per session
                        if shown.insert((reminder.event_id.clone(), reminder.starts_at)) {
                            println!("{}", reminder.render());
                        }
                    }
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poll.stop().await;
    Ok(())
}

//! Reminder sweep and the periodic poll that runs it.
//!
//! The sweep only reads events. The poll runs it on a fixed interval in a
//! background task and hands due reminders to a channel until it is stopped.

use std::fmt;
use std::time::Duration as StdDuration;

use chrono::{Duration, NaiveDateTime};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::event::{Event, Schedulable};
use crate::recurrence::expand;
use crate::window::DateWindow;

/// A notification that an event starts soon.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub event_id: String,
    pub series_id: String,
    pub title: String,
    pub starts_at: NaiveDateTime,
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Upcoming event: {} at {}",
            self.title,
            self.starts_at.format("%-I:%M %p")
        )
    }
}

/// Reminders whose lead time has elapsed at `now` for events that haven't started yet.
///
/// An occurrence is due when `start - reminder < now < start`. Recurring
/// events are checked per occurrence, not only at their anchor.
pub fn due_reminders(events: &[Event], now: NaiveDateTime) -> Vec<Reminder> {
    let mut due: Vec<Reminder> = events
        .iter()
        .filter(|event| event.reminder > 0)
        .flat_map(|event| {
            let lead = Duration::minutes(i64::from(event.reminder));
            let window = DateWindow::new(now, now + lead);
            expand(event, &window)
                .into_iter()
                .filter(move |occ| occ.start() > now && occ.start() - lead < now)
        })
        .map(|occ| Reminder {
            event_id: occ.event.id.clone(),
            series_id: occ.series_id().to_string(),
            title: occ.event.title.clone(),
            starts_at: occ.start(),
        })
        .collect();

    due.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
    due
}

/// Handle to a running reminder poll.
///
/// Dropping the handle also ends the poll at its next wake-up.
pub struct ReminderPoll {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ReminderPoll {
    /// Start polling. The first sweep runs immediately, then every `interval`.
    ///
    /// `source` yields the current event snapshot and `clock` the current
    /// local time. Non-empty batches are sent to `sink`; the poll ends when
    /// the sink is closed.
    pub fn spawn<S, C>(
        interval: StdDuration,
        source: S,
        clock: C,
        sink: mpsc::Sender<Vec<Reminder>>,
    ) -> Self
    where
        S: Fn() -> Vec<Event> + Send + 'static,
        C: Fn() -> NaiveDateTime + Send + 'static,
    {
        let (shutdown, mut stopped) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = stopped.changed() => break,
                    _ = ticker.tick() => {
                        let due = due_reminders(&source(), clock());
                        if due.is_empty() {
                            continue;
                        }
                        debug!(count = due.len(), "reminders due");
                        if sink.send(due).await.is_err() {
                            debug!("reminder sink closed, stopping poll");
                            break;
                        }
                    }
                }
            }
        });

        ReminderPoll { shutdown, handle }
    }

    /// Stop the poll and wait for it to finish. No sweep runs afterwards.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            warn!("Reminder poll ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

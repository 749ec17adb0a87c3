//! Push the local event list to an external calendar.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{AgendaError, AgendaResult};
use crate::event::Event;
use crate::remote::protocol::{SyncEvents, SyncResponse};
use crate::remote::Provider;

const MOCK_SYNC_DELAY: Duration = Duration::from_secs(1);

/// An external calendar that accepts the full event list.
pub trait CalendarSync {
    fn sync_events(&self, events: &[Event]) -> impl Future<Output = AgendaResult<SyncResponse>>;
}

impl CalendarSync for Provider {
    async fn sync_events(&self, events: &[Event]) -> AgendaResult<SyncResponse> {
        self.call(SyncEvents {
            events: events.to_vec(),
        })
        .await
    }
}

/// Stand-in external calendar: waits a second, then accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSync;

impl CalendarSync for MockSync {
    async fn sync_events(&self, events: &[Event]) -> AgendaResult<SyncResponse> {
        tokio::time::sleep(MOCK_SYNC_DELAY).await;
        Ok(SyncResponse {
            success: true,
            message: "Calendar synced successfully".to_string(),
            synced_events: Some(events.to_vec()),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Synced {
        message: String,
        events: Option<Vec<Event>>,
    },
    Failed {
        message: String,
    },
}

impl SyncOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncOutcome::Synced { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            SyncOutcome::Synced { message, .. } | SyncOutcome::Failed { message } => message,
        }
    }
}

/// Sync `events`, folding a rejected sync and any collaborator error into `Failed`.
pub async fn sync_calendar<C: CalendarSync>(target: &C, events: &[Event]) -> SyncOutcome {
    debug!(count = events.len(), "syncing events");

    match target.sync_events(events).await {
        Ok(response) if response.success => SyncOutcome::Synced {
            message: response.message,
            events: response.synced_events,
        },
        Ok(response) => {
            let err = AgendaError::Sync(response.message);
            warn!("{}", err);
            SyncOutcome::Failed {
                message: err.to_string(),
            }
        }
        Err(e) => {
            warn!("Sync failed: {}", e);
            SyncOutcome::Failed {
                message: format!("Failed to sync calendar: {}", e),
            }
        }
    }
}

//! Read and write API over the event store.
//!
//! [`visible_occurrences`] answers what is on screen for a window.
//! [`Scheduler`] owns the current store snapshot, screens every edit for
//! conflicts and persists each accepted change before adopting it.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::constants::EVENTS_KEY;
use crate::error::{AgendaError, AgendaResult};
use crate::event::{Event, EventDraft, Occurrence, Schedulable};
use crate::filter::EventFilter;
use crate::recurrence::expand;
use crate::reminder::{self, Reminder};
use crate::storage::Storage;
use crate::store::{Change, EditScope, EventStore, ImportReport};
use crate::window::DateWindow;

/// Every occurrence of every event inside `window` that passes `filter`, ordered by start.
pub fn visible_occurrences(
    store: &EventStore,
    window: &DateWindow,
    filter: &EventFilter,
) -> Vec<Occurrence> {
    let mut occurrences: Vec<Occurrence> = store
        .events()
        .iter()
        .filter(|event| filter.matches(event))
        .flat_map(|event| expand(event, window))
        .collect();

    occurrences.sort_by(|a, b| a.start().cmp(&b.start()));
    occurrences
}

/// A file ready to be written by an export.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub file_name: String,
    pub contents: String,
}

pub struct Scheduler<S: Storage> {
    store: EventStore,
    storage: S,
}

impl<S: Storage> Scheduler<S> {
    /// Load the persisted event list. Nothing stored yet means an empty calendar.
    pub fn open(storage: S) -> AgendaResult<Self> {
        let store = match storage.read(EVENTS_KEY)? {
            Some(blob) => serde_json::from_str(&blob).map_err(|e| {
                AgendaError::Serialization(format!("Stored events are unreadable: {e}"))
            })?,
            None => EventStore::new(),
        };
        debug!(count = store.len(), "opened event store");

        Ok(Scheduler { store, storage })
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn visible_occurrences(&self, window: &DateWindow, filter: &EventFilter) -> Vec<Occurrence> {
        visible_occurrences(&self.store, window, filter)
    }

    /// The occurrence of event `id` that starts at `start`.
    ///
    /// Without `start`, the stored record itself is selected, flagged as
    /// recurring when it defines a series, even if its anchor doesn't emit.
    pub fn occurrence(&self, id: &str, start: Option<NaiveDateTime>) -> AgendaResult<Occurrence> {
        let event = self
            .store
            .get(id)
            .ok_or_else(|| AgendaError::EventNotFound(id.to_string()))?;

        let Some(start) = start else {
            return Ok(if event.is_recurring() {
                Occurrence::recurring(event, event.date)
            } else {
                Occurrence::single(event)
            });
        };

        if !event.is_recurring() {
            return if start == event.date {
                Ok(Occurrence::single(event))
            } else {
                Err(AgendaError::EventNotFound(format!("{id} at {start}")))
            };
        }

        expand(event, &DateWindow::new(start, start))
            .into_iter()
            .next()
            .ok_or_else(|| AgendaError::EventNotFound(format!("{id} at {start}")))
    }

    /// Save a form: create an event when nothing is selected, else update the
    /// selected occurrence or its whole series.
    ///
    /// The draft is screened for conflicts up front; it never conflicts with
    /// the record being edited.
    pub fn try_save(
        &mut self,
        draft: &EventDraft,
        selected: Option<&Occurrence>,
        scope: EditScope,
    ) -> AgendaResult<Event> {
        let Some(selected) = selected else {
            let change = self.store.add(draft)?;
            return self.commit(change);
        };

        let candidate = draft.to_event(selected.id(), Some(selected.series_id()), Vec::new());
        candidate.validate()?;
        self.store.ensure_free(&candidate)?;

        match scope {
            EditScope::ThisInstance => {
                let change = self.store.update_single_instance(selected, draft)?;
                self.commit(change)
            }
            EditScope::AllInstances => {
                let change = self
                    .store
                    .update_all_instances(selected.series_id(), draft)?;
                let updated = change
                    .value
                    .iter()
                    .find(|e| e.id == selected.id())
                    .or_else(|| change.value.first())
                    .cloned()
                    .ok_or_else(|| AgendaError::EventNotFound(selected.series_id().to_string()))?;
                self.commit(Change {
                    store: change.store,
                    value: updated,
                })
            }
        }
    }

    pub fn try_move(&mut self, id: &str, new_date: NaiveDateTime) -> AgendaResult<Event> {
        let change = self.store.move_event(id, new_date)?;
        self.commit(change)
    }

    /// Delete the selected record or its whole series. Returns how many records were removed.
    pub fn delete(&mut self, selected: &Occurrence, scope: EditScope) -> AgendaResult<usize> {
        match scope {
            EditScope::ThisInstance => {
                let change = self.store.delete_single_instance(selected.id())?;
                self.commit(change).map(|_| 1)
            }
            EditScope::AllInstances => {
                let change = self.store.delete_all_instances(selected.series_id())?;
                self.commit(change).map(|removed| removed.len())
            }
        }
    }

    pub fn import(&mut self, text: &str) -> AgendaResult<ImportReport> {
        let change = self.store.import_batch(text)?;
        self.commit(change)
    }

    pub fn export(&self, today: NaiveDate) -> AgendaResult<Export> {
        Ok(Export {
            file_name: EventStore::export_file_name(today),
            contents: self.store.export_all()?,
        })
    }

    pub fn due_reminders(&self, now: NaiveDateTime) -> Vec<Reminder> {
        reminder::due_reminders(self.store.events(), now)
    }

    /// Persist the new snapshot, then adopt it. A failed write keeps the old snapshot.
    fn commit<T>(&mut self, change: Change<T>) -> AgendaResult<T> {
        let blob = serde_json::to_string(&change.store)
            .map_err(|e| AgendaError::Serialization(e.to_string()))?;
        self.storage.write(EVENTS_KEY, &blob)?;

        self.store = change.store;
        Ok(change.value)
    }
}

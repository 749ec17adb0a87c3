//! The event store.
//!
//! Holds the base event records (series definitions). Every operation borrows
//! the current snapshot and returns a new one inside a [`Change`]; a rejected
//! operation returns an error and the caller keeps the snapshot it had.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::conflict::find_conflict;
use crate::error::{AgendaError, AgendaResult};
use crate::event::{Event, EventDraft, Occurrence, Schedulable};

/// Whether an edit or delete of a recurring event applies to one instance or the whole series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditScope {
    #[default]
    ThisInstance,
    AllInstances,
}

/// A new store snapshot together with the operation's result.
#[derive(Debug, Clone)]
pub struct Change<T> {
    pub store: EventStore,
    pub value: T,
}

/// Outcome of an import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Ids of the imported records, in file order.
    pub imported: Vec<String>,
    /// Ids of imported records that overlap events already in the store.
    pub conflicting: Vec<String>,
}

impl ImportReport {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicting.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<Event>) -> Self {
        EventStore { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Every record belonging to the series rooted at `root_id`.
    pub fn series<'a>(&'a self, root_id: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.events.iter().filter(move |e| e.series_id() == root_id)
    }

    fn require(&self, id: &str) -> AgendaResult<&Event> {
        self.get(id)
            .ok_or_else(|| AgendaError::EventNotFound(id.to_string()))
    }

    /// Fail with a conflict if `candidate` overlaps any stored event other than itself.
    pub fn ensure_free<C: Schedulable + ?Sized>(&self, candidate: &C) -> AgendaResult<()> {
        match find_conflict(candidate, &self.events) {
            Some(blocking) => Err(AgendaError::Conflict {
                id: blocking.id.clone(),
                title: blocking.title.clone(),
            }),
            None => Ok(()),
        }
    }

    fn with_events(&self, events: Vec<Event>) -> EventStore {
        EventStore { events }
    }

    /// Create a new event from a draft under a fresh id.
    pub fn add(&self, draft: &EventDraft) -> AgendaResult<Change<Event>> {
        let id = Uuid::new_v4().to_string();
        let event = draft.to_event(&id, Some(&id), Vec::new());
        event.validate()?;
        self.ensure_free(&event)?;

        let mut events = self.events.clone();
        events.push(event.clone());
        debug!(id = %event.id, title = %event.title, "added event");

        Ok(Change {
            store: self.with_events(events),
            value: event,
        })
    }

    /// Apply a draft to one instance.
    ///
    /// A recurring occurrence is detached: a new standalone record is created
    /// for it (fresh id, same series root) and the occurrence's day is
    /// excluded from the series. Anything else is replaced in place.
    pub fn update_single_instance(
        &self,
        target: &Occurrence,
        draft: &EventDraft,
    ) -> AgendaResult<Change<Event>> {
        let stored = self.require(target.id())?;

        if !target.is_recurring {
            let updated = draft.to_event(
                &stored.id,
                stored.original_event_id.as_deref(),
                stored.excluded_dates.clone(),
            );
            updated.validate()?;

            let events = self
                .events
                .iter()
                .map(|e| if e.id == stored.id { updated.clone() } else { e.clone() })
                .collect();
            debug!(id = %updated.id, "updated event");

            return Ok(Change {
                store: self.with_events(events),
                value: updated,
            });
        }

        let detached_id = Uuid::new_v4().to_string();
        let detached = draft.to_event(&detached_id, Some(target.series_id()), Vec::new());
        detached.validate()?;

        let skipped_day = target.event.date.date();
        let mut events: Vec<Event> = self
            .events
            .iter()
            .map(|e| {
                if e.id == stored.id {
                    with_excluded_day(e, skipped_day)
                } else {
                    e.clone()
                }
            })
            .collect();
        events.push(detached.clone());
        debug!(
            series = %target.series_id(),
            id = %detached.id,
            day = %skipped_day,
            "detached occurrence from series"
        );

        Ok(Change {
            store: self.with_events(events),
            value: detached,
        })
    }

    /// Apply a draft to every record of a series, keeping each record's identity.
    pub fn update_all_instances(
        &self,
        series_root_id: &str,
        draft: &EventDraft,
    ) -> AgendaResult<Change<Vec<Event>>> {
        if self.series(series_root_id).next().is_none() {
            return Err(AgendaError::EventNotFound(series_root_id.to_string()));
        }

        let mut updated = Vec::new();
        let mut events = Vec::with_capacity(self.events.len());
        for e in &self.events {
            if e.series_id() == series_root_id {
                let replaced = draft.to_event(
                    &e.id,
                    e.original_event_id.as_deref(),
                    e.excluded_dates.clone(),
                );
                replaced.validate()?;
                updated.push(replaced.clone());
                events.push(replaced);
            } else {
                events.push(e.clone());
            }
        }
        debug!(series = %series_root_id, count = updated.len(), "updated series");

        Ok(Change {
            store: self.with_events(events),
            value: updated,
        })
    }

    /// Remove exactly the record with `id`.
    pub fn delete_single_instance(&self, id: &str) -> AgendaResult<Change<Event>> {
        let removed = self.require(id)?.clone();
        let events = self.events.iter().filter(|e| e.id != id).cloned().collect();
        debug!(id = %id, "deleted event");

        Ok(Change {
            store: self.with_events(events),
            value: removed,
        })
    }

    /// Remove every record belonging to the series `original_event_id`.
    pub fn delete_all_instances(&self, original_event_id: &str) -> AgendaResult<Change<Vec<Event>>> {
        let (removed, kept): (Vec<Event>, Vec<Event>) = self
            .events
            .iter()
            .cloned()
            .partition(|e| e.series_id() == original_event_id);

        if removed.is_empty() {
            return Err(AgendaError::EventNotFound(original_event_id.to_string()));
        }
        debug!(series = %original_event_id, count = removed.len(), "deleted series");

        Ok(Change {
            store: self.with_events(kept),
            value: removed,
        })
    }

    /// Reschedule a record to `new_date`, rejecting the move if the new slot is taken.
    pub fn move_event(&self, id: &str, new_date: NaiveDateTime) -> AgendaResult<Change<Event>> {
        let mut moved = self.require(id)?.clone();
        moved.date = new_date;
        moved.end_date = Some(moved.computed_end_date());
        self.ensure_free(&moved)?;

        let events = self
            .events
            .iter()
            .map(|e| if e.id == id { moved.clone() } else { e.clone() })
            .collect();
        debug!(id = %id, date = %new_date, "moved event");

        Ok(Change {
            store: self.with_events(events),
            value: moved,
        })
    }

    /// Parse an exported JSON list and append it to the store.
    ///
    /// Records whose ids are already taken get fresh ids (series links inside
    /// the batch follow). Overlaps with existing events are reported, not rejected.
    pub fn import_batch(&self, text: &str) -> AgendaResult<Change<ImportReport>> {
        let records: Vec<Event> =
            serde_json::from_str(text).map_err(|e| AgendaError::ImportFormat(e.to_string()))?;

        for (index, record) in records.iter().enumerate() {
            record.validate().map_err(|e| {
                AgendaError::ImportFormat(format!("record {}: {}", index + 1, e))
            })?;
        }

        let mut taken: HashSet<String> = self.events.iter().map(|e| e.id.clone()).collect();
        let mut renamed: HashMap<String, String> = HashMap::new();
        let mut prepared = Vec::with_capacity(records.len());

        for mut record in records {
            let root_of_itself = record.series_id() == record.id;
            if !taken.insert(record.id.clone()) {
                let fresh = Uuid::new_v4().to_string();
                renamed.insert(record.id.clone(), fresh.clone());
                taken.insert(fresh.clone());
                record.id = fresh;
            }
            if root_of_itself {
                record.original_event_id = Some(record.id.clone());
            }
            prepared.push(record);
        }

        let mut report = ImportReport::default();
        let mut events = self.events.clone();

        for mut record in prepared {
            let new_root = record
                .original_event_id
                .as_ref()
                .filter(|root| **root != record.id)
                .and_then(|root| renamed.get(root))
                .cloned();
            if new_root.is_some() {
                record.original_event_id = new_root;
            }
            if record.end_date.is_none() {
                record.end_date = Some(record.computed_end_date());
            }
            if record.color.is_empty() {
                record.color = record.category.color().to_string();
            }

            if find_conflict(&record, &self.events).is_some() {
                report.conflicting.push(record.id.clone());
            }
            report.imported.push(record.id.clone());
            events.push(record);
        }
        debug!(
            imported = report.imported.len(),
            conflicting = report.conflicting.len(),
            "imported events"
        );

        Ok(Change {
            store: self.with_events(events),
            value: report,
        })
    }

    /// Serialize every record as pretty JSON with ISO-8601 timestamps.
    pub fn export_all(&self) -> AgendaResult<String> {
        serde_json::to_string_pretty(&self.events)
            .map_err(|e| AgendaError::Serialization(e.to_string()))
    }

    /// File name an export made on `today` is written under.
    pub fn export_file_name(today: NaiveDate) -> String {
        format!("calendar-events-{}.json", today.format("%Y-%m-%d"))
    }
}

fn with_excluded_day(event: &Event, day: NaiveDate) -> Event {
    let mut event = event.clone();
    if !event.excluded_dates.contains(&day) {
        event.excluded_dates.push(day);
        event.excluded_dates.sort();
    }
    event
}

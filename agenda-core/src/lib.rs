//! Scheduling engine for agenda.
//!
//! This crate holds everything the `agenda` CLI (or any other front end) needs:
//! - `recurrence` expands a series into occurrences for a visible window
//! - `conflict` detects overlapping events on the same day
//! - `store` applies edits, moves, deletes and imports as immutable snapshots
//! - `scheduler` ties them together and persists accepted changes
//! - `remote`, `holiday` and `sync` reach external collaborators

pub mod config;
pub mod conflict;
pub mod constants;
pub mod datetime;
pub mod error;
pub mod event;
pub mod filter;
pub mod holiday;
pub mod recurrence;
pub mod reminder;
pub mod remote;
pub mod scheduler;
pub mod storage;
pub mod store;
pub mod sync;
pub mod window;

pub use error::{AgendaError, AgendaResult, ErrorKind};
pub use event::{Category, Event, EventDraft, Occurrence, Repeat, RepeatEnd, Schedulable};
pub use scheduler::{Scheduler, visible_occurrences};
pub use store::{EditScope, EventStore};
pub use window::{DateWindow, View};

//! Event types.
//!
//! An [`Event`] is the persisted series definition. An [`Occurrence`] is the
//! projection of an event onto one concrete date, produced by recurrence
//! expansion and never stored. An [`EventDraft`] is what a form submits when
//! creating or editing an event.
//!
//! Field names serialize in camelCase so exported files stay compatible with
//! the browser calendar's import format.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::DEFAULT_DURATION_MINUTES;
use crate::datetime::end_of_day;
use crate::error::{AgendaError, AgendaResult};

/// Anything with a time span that can take part in conflict detection.
pub trait Schedulable {
    fn id(&self) -> &str;
    fn start(&self) -> NaiveDateTime;
    fn duration_minutes(&self) -> u32;

    /// Exclusive end of the span, saturating at the latest representable instant.
    fn end(&self) -> NaiveDateTime {
        self.start()
            .checked_add_signed(Duration::minutes(i64::from(self.duration_minutes())))
            .unwrap_or(NaiveDateTime::MAX)
    }
}

/// Event category. Only affects display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Work,
    Personal,
    Meeting,
    Appointment,
    Reminder,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Work,
        Category::Personal,
        Category::Meeting,
        Category::Appointment,
        Category::Reminder,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Meeting => "meeting",
            Category::Appointment => "appointment",
            Category::Reminder => "reminder",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Meeting => "Meeting",
            Category::Appointment => "Appointment",
            Category::Reminder => "Reminder",
            Category::Other => "Other",
        }
    }

    /// Display color as a CSS hex string.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Work => "#1976d2",
            Category::Personal => "#2e7d32",
            Category::Meeting => "#ed6c02",
            Category::Appointment => "#9c27b0",
            Category::Reminder => "#d32f2f",
            Category::Other => "#757575",
        }
    }

    fn lookup(s: &str) -> Option<Category> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
    }
}

/// Lenient conversion used when reading stored data: unknown text is `Other`.
impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::lookup(&s).unwrap_or_default()
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.as_str().to_string()
    }
}

/// Strict conversion used for user input.
impl FromStr for Category {
    type Err = AgendaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::lookup(s).ok_or_else(|| {
            AgendaError::Validation(format!(
                "Unknown category '{}'. Expected one of: work, personal, meeting, appointment, reminder, other",
                s
            ))
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recurrence frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    #[default]
    Never,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl FromStr for Repeat {
    type Err = AgendaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "never" => Ok(Repeat::Never),
            "daily" => Ok(Repeat::Daily),
            "weekly" => Ok(Repeat::Weekly),
            "monthly" => Ok(Repeat::Monthly),
            "yearly" => Ok(Repeat::Yearly),
            other => Err(AgendaError::Validation(format!(
                "Unknown repeat '{}'. Expected never, daily, weekly, monthly or yearly",
                other
            ))),
        }
    }
}

/// How a recurring series ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatEnd {
    #[default]
    Never,
    /// Paired with `repeat_end_date`, an inclusive bound on occurrence start.
    On,
    /// Paired with `repeat_count`, a cap on the number of steps.
    After,
}

/// A stored event: the definition of a single event or of a recurring series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Anchor instant of the first occurrence.
    #[serde(with = "crate::datetime::iso")]
    pub date: NaiveDateTime,
    #[serde(default, with = "crate::datetime::iso_option")]
    pub end_date: Option<NaiveDateTime>,
    /// Minutes.
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub color: String,

    // Recurrence
    #[serde(default)]
    pub repeat: Repeat,
    #[serde(default = "default_interval")]
    pub repeat_interval: u32,
    /// Weekday indices, 0 = Sunday. Only used for weekly series.
    #[serde(default)]
    pub repeat_days: BTreeSet<u8>,
    #[serde(default)]
    pub repeat_end_type: RepeatEnd,
    #[serde(default, with = "crate::datetime::iso_option")]
    pub repeat_end_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub repeat_count: Option<u32>,

    /// Minutes before start; 0 disables the reminder.
    #[serde(default)]
    pub reminder: u32,
    #[serde(default)]
    pub share_with: Vec<String>,

    /// Series root this record belongs to. `None` means the record is its own root.
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_event_id: Option<String>,
    /// Days on which the series emits nothing (instances detached from the series).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_dates: Vec<NaiveDate>,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

fn default_interval() -> u32 {
    1
}

/// Ids written by the browser calendar are millisecond timestamps, not strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn deserialize_optional_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

impl Event {
    /// Id of the series root (the record's own id when it is the root).
    pub fn series_id(&self) -> &str {
        self.original_event_id.as_deref().unwrap_or(&self.id)
    }

    pub fn is_recurring(&self) -> bool {
        self.repeat != Repeat::Never
    }

    /// End date as displayed: end of the calendar day for all-day events,
    /// `date + duration` otherwise. Saturates instead of overflowing;
    /// [`Event::validate`] rejects records whose end can't be represented.
    pub fn computed_end_date(&self) -> NaiveDateTime {
        if self.is_all_day {
            end_of_day(self.date.date())
        } else {
            self.timed_end().unwrap_or(NaiveDateTime::MAX)
        }
    }

    fn timed_end(&self) -> Option<NaiveDateTime> {
        self.date
            .checked_add_signed(Duration::minutes(i64::from(self.duration)))
    }

    /// Reject records whose recurrence parameters can't be expanded.
    pub fn validate(&self) -> AgendaResult<()> {
        if self.title.trim().is_empty() {
            return Err(AgendaError::Validation("Title is required".into()));
        }
        if self.duration == 0 {
            return Err(AgendaError::Validation(
                "Duration must be at least one minute".into(),
            ));
        }
        if self.timed_end().is_none() {
            return Err(AgendaError::Validation(format!(
                "Event starting at {} ends past the latest supported date",
                self.date
            )));
        }
        if let Some(day) = self.repeat_days.iter().find(|d| **d > 6) {
            return Err(AgendaError::Validation(format!(
                "Weekday index {} is out of range (0 = Sunday .. 6 = Saturday)",
                day
            )));
        }
        if !self.is_recurring() {
            return Ok(());
        }
        if self.repeat_interval == 0 {
            return Err(AgendaError::Validation(
                "Repeat interval must be a positive number".into(),
            ));
        }
        match self.repeat_end_type {
            RepeatEnd::Never => Ok(()),
            RepeatEnd::On => match self.repeat_end_date {
                None => Err(AgendaError::Validation(
                    "Repeat end date is required when the series ends on a date".into(),
                )),
                Some(end) if end < self.date => Err(AgendaError::Validation(
                    "Repeat end date must not be before the event's start".into(),
                )),
                Some(_) => Ok(()),
            },
            RepeatEnd::After if !matches!(self.repeat_count, Some(n) if n >= 1) => {
                Err(AgendaError::Validation(
                    "Repeat count must be at least 1 when the series ends after a number of occurrences"
                        .into(),
                ))
            }
            _ => Ok(()),
        }
    }
}

impl Schedulable for Event {
    fn id(&self) -> &str {
        &self.id
    }

    fn start(&self) -> NaiveDateTime {
        self.date
    }

    fn duration_minutes(&self) -> u32 {
        self.duration
    }
}

/// One concrete instance of an event on a given date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    /// Copy of the defining event with `date`/`end_date` moved to this instance.
    #[serde(flatten)]
    pub event: Event,
    pub is_recurring: bool,
}

impl Occurrence {
    /// The event itself, not flagged as recurring.
    pub fn single(event: &Event) -> Self {
        Occurrence {
            event: event.clone(),
            is_recurring: false,
        }
    }

    /// An instance of a recurring series starting at `date`.
    pub fn recurring(event: &Event, date: NaiveDateTime) -> Self {
        let mut instance = event.clone();
        instance.date = date;
        instance.end_date = Some(instance.computed_end_date());
        instance.original_event_id = Some(event.series_id().to_string());

        Occurrence {
            event: instance,
            is_recurring: true,
        }
    }

    pub fn series_id(&self) -> &str {
        self.event.series_id()
    }
}

impl Schedulable for Occurrence {
    fn id(&self) -> &str {
        &self.event.id
    }

    fn start(&self) -> NaiveDateTime {
        self.event.date
    }

    fn duration_minutes(&self) -> u32 {
        self.event.duration
    }
}

/// Fields submitted by an event form.
///
/// Saving a draft replaces every user-editable field of the target record;
/// identity fields (`id`, `original_event_id`) and detached dates are owned
/// by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    /// `None` falls back to the default duration.
    pub duration: Option<u32>,
    pub is_all_day: bool,
    pub category: Category,
    pub repeat: Repeat,
    pub repeat_interval: u32,
    pub repeat_days: BTreeSet<u8>,
    pub repeat_end_type: RepeatEnd,
    pub repeat_end_date: Option<NaiveDateTime>,
    pub repeat_count: Option<u32>,
    pub reminder: u32,
    pub share_with: Vec<String>,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, date: NaiveDateTime) -> Self {
        EventDraft {
            title: title.into(),
            description: None,
            date,
            duration: None,
            is_all_day: false,
            category: Category::default(),
            repeat: Repeat::Never,
            repeat_interval: 1,
            repeat_days: BTreeSet::new(),
            repeat_end_type: RepeatEnd::Never,
            repeat_end_date: None,
            repeat_count: None,
            reminder: 0,
            share_with: Vec::new(),
        }
    }

    /// Prefill a draft from an existing event or occurrence, as an edit form does.
    pub fn from_event(event: &Event) -> Self {
        EventDraft {
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date,
            duration: Some(event.duration),
            is_all_day: event.is_all_day,
            category: event.category,
            repeat: event.repeat,
            repeat_interval: event.repeat_interval,
            repeat_days: event.repeat_days.clone(),
            repeat_end_type: event.repeat_end_type,
            repeat_end_date: event.repeat_end_date,
            repeat_count: event.repeat_count,
            reminder: event.reminder,
            share_with: event.share_with.clone(),
        }
    }

    /// Build the stored record for this draft under the given identity.
    pub fn to_event(
        &self,
        id: &str,
        original_event_id: Option<&str>,
        excluded_dates: Vec<NaiveDate>,
    ) -> Event {
        let mut event = Event {
            id: id.to_string(),
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date,
            end_date: None,
            duration: self.duration.unwrap_or(DEFAULT_DURATION_MINUTES),
            is_all_day: self.is_all_day,
            category: self.category,
            color: self.category.color().to_string(),
            repeat: self.repeat,
            repeat_interval: self.repeat_interval,
            repeat_days: self.repeat_days.clone(),
            repeat_end_type: self.repeat_end_type,
            repeat_end_date: self.repeat_end_date,
            repeat_count: self.repeat_count,
            reminder: self.reminder,
            share_with: self.share_with.clone(),
            original_event_id: original_event_id.map(String::from),
            excluded_dates,
        };
        event.end_date = Some(event.computed_end_date());
        event
    }
}

pub mod add;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import;
pub mod list;
pub mod move_event;
pub mod remind;
pub mod sync;

use agenda_core::config::AgendaConfig;
use agenda_core::datetime::{end_of_day, parse_iso};
use agenda_core::event::{Category, EventDraft, Repeat, RepeatEnd};
use agenda_core::scheduler::Scheduler;
use agenda_core::storage::FileStorage;
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::Args;

/// Event form fields shared by `add` and `edit`. Unset flags leave the draft as is.
#[derive(Args, Debug, Default)]
pub struct EventFields {
    /// Start date/time (e.g., "2025-03-20T15:00")
    #[arg(short, long)]
    pub start: Option<String>,

    /// Length in minutes
    #[arg(short, long)]
    pub duration: Option<u32>,

    /// Mark as an all-day event (`--all-day false` to undo)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub all_day: Option<bool>,

    #[arg(short, long)]
    pub category: Option<Category>,

    #[arg(long)]
    pub description: Option<String>,

    /// never, daily, weekly, monthly or yearly
    #[arg(short, long)]
    pub repeat: Option<Repeat>,

    /// Repeat every N days/weeks/months/years
    #[arg(long)]
    pub interval: Option<u32>,

    /// Weekdays for weekly events, 0 = Sunday (e.g. "1,3,5")
    #[arg(long, value_delimiter = ',')]
    pub days: Option<Vec<u8>>,

    /// Last date a repeating event may start on
    #[arg(long, conflicts_with = "count")]
    pub until: Option<String>,

    /// Stop repeating after N occurrences
    #[arg(long)]
    pub count: Option<u32>,

    /// Minutes before start to remind you (0 disables)
    #[arg(long)]
    pub reminder: Option<u32>,

    /// Email to share with (repeatable)
    #[arg(long = "share")]
    pub share_with: Vec<String>,
}

impl EventFields {
    pub fn apply(self, draft: &mut EventDraft) -> Result<()> {
        if let Some(start) = self.start {
            draft.date = parse_when(&start)?;
        }
        if let Some(duration) = self.duration {
            draft.duration = Some(duration);
        }
        if let Some(all_day) = self.all_day {
            draft.is_all_day = all_day;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(description) = self.description {
            draft.description = (!description.is_empty()).then_some(description);
        }
        if let Some(repeat) = self.repeat {
            draft.repeat = repeat;
        }
        if let Some(interval) = self.interval {
            draft.repeat_interval = interval;
        }
        if let Some(days) = self.days {
            draft.repeat_days = days.into_iter().collect();
        }
        if let Some(until) = self.until {
            draft.repeat_end_type = RepeatEnd::On;
            draft.repeat_end_date = Some(parse_until(&until)?);
            draft.repeat_count = None;
        }
        if let Some(count) = self.count {
            draft.repeat_end_type = RepeatEnd::After;
            draft.repeat_count = Some(count);
            draft.repeat_end_date = None;
        }
        if draft.repeat == Repeat::Never {
            draft.repeat_end_type = RepeatEnd::Never;
        }
        if let Some(reminder) = self.reminder {
            draft.reminder = reminder;
        }
        if !self.share_with.is_empty() {
            draft.share_with = self.share_with;
        }
        Ok(())
    }
}

pub fn parse_when(input: &str) -> Result<NaiveDateTime> {
    parse_iso(input).with_context(|| {
        format!("Could not understand '{input}'. Use YYYY-MM-DD or YYYY-MM-DDTHH:MM")
    })
}

/// A bare date means "through the end of that day".
fn parse_until(input: &str) -> Result<NaiveDateTime> {
    match NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
        Ok(date) => Ok(end_of_day(date)),
        Err(_) => parse_when(input),
    }
}

pub fn open_scheduler(config: &AgendaConfig) -> Result<Scheduler<FileStorage>> {
    let data_path = config.data_path();
    Scheduler::open(FileStorage::new(&data_path))
        .with_context(|| format!("Could not load events from {}", data_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn unset_fields_leave_draft_untouched() {
        let mut draft = EventDraft::new("Standup", jan(1, 9));
        let before = draft.clone();

        EventFields::default().apply(&mut draft).unwrap();

        assert_eq!(draft, before);
    }

    #[test]
    fn repeat_fields_set_end_rule() {
        let mut draft = EventDraft::new("Gym", jan(1, 7));
        let fields = EventFields {
            repeat: Some(Repeat::Weekly),
            days: Some(vec![1, 3, 5]),
            count: Some(10),
            ..Default::default()
        };

        fields.apply(&mut draft).unwrap();

        assert_eq!(draft.repeat_end_type, RepeatEnd::After);
        assert_eq!(draft.repeat_count, Some(10));
        assert_eq!(draft.repeat_days.len(), 3);
    }

    #[test]
    fn until_sets_end_date() {
        let mut draft = EventDraft::new("Class", jan(1, 18));
        let fields = EventFields {
            repeat: Some(Repeat::Daily),
            until: Some("2024-01-31".into()),
            ..Default::default()
        };

        fields.apply(&mut draft).unwrap();

        assert_eq!(draft.repeat_end_type, RepeatEnd::On);
        let last_day = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(draft.repeat_end_date, Some(end_of_day(last_day)));
    }

    #[test]
    fn unparseable_start_is_an_error() {
        let mut draft = EventDraft::new("Lunch", jan(1, 12));
        let fields = EventFields {
            start: Some("next tuesday".into()),
            ..Default::default()
        };

        assert!(fields.apply(&mut draft).is_err());
    }
}

//! Terminal rendering for agenda-core types.
//!
//! Extension traits that add colored output to core types using owo_colors.

use agenda_core::event::{Category, Event, Occurrence};
use agenda_core::holiday::Holiday;
use agenda_core::reminder::Reminder;
use agenda_core::store::ImportReport;
use chrono::NaiveDate;
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Category {
    fn render(&self) -> String {
        let tag = format!("[{}]", self.as_str());
        match self {
            Category::Work => tag.blue().to_string(),
            Category::Personal => tag.green().to_string(),
            Category::Meeting => tag.yellow().to_string(),
            Category::Appointment => tag.magenta().to_string(),
            Category::Reminder => tag.red().to_string(),
            Category::Other => tag.dimmed().to_string(),
        }
    }
}

impl Render for Occurrence {
    fn render(&self) -> String {
        let event = &self.event;
        let repeat = if self.is_recurring { " ↻" } else { "" };
        format!(
            "  {} {}{} {} {}",
            format_time(event),
            event.title,
            repeat,
            event.category.render(),
            event.id.dimmed()
        )
    }
}

impl Render for Holiday {
    fn render(&self) -> String {
        format!("  {} {}", "holiday".dimmed(), self.display_name().italic())
    }
}

impl Render for Reminder {
    fn render(&self) -> String {
        format!("🔔 {}", self.to_string().bold())
    }
}

impl Render for ImportReport {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "Imported {} {}",
            self.imported.len(),
            pluralize("event", self.imported.len())
        )];
        if self.has_conflicts() {
            let warning = format!(
                "{} imported {} overlap existing events: {}",
                self.conflicting.len(),
                pluralize("event", self.conflicting.len()),
                self.conflicting.join(", ")
            );
            lines.push(warning.yellow().to_string());
        }
        lines.join("\n")
    }
}

/// A date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
pub fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// The time portion of an event (e.g. "15:00" or "all-day")
pub fn format_time(event: &Event) -> String {
    if event.is_all_day {
        format!("{:>7}", "all-day")
    } else {
        format!("{:>7}", event.date.format("%H:%M"))
    }
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn relative_date_labels() {
        let today = day(2, 24);
        assert_eq!(format_date_label(today, today), "Today");
        assert_eq!(format_date_label(day(2, 25), today), "Tomorrow");
        assert_eq!(format_date_label(day(2, 23), today), "Yesterday");
        assert_eq!(format_date_label(day(2, 26), today), "Wed Feb 26");
    }

    #[test]
    fn pluralizes_counts() {
        assert_eq!(pluralize("event", 1), "event");
        assert_eq!(pluralize("event", 0), "events");
        assert_eq!(pluralize("event", 3), "events");
    }
}

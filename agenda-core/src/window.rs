//! Visible date windows.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::datetime::end_of_day;
use crate::error::AgendaError;

/// Calendar view a window is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Month,
    Week,
    Day,
}

impl FromStr for View {
    type Err = AgendaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(View::Month),
            "week" => Ok(View::Week),
            "day" => Ok(View::Day),
            other => Err(AgendaError::Validation(format!(
                "Unknown view '{}'. Expected month, week or day",
                other
            ))),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Month => write!(f, "month"),
            View::Week => write!(f, "week"),
            View::Day => write!(f, "day"),
        }
    }
}

/// Closed range of instants for which occurrences are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        DateWindow { start, end }
    }

    /// Midnight to the last millisecond of `date`.
    pub fn day(date: NaiveDate) -> Self {
        DateWindow {
            start: date.and_time(NaiveTime::MIN),
            end: end_of_day(date),
        }
    }

    /// Sunday through Saturday of the week containing `date`.
    pub fn week(date: NaiveDate) -> Self {
        let offset = u64::from(date.weekday().num_days_from_sunday());
        let sunday = date.checked_sub_days(Days::new(offset)).unwrap_or(date);
        let saturday = sunday.checked_add_days(Days::new(6)).unwrap_or(sunday);
        DateWindow {
            start: sunday.and_time(NaiveTime::MIN),
            end: end_of_day(saturday),
        }
    }

    /// First through last day of `date`'s month.
    pub fn month(date: NaiveDate) -> Self {
        let first = date.with_day(1).unwrap_or(date);
        let last = first
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(date);
        DateWindow {
            start: first.and_time(NaiveTime::MIN),
            end: end_of_day(last),
        }
    }

    pub fn for_view(view: View, date: NaiveDate) -> Self {
        match view {
            View::Month => Self::month(date),
            View::Week => Self::week(date),
            View::Day => Self::day(date),
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// Every calendar day the window touches, in order.
    pub fn days(&self) -> Vec<NaiveDate> {
        let last = self.end.date();
        let mut days = Vec::new();
        let mut day = self.start.date();
        while day <= last {
            days.push(day);
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_window_covers_whole_month() {
        let w = DateWindow::month(date(2024, 2, 14));
        assert_eq!(w.start, date(2024, 2, 1).and_time(NaiveTime::MIN));
        assert_eq!(w.end, end_of_day(date(2024, 2, 29)));
        assert_eq!(w.days().len(), 29);
    }

    #[test]
    fn december_month_window() {
        let w = DateWindow::month(date(2024, 12, 5));
        assert_eq!(w.end, end_of_day(date(2024, 12, 31)));
    }

    #[test]
    fn week_window_starts_on_sunday() {
        // 2024-01-03 is a Wednesday
        let w = DateWindow::week(date(2024, 1, 3));
        assert_eq!(w.start.date(), date(2023, 12, 31));
        assert_eq!(w.end.date(), date(2024, 1, 6));
        assert_eq!(w.days().len(), 7);
    }

    #[test]
    fn day_window_is_inclusive() {
        let w = DateWindow::day(date(2024, 1, 3));
        assert!(w.contains(date(2024, 1, 3).and_hms_opt(0, 0, 0).unwrap()));
        assert!(w.contains(date(2024, 1, 3).and_hms_opt(23, 59, 59).unwrap()));
        assert!(!w.contains(date(2024, 1, 4).and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn parses_views() {
        assert_eq!("Week".parse::<View>().unwrap(), View::Week);
        assert!("fortnight".parse::<View>().is_err());
    }
}

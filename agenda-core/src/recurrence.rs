//! Recurrence expansion.
//!
//! Walks a cursor forward from the event's anchor date by the series step
//! and emits one occurrence per cursor that lands inside the window.
//!
//! Weekly series with `repeat_days` test the weekday of the stepped cursor
//! only, so each step yields at most one occurrence even when several of the
//! configured weekdays fall inside the same week.

use chrono::{Datelike, Duration, Months, NaiveDateTime};

use crate::event::{Event, Occurrence, Repeat, RepeatEnd};
use crate::window::DateWindow;

/// Expand `event` into the occurrences that start inside `window` (both ends inclusive).
///
/// Non-recurring events produce themselves, unflagged, when their date is in the window.
pub fn expand(event: &Event, window: &DateWindow) -> Vec<Occurrence> {
    if !event.is_recurring() {
        return if window.contains(event.date) {
            vec![Occurrence::single(event)]
        } else {
            Vec::new()
        };
    }

    let end_bound = match event.repeat_end_type {
        RepeatEnd::On => event.repeat_end_date,
        _ => None,
    };
    let count_cap = match event.repeat_end_type {
        RepeatEnd::After => Some(event.repeat_count.unwrap_or(1).max(1)),
        _ => None,
    };

    let mut occurrences = Vec::new();
    let mut cursor = event.date;
    let mut steps: u32 = 0;

    while cursor <= window.end {
        if end_bound.is_some_and(|bound| cursor > bound) {
            break;
        }

        if cursor >= window.start && emits_on(event, cursor) {
            occurrences.push(Occurrence::recurring(event, cursor));
        }

        cursor = match step(cursor, event.repeat, event.repeat_interval) {
            Some(next) => next,
            None => break,
        };

        steps += 1;
        if count_cap.is_some_and(|cap| steps >= cap) {
            break;
        }
    }

    occurrences
}

/// Whether the series emits an occurrence at this cursor.
fn emits_on(event: &Event, cursor: NaiveDateTime) -> bool {
    if event.excluded_dates.contains(&cursor.date()) {
        return false;
    }

    if event.repeat == Repeat::Weekly && !event.repeat_days.is_empty() {
        // Weekday of the stepped date, 0 = Sunday
        let weekday = cursor.weekday().num_days_from_sunday() as u8;
        return event.repeat_days.contains(&weekday);
    }

    true
}

/// Advance the cursor by one series step. Month and year steps clamp to the
/// last day of shorter months. `None` on overflow or for non-recurring events.
fn step(cursor: NaiveDateTime, repeat: Repeat, interval: u32) -> Option<NaiveDateTime> {
    let interval = interval.max(1);
    match repeat {
        Repeat::Never => None,
        Repeat::Daily => cursor.checked_add_signed(Duration::try_days(i64::from(interval))?),
        Repeat::Weekly => cursor.checked_add_signed(Duration::try_weeks(i64::from(interval))?),
        Repeat::Monthly => cursor.checked_add_months(Months::new(interval)),
        Repeat::Yearly => cursor.checked_add_months(Months::new(interval.checked_mul(12)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::tests::{at, make_test_event};
    use chrono::{NaiveDate, Weekday};

    fn window(start: NaiveDateTime, end: NaiveDateTime) -> DateWindow {
        DateWindow::new(start, end)
    }

    fn days(occurrences: &[Occurrence]) -> Vec<u32> {
        occurrences.iter().map(|o| o.event.date.day()).collect()
    }

    #[test]
    fn non_recurring_inside_window_returns_itself() {
        let event = make_test_event("e1", at(2024, 1, 5, 10, 0), 60);
        let result = expand(&event, &window(at(2024, 1, 1, 0, 0), at(2024, 1, 31, 23, 59)));

        assert_eq!(result.len(), 1);
        assert!(!result[0].is_recurring);
        assert_eq!(result[0].event, event);
    }

    #[test]
    fn non_recurring_outside_window_is_empty() {
        let event = make_test_event("e1", at(2024, 2, 5, 10, 0), 60);
        let result = expand(&event, &window(at(2024, 1, 1, 0, 0), at(2024, 1, 31, 23, 59)));
        assert!(result.is_empty());
    }

    #[test]
    fn daily_every_other_day() {
        let mut event = make_test_event("e1", at(2024, 1, 1, 0, 0), 60);
        event.repeat = Repeat::Daily;
        event.repeat_interval = 2;

        let result = expand(&event, &window(at(2024, 1, 1, 0, 0), at(2024, 1, 10, 0, 0)));

        assert_eq!(days(&result), vec![1, 3, 5, 7, 9]);
        assert!(result.iter().all(|o| o.is_recurring && o.series_id() == "e1"));
    }

    #[test]
    fn occurrences_before_window_are_skipped() {
        let mut event = make_test_event("e1", at(2024, 1, 1, 9, 0), 60);
        event.repeat = Repeat::Daily;

        let result = expand(&event, &window(at(2024, 1, 29, 0, 0), at(2024, 2, 2, 23, 59)));

        let dates: Vec<_> = result.iter().map(|o| o.event.date).collect();
        assert_eq!(
            dates,
            vec![
                at(2024, 1, 29, 9, 0),
                at(2024, 1, 30, 9, 0),
                at(2024, 1, 31, 9, 0),
                at(2024, 2, 1, 9, 0),
                at(2024, 2, 2, 9, 0),
            ]
        );
    }

    #[test]
    fn weekly_repeat_days_test_only_the_stepped_weekday() {
        // 2024-01-01 is a Monday
        let anchor = at(2024, 1, 1, 9, 0);
        assert_eq!(anchor.weekday(), Weekday::Mon);

        let mut event = make_test_event("e1", anchor, 60);
        event.repeat = Repeat::Weekly;
        event.repeat_days = [1, 3, 5].into_iter().collect();

        let result = expand(&event, &window(at(2024, 1, 1, 0, 0), at(2024, 1, 31, 23, 59)));

        // One Monday per step; Wednesdays and Fridays are never visited
        assert_eq!(days(&result), vec![1, 8, 15, 22, 29]);
        assert!(result.iter().all(|o| o.event.date.weekday() == Weekday::Mon));
    }

    #[test]
    fn weekly_repeat_days_excluding_anchor_weekday_emit_nothing() {
        let mut event = make_test_event("e1", at(2024, 1, 1, 9, 0), 60);
        event.repeat = Repeat::Weekly;
        event.repeat_days = [3].into_iter().collect();

        let result = expand(&event, &window(at(2024, 1, 1, 0, 0), at(2024, 3, 1, 0, 0)));
        assert!(result.is_empty());
    }

    #[test]
    fn weekly_without_days_uses_anchor_weekday() {
        let mut event = make_test_event("e1", at(2024, 1, 3, 9, 0), 60);
        event.repeat = Repeat::Weekly;
        event.repeat_interval = 2;

        let result = expand(&event, &window(at(2024, 1, 1, 0, 0), at(2024, 2, 29, 23, 59)));
        let dates: Vec<_> = result.iter().map(|o| o.event.date.date()).collect();

        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 17).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
            ]
        );
    }

    #[test]
    fn repeat_count_caps_regardless_of_window() {
        let mut event = make_test_event("e1", at(2024, 1, 1, 9, 0), 60);
        event.repeat = Repeat::Daily;
        event.repeat_end_type = RepeatEnd::After;
        event.repeat_count = Some(3);

        let small = expand(&event, &window(at(2024, 1, 1, 0, 0), at(2024, 1, 31, 0, 0)));
        let large = expand(&event, &window(at(2023, 1, 1, 0, 0), at(2030, 1, 1, 0, 0)));

        assert_eq!(days(&small), vec![1, 2, 3]);
        assert_eq!(large.len(), 3);
    }

    #[test]
    fn repeat_count_is_counted_across_the_whole_series() {
        let mut event = make_test_event("e1", at(2024, 1, 1, 9, 0), 60);
        event.repeat = Repeat::Daily;
        event.repeat_end_type = RepeatEnd::After;
        event.repeat_count = Some(3);

        // Window starts after the third occurrence
        let result = expand(&event, &window(at(2024, 1, 4, 0, 0), at(2024, 1, 31, 0, 0)));
        assert!(result.is_empty());
    }

    #[test]
    fn repeat_end_date_is_inclusive() {
        let mut event = make_test_event("e1", at(2024, 1, 1, 9, 0), 60);
        event.repeat = Repeat::Daily;
        event.repeat_end_type = RepeatEnd::On;
        event.repeat_end_date = Some(at(2024, 1, 4, 9, 0));

        let result = expand(&event, &window(at(2024, 1, 1, 0, 0), at(2024, 1, 31, 0, 0)));
        assert_eq!(days(&result), vec![1, 2, 3, 4]);
    }

    #[test]
    fn anchor_after_repeat_end_date_emits_nothing() {
        let mut event = make_test_event("e1", at(2024, 1, 10, 9, 0), 60);
        event.repeat = Repeat::Daily;
        event.repeat_end_type = RepeatEnd::On;
        event.repeat_end_date = Some(at(2024, 1, 5, 0, 0));

        let result = expand(&event, &window(at(2024, 1, 1, 0, 0), at(2024, 1, 31, 0, 0)));
        assert!(result.is_empty());
    }

    #[test]
    fn monthly_steps_clamp_and_continue_from_clamped_day() {
        let mut event = make_test_event("e1", at(2024, 1, 31, 9, 0), 60);
        event.repeat = Repeat::Monthly;

        let result = expand(&event, &window(at(2024, 1, 1, 0, 0), at(2024, 4, 30, 23, 59)));
        let dates: Vec<_> = result.iter().map(|o| o.event.date.date()).collect();

        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 4, 29).unwrap(),
            ]
        );
    }

    #[test]
    fn yearly_leap_day_clamps_to_february_28() {
        let mut event = make_test_event("e1", at(2024, 2, 29, 9, 0), 60);
        event.repeat = Repeat::Yearly;

        let result = expand(&event, &window(at(2024, 1, 1, 0, 0), at(2026, 12, 31, 0, 0)));
        let dates: Vec<_> = result.iter().map(|o| o.event.date.date()).collect();

        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
                NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
            ]
        );
    }

    #[test]
    fn zero_length_window_emits_boundary_occurrence() {
        let mut event = make_test_event("e1", at(2024, 1, 1, 9, 0), 60);
        event.repeat = Repeat::Daily;

        let instant = at(2024, 1, 3, 9, 0);
        let hit = expand(&event, &window(instant, instant));
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].event.date, instant);

        let miss_instant = at(2024, 1, 3, 9, 1);
        assert!(expand(&event, &window(miss_instant, miss_instant)).is_empty());
    }

    #[test]
    fn anchor_after_window_is_empty() {
        let mut event = make_test_event("e1", at(2024, 3, 1, 9, 0), 60);
        event.repeat = Repeat::Daily;

        let result = expand(&event, &window(at(2024, 1, 1, 0, 0), at(2024, 1, 31, 0, 0)));
        assert!(result.is_empty());
    }

    #[test]
    fn excluded_dates_suppress_only_that_day() {
        let mut event = make_test_event("e1", at(2024, 1, 1, 9, 0), 60);
        event.repeat = Repeat::Daily;
        event.excluded_dates = vec![NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()];

        let result = expand(&event, &window(at(2024, 1, 1, 0, 0), at(2024, 1, 5, 23, 59)));
        assert_eq!(days(&result), vec![1, 2, 4, 5]);
    }

    #[test]
    fn occurrences_carry_shifted_end_dates() {
        let mut event = make_test_event("e1", at(2024, 1, 1, 9, 0), 90);
        event.repeat = Repeat::Daily;

        let result = expand(&event, &window(at(2024, 1, 2, 0, 0), at(2024, 1, 2, 23, 59)));
        assert_eq!(result[0].event.end_date, Some(at(2024, 1, 2, 10, 30)));
    }

    #[test]
    fn expansion_is_restartable() {
        let mut event = make_test_event("e1", at(2024, 1, 1, 9, 0), 60);
        event.repeat = Repeat::Weekly;
        let w = window(at(2024, 1, 1, 0, 0), at(2024, 12, 31, 0, 0));

        assert_eq!(expand(&event, &w), expand(&event, &w));
    }
}

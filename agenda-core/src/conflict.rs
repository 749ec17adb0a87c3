//! Time-overlap conflict detection.
//!
//! Two spans conflict when they start on the same calendar day and overlap
//! under half-open `[start, end)` semantics. Only base events are compared:
//! a recurring series is checked at its anchor date, so callers that create
//! or move a specific occurrence pass that occurrence as the candidate.

use crate::event::{Event, Schedulable};

/// First existing event that `candidate` overlaps, skipping the candidate itself.
///
/// A series whose anchor day was detached no longer occupies that slot.
pub fn find_conflict<'a, C>(candidate: &C, existing: &'a [Event]) -> Option<&'a Event>
where
    C: Schedulable + ?Sized,
{
    existing.iter().find(|event| {
        event.id != candidate.id()
            && !event.excluded_dates.contains(&event.date.date())
            && overlaps(candidate, *event)
    })
}

/// Whether `candidate` overlaps any event in `existing` other than itself.
pub fn has_conflict<C>(candidate: &C, existing: &[Event]) -> bool
where
    C: Schedulable + ?Sized,
{
    find_conflict(candidate, existing).is_some()
}

fn overlaps<A, B>(candidate: &A, existing: &B) -> bool
where
    A: Schedulable + ?Sized,
    B: Schedulable + ?Sized,
{
    let (new_start, new_end) = (candidate.start(), candidate.end());
    let (old_start, old_end) = (existing.start(), existing.end());

    if new_start.date() != old_start.date() {
        return false;
    }

    // starts inside, ends inside, or swallows the existing span
    (new_start >= old_start && new_start < old_end)
        || (new_end > old_start && new_end <= old_end)
        || (new_start <= old_start && new_end >= old_end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::tests::{at, make_test_event};
    use crate::event::{Occurrence, Repeat};

    #[test]
    fn overlapping_spans_conflict_both_ways() {
        let a = make_test_event("a", at(2024, 1, 1, 10, 0), 60);
        let b = make_test_event("b", at(2024, 1, 1, 10, 30), 60);

        assert!(has_conflict(&b, std::slice::from_ref(&a)));
        assert!(has_conflict(&a, std::slice::from_ref(&b)));
    }

    #[test]
    fn touching_spans_do_not_conflict() {
        let a = make_test_event("a", at(2024, 1, 1, 10, 0), 60);
        let b = make_test_event("b", at(2024, 1, 1, 11, 0), 60);

        assert!(!has_conflict(&b, std::slice::from_ref(&a)));
        assert!(!has_conflict(&a, std::slice::from_ref(&b)));
    }

    #[test]
    fn containment_conflicts() {
        let outer = make_test_event("outer", at(2024, 1, 1, 9, 0), 180);
        let inner = make_test_event("inner", at(2024, 1, 1, 10, 0), 15);

        assert!(has_conflict(&outer, std::slice::from_ref(&inner)));
        assert!(has_conflict(&inner, std::slice::from_ref(&outer)));
    }

    #[test]
    fn identical_spans_conflict() {
        let a = make_test_event("a", at(2024, 1, 1, 10, 0), 60);
        let b = make_test_event("b", at(2024, 1, 1, 10, 0), 60);
        assert!(has_conflict(&b, std::slice::from_ref(&a)));
    }

    #[test]
    fn different_days_never_conflict() {
        // Spans overlap across midnight but start on different calendar days
        let late = make_test_event("late", at(2024, 1, 1, 23, 0), 120);
        let early = make_test_event("early", at(2024, 1, 2, 0, 30), 30);

        assert!(!has_conflict(&early, std::slice::from_ref(&late)));
    }

    #[test]
    fn event_never_conflicts_with_itself() {
        let a = make_test_event("a", at(2024, 1, 1, 10, 0), 60);
        assert!(!has_conflict(&a, std::slice::from_ref(&a)));
    }

    #[test]
    fn find_conflict_returns_blocking_event() {
        let free = make_test_event("free", at(2024, 1, 1, 8, 0), 30);
        let busy = make_test_event("busy", at(2024, 1, 1, 10, 0), 60);
        let candidate = make_test_event("new", at(2024, 1, 1, 10, 45), 30);

        let existing = vec![free, busy];
        let found = find_conflict(&candidate, &existing).expect("should conflict");
        assert_eq!(found.id, "busy");
    }

    #[test]
    fn series_are_checked_at_their_anchor_only() {
        let mut series = make_test_event("series", at(2024, 1, 1, 10, 0), 60);
        series.repeat = Repeat::Daily;

        // Same time on a later day: the base record starts on Jan 1, so no conflict
        let later = make_test_event("later", at(2024, 1, 5, 10, 0), 60);
        assert!(!has_conflict(&later, std::slice::from_ref(&series)));

        // The caller re-checks a specific occurrence against the other base events
        let occurrence = Occurrence::recurring(&series, at(2024, 1, 5, 10, 0));
        assert!(has_conflict(&occurrence, std::slice::from_ref(&later)));
    }

    #[test]
    fn detached_anchor_day_is_free() {
        let mut series = make_test_event("series", at(2024, 1, 1, 9, 0), 60);
        series.repeat = Repeat::Daily;
        let candidate = make_test_event("new", at(2024, 1, 1, 9, 0), 60);
        assert!(has_conflict(&candidate, std::slice::from_ref(&series)));

        series.excluded_dates.push(at(2024, 1, 1, 0, 0).date());
        assert!(!has_conflict(&candidate, std::slice::from_ref(&series)));
    }
}

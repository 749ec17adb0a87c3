//! Search and category filtering applied to visible events.

use crate::event::{Category, Event};

/// Pass-through predicate over events: free-text search plus an optional category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub query: String,
    /// `None` matches every category.
    pub category: Option<Category>,
}

impl EventFilter {
    pub fn new(query: impl Into<String>, category: Option<Category>) -> Self {
        EventFilter {
            query: query.into(),
            category,
        }
    }

    /// Every whitespace-separated search term must appear (case-insensitively)
    /// in the title, description or category name.
    pub fn matches(&self, event: &Event) -> bool {
        if self.category.is_some_and(|c| c != event.category) {
            return false;
        }

        let title = event.title.to_lowercase();
        let description = event
            .description
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        let category = event.category.as_str();

        self.query
            .to_lowercase()
            .split_whitespace()
            .all(|term| {
                title.contains(term) || description.contains(term) || category.contains(term)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::tests::{at, make_test_event};

    fn sample() -> Event {
        let mut event = make_test_event("e1", at(2024, 1, 1, 9, 0), 30);
        event.title = "Quarterly Review".into();
        event.description = Some("Budget numbers with finance".into());
        event.category = Category::Work;
        event
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(EventFilter::default().matches(&sample()));
    }

    #[test]
    fn all_terms_must_match_somewhere() {
        let event = sample();
        assert!(EventFilter::new("review budget", None).matches(&event));
        assert!(EventFilter::new("QUARTERLY", None).matches(&event));
        assert!(EventFilter::new("work", None).matches(&event));
        assert!(!EventFilter::new("review dentist", None).matches(&event));
    }

    #[test]
    fn category_must_match_exactly() {
        let event = sample();
        assert!(EventFilter::new("", Some(Category::Work)).matches(&event));
        assert!(!EventFilter::new("", Some(Category::Personal)).matches(&event));
    }

    #[test]
    fn missing_description_is_empty() {
        let mut event = sample();
        event.description = None;
        assert!(!EventFilter::new("finance", None).matches(&event));
    }
}

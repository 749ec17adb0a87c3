//! Public holidays used to annotate calendar days.
//!
//! Holidays come from an external source and are display-only. Any failure
//! to load them degrades to an empty calendar.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AgendaError, AgendaResult};
use crate::remote::protocol::ListHolidays;
use crate::remote::Provider;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    pub date: NaiveDate,
    #[serde(default)]
    pub local_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Holiday {
    /// The local name when present, else the English one.
    pub fn display_name(&self) -> &str {
        self.local_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.name.as_deref())
            .unwrap_or("Holiday")
    }
}

/// Parse a holiday list. A body that is not a JSON array yields no holidays;
/// entries that don't decode are skipped.
pub fn parse_holidays(body: &serde_json::Value) -> Vec<Holiday> {
    let Some(entries) = body.as_array() else {
        debug!("holiday payload is not a list, ignoring");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match Holiday::deserialize(entry) {
            Ok(holiday) => Some(holiday),
            Err(e) => {
                debug!("skipping holiday entry: {}", e);
                None
            }
        })
        .collect()
}

/// Anything that can list the public holidays of a year.
pub trait HolidaySource {
    fn list_holidays(
        &self,
        year: i32,
        country_code: &str,
    ) -> impl Future<Output = AgendaResult<serde_json::Value>>;
}

impl HolidaySource for Provider {
    async fn list_holidays(&self, year: i32, country_code: &str) -> AgendaResult<serde_json::Value> {
        self.call(ListHolidays {
            year,
            country_code: country_code.to_string(),
        })
        .await
        .map_err(|e| AgendaError::Holiday(e.to_string()))
    }
}

/// A fixed holiday payload, for tests and offline use.
#[derive(Debug, Clone, Default)]
pub struct StaticHolidays(pub serde_json::Value);

impl HolidaySource for StaticHolidays {
    async fn list_holidays(&self, _year: i32, _country_code: &str) -> AgendaResult<serde_json::Value> {
        Ok(self.0.clone())
    }
}

/// Holidays indexed by day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HolidayCalendar {
    by_day: BTreeMap<NaiveDate, Vec<Holiday>>,
}

impl HolidayCalendar {
    pub fn new(holidays: Vec<Holiday>) -> Self {
        let mut by_day: BTreeMap<NaiveDate, Vec<Holiday>> = BTreeMap::new();
        for holiday in holidays {
            by_day.entry(holiday.date).or_default().push(holiday);
        }
        HolidayCalendar { by_day }
    }

    pub fn on(&self, date: NaiveDate) -> &[Holiday] {
        self.by_day.get(&date).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_day.values().map(Vec::len).sum()
    }
}

/// Load holidays for `year`, degrading any failure to an empty calendar.
pub async fn load_holidays<H: HolidaySource>(
    source: &H,
    year: i32,
    country_code: &str,
) -> HolidayCalendar {
    match source.list_holidays(year, country_code).await {
        Ok(body) => {
            let holidays = parse_holidays(&body);
            debug!(year, country = %country_code, count = holidays.len(), "loaded holidays");
            HolidayCalendar::new(holidays)
        }
        Err(e) => {
            warn!("Holidays unavailable for {} {}: {}", country_code, year, e);
            HolidayCalendar::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct FailingSource;

    impl HolidaySource for FailingSource {
        async fn list_holidays(&self, _year: i32, _country: &str) -> AgendaResult<serde_json::Value> {
            Err(AgendaError::Holiday("network down".into()))
        }
    }

    #[test]
    fn parses_local_and_english_names() {
        let body = json!([
            {"date": "2024-01-26", "localName": "गणतंत्र दिवस", "name": "Republic Day"},
            {"date": "2024-08-15", "name": "Independence Day"},
        ]);

        let holidays = parse_holidays(&body);

        assert_eq!(holidays.len(), 2);
        assert_eq!(holidays[0].display_name(), "गणतंत्र दिवस");
        assert_eq!(holidays[1].display_name(), "Independence Day");
    }

    #[test]
    fn non_array_payload_is_empty() {
        assert!(parse_holidays(&json!({"error": "rate limited"})).is_empty());
        assert!(parse_holidays(&json!(null)).is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let body = json!([
            {"date": "not a date", "name": "Broken"},
            {"date": "2024-12-25", "name": "Christmas"},
        ]);

        let holidays = parse_holidays(&body);
        assert_eq!(holidays.len(), 1);
        assert_eq!(holidays[0].date, day(2024, 12, 25));
    }

    #[test]
    fn calendar_annotates_days() {
        let calendar = HolidayCalendar::new(parse_holidays(&json!([
            {"date": "2024-12-25", "name": "Christmas"},
        ])));

        assert_eq!(calendar.on(day(2024, 12, 25))[0].display_name(), "Christmas");
        assert!(calendar.on(day(2024, 12, 24)).is_empty());
        assert_eq!(calendar.len(), 1);
    }

    #[tokio::test]
    async fn load_uses_source_payload() {
        let source = StaticHolidays(json!([{"date": "2024-01-01", "name": "New Year"}]));

        let calendar = load_holidays(&source, 2024, "IN").await;

        assert_eq!(calendar.on(day(2024, 1, 1)).len(), 1);
    }

    #[tokio::test]
    async fn load_failure_degrades_to_empty() {
        let calendar = load_holidays(&FailingSource, 2024, "IN").await;
        assert!(calendar.is_empty());
    }
}

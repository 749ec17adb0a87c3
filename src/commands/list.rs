use agenda_core::config::AgendaConfig;
use agenda_core::event::{Category, Schedulable};
use agenda_core::filter::EventFilter;
use agenda_core::holiday::{HolidayCalendar, load_holidays};
use agenda_core::window::{DateWindow, View};
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;

use super::open_scheduler;
use crate::render::{Render, format_date_label};

pub async fn run(
    config: &AgendaConfig,
    view: View,
    date: Option<&str>,
    search: Option<String>,
    category: Option<Category>,
) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let anchor = match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{d}', expected YYYY-MM-DD"))?,
        None => today,
    };
    let window = DateWindow::for_view(view, anchor);
    let filter = EventFilter::new(search.unwrap_or_default(), category);

    let scheduler = open_scheduler(config)?;
    let occurrences = scheduler.visible_occurrences(&window, &filter);
    let holidays = holidays_for(config, &window).await;

    let mut printed_any = false;
    for day in window.days() {
        let on_day: Vec<_> = occurrences
            .iter()
            .filter(|occ| occ.start().date() == day)
            .collect();
        let holidays_today = holidays.on(day);

        if on_day.is_empty() && holidays_today.is_empty() {
            continue;
        }
        if printed_any {
            println!();
        }
        printed_any = true;

        println!("{}", format_date_label(day, today).bold());
        for holiday in holidays_today {
            println!("{}", holiday.render());
        }
        for occ in on_day {
            println!("{}", occ.render());
        }
    }

    if !printed_any {
        println!("{}", "No events found".dimmed());
    }
    Ok(())
}

/// Holidays for every year the window touches, or none without a holiday provider.
async fn holidays_for(config: &AgendaConfig, window: &DateWindow) -> HolidayCalendar {
    let Some(provider) = config.holiday_provider() else {
        return HolidayCalendar::default();
    };

    let mut holidays = Vec::new();
    for year in window.start.year()..=window.end.year() {
        let calendar = load_holidays(&provider, year, &config.holiday_country).await;
        holidays.extend(
            window
                .days()
                .into_iter()
                .filter(|d| d.year() == year)
                .flat_map(|d| calendar.on(d).to_vec()),
        );
    }
    HolidayCalendar::new(holidays)
}

use agenda_core::config::AgendaConfig;
use agenda_core::event::{EventDraft, Repeat};
use agenda_core::store::EditScope;
use anyhow::Result;
use owo_colors::OwoColorize;

use super::{EventFields, open_scheduler, parse_when};

pub fn run(
    config: &AgendaConfig,
    id: &str,
    on: Option<&str>,
    all: bool,
    title: Option<String>,
    fields: EventFields,
) -> Result<()> {
    let mut scheduler = open_scheduler(config)?;

    let start = on.map(parse_when).transpose()?;
    let selected = scheduler.occurrence(id, start)?;
    let scope = if all {
        EditScope::AllInstances
    } else {
        EditScope::ThisInstance
    };

    let mut draft = EventDraft::from_event(&selected.event);
    if all {
        // Series edits keep the series anchor unless a new start is given
        if let Some(series) = scheduler.store().get(selected.series_id()) {
            draft.date = series.date;
        }
    } else if selected.is_recurring {
        // A detached instance stands alone
        draft.repeat = Repeat::Never;
    }
    if let Some(title) = title {
        draft.title = title;
    }
    fields.apply(&mut draft)?;

    let event = scheduler.try_save(&draft, Some(&selected), scope)?;

    let what = match (scope, selected.is_recurring) {
        (EditScope::AllInstances, _) => "Updated series",
        (EditScope::ThisInstance, true) => "Updated this occurrence",
        (EditScope::ThisInstance, false) => "Updated",
    };
    println!("{} {}", what.green(), event.title.bold());
    if event.id != selected.event.id {
        println!("  {}", event.id.dimmed());
    }
    Ok(())
}

use crate::output::print_json;
use chrono::{Datelike, NaiveDateTime, Weekday};
use humanos_core::catalog::fetch_routines;
use humanos_core::schedule::week_view;
use humanos_core::types::{weekday_name, weekday_short};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct DayColumn<'a> {
    #[serde(skip)]
    weekday: Weekday,
    day: &'static str,
    today: bool,
    routines: Vec<DayRoutine<'a>>,
}

#[derive(Serialize)]
struct DayRoutine<'a> {
    id: &'a str,
    name: &'a str,
    preferred: &'a str,
}

pub fn run(root: &Path, now: NaiveDateTime, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root);
    let source = super::http_source()?;
    let routines = fetch_routines(&store, &source, now.date(), false);

    let columns: Vec<DayColumn> = week_view(&routines)
        .into_iter()
        .map(|(day, scheduled)| {
            let mut scheduled: Vec<DayRoutine> = scheduled
                .into_iter()
                .map(|r| DayRoutine {
                    id: &r.id,
                    name: &r.name,
                    preferred: &r.trigger.preferred,
                })
                .collect();
            scheduled.sort_by(|a, b| a.preferred.cmp(b.preferred));
            DayColumn {
                weekday: day,
                day: weekday_name(day),
                today: day == now.weekday(),
                routines: scheduled,
            }
        })
        .collect();

    if json {
        return print_json(&columns);
    }

    for col in &columns {
        let marker = if col.today { " (today)" } else { "" };
        println!("{}{marker}", weekday_short(col.weekday));
        if col.routines.is_empty() {
            println!("  No routines");
        }
        for r in &col.routines {
            println!("  {}  {} [{}]", r.preferred, r.name, r.id);
        }
    }
    Ok(())
}

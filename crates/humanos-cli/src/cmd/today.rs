use crate::output::{print_json, print_table};
use chrono::{Datelike, NaiveDateTime};
use humanos_core::routine::RoutineWithStatus;
use humanos_core::schedule::{is_active, is_next_up, sort_for_dashboard, today_routines};
use humanos_core::types::weekday_name;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TodayEntry<'a> {
    #[serde(flatten)]
    routine: &'a RoutineWithStatus,
    active: bool,
    next_up: bool,
}

#[derive(Serialize)]
struct TodayOutput<'a> {
    date: String,
    weekday: &'static str,
    routines: Vec<TodayEntry<'a>>,
}

pub fn run(root: &Path, now: NaiveDateTime, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root);
    let source = super::http_source()?;

    let mut routines = today_routines(&store, &source, now);
    sort_for_dashboard(&mut routines);

    let entries: Vec<TodayEntry> = routines
        .iter()
        .map(|r| TodayEntry {
            routine: r,
            active: is_active(&r.routine, now),
            next_up: is_next_up(&r.routine, now),
        })
        .collect();

    if json {
        return print_json(&TodayOutput {
            date: now.date().to_string(),
            weekday: weekday_name(now.weekday()),
            routines: entries,
        });
    }

    println!("{}, {}", weekday_name(now.weekday()), now.date());
    if entries.is_empty() {
        println!("No routines scheduled today.");
        return Ok(());
    }

    let rows = entries
        .iter()
        .map(|e| {
            let r = &e.routine.routine;
            let when = if e.active {
                "active now"
            } else if e.next_up {
                "up next"
            } else {
                ""
            };
            vec![
                r.id.clone(),
                r.label(),
                super::window(r),
                e.routine.status.to_string(),
                r.steps.len().to_string(),
                when.to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "ROUTINE", "WINDOW", "STATUS", "STEPS", ""], rows);
    Ok(())
}

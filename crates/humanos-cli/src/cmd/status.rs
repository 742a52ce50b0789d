use crate::output::print_json;
use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use clap::Subcommand;
use humanos_core::catalog::fetch_routines;
use humanos_core::routine::find;
use humanos_core::status;
use humanos_core::types::{date_key, parse_date, RoutineStatus};
use humanos_core::HumanosError;
use serde::Serialize;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum StatusSubcommand {
    /// Show a routine's status for a day
    Get {
        /// Routine id
        id: String,
        /// Day to read (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Record a routine's status for a day
    Set {
        /// Routine id
        id: String,
        /// not_started, in_progress or completed
        status: String,
        /// Day to write (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Forget every status recorded today
    ClearToday,

    /// Forget all status history
    Reset,
}

#[derive(Serialize)]
struct StatusOutput<'a> {
    id: &'a str,
    date: String,
    status: RoutineStatus,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(
    root: &Path,
    now: NaiveDateTime,
    subcmd: StatusSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let store = super::open_store(root);
    let today = now.date();

    match subcmd {
        StatusSubcommand::Get { id, date } => {
            let date = day_or_today(date.as_deref(), today)?;
            status::reset_if_new_day(&store, today).context("failed to start a new day")?;
            let current = status::get_status(&store, &id, date, today)
                .with_context(|| format!("failed to read status of '{id}'"))?;
            print_status(&id, date, current, json)
        }
        StatusSubcommand::Set { id, status: value, date } => {
            let new_status: RoutineStatus = value.parse()?;
            let date = day_or_today(date.as_deref(), today)?;

            let source = super::http_source()?;
            let routines = fetch_routines(&store, &source, today, false);
            if find(&routines, &id).is_none() {
                return Err(HumanosError::RoutineNotFound(id).into());
            }

            status::reset_if_new_day(&store, today).context("failed to start a new day")?;
            status::set_status(&store, &id, new_status, date, today)
                .with_context(|| format!("failed to update status of '{id}'"))?;
            print_status(&id, date, new_status, json)
        }
        StatusSubcommand::ClearToday => {
            status::clear_day(&store, today, today).context("failed to clear today's statuses")?;
            if json {
                return print_json(&serde_json::json!({ "cleared": date_key(today) }));
            }
            println!("Cleared statuses for {}", date_key(today));
            Ok(())
        }
        StatusSubcommand::Reset => {
            status::clear_all(&store).context("failed to reset status history")?;
            if json {
                return print_json(&serde_json::json!({ "cleared": "all" }));
            }
            println!("Cleared all status history");
            Ok(())
        }
    }
}

fn day_or_today(date: Option<&str>, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    match date {
        Some(s) => Ok(parse_date(s)?),
        None => Ok(today),
    }
}

fn print_status(id: &str, date: NaiveDate, status: RoutineStatus, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&StatusOutput {
            id,
            date: date_key(date),
            status,
        });
    }
    println!("{id}: {status} ({})", date_key(date));
    Ok(())
}

use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::NaiveDateTime;
use clap::Subcommand;
use humanos_core::catalog::{cached_routines_json, fetch_routines, import_routines};
use humanos_core::routine::{has_errors, validate_routines, WarnLevel};
use humanos_core::settings::require_developer_mode;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum CatalogSubcommand {
    /// Print the cached catalog as JSON
    Show,

    /// Check the catalog for mistakes
    Validate,

    /// Replace the cached catalog with a JSON file (developer mode)
    Import {
        /// JSON file holding {"routines": [...]} or a bare array
        file: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(
    root: &Path,
    now: NaiveDateTime,
    subcmd: CatalogSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        CatalogSubcommand::Show => show(root, now),
        CatalogSubcommand::Validate => validate(root, now, json),
        CatalogSubcommand::Import { file } => import(root, now, &file, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(root: &Path, now: NaiveDateTime) -> anyhow::Result<()> {
    let store = super::open_store(root);
    if let Some(raw) = cached_routines_json(&store)? {
        println!("{raw}");
        return Ok(());
    }

    // Nothing cached yet: load once so there is something to show.
    let source = super::http_source()?;
    fetch_routines(&store, &source, now.date(), false);
    let raw = cached_routines_json(&store)?.context("routine cache is empty")?;
    println!("{raw}");
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(root: &Path, now: NaiveDateTime, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root);
    let source = super::http_source()?;
    let routines = fetch_routines(&store, &source, now.date(), false);
    let warnings = validate_routines(&routines);

    if json {
        print_json(&warnings)?;
    } else if warnings.is_empty() {
        println!("Catalog OK ({} routines)", routines.len());
    } else {
        let rows = warnings
            .iter()
            .map(|w| {
                let level = match w.level {
                    WarnLevel::Warning => "warning",
                    WarnLevel::Error => "error",
                };
                vec![level.to_string(), w.routine.clone(), w.message.clone()]
            })
            .collect();
        print_table(&["LEVEL", "ROUTINE", "MESSAGE"], rows);
    }

    if has_errors(&warnings) {
        anyhow::bail!("catalog has errors");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// import
// ---------------------------------------------------------------------------

fn import(root: &Path, now: NaiveDateTime, file: &Path, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root);
    require_developer_mode(&store)?;

    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let routines = import_routines(&store, &raw, now.date())
        .with_context(|| format!("failed to import {}", file.display()))?;

    if json {
        return print_json(&serde_json::json!({ "imported": routines.len() }));
    }
    println!("Imported {} routine(s)", routines.len());
    Ok(())
}

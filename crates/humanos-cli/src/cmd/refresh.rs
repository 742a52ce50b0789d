use crate::output::print_json;
use chrono::NaiveDateTime;
use humanos_core::catalog::fetch_routines;
use humanos_core::paths::LAST_FETCH_DATE_KEY;
use humanos_core::store::KvStore;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshOutput {
    count: usize,
    fetched_on: Option<String>,
}

pub fn run(root: &Path, now: NaiveDateTime, json: bool) -> anyhow::Result<()> {
    let store = super::open_store(root);
    let source = super::http_source()?;
    let routines = fetch_routines(&store, &source, now.date(), true);
    let fetched_on = store.get(LAST_FETCH_DATE_KEY)?;

    if json {
        return print_json(&RefreshOutput {
            count: routines.len(),
            fetched_on,
        });
    }

    println!("Loaded {} routine(s)", routines.len());
    Ok(())
}

use crate::defaults::default_routines;
use crate::error::{HumanosError, Result};
use crate::paths::{DEFAULT_JSON_URL, JSON_URL_KEY, LAST_FETCH_DATE_KEY, ROUTINES_KEY};
use crate::routine::{has_errors, validate_routines, Routine, RoutinesData, WarnLevel};
use crate::store::{self, KvStore};
use crate::types::date_key;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Where a fresh catalog comes from.
pub trait CatalogSource {
    fn fetch(&self, url: &str) -> Result<RoutinesData>;
}

/// Single blocking GET, no retries. Non-2xx responses are failures.
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("humanos/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl CatalogSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<RoutinesData> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        tracing::debug!(url, status = status.as_u16(), "catalog response");
        if !status.is_success() {
            return Err(HumanosError::HttpStatus(status.as_u16()));
        }
        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

// ---------------------------------------------------------------------------
// Fetch with daily cache
// ---------------------------------------------------------------------------

/// Load the routine catalog for `today`.
///
/// Served from the cache when it was already fetched today (unless
/// `force_refresh`); otherwise fetched from the configured source, with the
/// bundled defaults standing in when the fetch fails. Whatever is returned
/// after a fetch attempt becomes today's cache. Never fails: storage errors
/// degrade to the cached list, then to the bundled defaults.
pub fn fetch_routines(
    store: &dyn KvStore,
    source: &dyn CatalogSource,
    today: NaiveDate,
    force_refresh: bool,
) -> Vec<Routine> {
    match load_or_fetch(store, source, today, force_refresh) {
        Ok(routines) => routines,
        Err(e) => {
            tracing::error!(error = %e, "failed to load routines");
            match read_cache(store) {
                Ok(Some(routines)) => {
                    tracing::debug!(count = routines.len(), "using cached routines after error");
                    routines
                }
                Ok(None) => default_routines().to_vec(),
                Err(e) => {
                    tracing::warn!(error = %e, "cached routines unreadable, using bundled defaults");
                    default_routines().to_vec()
                }
            }
        }
    }
}

fn load_or_fetch(
    store: &dyn KvStore,
    source: &dyn CatalogSource,
    today: NaiveDate,
    force_refresh: bool,
) -> Result<Vec<Routine>> {
    let today_key = date_key(today);
    let last_fetch = store.get(LAST_FETCH_DATE_KEY)?;

    if !force_refresh && last_fetch.as_deref() == Some(today_key.as_str()) {
        match read_cache(store) {
            Ok(Some(routines)) => {
                tracing::debug!(count = routines.len(), "using routines cached today");
                return Ok(routines);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "cached routines unreadable, refetching"),
        }
    }

    let url = source_url_or_default(store)?;
    let routines = match source
        .fetch(&url)
        .and_then(|data| data.routines.ok_or(HumanosError::MissingRoutines))
    {
        Ok(routines) => {
            tracing::info!(url = %url, count = routines.len(), "fetched remote routines");
            routines
        }
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "failed to fetch remote routines, using bundled defaults");
            default_routines().to_vec()
        }
    };

    write_cache(store, &routines, today)?;
    Ok(routines)
}

/// The configured URL; persists the default the first time it is needed.
fn source_url_or_default(store: &dyn KvStore) -> Result<String> {
    match store.get(JSON_URL_KEY)? {
        Some(url) if !url.trim().is_empty() => Ok(url),
        _ => {
            store.set(JSON_URL_KEY, DEFAULT_JSON_URL)?;
            Ok(DEFAULT_JSON_URL.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Cache access
// ---------------------------------------------------------------------------

pub fn read_cache(store: &dyn KvStore) -> Result<Option<Vec<Routine>>> {
    store::get_json(store, ROUTINES_KEY)
}

fn write_cache(store: &dyn KvStore, routines: &[Routine], today: NaiveDate) -> Result<()> {
    store::set_json(store, ROUTINES_KEY, routines)?;
    store.set(LAST_FETCH_DATE_KEY, &date_key(today))
}

/// The cached catalog as pretty JSON (the developer-mode raw view).
pub fn cached_routines_json(store: &dyn KvStore) -> Result<Option<String>> {
    match read_cache(store)? {
        Some(routines) => {
            let envelope = RoutinesData {
                routines: Some(routines),
            };
            Ok(Some(serde_json::to_string_pretty(&envelope)?))
        }
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Raw JSON import
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportDocument {
    Envelope { routines: Vec<Routine> },
    Bare(Vec<Routine>),
}

/// Replace today's cached catalog with hand-edited JSON.
///
/// Accepts either the `{routines: [...]}` envelope or a bare array. Catalogs
/// with error-level validation findings are refused and leave the cache as is.
pub fn import_routines(store: &dyn KvStore, json: &str, today: NaiveDate) -> Result<Vec<Routine>> {
    let routines = match serde_json::from_str::<ImportDocument>(json) {
        Ok(ImportDocument::Envelope { routines }) | Ok(ImportDocument::Bare(routines)) => routines,
        Err(_) => {
            // Re-run against the envelope shape for a useful error message.
            let data: RoutinesData = serde_json::from_str(json)?;
            data.routines.ok_or(HumanosError::MissingRoutines)?
        }
    };

    let warnings = validate_routines(&routines);
    if has_errors(&warnings) {
        let messages: Vec<String> = warnings
            .iter()
            .filter(|w| w.level == WarnLevel::Error)
            .map(|w| format!("{}: {}", w.routine, w.message))
            .collect();
        return Err(HumanosError::InvalidCatalog(messages.join("; ")));
    }

    write_cache(store, &routines, today)?;
    tracing::info!(count = routines.len(), "imported routines");
    Ok(routines)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use crate::error::{HumanosError, Result};
use crate::paths::{
    DEFAULT_JSON_URL, DEVELOPER_MODE_KEY, JSON_URL_KEY, LAST_FETCH_DATE_KEY, ROUTINES_KEY,
};
use crate::store::KvStore;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub source_url: String,
    pub source_url_is_default: bool,
    pub developer_mode: bool,
}

/// Snapshot of the user-editable settings. Unreadable values fall back to
/// their defaults.
pub fn load(store: &dyn KvStore) -> Settings {
    let stored_url = match store.get(JSON_URL_KEY) {
        Ok(url) => url.filter(|u| !u.trim().is_empty()),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read source url");
            None
        }
    };
    Settings {
        source_url_is_default: stored_url.as_deref().map_or(true, |u| u == DEFAULT_JSON_URL),
        source_url: stored_url.unwrap_or_else(|| DEFAULT_JSON_URL.to_string()),
        developer_mode: developer_mode(store),
    }
}

// ---------------------------------------------------------------------------
// Source URL
// ---------------------------------------------------------------------------

pub fn get_source_url(store: &dyn KvStore) -> String {
    load(store).source_url
}

pub fn set_source_url(store: &dyn KvStore, url: &str) -> Result<()> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(HumanosError::InvalidUrl(url.to_string()));
    }
    store.set(JSON_URL_KEY, url)?;
    tracing::info!(url, "source url updated");
    Ok(())
}

// ---------------------------------------------------------------------------
// Developer mode
// ---------------------------------------------------------------------------

pub fn developer_mode(store: &dyn KvStore) -> bool {
    match store.get(DEVELOPER_MODE_KEY) {
        Ok(v) => v.as_deref() == Some("true"),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read developer mode flag");
            false
        }
    }
}

pub fn set_developer_mode(store: &dyn KvStore, enabled: bool) -> Result<()> {
    store.set(DEVELOPER_MODE_KEY, if enabled { "true" } else { "false" })
}

pub fn require_developer_mode(store: &dyn KvStore) -> Result<()> {
    if developer_mode(store) {
        Ok(())
    } else {
        Err(HumanosError::DeveloperModeRequired)
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Drop the cached catalog so the next load goes back to the source.
pub fn clear_cache(store: &dyn KvStore) -> Result<()> {
    store.remove(ROUTINES_KEY)?;
    store.remove(LAST_FETCH_DATE_KEY)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn defaults_when_empty() {
        let store = MemoryStore::new();
        let s = load(&store);
        assert_eq!(s.source_url, DEFAULT_JSON_URL);
        assert!(s.source_url_is_default);
        assert!(!s.developer_mode);
    }

    #[test]
    fn set_source_url_persists() {
        let store = MemoryStore::new();
        set_source_url(&store, " https://example.com/routines.json ").unwrap();
        assert_eq!(get_source_url(&store), "https://example.com/routines.json");
        assert!(!load(&store).source_url_is_default);
    }

    #[test]
    fn set_source_url_rejects_non_http() {
        let store = MemoryStore::new();
        let err = set_source_url(&store, "ftp://example.com/r.json").unwrap_err();
        assert!(matches!(err, HumanosError::InvalidUrl(_)));
        assert_eq!(get_source_url(&store), DEFAULT_JSON_URL);
    }

    #[test]
    fn developer_mode_toggle() {
        let store = MemoryStore::new();
        assert!(require_developer_mode(&store).is_err());
        set_developer_mode(&store, true).unwrap();
        assert!(developer_mode(&store));
        assert!(require_developer_mode(&store).is_ok());
        set_developer_mode(&store, false).unwrap();
        assert!(!developer_mode(&store));
    }

    #[test]
    fn clear_cache_removes_catalog_and_fetch_date() {
        let store = MemoryStore::new();
        store.set(ROUTINES_KEY, "[]").unwrap();
        store.set(LAST_FETCH_DATE_KEY, "2025-01-06").unwrap();
        store.set(DEVELOPER_MODE_KEY, "true").unwrap();
        clear_cache(&store).unwrap();
        assert!(store.get(ROUTINES_KEY).unwrap().is_none());
        assert!(store.get(LAST_FETCH_DATE_KEY).unwrap().is_none());
        assert!(developer_mode(&store));
    }
}

use crate::error::{HumanosError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const HUMANOS_DIR: &str = ".humanos";
pub const STORAGE_FILE: &str = ".humanos/storage.yaml";

// ---------------------------------------------------------------------------
// Storage keys
// ---------------------------------------------------------------------------

pub const ROUTINES_KEY: &str = "humanos_routines";
pub const JSON_URL_KEY: &str = "humanos_json_url";
pub const ROUTINE_STATUS_KEY: &str = "humanos_routine_status";
pub const LAST_FETCH_DATE_KEY: &str = "humanos_last_fetch_date";
pub const LAST_RESET_DATE_KEY: &str = "humanos_last_reset_date";
pub const DEVELOPER_MODE_KEY: &str = "developer_mode";

pub const DEFAULT_JSON_URL: &str =
    "https://raw.githubusercontent.com/xuy/humanos/refs/heads/master/routines.json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn humanos_dir(root: &Path) -> PathBuf {
    root.join(HUMANOS_DIR)
}

pub fn storage_path(root: &Path) -> PathBuf {
    root.join(STORAGE_FILE)
}

/// The user's home directory, where `.humanos/` lives unless overridden.
pub fn default_root() -> Result<PathBuf> {
    home::home_dir().ok_or(HumanosError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Routine id validation
// ---------------------------------------------------------------------------

static ROUTINE_ID_RE: OnceLock<Regex> = OnceLock::new();

fn routine_id_re() -> &'static Regex {
    ROUTINE_ID_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9_\-]*$").unwrap())
}

pub fn is_valid_routine_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 64 && routine_id_re().is_match(id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

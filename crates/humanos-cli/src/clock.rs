use anyhow::Context;
use chrono::{Local, NaiveDateTime};

const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// The local wall-clock time every command works against.
pub fn resolve_now(explicit: Option<&str>) -> anyhow::Result<NaiveDateTime> {
    match explicit {
        Some(s) => parse_now(s).with_context(|| format!("invalid --now value '{s}'")),
        None => Ok(Local::now().naive_local()),
    }
}

fn parse_now(s: &str) -> anyhow::Result<NaiveDateTime> {
    FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s.trim(), f).ok())
        .ok_or_else(|| anyhow::anyhow!("expected YYYY-MM-DDTHH:MM[:SS]"))
}

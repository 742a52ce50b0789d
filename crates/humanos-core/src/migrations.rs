//! Decoding of every status document shape that has ever been persisted.
//!
//! Three layouts exist in stored data:
//!
//! 1. `{ "<routineId>": "completed" }`
//! 2. `{ "<routineId>": { "status": "completed", "lastUpdated": "..." } }`
//! 3. `{ "<date>": { "<routineId>": { "status": ..., "lastUpdated": ... } } }`
//!
//! plus an inverted variant of 3 keyed `routineId -> date`. All of them are
//! normalized into a [`StatusBook`] here so nothing else branches on shape.

use crate::error::Result;
use crate::status::{StatusBook, StatusRecord};
use crate::types::{parse_date, RoutineStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Bare(RoutineStatus),
    Record(RawRecord),
    Nested(BTreeMap<String, RawEntry>),
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    status: RoutineStatus,
    #[serde(rename = "lastUpdated", default)]
    last_updated: Option<String>,
}

/// Result of decoding a persisted status document.
#[derive(Debug)]
pub struct Migration {
    pub book: StatusBook,
    /// True when anything was rewritten or dropped, i.e. the stored document
    /// differs from the canonical serialization of `book`.
    pub changed: bool,
}

/// Normalize a raw status document.
///
/// `today` is the real current day and receives entries that carry no date; `now` stamps records that
/// carry no (or an unreadable) `lastUpdated`. Only a document that is not a
/// JSON object at all is an error; individual bad entries are dropped.
pub fn migrate_status_document(raw: &str, today: NaiveDate, now: DateTime<Utc>) -> Result<Migration> {
    let top: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)?;

    let mut book = StatusBook::default();
    let mut legacy: Vec<(NaiveDate, String, StatusRecord)> = Vec::new();
    let mut changed = false;

    for (key, value) in top {
        // A date bucket is always a routine map, even when a routine id
        // happens to read like a record field (`status`).
        if let Ok(date) = parse_date(&key) {
            match value {
                serde_json::Value::Object(routines) => {
                    book.ensure_day(date);
                    for (routine_id, inner) in routines {
                        let decoded = serde_json::from_value::<RawEntry>(inner)
                            .ok()
                            .and_then(|entry| to_record(entry, now));
                        match decoded {
                            Some((record, normalized)) => {
                                changed |= normalized;
                                book.insert(date, &routine_id, record);
                            }
                            None => {
                                tracing::warn!(date = %key, routine = %routine_id, "dropping malformed status record");
                                changed = true;
                            }
                        }
                    }
                }
                _ => {
                    tracing::warn!(key = %key, "dropping status entry keyed by a date but holding no routines");
                    changed = true;
                }
            }
            continue;
        }

        let entry = match serde_json::from_value::<RawEntry>(value) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "dropping undecodable status entry");
                changed = true;
                continue;
            }
        };

        match entry {
            // Revision 1 and 2: routineId -> status, no date.
            entry @ (RawEntry::Bare(_) | RawEntry::Record(_)) => {
                if let Some((record, _)) = to_record(entry, now) {
                    legacy.push((today, key, record));
                }
                changed = true;
            }
            // Inverted nesting: routineId -> date -> record.
            RawEntry::Nested(dates) => {
                for (date_key, inner) in dates {
                    match (parse_date(&date_key), to_record(inner, now)) {
                        (Ok(date), Some((record, _))) => legacy.push((date, key.clone(), record)),
                        _ => {
                            tracing::warn!(routine = %key, date = %date_key, "dropping malformed status record");
                        }
                    }
                }
                changed = true;
            }
        }
    }

    for (date, routine_id, record) in legacy {
        book.insert_if_absent(date, &routine_id, record);
    }

    Ok(Migration { book, changed })
}

/// Returns the record and whether it had to be normalized to get there.
fn to_record(entry: RawEntry, now: DateTime<Utc>) -> Option<(StatusRecord, bool)> {
    match entry {
        RawEntry::Bare(status) => Some((
            StatusRecord {
                status,
                last_updated: now,
            },
            true,
        )),
        RawEntry::Record(raw) => {
            let parsed = raw
                .last_updated
                .as_deref()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc));
            Some((
                StatusRecord {
                    status: raw.status,
                    last_updated: parsed.unwrap_or(now),
                },
                parsed.is_none(),
            ))
        }
        RawEntry::Nested(_) => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use crate::error::Result;
use crate::migrations::migrate_status_document;
use crate::paths::{LAST_RESET_DATE_KEY, ROUTINE_STATUS_KEY};
use crate::store::{self, KvStore};
use crate::types::{date_key, RoutineStatus};
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Days of status history kept when a new day starts.
pub const STATUS_HISTORY_DAYS: u64 = 90;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: RoutineStatus,
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
}

/// Routine id -> record for one calendar day.
pub type DayStatuses = BTreeMap<String, StatusRecord>;

/// The canonical status document: one bucket per calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusBook {
    days: BTreeMap<NaiveDate, DayStatuses>,
}

impl StatusBook {
    pub fn get(&self, routine_id: &str, date: NaiveDate) -> Option<&StatusRecord> {
        self.days.get(&date).and_then(|d| d.get(routine_id))
    }

    /// Status on `date`; routines without a record have not been started.
    pub fn status(&self, routine_id: &str, date: NaiveDate) -> RoutineStatus {
        self.get(routine_id, date)
            .map(|r| r.status)
            .unwrap_or_default()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayStatuses> {
        self.days.get(&date)
    }

    pub fn has_day(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn insert(&mut self, date: NaiveDate, routine_id: &str, record: StatusRecord) {
        self.days
            .entry(date)
            .or_default()
            .insert(routine_id.to_string(), record);
    }

    pub fn insert_if_absent(&mut self, date: NaiveDate, routine_id: &str, record: StatusRecord) {
        self.days
            .entry(date)
            .or_default()
            .entry(routine_id.to_string())
            .or_insert(record);
    }

    pub fn set(
        &mut self,
        routine_id: &str,
        status: RoutineStatus,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) {
        self.insert(
            date,
            routine_id,
            StatusRecord {
                status,
                last_updated: now,
            },
        );
    }

    /// Make sure `date` has a bucket. Returns true if one was created.
    pub fn ensure_day(&mut self, date: NaiveDate) -> bool {
        if self.days.contains_key(&date) {
            return false;
        }
        self.days.insert(date, DayStatuses::new());
        true
    }

    pub fn clear_day(&mut self, date: NaiveDate) -> bool {
        self.days.remove(&date).is_some()
    }

    /// Drop every bucket strictly before `cutoff`. Returns how many went.
    pub fn prune_before(&mut self, cutoff: NaiveDate) -> usize {
        let before = self.days.len();
        self.days.retain(|date, _| *date >= cutoff);
        before - self.days.len()
    }
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Load the status document, migrating legacy shapes on the way in.
///
/// `today` is the real current day, where undated legacy entries land. It is
/// never the day being queried. When migration rewrote
/// anything the canonical form is persisted before returning.
pub fn load_book(store: &dyn KvStore, today: NaiveDate) -> Result<StatusBook> {
    let Some(raw) = store.get(ROUTINE_STATUS_KEY)? else {
        return Ok(StatusBook::default());
    };
    if raw.trim().is_empty() {
        return Ok(StatusBook::default());
    }
    let migration = migrate_status_document(&raw, today, Utc::now())?;
    if migration.changed {
        tracing::info!("migrated stored routine statuses to the per-day layout");
        save_book(store, &migration.book)?;
    }
    Ok(migration.book)
}

pub fn save_book(store: &dyn KvStore, book: &StatusBook) -> Result<()> {
    store::set_json(store, ROUTINE_STATUS_KEY, book)
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Status of `routine_id` on `date`. `today` is the real current day, where
/// undated legacy entries are filed if the stored document still has any.
pub fn get_status(
    store: &dyn KvStore,
    routine_id: &str,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<RoutineStatus> {
    Ok(load_book(store, today)?.status(routine_id, date))
}

pub fn set_status(
    store: &dyn KvStore,
    routine_id: &str,
    status: RoutineStatus,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<()> {
    let mut book = load_book(store, today)?;
    book.set(routine_id, status, date, Utc::now());
    save_book(store, &book)?;
    tracing::debug!(routine = routine_id, %status, date = %date, "status updated");
    Ok(())
}

pub fn status_for_day(store: &dyn KvStore, date: NaiveDate, today: NaiveDate) -> Result<DayStatuses> {
    Ok(load_book(store, today)?
        .day(date)
        .cloned()
        .unwrap_or_default())
}

/// Start a new day if `date` has not been reset yet.
///
/// Creates an empty bucket for `date` so every routine reads `not_started`,
/// prunes history older than [`STATUS_HISTORY_DAYS`], and records `date` as
/// the last reset. Earlier days stay queryable. Returns true if a reset ran.
pub fn reset_if_new_day(store: &dyn KvStore, date: NaiveDate) -> Result<bool> {
    let today = date_key(date);
    if store.get(LAST_RESET_DATE_KEY)?.as_deref() == Some(today.as_str()) {
        return Ok(false);
    }

    let mut book = load_book(store, date)?;
    book.ensure_day(date);
    if let Some(cutoff) = date.checked_sub_days(Days::new(STATUS_HISTORY_DAYS)) {
        let pruned = book.prune_before(cutoff);
        if pruned > 0 {
            tracing::debug!(pruned, "pruned old status days");
        }
    }
    save_book(store, &book)?;
    store.set(LAST_RESET_DATE_KEY, &today)?;
    tracing::info!(date = %today, "started a new status day");
    Ok(true)
}

/// Forget every status recorded on `date`.
pub fn clear_day(store: &dyn KvStore, date: NaiveDate, today: NaiveDate) -> Result<()> {
    let mut book = load_book(store, today)?;
    if book.clear_day(date) {
        book.ensure_day(date);
        save_book(store, &book)?;
    }
    Ok(())
}

/// Forget all status history.
pub fn clear_all(store: &dyn KvStore) -> Result<()> {
    store.remove(ROUTINE_STATUS_KEY)?;
    store.remove(LAST_RESET_DATE_KEY)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Fixtures shared by the unit tests.

use crate::catalog::CatalogSource;
use crate::error::{HumanosError, Result};
use crate::routine::{Routine, RoutinesData, Step, Trigger};
use crate::store::{KvStore, MemoryStore};
use crate::types::TriggerType;
use chrono::{NaiveDate, NaiveDateTime};
use std::cell::{Cell, RefCell};

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    date.and_hms_opt(h, m, 0).unwrap()
}

pub fn routine(id: &str, days: &[&str]) -> Routine {
    windowed(id, "05:30", "06:30", "08:30", days)
}

pub fn windowed(id: &str, start: &str, preferred: &str, end: &str, days: &[&str]) -> Routine {
    Routine {
        id: id.to_string(),
        name: format!("Routine {id}"),
        tags: vec!["test".to_string()],
        emoji: None,
        time_of_day: None,
        trigger: Trigger {
            trigger_type: TriggerType::TimeWindow,
            start: start.to_string(),
            end: end.to_string(),
            preferred: preferred.to_string(),
            days: days.iter().map(|d| d.to_string()).collect(),
        },
        steps: vec![
            Step {
                text: "first".to_string(),
                intention: None,
                duration: Some(1),
            },
            Step {
                text: "second".to_string(),
                intention: Some("focus".to_string()),
                duration: None,
            },
            Step {
                text: "third".to_string(),
                intention: None,
                duration: Some(5),
            },
        ],
    }
}

/// A catalog source that counts calls and returns a canned response.
pub struct FakeSource {
    response: Option<RoutinesData>,
    calls: Cell<usize>,
    last_url: RefCell<Option<String>>,
}

impl FakeSource {
    pub fn ok(routines: Vec<Routine>) -> Self {
        Self::returning(RoutinesData {
            routines: Some(routines),
        })
    }

    pub fn returning(data: RoutinesData) -> Self {
        Self {
            response: Some(data),
            calls: Cell::new(0),
            last_url: RefCell::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            calls: Cell::new(0),
            last_url: RefCell::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn last_url(&self) -> Option<String> {
        self.last_url.borrow().clone()
    }
}

impl CatalogSource for FakeSource {
    fn fetch(&self, url: &str) -> Result<RoutinesData> {
        self.calls.set(self.calls.get() + 1);
        *self.last_url.borrow_mut() = Some(url.to_string());
        self.response.clone().ok_or_else(|| {
            HumanosError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "network unreachable",
            ))
        })
    }
}

/// A store whose every operation fails.
pub struct FailingStore;

fn storage_error() -> HumanosError {
    HumanosError::Io(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "storage unavailable",
    ))
}

impl KvStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(storage_error())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(storage_error())
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(storage_error())
    }
}

/// A store that can be read but refuses every write.
#[derive(Default)]
pub struct ReadOnlyStore {
    inner: MemoryStore,
}

impl ReadOnlyStore {
    pub fn seeded(entries: &[(&str, &str)]) -> Self {
        let inner = MemoryStore::new();
        for (key, value) in entries {
            inner.set(key, value).unwrap();
        }
        Self { inner }
    }
}

impl KvStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(storage_error())
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(storage_error())
    }
}

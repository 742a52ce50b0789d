use crate::error::HumanosError;
use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// RoutineStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl RoutineStatus {
    pub fn all() -> &'static [RoutineStatus] {
        &[
            RoutineStatus::NotStarted,
            RoutineStatus::InProgress,
            RoutineStatus::Completed,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoutineStatus::NotStarted => "not_started",
            RoutineStatus::InProgress => "in_progress",
            RoutineStatus::Completed => "completed",
        }
    }

    /// Dashboard ordering: unfinished work first, finished work last.
    pub fn dashboard_rank(self) -> u8 {
        match self {
            RoutineStatus::InProgress => 0,
            RoutineStatus::NotStarted => 1,
            RoutineStatus::Completed => 2,
        }
    }
}

impl fmt::Display for RoutineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoutineStatus {
    type Err = HumanosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" | "not-started" => Ok(RoutineStatus::NotStarted),
            "in_progress" | "in-progress" => Ok(RoutineStatus::InProgress),
            "completed" => Ok(RoutineStatus::Completed),
            _ => Err(HumanosError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// TriggerType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    #[default]
    TimeWindow,
    Manual,
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TriggerType::TimeWindow => "time_window",
            TriggerType::Manual => "manual",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// TimeOfDay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Weekdays
// ---------------------------------------------------------------------------

/// Monday-first, matching the weekly view.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// English full name as used in `trigger.days`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn weekday_short(day: Weekday) -> &'static str {
    &weekday_name(day)[..3]
}

pub fn parse_weekday_name(name: &str) -> Option<Weekday> {
    WEEK.iter().copied().find(|d| weekday_name(*d) == name)
}

// ---------------------------------------------------------------------------
// Time and date parsing
// ---------------------------------------------------------------------------

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a trigger time of day (`HH:MM`).
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, HumanosError> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| HumanosError::InvalidTime(s.to_string()))
}

/// Parse a calendar date key (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate, HumanosError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| HumanosError::InvalidDate(s.to_string()))
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use crate::paths;
use crate::types::{parse_hhmm, parse_weekday_name, RoutineStatus, TimeOfDay, TriggerType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Routine definitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intention: Option<String>,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(rename = "type", default)]
    pub trigger_type: TriggerType,
    pub start: String,
    pub end: String,
    pub preferred: String,
    #[serde(default)]
    pub days: Vec<String>,
}

impl Trigger {
    pub fn runs_on(&self, weekday_name: &str) -> bool {
        self.days.iter().any(|d| d == weekday_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,
    pub trigger: Trigger,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Routine {
    pub fn label(&self) -> String {
        match &self.emoji {
            Some(emoji) => format!("{emoji} {}", self.name),
            None => self.name.clone(),
        }
    }

    /// Sum of step durations in minutes; steps without a duration count as zero.
    pub fn total_minutes(&self) -> u32 {
        self.steps.iter().filter_map(|s| s.duration).sum()
    }
}

/// The `{routines: [...]}` envelope served remotely and bundled with the app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutinesData {
    #[serde(default)]
    pub routines: Option<Vec<Routine>>,
}

/// A routine together with its status for the selected day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineWithStatus {
    #[serde(flatten)]
    pub routine: Routine,
    pub status: RoutineStatus,
}

pub fn find<'a>(routines: &'a [Routine], id: &str) -> Option<&'a Routine> {
    routines.iter().find(|r| r.id == id)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogWarning {
    pub level: WarnLevel,
    pub routine: String,
    pub message: String,
}

impl CatalogWarning {
    fn warning(routine: &str, message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Warning,
            routine: routine.to_string(),
            message: message.into(),
        }
    }

    fn error(routine: &str, message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Error,
            routine: routine.to_string(),
            message: message.into(),
        }
    }
}

/// Check a catalog for mistakes that would make it misbehave at runtime.
///
/// Nothing here rejects a fetched catalog; callers decide what to do with
/// `Error`-level findings (importing raw JSON refuses them).
pub fn validate_routines(routines: &[Routine]) -> Vec<CatalogWarning> {
    let mut warnings = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for routine in routines {
        let id = routine.id.as_str();

        if !seen.insert(id) {
            warnings.push(CatalogWarning::error(id, format!("duplicate routine id '{id}'")));
        }
        if !paths::is_valid_routine_id(id) {
            warnings.push(CatalogWarning::warning(
                id,
                format!("routine id '{id}' should be lowercase alphanumeric with '_' or '-'"),
            ));
        }

        let t = &routine.trigger;
        let start = parse_hhmm(&t.start);
        let preferred = parse_hhmm(&t.preferred);
        let end = parse_hhmm(&t.end);
        for (field, value, parsed) in [
            ("start", &t.start, &start),
            ("preferred", &t.preferred, &preferred),
            ("end", &t.end, &end),
        ] {
            if parsed.is_err() {
                warnings.push(CatalogWarning::error(
                    id,
                    format!("trigger.{field} '{value}' is not a valid HH:MM time"),
                ));
            }
        }
        if let (Ok(start), Ok(preferred), Ok(end)) = (start, preferred, end) {
            if !(start <= preferred && preferred <= end) {
                warnings.push(CatalogWarning::warning(
                    id,
                    format!(
                        "trigger times should satisfy start <= preferred <= end \
                         (got {} / {} / {})",
                        t.start, t.preferred, t.end
                    ),
                ));
            }
        }

        if t.days.is_empty() {
            warnings.push(CatalogWarning::warning(id, "trigger.days is empty; routine never runs"));
        }
        for day in &t.days {
            if parse_weekday_name(day).is_none() {
                warnings.push(CatalogWarning::warning(
                    id,
                    format!("unknown weekday '{day}' in trigger.days (expected e.g. 'Monday')"),
                ));
            }
        }

        if routine.steps.is_empty() {
            warnings.push(CatalogWarning::warning(id, "routine has no steps"));
        }
    }

    warnings
}

pub fn has_errors(warnings: &[CatalogWarning]) -> bool {
    warnings.iter().any(|w| w.level == WarnLevel::Error)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use crate::catalog::{self, CatalogSource};
use crate::routine::{Routine, RoutineWithStatus};
use crate::status::{self, DayStatuses};
use crate::store::KvStore;
use crate::types::{parse_hhmm, weekday_name, WEEK};
use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike, Weekday};

// ---------------------------------------------------------------------------
// Time-of-day predicates
// ---------------------------------------------------------------------------

fn minute_of(now: NaiveDateTime) -> NaiveTime {
    NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(NaiveTime::MIN)
}

/// True while `now` is inside the trigger window, bounds included.
///
/// Only hour and minute are compared. A window whose start is after its end,
/// or with an unreadable bound, is never active.
pub fn is_active(routine: &Routine, now: NaiveDateTime) -> bool {
    let (start, end) = match (parse_hhmm(&routine.trigger.start), parse_hhmm(&routine.trigger.end)) {
        (Ok(start), Ok(end)) => (start, end),
        (Err(e), _) | (_, Err(e)) => {
            tracing::debug!(routine = %routine.id, error = %e, "cannot evaluate trigger window");
            return false;
        }
    };
    if start > end {
        tracing::debug!(routine = %routine.id, "trigger window ends before it starts");
        return false;
    }
    let t = minute_of(now);
    start <= t && t <= end
}

/// True when the routine runs on `now`'s weekday and its preferred time is
/// still ahead.
///
/// This is a per-routine check: several of today's routines can be "next up"
/// at once.
pub fn is_next_up(routine: &Routine, now: NaiveDateTime) -> bool {
    let preferred = match parse_hhmm(&routine.trigger.preferred) {
        Ok(t) => t,
        Err(e) => {
            tracing::debug!(routine = %routine.id, error = %e, "cannot evaluate preferred time");
            return false;
        }
    };
    if minute_of(now) >= preferred {
        return false;
    }
    routine.trigger.runs_on(weekday_name(now.weekday()))
}

// ---------------------------------------------------------------------------
// Day selection
// ---------------------------------------------------------------------------

pub fn routines_for_day(routines: &[Routine], day: Weekday) -> Vec<&Routine> {
    let name = weekday_name(day);
    routines.iter().filter(|r| r.trigger.runs_on(name)).collect()
}

/// Monday-first columns of the weekly view.
pub fn week_view(routines: &[Routine]) -> Vec<(Weekday, Vec<&Routine>)> {
    WEEK.iter()
        .map(|day| (*day, routines_for_day(routines, *day)))
        .collect()
}

/// Routines scheduled on `day` with their status from `statuses`.
pub fn with_statuses(
    routines: &[Routine],
    day: Weekday,
    statuses: &DayStatuses,
) -> Vec<RoutineWithStatus> {
    routines_for_day(routines, day)
        .into_iter()
        .map(|routine| RoutineWithStatus {
            status: statuses
                .get(&routine.id)
                .map(|r| r.status)
                .unwrap_or_default(),
            routine: routine.clone(),
        })
        .collect()
}

/// Today's routines with today's status attached.
///
/// Starts a new status day first if needed, then loads the (cached) catalog.
/// Never fails: status problems are logged and read as `not_started`.
pub fn today_routines(
    store: &dyn KvStore,
    source: &dyn CatalogSource,
    now: NaiveDateTime,
) -> Vec<RoutineWithStatus> {
    let today = now.date();

    if let Err(e) = status::reset_if_new_day(store, today) {
        tracing::warn!(error = %e, "failed to start a new status day");
    }

    let routines = catalog::fetch_routines(store, source, today, false);
    let statuses = match status::status_for_day(store, today, today) {
        Ok(statuses) => statuses,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read routine statuses");
            DayStatuses::new()
        }
    };

    let selected = with_statuses(&routines, now.weekday(), &statuses);
    tracing::debug!(
        day = weekday_name(now.weekday()),
        total = routines.len(),
        selected = selected.len(),
        "selected today's routines"
    );
    selected
}

/// Dashboard order: in progress, then not started, then completed. Stable.
pub fn sort_for_dashboard(routines: &mut [RoutineWithStatus]) {
    routines.sort_by_key(|r| r.status.dashboard_rank());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

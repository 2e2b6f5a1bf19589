//! Shift resolver - Determines the expected shift for an employee on a date.
//!
//! Precedence: explicit per-day override, then the latest applicable pattern
//! assignment, then no schedule. For an assignment, the snapshot-vs-live
//! decision is evaluated once per assignment, not per weekday: a snapshot
//! with any pinned weekday wins everywhere, a manual-override marker pins an
//! intentional all-rest snapshot, and an all-rest live pattern falls back to
//! the snapshot. Otherwise the pattern's live values apply, so a fresh
//! assignment tracks later pattern edits by default while pinned history
//! stays put.

use crate::{
    core::{
        calendar::OrgCalendar,
        pattern::{assignment_effective_on, override_for_day},
        shift::require_shift,
    },
    entities::shift,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};

/// Where the resolved schedule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleSource {
    /// A single-day override supplied the schedule (or forced a rest day)
    Override,
    /// A weekly pattern assignment supplied the schedule
    Pattern,
    /// No override, no applicable assignment, or a pattern rest day
    None,
}

/// The expected shift for one employee-day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedShift {
    /// The shift definition, absent on rest days and unscheduled days
    pub shift: Option<shift::Model>,
    /// Scheduled start in minutes from day start
    pub scheduled_start_minutes: Option<i32>,
    /// Scheduled end in minutes from day start (midnight-adjusted)
    pub scheduled_end_minutes: Option<i32>,
    /// Where the schedule came from
    pub source: ScheduleSource,
}

impl ResolvedShift {
    fn none() -> Self {
        Self {
            shift: None,
            scheduled_start_minutes: None,
            scheduled_end_minutes: None,
            source: ScheduleSource::None,
        }
    }

    fn rest(source: ScheduleSource) -> Self {
        Self {
            shift: None,
            scheduled_start_minutes: None,
            scheduled_end_minutes: None,
            source,
        }
    }

    fn scheduled(shift: shift::Model, source: ScheduleSource) -> Self {
        let scheduled_start_minutes = Some(shift.start_minutes);
        let scheduled_end_minutes = Some(shift.effective_end_minutes());
        Self {
            shift: Some(shift),
            scheduled_start_minutes,
            scheduled_end_minutes,
            source,
        }
    }

    /// True when a concrete shift schedule was resolved.
    #[must_use]
    pub const fn has_schedule(&self) -> bool {
        self.shift.is_some()
    }
}

/// Resolves the expected shift for `employee_id` on `date`.
pub async fn resolve_expected_shift<C: ConnectionTrait>(
    db: &C,
    calendar: &OrgCalendar,
    employee_id: i64,
    date: NaiveDate,
) -> Result<ResolvedShift> {
    let bounds = calendar.day_bounds_for_date(date);

    if let Some(day_override) = override_for_day(db, employee_id, bounds.work_date).await? {
        return Ok(match day_override.shift_id {
            // Explicit forced rest day
            None => ResolvedShift::rest(ScheduleSource::Override),
            Some(shift_id) => {
                ResolvedShift::scheduled(require_shift(db, shift_id).await?, ScheduleSource::Override)
            }
        });
    }

    let Some(assignment) = assignment_effective_on(db, employee_id, bounds.work_date).await? else {
        return Ok(ResolvedShift::none());
    };

    let pattern = crate::core::pattern::get_pattern_by_id(db, assignment.pattern_id).await?;
    let prefer_snapshot = assignment.has_pinned_snapshot()
        || assignment.is_manual_override()
        || pattern.as_ref().is_none_or(|p| p.is_all_rest());

    let weekday = calendar.weekday(bounds.work_date);
    let resolved_id = if prefer_snapshot {
        assignment.snapshot_for(weekday)
    } else {
        pattern.as_ref().and_then(|p| p.shift_id_for(weekday))
    };

    match resolved_id {
        None => Ok(ResolvedShift::none()),
        Some(shift_id) => Ok(ResolvedShift::scheduled(
            require_shift(db, shift_id).await?,
            ScheduleSource::Pattern,
        )),
    }
}

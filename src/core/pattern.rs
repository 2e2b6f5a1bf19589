//! Weekly pattern, pattern assignment and shift override business logic.
//!
//! Assignments snapshot the pattern's day-to-shift mapping at assignment
//! time; the resolver decides per assignment whether the snapshot or the
//! pattern's live values win.

use crate::{
    core::shift::require_shift,
    entities::{
        PatternAssignment, ShiftOverride, WeeklyPattern, pattern_assignment, shift_override,
        weekly_pattern,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Weekday};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Creates a weekly pattern. `days` holds one optional shift per weekday,
/// Sunday first; every referenced shift must exist.
pub async fn create_pattern(
    db: &DatabaseConnection,
    code: String,
    name: String,
    days: [Option<i64>; 7],
) -> Result<weekly_pattern::Model> {
    if code.trim().is_empty() {
        return Err(Error::Config {
            message: "Pattern code cannot be empty".to_string(),
        });
    }
    for shift_id in days.iter().flatten() {
        require_shift(db, *shift_id).await?;
    }

    let model = weekly_pattern::ActiveModel {
        code: Set(code.trim().to_string()),
        name: Set(name),
        sunday_shift_id: Set(days[0]),
        monday_shift_id: Set(days[1]),
        tuesday_shift_id: Set(days[2]),
        wednesday_shift_id: Set(days[3]),
        thursday_shift_id: Set(days[4]),
        friday_shift_id: Set(days[5]),
        saturday_shift_id: Set(days[6]),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

/// Finds a pattern by id.
pub async fn get_pattern_by_id<C: ConnectionTrait>(
    db: &C,
    pattern_id: i64,
) -> Result<Option<weekly_pattern::Model>> {
    WeeklyPattern::find_by_id(pattern_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a pattern by code.
pub async fn get_pattern_by_code(
    db: &DatabaseConnection,
    code: &str,
) -> Result<Option<weekly_pattern::Model>> {
    WeeklyPattern::find()
        .filter(weekly_pattern::Column::Code.eq(code))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Edits one weekday of a pattern's live mapping. Takes effect for every
/// assignment still tracking the live pattern; pinned snapshots are
/// unaffected.
pub async fn set_pattern_day(
    db: &DatabaseConnection,
    pattern_id: i64,
    weekday: Weekday,
    shift_id: Option<i64>,
) -> Result<weekly_pattern::Model> {
    if let Some(id) = shift_id {
        require_shift(db, id).await?;
    }
    let pattern = get_pattern_by_id(db, pattern_id)
        .await?
        .ok_or(Error::PatternNotFound { pattern_id })?;

    let mut active: weekly_pattern::ActiveModel = pattern.into();
    match weekday {
        Weekday::Sun => active.sunday_shift_id = Set(shift_id),
        Weekday::Mon => active.monday_shift_id = Set(shift_id),
        Weekday::Tue => active.tuesday_shift_id = Set(shift_id),
        Weekday::Wed => active.wednesday_shift_id = Set(shift_id),
        Weekday::Thu => active.thursday_shift_id = Set(shift_id),
        Weekday::Fri => active.friday_shift_id = Set(shift_id),
        Weekday::Sat => active.saturday_shift_id = Set(shift_id),
    }

    Ok(active.update(db).await?)
}

/// Assigns a pattern to an employee from `effective_date` (inclusive),
/// snapshotting the pattern's current day-to-shift mapping into the
/// assignment row.
pub async fn assign_pattern(
    db: &DatabaseConnection,
    employee_id: i64,
    pattern_id: i64,
    effective_date: NaiveDate,
    reason: Option<String>,
) -> Result<pattern_assignment::Model> {
    crate::core::employee::ensure_employee(db, employee_id).await?;
    let pattern = get_pattern_by_id(db, pattern_id)
        .await?
        .ok_or(Error::PatternNotFound { pattern_id })?;

    let snapshot = pattern.day_shift_ids();
    let model = pattern_assignment::ActiveModel {
        employee_id: Set(employee_id),
        pattern_id: Set(pattern_id),
        effective_date: Set(effective_date),
        snapshot_sunday_shift_id: Set(snapshot[0]),
        snapshot_monday_shift_id: Set(snapshot[1]),
        snapshot_tuesday_shift_id: Set(snapshot[2]),
        snapshot_wednesday_shift_id: Set(snapshot[3]),
        snapshot_thursday_shift_id: Set(snapshot[4]),
        snapshot_friday_shift_id: Set(snapshot[5]),
        snapshot_saturday_shift_id: Set(snapshot[6]),
        reason: Set(reason),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

/// Replaces an assignment's snapshot with the given values in place. This is
/// the correction path; `employee_id` is never touched.
pub async fn update_assignment_snapshot(
    db: &DatabaseConnection,
    assignment_id: i64,
    snapshot: [Option<i64>; 7],
    reason: Option<String>,
) -> Result<pattern_assignment::Model> {
    let assignment = PatternAssignment::find_by_id(assignment_id)
        .one(db)
        .await?
        .ok_or(Error::AssignmentNotFound { assignment_id })?;

    let mut active: pattern_assignment::ActiveModel = assignment.into();
    active.snapshot_sunday_shift_id = Set(snapshot[0]);
    active.snapshot_monday_shift_id = Set(snapshot[1]);
    active.snapshot_tuesday_shift_id = Set(snapshot[2]);
    active.snapshot_wednesday_shift_id = Set(snapshot[3]);
    active.snapshot_thursday_shift_id = Set(snapshot[4]);
    active.snapshot_friday_shift_id = Set(snapshot[5]);
    active.snapshot_saturday_shift_id = Set(snapshot[6]);
    active.reason = Set(reason);

    Ok(active.update(db).await?)
}

/// The authoritative assignment for an employee on a date: greatest
/// `effective_date` at or before the date, ties broken by highest id.
pub async fn assignment_effective_on<C: ConnectionTrait>(
    db: &C,
    employee_id: i64,
    date: NaiveDate,
) -> Result<Option<pattern_assignment::Model>> {
    PatternAssignment::find()
        .filter(pattern_assignment::Column::EmployeeId.eq(employee_id))
        .filter(pattern_assignment::Column::EffectiveDate.lte(date))
        .order_by_desc(pattern_assignment::Column::EffectiveDate)
        .order_by_desc(pattern_assignment::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Records a single-day override. `shift_id = None` forces a rest day.
pub async fn set_override(
    db: &DatabaseConnection,
    employee_id: i64,
    work_date: NaiveDate,
    shift_id: Option<i64>,
    source: String,
) -> Result<shift_override::Model> {
    crate::core::employee::ensure_employee(db, employee_id).await?;
    if let Some(id) = shift_id {
        require_shift(db, id).await?;
    }

    let model = shift_override::ActiveModel {
        employee_id: Set(employee_id),
        work_date: Set(work_date),
        shift_id: Set(shift_id),
        source: Set(source),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

/// The effective override for an employee-day. First match wins; at most one
/// is expected per day, duplicates are ignored rather than rejected.
pub async fn override_for_day<C: ConnectionTrait>(
    db: &C,
    employee_id: i64,
    work_date: NaiveDate,
) -> Result<Option<shift_override::Model>> {
    ShiftOverride::find()
        .filter(shift_override::Column::EmployeeId.eq(employee_id))
        .filter(shift_override::Column::WorkDate.eq(work_date))
        .order_by_asc(shift_override::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

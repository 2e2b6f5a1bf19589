//! Punch ledger and validation gate.
//!
//! Punch creation and the subsequent recompute form one logical operation:
//! either both commit or the punch is rolled back, so a punch can never
//! outlive its day's attendance snapshot. Self-service and kiosk punches go
//! through the validation gate first; admin entries and synthesized
//! clock-outs bypass it.

use crate::{
    core::{
        calendar::{DayBounds, OrgCalendar},
        day_lock::DayLockRegistry,
        employee::ensure_employee,
        recompute::recompute_in_txn,
        resolver::resolve_expected_shift,
    },
    entities::{
        Punch, attendance,
        punch::{self, PunchSource, PunchType},
    },
    errors::{Error, RejectionReason, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::debug;

/// The fixed punch cycle: none/`TimeOut` → `TimeIn` → `BreakIn` → `BreakOut`
/// → `TimeOut`, repeating. Drives which punch action is currently legal at
/// attended punch points.
#[must_use]
pub const fn next_expected_punch_type(last: Option<PunchType>) -> PunchType {
    match last {
        None | Some(PunchType::TimeOut) => PunchType::TimeIn,
        Some(PunchType::TimeIn) => PunchType::BreakIn,
        Some(PunchType::BreakIn) => PunchType::BreakOut,
        Some(PunchType::BreakOut) => PunchType::TimeOut,
    }
}

/// Rejects with `invalid_sequence` when the requested punch is not the next
/// one in the cycle. Violations are reported, never silently corrected.
pub fn ensure_expected_sequence(last: Option<PunchType>, requested: PunchType) -> Result<()> {
    let expected = next_expected_punch_type(last);
    if requested == expected {
        Ok(())
    } else {
        Err(Error::PunchRejected {
            reason: RejectionReason::InvalidSequence {
                expected,
                got: requested,
            },
        })
    }
}

/// Pre-write clock-in window check for attended punch points. Rules in
/// order, first failure short-circuits: a schedule must exist for today,
/// `now` must not precede the scheduled start, and must not exceed the
/// scheduled end when one is known.
pub async fn validate_clock_in<C: ConnectionTrait>(
    db: &C,
    calendar: &OrgCalendar,
    employee_id: i64,
    now: DateTime<Utc>,
) -> Result<()> {
    ensure_employee(db, employee_id).await?;
    let bounds = calendar.day_bounds(now);
    let resolved = resolve_expected_shift(db, calendar, employee_id, bounds.work_date).await?;

    let Some(start) = resolved.scheduled_start_minutes else {
        return Err(Error::PunchRejected {
            reason: RejectionReason::NoShiftToday,
        });
    };
    let now_minutes = OrgCalendar::minutes_into_day(&bounds, now);
    if now_minutes < i64::from(start) {
        return Err(Error::PunchRejected {
            reason: RejectionReason::TooEarly,
        });
    }
    if let Some(end) = resolved.scheduled_end_minutes {
        if now_minutes > i64::from(end) {
            return Err(Error::PunchRejected {
                reason: RejectionReason::TooLate,
            });
        }
    }
    Ok(())
}

/// Punches for one employee inside a day bucket, time-ordered.
pub(crate) async fn punches_in_bounds<C: ConnectionTrait>(
    db: &C,
    employee_id: i64,
    bounds: &DayBounds,
) -> Result<Vec<punch::Model>> {
    Punch::find()
        .filter(punch::Column::EmployeeId.eq(employee_id))
        .filter(punch::Column::PunchTime.gte(bounds.start))
        .filter(punch::Column::PunchTime.lt(bounds.end))
        .order_by_asc(punch::Column::PunchTime)
        .order_by_asc(punch::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Punches for one employee on an organizational calendar day.
pub async fn punches_for_day(
    db: &DatabaseConnection,
    calendar: &OrgCalendar,
    employee_id: i64,
    date: NaiveDate,
) -> Result<Vec<punch::Model>> {
    punches_in_bounds(db, employee_id, &calendar.day_bounds_for_date(date)).await
}

/// Punches for one employee inside an arbitrary `[from, to)` time window.
pub async fn punches_in_range(
    db: &DatabaseConnection,
    employee_id: i64,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<punch::Model>> {
    Punch::find()
        .filter(punch::Column::EmployeeId.eq(employee_id))
        .filter(punch::Column::PunchTime.gte(from))
        .filter(punch::Column::PunchTime.lt(to))
        .order_by_asc(punch::Column::PunchTime)
        .order_by_asc(punch::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Points every punch in the day bucket at the attendance row. Overwrite-safe
/// and idempotent; called on every recompute.
pub(crate) async fn relink_to_attendance<C: ConnectionTrait>(
    db: &C,
    employee_id: i64,
    bounds: &DayBounds,
    attendance_id: i64,
) -> Result<()> {
    Punch::update_many()
        .col_expr(punch::Column::AttendanceId, Expr::value(attendance_id))
        .filter(punch::Column::EmployeeId.eq(employee_id))
        .filter(punch::Column::PunchTime.gte(bounds.start))
        .filter(punch::Column::PunchTime.lt(bounds.end))
        .exec(db)
        .await?;
    Ok(())
}

/// Records a punch and recomputes its day in one transaction under the
/// employee-day lock. Attended sources run the validation gate first: the
/// clock-in window check for `TimeIn` and the sequence expectation for every
/// type. Returns the stored punch (with its attendance backlink) and the
/// recomputed attendance row.
#[allow(clippy::too_many_arguments)]
pub async fn record_punch(
    db: &DatabaseConnection,
    calendar: &OrgCalendar,
    locks: &DayLockRegistry,
    employee_id: i64,
    punch_type: PunchType,
    punch_time: DateTime<Utc>,
    source: PunchSource,
    now: DateTime<Utc>,
) -> Result<(punch::Model, attendance::Model)> {
    ensure_employee(db, employee_id).await?;
    let bounds = calendar.day_bounds(punch_time);

    let _guard = locks.acquire(employee_id, bounds.work_date).await;
    let txn = db.begin().await?;

    if source.is_gated() {
        if punch_type == PunchType::TimeIn {
            validate_clock_in(&txn, calendar, employee_id, now).await?;
        }
        let last = punches_in_bounds(&txn, employee_id, &bounds)
            .await?
            .last()
            .map(|p| p.punch_type);
        ensure_expected_sequence(last, punch_type)?;
    }

    let inserted = punch::ActiveModel {
        employee_id: Set(employee_id),
        punch_type: Set(punch_type),
        punch_time: Set(punch_time),
        source: Set(source),
        attendance_id: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let attendance = recompute_in_txn(&txn, calendar, employee_id, bounds.work_date, now).await?;
    txn.commit().await?;

    // The backlink was written by the bulk relink; re-read the stored punch.
    let stored = Punch::find_by_id(inserted.id)
        .one(db)
        .await?
        .ok_or(Error::PunchNotFound {
            punch_id: inserted.id,
        })?;

    debug!(
        employee_id,
        punch_type = ?stored.punch_type,
        punch_time = %stored.punch_time,
        source = ?stored.source,
        "recorded punch"
    );
    Ok((stored, attendance))
}

/// Narrow correction path: edits a punch's type and/or time, then recomputes
/// the affected day - both days when the correction moves the punch across a
/// day boundary. Locks are acquired in deterministic date order.
pub async fn correct_punch(
    db: &DatabaseConnection,
    calendar: &OrgCalendar,
    locks: &DayLockRegistry,
    punch_id: i64,
    new_type: Option<PunchType>,
    new_time: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(punch::Model, attendance::Model)> {
    let existing = Punch::find_by_id(punch_id)
        .one(db)
        .await?
        .ok_or(Error::PunchNotFound { punch_id })?;
    let employee_id = existing.employee_id;
    let old_date = calendar.day_bounds(existing.punch_time).work_date;

    let target_type = new_type.unwrap_or(existing.punch_type);
    let target_time = new_time.unwrap_or(existing.punch_time);
    let new_date = calendar.day_bounds(target_time).work_date;

    let mut dates = vec![old_date, new_date];
    dates.sort_unstable();
    dates.dedup();
    let mut guards = Vec::with_capacity(dates.len());
    for day in &dates {
        guards.push(locks.acquire(employee_id, *day).await);
    }

    let txn = db.begin().await?;
    let mut active: punch::ActiveModel = existing.into();
    active.punch_type = Set(target_type);
    active.punch_time = Set(target_time);
    let updated = active.update(&txn).await?;

    let mut corrected_day_attendance = None;
    for day in &dates {
        let attendance = recompute_in_txn(&txn, calendar, employee_id, *day, now).await?;
        if *day == new_date {
            corrected_day_attendance = Some(attendance);
        }
    }
    txn.commit().await?;

    let attendance = corrected_day_attendance.ok_or_else(|| Error::Config {
        message: "corrected day missing from recompute set".to_string(),
    })?;
    let stored = Punch::find_by_id(updated.id)
        .one(db)
        .await?
        .ok_or(Error::PunchNotFound { punch_id })?;

    debug!(
        employee_id,
        punch_id,
        punch_type = ?stored.punch_type,
        punch_time = %stored.punch_time,
        "corrected punch"
    );
    Ok((stored, attendance))
}

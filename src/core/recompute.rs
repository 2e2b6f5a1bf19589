//! Recompute engine - Derives the idempotent attendance snapshot for one
//! employee-day from its punches and the resolved expected shift.
//!
//! A recompute is safe to repeat: every derived field is a pure function of
//! the punches, the resolved schedule and the passed-in `now`, and the one
//! side effect that is not (the synthesized clock-out) is guarded by an
//! exact type+timestamp existence check inside the same critical section.
//! Callers race from several entry points, so every write path runs under
//! the per-employee-day lock and a database transaction.

use crate::{
    core::{
        attendance::{find_by_employee_day, unlocked_for_day},
        calendar::{DayBounds, OrgCalendar},
        day_lock::DayLockRegistry,
        employee::ensure_employee,
        punch::{punches_in_bounds, relink_to_attendance},
        resolver::{ResolvedShift, resolve_expected_shift},
    },
    entities::{
        Punch,
        attendance::{self, AttendanceStatus},
        punch::{self, PunchSource, PunchType},
    },
    errors::Result,
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// Minutes past the scheduled end before a missing clock-out is synthesized.
pub const AUTO_TIMEOUT_GRACE_MINUTES: i64 = 60;

/// Minutes past the scheduled end after which the day is locked.
pub const LOCK_GRACE_MINUTES: i64 = 5;

/// Recomputes the attendance snapshot for one employee-day and returns the
/// upserted row. Idempotent modulo the wall-clock-dependent auto-timeout
/// synthesis; `now` is the instant the caller considers current.
pub async fn recompute_attendance_for_day(
    db: &DatabaseConnection,
    calendar: &OrgCalendar,
    locks: &DayLockRegistry,
    employee_id: i64,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<attendance::Model> {
    ensure_employee(db, employee_id).await?;

    let _guard = locks.acquire(employee_id, date).await;
    let txn = db.begin().await?;
    let model = recompute_in_txn(&txn, calendar, employee_id, date, now).await?;
    txn.commit().await?;
    Ok(model)
}

/// The recompute body, composable into a larger transaction (punch creation
/// and recompute form one logical operation). The caller must already hold
/// the employee-day lock.
pub(crate) async fn recompute_in_txn<C: ConnectionTrait>(
    db: &C,
    calendar: &OrgCalendar,
    employee_id: i64,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<attendance::Model> {
    let bounds = calendar.day_bounds_for_date(date);
    let mut punches = punches_in_bounds(db, employee_id, &bounds).await?;
    let resolved = resolve_expected_shift(db, calendar, employee_id, date).await?;

    if synthesize_auto_timeout(db, employee_id, &bounds, &resolved, &punches, now).await? {
        punches = punches_in_bounds(db, employee_id, &bounds).await?;
    }

    let (break_minutes, break_count) = pair_breaks(&punches);

    let actual_in_at = punches
        .iter()
        .find(|p| p.punch_type == PunchType::TimeIn)
        .or_else(|| punches.first())
        .map(|p| p.punch_time);
    let actual_out_at = punches
        .iter()
        .rev()
        .find(|p| p.punch_type == PunchType::TimeOut)
        .map(|p| p.punch_time);

    let actual_in_minutes =
        actual_in_at.map(|t| OrgCalendar::minutes_into_day(&bounds, t) as i32);
    let actual_out_minutes =
        actual_out_at.map(|t| OrgCalendar::minutes_into_day(&bounds, t) as i32);

    let late_minutes = match (actual_in_minutes, resolved.scheduled_start_minutes) {
        (Some(actual), Some(scheduled)) => (actual - scheduled).max(0),
        _ => 0,
    };
    let undertime_minutes = match (actual_out_minutes, resolved.scheduled_end_minutes) {
        (Some(actual), Some(scheduled)) => (scheduled - actual).max(0),
        _ => 0,
    };
    let overtime_minutes_raw = match (actual_out_minutes, resolved.scheduled_end_minutes) {
        (Some(actual), Some(scheduled)) => (actual - scheduled).max(0),
        _ => 0,
    };
    let worked_minutes = match (actual_in_at, actual_out_at) {
        (Some(t_in), Some(t_out)) => Some((t_out - t_in).num_minutes().max(0) as i32),
        _ => None,
    };

    let cutoff_passed = resolved.scheduled_end_minutes.is_some_and(|end| {
        now >= OrgCalendar::instant_at_minutes(&bounds, i64::from(end) + LOCK_GRACE_MINUTES)
    });

    let status = if punches.is_empty() {
        if resolved.has_schedule() {
            AttendanceStatus::Absent
        } else {
            AttendanceStatus::Rest
        }
    } else if actual_out_at.is_none() && cutoff_passed {
        AttendanceStatus::Incomplete
    } else if late_minutes > 0 {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    };

    let existing = find_by_employee_day(db, employee_id, bounds.work_date).await?;
    let mut active = attendance::ActiveModel {
        employee_id: Set(employee_id),
        work_date: Set(bounds.work_date),
        expected_shift_id: Set(resolved.shift.as_ref().map(|s| s.id)),
        scheduled_start_minutes: Set(resolved.scheduled_start_minutes),
        scheduled_end_minutes: Set(resolved.scheduled_end_minutes),
        paid_hours_per_day: Set(resolved.shift.as_ref().map(|s| s.paid_hours_per_day)),
        actual_in_at: Set(actual_in_at),
        actual_out_at: Set(actual_out_at),
        worked_minutes: Set(worked_minutes),
        break_minutes: Set(break_minutes),
        break_count: Set(break_count),
        late_minutes: Set(late_minutes),
        undertime_minutes: Set(undertime_minutes),
        overtime_minutes_raw: Set(overtime_minutes_raw),
        status: Set(status),
        is_locked: Set(cutoff_passed),
        ..Default::default()
    };

    let model = match existing {
        Some(row) => {
            // Approved overtime belongs to payroll approval; carry it over.
            active.id = Set(row.id);
            active.overtime_minutes_approved = Set(row.overtime_minutes_approved);
            active.update(db).await?
        }
        None => {
            active.overtime_minutes_approved = Set(0);
            active.insert(db).await?
        }
    };

    relink_to_attendance(db, employee_id, &bounds, model.id).await?;

    debug!(
        employee_id,
        work_date = %bounds.work_date,
        status = ?model.status,
        worked_minutes = model.worked_minutes,
        is_locked = model.is_locked,
        "recomputed attendance"
    );
    Ok(model)
}

/// Inserts the synthetic clock-out when the employee is overdue: a first
/// clock-in exists, no clock-out yet, the schedule's end is known, and `now`
/// is at or past end + grace. The punch is stamped exactly at the scheduled
/// end so repeated recomputes can recognize it. Returns true when a punch
/// was inserted.
async fn synthesize_auto_timeout<C: ConnectionTrait>(
    db: &C,
    employee_id: i64,
    bounds: &DayBounds,
    resolved: &ResolvedShift,
    punches: &[punch::Model],
    now: DateTime<Utc>,
) -> Result<bool> {
    let Some(scheduled_end) = resolved.scheduled_end_minutes else {
        return Ok(false);
    };
    let has_time_in = punches.iter().any(|p| p.punch_type == PunchType::TimeIn);
    let has_time_out = punches.iter().any(|p| p.punch_type == PunchType::TimeOut);
    if !has_time_in || has_time_out {
        return Ok(false);
    }

    let deadline = OrgCalendar::instant_at_minutes(
        bounds,
        i64::from(scheduled_end) + AUTO_TIMEOUT_GRACE_MINUTES,
    );
    if now < deadline {
        return Ok(false);
    }

    let stamp = OrgCalendar::instant_at_minutes(bounds, i64::from(scheduled_end));

    // Idempotency guard: a concurrent caller may have synthesized the punch
    // already; re-check inside the same critical section and transaction.
    let already_exists = Punch::find()
        .filter(punch::Column::EmployeeId.eq(employee_id))
        .filter(punch::Column::PunchType.eq(PunchType::TimeOut))
        .filter(punch::Column::PunchTime.eq(stamp))
        .one(db)
        .await?
        .is_some();
    if already_exists {
        return Ok(false);
    }

    punch::ActiveModel {
        employee_id: Set(employee_id),
        punch_type: Set(PunchType::TimeOut),
        punch_time: Set(stamp),
        source: Set(PunchSource::AutoTimeout),
        attendance_id: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(employee_id, stamp = %stamp, "synthesized overdue clock-out");
    Ok(true)
}

/// Pairs break punches into intervals in time order. `BreakIn` and
/// `BreakOut` are treated interchangeably as delimiters: the first break
/// punch opens an interval, the next one closes it regardless of its
/// declared type. Tolerates operator mis-tagging while keeping the total
/// sane.
fn pair_breaks(punches: &[punch::Model]) -> (i32, i32) {
    let mut break_minutes = 0i32;
    let mut break_count = 0i32;
    let mut open_at: Option<DateTime<Utc>> = None;

    for p in punches {
        if !matches!(p.punch_type, PunchType::BreakIn | PunchType::BreakOut) {
            continue;
        }
        match open_at.take() {
            None => open_at = Some(p.punch_time),
            Some(opened) => {
                break_minutes += (p.punch_time - opened).num_minutes().max(0) as i32;
                break_count += 1;
            }
        }
    }

    (break_minutes, break_count)
}

/// End-of-day sweep: locks every still-unlocked attendance row for the date.
/// Rows with a clock-in but no clock-out become `Incomplete`; everything
/// else keeps its computed status. Returns the number of rows locked.
pub async fn lock_day(
    db: &DatabaseConnection,
    calendar: &OrgCalendar,
    locks: &DayLockRegistry,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<u64> {
    let bounds = calendar.day_bounds_for_date(date);
    let candidates = unlocked_for_day(db, bounds.work_date).await?;

    let mut locked = 0u64;
    for candidate in candidates {
        let _guard = locks.acquire(candidate.employee_id, bounds.work_date).await;
        let txn = db.begin().await?;

        // Re-read under the lock; a racing recompute may have advanced the row.
        let Some(row) = attendance::Entity::find_by_id(candidate.id).one(&txn).await? else {
            continue;
        };
        if row.is_locked {
            continue;
        }

        let open_without_clock_out = row.actual_in_at.is_some() && row.actual_out_at.is_none();
        let mut active: attendance::ActiveModel = row.into();
        if open_without_clock_out {
            active.status = Set(AttendanceStatus::Incomplete);
        }
        active.is_locked = Set(true);
        active.update(&txn).await?;
        txn.commit().await?;
        locked += 1;
    }

    info!(work_date = %bounds.work_date, locked, at = %now, "end-of-day lock sweep");
    Ok(locked)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::pattern::{assign_pattern, set_override};
    use crate::core::punch::punches_for_day;
    use crate::test_utils::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_rest_day_with_no_punches_and_no_schedule() -> Result<()> {
        let (db, employee, _shift) = setup_with_employee_and_shift().await?;
        let (cal, locks) = engine_parts();
        let day = date(2024, 3, 11);

        let att =
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, at(&cal, day, 1200))
                .await?;

        assert_eq!(att.status, AttendanceStatus::Rest);
        assert_eq!(att.break_minutes, 0);
        assert_eq!(att.late_minutes, 0);
        assert_eq!(att.worked_minutes, None);
        // No schedule means no cutoff, so the row is never auto-locked
        assert!(!att.is_locked);

        Ok(())
    }

    #[tokio::test]
    async fn test_scheduled_day_with_no_punches_is_absent() -> Result<()> {
        let (db, employee, shift) = setup_with_employee_and_shift().await?;
        let (cal, locks) = engine_parts();
        let day = date(2024, 3, 11);
        schedule_override(&db, employee.id, day, shift.id).await?;

        // Before the cutoff the day is open
        let att =
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, at(&cal, day, 600))
                .await?;
        assert_eq!(att.status, AttendanceStatus::Absent);
        assert!(!att.is_locked);
        assert_eq!(att.expected_shift_id, Some(shift.id));
        assert_eq!(att.scheduled_start_minutes, Some(540));
        assert_eq!(att.scheduled_end_minutes, Some(1080));

        Ok(())
    }

    #[tokio::test]
    async fn test_on_time_day_is_present() -> Result<()> {
        let (db, employee, shift) = setup_with_employee_and_shift().await?;
        let (cal, locks) = engine_parts();
        let day = date(2024, 3, 11);
        schedule_override(&db, employee.id, day, shift.id).await?;

        insert_punch(&db, employee.id, PunchType::TimeIn, at(&cal, day, 535)).await?;
        insert_punch(&db, employee.id, PunchType::TimeOut, at(&cal, day, 1080)).await?;

        let att =
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, at(&cal, day, 1081))
                .await?;

        assert_eq!(att.status, AttendanceStatus::Present);
        assert_eq!(att.late_minutes, 0);
        assert_eq!(att.undertime_minutes, 0);
        assert_eq!(att.overtime_minutes_raw, 0);
        assert_eq!(att.worked_minutes, Some(545));

        Ok(())
    }

    #[tokio::test]
    async fn test_late_arrival() -> Result<()> {
        let (db, employee, shift) = setup_with_employee_and_shift().await?;
        let (cal, locks) = engine_parts();
        let day = date(2024, 3, 11);
        schedule_override(&db, employee.id, day, shift.id).await?;

        // Scheduled 09:00, clocked in 09:20
        insert_punch(&db, employee.id, PunchType::TimeIn, at(&cal, day, 560)).await?;
        insert_punch(&db, employee.id, PunchType::TimeOut, at(&cal, day, 1080)).await?;

        let att =
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, at(&cal, day, 1081))
                .await?;

        assert_eq!(att.late_minutes, 20);
        assert_eq!(att.status, AttendanceStatus::Late);

        Ok(())
    }

    #[tokio::test]
    async fn test_undertime_and_overtime() -> Result<()> {
        let (db, employee, shift) = setup_with_employee_and_shift().await?;
        let (cal, locks) = engine_parts();
        let day = date(2024, 3, 11);
        schedule_override(&db, employee.id, day, shift.id).await?;

        insert_punch(&db, employee.id, PunchType::TimeIn, at(&cal, day, 540)).await?;
        insert_punch(&db, employee.id, PunchType::TimeOut, at(&cal, day, 1050)).await?;

        let att =
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, at(&cal, day, 1051))
                .await?;
        assert_eq!(att.undertime_minutes, 30);
        assert_eq!(att.overtime_minutes_raw, 0);

        // Replace the early departure with a late one
        insert_punch(&db, employee.id, PunchType::TimeOut, at(&cal, day, 1125)).await?;
        let att =
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, at(&cal, day, 1126))
                .await?;
        assert_eq!(att.undertime_minutes, 0);
        assert_eq!(att.overtime_minutes_raw, 45);

        Ok(())
    }

    #[tokio::test]
    async fn test_break_pairing_well_formed() -> Result<()> {
        let (db, employee, shift) = setup_with_employee_and_shift().await?;
        let (cal, locks) = engine_parts();
        let day = date(2024, 3, 11);
        schedule_override(&db, employee.id, day, shift.id).await?;

        insert_punch(&db, employee.id, PunchType::TimeIn, at(&cal, day, 540)).await?;
        insert_punch(&db, employee.id, PunchType::BreakIn, at(&cal, day, 600)).await?;
        insert_punch(&db, employee.id, PunchType::BreakOut, at(&cal, day, 615)).await?;
        insert_punch(&db, employee.id, PunchType::BreakIn, at(&cal, day, 840)).await?;
        insert_punch(&db, employee.id, PunchType::BreakOut, at(&cal, day, 850)).await?;
        insert_punch(&db, employee.id, PunchType::TimeOut, at(&cal, day, 1080)).await?;

        let att =
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, at(&cal, day, 1081))
                .await?;
        assert_eq!(att.break_count, 2);
        assert_eq!(att.break_minutes, 25);

        Ok(())
    }

    #[tokio::test]
    async fn test_break_pairing_is_type_agnostic() -> Result<()> {
        let (db, employee, shift) = setup_with_employee_and_shift().await?;
        let (cal, locks) = engine_parts();
        let day = date(2024, 3, 11);
        schedule_override(&db, employee.id, day, shift.id).await?;

        insert_punch(&db, employee.id, PunchType::TimeIn, at(&cal, day, 540)).await?;
        // Mis-tagged: BREAK_OUT first, then BREAK_IN
        insert_punch(&db, employee.id, PunchType::BreakOut, at(&cal, day, 600)).await?;
        insert_punch(&db, employee.id, PunchType::BreakIn, at(&cal, day, 615)).await?;
        insert_punch(&db, employee.id, PunchType::TimeOut, at(&cal, day, 1080)).await?;

        let att =
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, at(&cal, day, 1081))
                .await?;
        assert_eq!(att.break_count, 1);
        assert_eq!(att.break_minutes, 15);

        Ok(())
    }

    #[tokio::test]
    async fn test_auto_timeout_synthesizes_clock_out_once() -> Result<()> {
        let (db, employee, shift) = setup_with_employee_and_shift().await?;
        let (cal, locks) = engine_parts();
        let day = date(2024, 3, 11);
        schedule_override(&db, employee.id, day, shift.id).await?;

        insert_punch(&db, employee.id, PunchType::TimeIn, at(&cal, day, 540)).await?;

        // 18:59 is still inside the grace period: nothing synthesized
        let att =
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, at(&cal, day, 1139))
                .await?;
        assert!(att.actual_out_at.is_none());

        // 19:00 is end + 60: the clock-out appears, stamped at 18:00
        let att =
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, at(&cal, day, 1140))
                .await?;
        assert_eq!(att.actual_out_at, Some(at(&cal, day, 1080)));
        assert_eq!(att.worked_minutes, Some(540));

        // Repeated recomputes never add a second synthetic punch
        for _ in 0..4 {
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, at(&cal, day, 1200))
                .await?;
        }
        let punches = punches_for_day(&db, &cal, employee.id, day).await?;
        let synthetic: Vec<_> = punches
            .iter()
            .filter(|p| p.source == PunchSource::AutoTimeout)
            .collect();
        assert_eq!(synthetic.len(), 1);
        assert_eq!(synthetic[0].punch_time, at(&cal, day, 1080));

        Ok(())
    }

    #[tokio::test]
    async fn test_auto_timeout_under_concurrent_recomputes() -> Result<()> {
        let (db, employee, shift) = setup_with_employee_and_shift().await?;
        let cal = test_calendar();
        let locks = Arc::new(DayLockRegistry::new());
        let day = date(2024, 3, 11);
        schedule_override(&db, employee.id, day, shift.id).await?;
        insert_punch(&db, employee.id, PunchType::TimeIn, at(&cal, day, 540)).await?;

        let now = at(&cal, day, 1200);
        let mut handles = Vec::new();
        for _ in 0..5 {
            let db = db.clone();
            let locks = Arc::clone(&locks);
            handles.push(tokio::spawn(async move {
                recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, now).await
            }));
        }
        for handle in handles {
            handle.await.unwrap()?;
        }

        let punches = punches_for_day(&db, &cal, employee.id, day).await?;
        assert_eq!(
            punches
                .iter()
                .filter(|p| p.source == PunchSource::AutoTimeout)
                .count(),
            1
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_incomplete_when_open_past_cutoff_without_schedule_end_reached() -> Result<()> {
        let (db, employee, shift) = setup_with_employee_and_shift().await?;
        let (cal, locks) = engine_parts();
        let day = date(2024, 3, 11);
        schedule_override(&db, employee.id, day, shift.id).await?;

        insert_punch(&db, employee.id, PunchType::TimeIn, at(&cal, day, 540)).await?;

        // 18:10: past the cutoff, inside the auto-timeout grace, still open
        let att =
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, at(&cal, day, 1090))
                .await?;
        assert_eq!(att.status, AttendanceStatus::Incomplete);
        assert!(att.is_locked);

        Ok(())
    }

    #[tokio::test]
    async fn test_lock_cutoff_boundary() -> Result<()> {
        let (db, employee, shift) = setup_with_employee_and_shift().await?;
        let (cal, locks) = engine_parts();
        let day = date(2024, 3, 11);
        schedule_override(&db, employee.id, day, shift.id).await?;

        insert_punch(&db, employee.id, PunchType::TimeIn, at(&cal, day, 540)).await?;
        insert_punch(&db, employee.id, PunchType::TimeOut, at(&cal, day, 1080)).await?;

        // 18:04 is before end + 5
        let att =
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, at(&cal, day, 1084))
                .await?;
        assert!(!att.is_locked);

        // 18:05 is the cutoff
        let att =
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, at(&cal, day, 1085))
                .await?;
        assert!(att.is_locked);

        Ok(())
    }

    #[tokio::test]
    async fn test_recompute_is_idempotent() -> Result<()> {
        let (db, employee, shift) = setup_with_employee_and_shift().await?;
        let (cal, locks) = engine_parts();
        let day = date(2024, 3, 11);
        schedule_override(&db, employee.id, day, shift.id).await?;

        insert_punch(&db, employee.id, PunchType::TimeIn, at(&cal, day, 560)).await?;
        insert_punch(&db, employee.id, PunchType::TimeOut, at(&cal, day, 1080)).await?;

        let now = at(&cal, day, 1200);
        let first =
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, now).await?;
        let second =
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, now).await?;
        assert_eq!(first, second);

        Ok(())
    }

    #[tokio::test]
    async fn test_repeated_recompute_never_creates_second_row() -> Result<()> {
        let (db, employee, shift) = setup_with_employee_and_shift().await?;
        let (cal, locks) = engine_parts();
        let day = date(2024, 3, 11);
        schedule_override(&db, employee.id, day, shift.id).await?;

        for minutes in [600, 700, 1200] {
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, at(&cal, day, minutes))
                .await?;
        }

        let count = attendance::Entity::find()
            .filter(attendance::Column::EmployeeId.eq(employee.id))
            .filter(attendance::Column::WorkDate.eq(day))
            .count(&db)
            .await?;
        assert_eq!(count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_punches_without_schedule_leave_deltas_zero() -> Result<()> {
        let (db, employee, _shift) = setup_with_employee_and_shift().await?;
        let (cal, locks) = engine_parts();
        let day = date(2024, 3, 11);

        insert_punch(&db, employee.id, PunchType::TimeIn, at(&cal, day, 560)).await?;
        insert_punch(&db, employee.id, PunchType::TimeOut, at(&cal, day, 1000)).await?;

        let att =
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, at(&cal, day, 1001))
                .await?;
        assert_eq!(att.worked_minutes, Some(440));
        assert_eq!(att.late_minutes, 0);
        assert_eq!(att.undertime_minutes, 0);
        assert_eq!(att.overtime_minutes_raw, 0);
        assert_eq!(att.status, AttendanceStatus::Present);

        Ok(())
    }

    #[tokio::test]
    async fn test_recompute_backlinks_punches() -> Result<()> {
        let (db, employee, shift) = setup_with_employee_and_shift().await?;
        let (cal, locks) = engine_parts();
        let day = date(2024, 3, 11);
        schedule_override(&db, employee.id, day, shift.id).await?;

        insert_punch(&db, employee.id, PunchType::TimeIn, at(&cal, day, 540)).await?;
        insert_punch(&db, employee.id, PunchType::TimeOut, at(&cal, day, 1080)).await?;

        let att =
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, at(&cal, day, 1081))
                .await?;
        let punches = punches_for_day(&db, &cal, employee.id, day).await?;
        assert!(punches.iter().all(|p| p.attendance_id == Some(att.id)));

        Ok(())
    }

    #[tokio::test]
    async fn test_earliest_punch_stands_in_for_missing_time_in() -> Result<()> {
        let (db, employee, shift) = setup_with_employee_and_shift().await?;
        let (cal, locks) = engine_parts();
        let day = date(2024, 3, 11);
        schedule_override(&db, employee.id, day, shift.id).await?;

        // Operator never clocked in but started a break
        insert_punch(&db, employee.id, PunchType::BreakIn, at(&cal, day, 700)).await?;
        insert_punch(&db, employee.id, PunchType::BreakOut, at(&cal, day, 710)).await?;

        let att =
            recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, at(&cal, day, 800))
                .await?;
        assert_eq!(att.actual_in_at, Some(at(&cal, day, 700)));
        assert_eq!(att.late_minutes, 160);

        Ok(())
    }

    #[tokio::test]
    async fn test_lock_day_sweep() -> Result<()> {
        let (db, employee, shift) = setup_with_employee_and_shift().await?;
        let other = crate::core::employee::create_employee(
            &db,
            "EMP-002".to_string(),
            "Bo Lin".to_string(),
        )
        .await?;
        let (cal, locks) = engine_parts();
        let day = date(2024, 3, 11);
        schedule_override(&db, employee.id, day, shift.id).await?;
        schedule_override(&db, other.id, day, shift.id).await?;

        // First employee is open without a clock-out; second never punched
        insert_punch(&db, employee.id, PunchType::TimeIn, at(&cal, day, 540)).await?;
        let before_cutoff = at(&cal, day, 1000);
        recompute_attendance_for_day(&db, &cal, &locks, employee.id, day, before_cutoff).await?;
        recompute_attendance_for_day(&db, &cal, &locks, other.id, day, before_cutoff).await?;

        let locked = lock_day(&db, &cal, &locks, day, at(&cal, day, 1440)).await?;
        assert_eq!(locked, 2);

        let open_row = crate::core::attendance::find_by_employee_day(&db, employee.id, day)
            .await?
            .unwrap();
        assert_eq!(open_row.status, AttendanceStatus::Incomplete);
        assert!(open_row.is_locked);

        let absent_row = crate::core::attendance::find_by_employee_day(&db, other.id, day)
            .await?
            .unwrap();
        assert_eq!(absent_row.status, AttendanceStatus::Absent);
        assert!(absent_row.is_locked);

        // Second sweep finds nothing left to lock
        let locked = lock_day(&db, &cal, &locks, day, at(&cal, day, 1441)).await?;
        assert_eq!(locked, 0);

        Ok(())
    }

    async fn schedule_override(
        db: &DatabaseConnection,
        employee_id: i64,
        day: chrono::NaiveDate,
        shift_id: i64,
    ) -> Result<()> {
        set_override(db, employee_id, day, Some(shift_id), "test".to_string()).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_pattern_schedule_feeds_recompute() -> Result<()> {
        let (db, employee, shift) = setup_with_employee_and_shift().await?;
        let (cal, locks) = engine_parts();
        let pattern = create_workweek_pattern(&db, "5X2", shift.id).await?;
        assign_pattern(&db, employee.id, pattern.id, date(2024, 1, 1), None).await?;

        // Monday follows the pattern
        let monday = date(2024, 3, 11);
        let att = recompute_attendance_for_day(
            &db,
            &cal,
            &locks,
            employee.id,
            monday,
            at(&cal, monday, 600),
        )
        .await?;
        assert_eq!(att.status, AttendanceStatus::Absent);
        assert_eq!(att.expected_shift_id, Some(shift.id));

        // Sunday is a pattern rest day
        let sunday = date(2024, 3, 10);
        let att = recompute_attendance_for_day(
            &db,
            &cal,
            &locks,
            employee.id,
            sunday,
            at(&cal, sunday, 600),
        )
        .await?;
        assert_eq!(att.status, AttendanceStatus::Rest);

        Ok(())
    }
}

//! Shared test utilities for `timeclock`.
//!
//! Provides the in-memory database setup, a fixed test calendar (UTC+8 so
//! time-zone bugs surface), and factories for the entities most tests need.

use crate::{
    core::{calendar::OrgCalendar, day_lock::DayLockRegistry, employee, pattern, shift},
    entities::{
        employee::Model as EmployeeModel,
        punch::{self, PunchSource, PunchType},
        shift::Model as ShiftModel,
        weekly_pattern::Model as WeeklyPatternModel,
    },
    errors::Result,
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// The fixed organizational calendar used throughout the tests: UTC+8, so
/// local day boundaries never coincide with UTC ones.
#[must_use]
pub fn test_calendar() -> OrgCalendar {
    OrgCalendar::new(480).expect("test offset is valid")
}

/// Calendar plus a fresh lock registry, the pair most engine tests need.
#[must_use]
pub fn engine_parts() -> (OrgCalendar, DayLockRegistry) {
    (test_calendar(), DayLockRegistry::new())
}

/// Shorthand for a calendar date.
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("test date is valid")
}

/// The instant at `minutes` past the organizational day start of `day`.
#[must_use]
pub fn at(calendar: &OrgCalendar, day: NaiveDate, minutes: i64) -> DateTime<Utc> {
    let bounds = calendar.day_bounds_for_date(day);
    OrgCalendar::instant_at_minutes(&bounds, minutes)
}

/// Creates a test employee with the given code.
pub async fn create_test_employee(db: &DatabaseConnection, code: &str) -> Result<EmployeeModel> {
    employee::create_employee(db, code.to_string(), format!("Test {code}")).await
}

/// Creates a shift with explicit minutes.
pub async fn create_test_shift(
    db: &DatabaseConnection,
    code: &str,
    start_minutes: i32,
    end_minutes: i32,
    spans_midnight: bool,
) -> Result<ShiftModel> {
    shift::create_shift(
        db,
        shift::NewShift {
            code: code.to_string(),
            name: format!("{code} shift"),
            start_minutes,
            end_minutes,
            spans_midnight,
            break_minutes_unpaid: 60,
            paid_hours_per_day: 8.0,
            notes: None,
        },
    )
    .await
}

/// The standard 09:00-18:00 day shift.
pub async fn create_day_shift(db: &DatabaseConnection) -> Result<ShiftModel> {
    create_test_shift(db, "DAY", 540, 1080, false).await
}

/// Creates a pattern with an explicit weekday mapping, Sunday first.
pub async fn create_test_pattern(
    db: &DatabaseConnection,
    code: &str,
    days: [Option<i64>; 7],
) -> Result<WeeklyPatternModel> {
    pattern::create_pattern(db, code.to_string(), format!("{code} pattern"), days).await
}

/// Creates a Monday-to-Friday pattern on one shift with weekend rest.
pub async fn create_workweek_pattern(
    db: &DatabaseConnection,
    code: &str,
    shift_id: i64,
) -> Result<WeeklyPatternModel> {
    create_test_pattern(
        db,
        code,
        [
            None,
            Some(shift_id),
            Some(shift_id),
            Some(shift_id),
            Some(shift_id),
            Some(shift_id),
            None,
        ],
    )
    .await
}

/// Inserts a raw punch without going through the gate or recompute, for
/// tests that stage a ledger directly.
pub async fn insert_punch(
    db: &DatabaseConnection,
    employee_id: i64,
    punch_type: PunchType,
    punch_time: DateTime<Utc>,
) -> Result<punch::Model> {
    let model = punch::ActiveModel {
        employee_id: Set(employee_id),
        punch_type: Set(punch_type),
        punch_time: Set(punch_time),
        source: Set(PunchSource::Admin),
        attendance_id: Set(None),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Sets up a database with one employee and the standard day shift.
/// Returns (db, employee, shift) for common engine scenarios.
pub async fn setup_with_employee_and_shift()
-> Result<(DatabaseConnection, EmployeeModel, ShiftModel)> {
    let db = setup_test_db().await?;
    let employee = create_test_employee(&db, "EMP-001").await?;
    let shift = create_day_shift(&db).await?;
    Ok((db, employee, shift))
}

/// Asserts that a result is a punch rejection carrying the given stable
/// reason token.
pub fn assert_rejected_with(result: Result<()>, expected_code: &str) {
    match result {
        Err(crate::errors::Error::PunchRejected { reason }) => {
            assert_eq!(reason.code(), expected_code);
        }
        other => panic!("expected rejection {expected_code}, got {other:?}"),
    }
}

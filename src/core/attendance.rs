//! Attendance row queries.
//!
//! Read-side helpers over the attendance store; all writes go through the
//! recompute engine in [`crate::core::recompute`].

use crate::{
    entities::{Attendance, attendance},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, prelude::*};

/// The attendance row for one employee-day, if a recompute has produced one.
pub async fn find_by_employee_day<C: ConnectionTrait>(
    db: &C,
    employee_id: i64,
    work_date: NaiveDate,
) -> Result<Option<attendance::Model>> {
    Attendance::find()
        .filter(attendance::Column::EmployeeId.eq(employee_id))
        .filter(attendance::Column::WorkDate.eq(work_date))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Attendance rows for an employee over an inclusive date range, ordered by
/// date.
pub async fn attendance_for_range(
    db: &DatabaseConnection,
    employee_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<attendance::Model>> {
    Attendance::find()
        .filter(attendance::Column::EmployeeId.eq(employee_id))
        .filter(attendance::Column::WorkDate.gte(from))
        .filter(attendance::Column::WorkDate.lte(to))
        .order_by_asc(attendance::Column::WorkDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Unlocked rows for one organizational day, used by the end-of-day sweep.
pub async fn unlocked_for_day(
    db: &DatabaseConnection,
    work_date: NaiveDate,
) -> Result<Vec<attendance::Model>> {
    Attendance::find()
        .filter(attendance::Column::WorkDate.eq(work_date))
        .filter(attendance::Column::IsLocked.eq(false))
        .order_by_asc(attendance::Column::EmployeeId)
        .all(db)
        .await
        .map_err(Into::into)
}

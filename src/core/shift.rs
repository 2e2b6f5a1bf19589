//! Shift catalogue business logic.
//!
//! Shift definitions are reference data: created and edited prospectively,
//! then treated as immutable by resolution.

use crate::{
    entities::{Shift, shift},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

const MINUTES_PER_DAY: i32 = 1440;

/// Parameters for a new shift definition.
#[derive(Debug, Clone)]
pub struct NewShift {
    pub code: String,
    pub name: String,
    pub start_minutes: i32,
    pub end_minutes: i32,
    pub spans_midnight: bool,
    pub break_minutes_unpaid: i32,
    pub paid_hours_per_day: f64,
    pub notes: Option<String>,
}

/// Creates a shift definition after validating minute-of-day ranges.
pub async fn create_shift(db: &DatabaseConnection, new: NewShift) -> Result<shift::Model> {
    if new.code.trim().is_empty() {
        return Err(Error::Config {
            message: "Shift code cannot be empty".to_string(),
        });
    }
    for (label, minutes) in [("start", new.start_minutes), ("end", new.end_minutes)] {
        if !(0..MINUTES_PER_DAY).contains(&minutes) {
            return Err(Error::InvalidShiftTime {
                message: format!("{label} must be a minute-of-day (0-1439), got {minutes}"),
            });
        }
    }
    if new.break_minutes_unpaid < 0 {
        return Err(Error::InvalidShiftTime {
            message: format!(
                "break allowance cannot be negative, got {}",
                new.break_minutes_unpaid
            ),
        });
    }

    let model = shift::ActiveModel {
        code: Set(new.code.trim().to_string()),
        name: Set(new.name),
        start_minutes: Set(new.start_minutes),
        end_minutes: Set(new.end_minutes),
        spans_midnight: Set(new.spans_midnight),
        break_minutes_unpaid: Set(new.break_minutes_unpaid),
        paid_hours_per_day: Set(new.paid_hours_per_day),
        notes: Set(new.notes),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

/// Finds a shift by id.
pub async fn get_shift_by_id<C: ConnectionTrait>(
    db: &C,
    shift_id: i64,
) -> Result<Option<shift::Model>> {
    Shift::find_by_id(shift_id).one(db).await.map_err(Into::into)
}

/// Finds a shift by code.
pub async fn get_shift_by_code<C: ConnectionTrait>(
    db: &C,
    code: &str,
) -> Result<Option<shift::Model>> {
    Shift::find()
        .filter(shift::Column::Code.eq(code))
        .one(db)
        .await
        .map_err(Into::into)
}

/// All shifts ordered by code.
pub async fn get_all_shifts(db: &DatabaseConnection) -> Result<Vec<shift::Model>> {
    Shift::find()
        .order_by_asc(shift::Column::Code)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Errors with [`Error::ShiftNotFound`] when the shift is missing.
pub async fn require_shift<C: ConnectionTrait>(db: &C, shift_id: i64) -> Result<shift::Model> {
    get_shift_by_id(db, shift_id)
        .await?
        .ok_or(Error::ShiftNotFound { shift_id })
}

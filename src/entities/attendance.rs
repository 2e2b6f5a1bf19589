//! Attendance entity - One recomputed snapshot per (employee, work date).
//!
//! The pair `(employee_id, work_date)` is a uniqueness invariant, enforced by
//! a unique index created in `config::database::create_tables`. Rows are
//! created on first recompute for a day and overwritten on every subsequent
//! recompute; the engine never deletes them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Day classification produced by the recompute state machine. Closed set,
/// matched exhaustively.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// No expected shift and the day is a rest day
    #[default]
    #[sea_orm(string_value = "rest")]
    Rest,
    /// An expected shift exists but no punch was recorded
    #[sea_orm(string_value = "absent")]
    Absent,
    /// Punched and on time
    #[sea_orm(string_value = "present")]
    Present,
    /// Punched but arrived after the scheduled start
    #[sea_orm(string_value = "late")]
    Late,
    /// Day closed past the cutoff without a clock-out
    #[sea_orm(string_value = "incomplete")]
    Incomplete,
}

/// Attendance database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    /// Unique identifier for the attendance row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Employee the row belongs to
    pub employee_id: i64,
    /// Organizational calendar day; unique together with `employee_id`
    pub work_date: Date,
    /// Resolved expected shift, if any
    pub expected_shift_id: Option<i64>,
    /// Scheduled start in minutes from day start
    pub scheduled_start_minutes: Option<i32>,
    /// Scheduled end in minutes from day start (midnight-adjusted)
    pub scheduled_end_minutes: Option<i32>,
    /// Paid hours credited for a full day on the expected shift
    pub paid_hours_per_day: Option<f64>,
    /// First clock-in (or earliest punch when no clock-in exists)
    pub actual_in_at: Option<DateTimeUtc>,
    /// Last clock-out
    pub actual_out_at: Option<DateTimeUtc>,
    /// Net span between actual in and out, when both exist
    pub worked_minutes: Option<i32>,
    /// Total break minutes derived by interval pairing
    pub break_minutes: i32,
    /// Number of paired break intervals
    pub break_count: i32,
    /// Minutes late past the scheduled start, clamped at zero
    pub late_minutes: i32,
    /// Minutes short of the scheduled end, clamped at zero
    pub undertime_minutes: i32,
    /// Raw minutes past the scheduled end, clamped at zero
    pub overtime_minutes_raw: i32,
    /// Approved overtime; written by payroll approval, never by this engine
    pub overtime_minutes_approved: i32,
    /// Day classification
    pub status: AttendanceStatus,
    /// Locked once the cutoff (scheduled end + grace) has passed
    pub is_locked: bool,
}

/// Defines relationships between Attendance and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each attendance row belongs to one employee
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
    /// One attendance row has many back-linked punches
    #[sea_orm(has_many = "super::punch::Entity")]
    Punches,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::punch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Punches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

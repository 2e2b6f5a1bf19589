//! Punch entity - Ordered per-employee log of clock events.
//!
//! Punches are append-only apart from the narrow type/time correction path,
//! which must be followed by a recompute. The `attendance_id` back-reference
//! is maintained exclusively by the recompute engine.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The four clock event kinds. Closed set; the status state machine matches
/// exhaustively so a new kind is a compile-time-visible change.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PunchType {
    /// Start of the working day
    #[sea_orm(string_value = "time_in")]
    TimeIn,
    /// End of the working day
    #[sea_orm(string_value = "time_out")]
    TimeOut,
    /// Start of a break interval
    #[sea_orm(string_value = "break_in")]
    BreakIn,
    /// End of a break interval
    #[sea_orm(string_value = "break_out")]
    BreakOut,
}

/// Channel a punch was captured on.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PunchSource {
    /// Employee self-service portal
    #[sea_orm(string_value = "self_service")]
    SelfService,
    /// Shared kiosk terminal
    #[sea_orm(string_value = "kiosk")]
    Kiosk,
    /// Administrative entry or correction
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Synthesized by the recompute engine when a clock-out is overdue
    #[sea_orm(string_value = "auto_timeout")]
    AutoTimeout,
}

impl PunchSource {
    /// True for the employee-facing channels that go through the punch
    /// validation gate; admin and synthesized punches bypass it.
    #[must_use]
    pub const fn is_gated(&self) -> bool {
        matches!(self, Self::SelfService | Self::Kiosk)
    }
}

/// Punch database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "punches")]
pub struct Model {
    /// Unique identifier for the punch
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Employee who punched
    pub employee_id: i64,
    /// Kind of clock event
    pub punch_type: PunchType,
    /// Absolute instant of the event
    pub punch_time: DateTimeUtc,
    /// Channel of capture
    pub source: PunchSource,
    /// Attendance row this punch was folded into, set by the recompute engine
    pub attendance_id: Option<i64>,
}

/// Defines relationships between Punch and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each punch belongs to one employee
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
    /// Each punch is back-linked to at most one attendance row
    #[sea_orm(
        belongs_to = "super::attendance::Entity",
        from = "Column::AttendanceId",
        to = "super::attendance::Column::Id"
    )]
    Attendance,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

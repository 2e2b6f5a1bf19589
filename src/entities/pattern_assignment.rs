//! Pattern assignment entity - Binds an employee to a weekly pattern from an
//! effective date, carrying a point-in-time snapshot of the pattern's
//! day-to-shift mapping.
//!
//! The assignment with the greatest `effective_date` at or before the queried
//! date is authoritative. `employee_id` is never changed after creation; a
//! correction updates the snapshot in place or creates a new assignment.

use chrono::Weekday;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Marker prefix in `reason` signalling the assignment was derived as a
/// manual override of another assignment. An all-rest snapshot under this
/// marker is intentional and must stay pinned.
pub const OVERRIDE_REASON_PREFIX: &str = "OVERRIDE_FROM:";

/// Pattern assignment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pattern_assignments")]
pub struct Model {
    /// Unique identifier for the assignment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Employee the pattern is assigned to
    pub employee_id: i64,
    /// The assigned weekly pattern
    pub pattern_id: i64,
    /// First day (inclusive, organizational calendar) the assignment applies
    pub effective_date: Date,
    /// Snapshot of the pattern's Sunday shift at assignment time
    pub snapshot_sunday_shift_id: Option<i64>,
    /// Snapshot of the pattern's Monday shift at assignment time
    pub snapshot_monday_shift_id: Option<i64>,
    /// Snapshot of the pattern's Tuesday shift at assignment time
    pub snapshot_tuesday_shift_id: Option<i64>,
    /// Snapshot of the pattern's Wednesday shift at assignment time
    pub snapshot_wednesday_shift_id: Option<i64>,
    /// Snapshot of the pattern's Thursday shift at assignment time
    pub snapshot_thursday_shift_id: Option<i64>,
    /// Snapshot of the pattern's Friday shift at assignment time
    pub snapshot_friday_shift_id: Option<i64>,
    /// Snapshot of the pattern's Saturday shift at assignment time
    pub snapshot_saturday_shift_id: Option<i64>,
    /// Free text; may carry the [`OVERRIDE_REASON_PREFIX`] marker
    pub reason: Option<String>,
}

impl Model {
    /// Snapshot shift reference for one weekday.
    #[must_use]
    pub const fn snapshot_for(&self, weekday: Weekday) -> Option<i64> {
        match weekday {
            Weekday::Sun => self.snapshot_sunday_shift_id,
            Weekday::Mon => self.snapshot_monday_shift_id,
            Weekday::Tue => self.snapshot_tuesday_shift_id,
            Weekday::Wed => self.snapshot_wednesday_shift_id,
            Weekday::Thu => self.snapshot_thursday_shift_id,
            Weekday::Fri => self.snapshot_friday_shift_id,
            Weekday::Sat => self.snapshot_saturday_shift_id,
        }
    }

    /// All seven snapshot references, Sunday first.
    #[must_use]
    pub const fn snapshot_shift_ids(&self) -> [Option<i64>; 7] {
        [
            self.snapshot_sunday_shift_id,
            self.snapshot_monday_shift_id,
            self.snapshot_tuesday_shift_id,
            self.snapshot_wednesday_shift_id,
            self.snapshot_thursday_shift_id,
            self.snapshot_friday_shift_id,
            self.snapshot_saturday_shift_id,
        ]
    }

    /// True when at least one snapshot weekday carries a shift; such an
    /// assignment is pinned to its snapshot for every weekday.
    #[must_use]
    pub fn has_pinned_snapshot(&self) -> bool {
        self.snapshot_shift_ids().iter().any(Option::is_some)
    }

    /// True when `reason` carries the manual-override marker.
    #[must_use]
    pub fn is_manual_override(&self) -> bool {
        self.reason
            .as_deref()
            .is_some_and(|r| r.starts_with(OVERRIDE_REASON_PREFIX))
    }
}

/// Defines relationships between `PatternAssignment` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each assignment belongs to one employee
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
    /// Each assignment references one weekly pattern
    #[sea_orm(
        belongs_to = "super::weekly_pattern::Entity",
        from = "Column::PatternId",
        to = "super::weekly_pattern::Column::Id"
    )]
    WeeklyPattern,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::weekly_pattern::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WeeklyPattern.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

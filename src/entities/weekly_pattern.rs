//! Weekly pattern entity - Reusable 7-day templates mapping weekdays to shifts.
//!
//! A `None` shift reference for a weekday means "rest day" under the pattern.

use chrono::Weekday;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Weekly pattern database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "weekly_patterns")]
pub struct Model {
    /// Unique identifier for the pattern
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-assigned code (e.g., "5X2-DAY")
    #[sea_orm(unique)]
    pub code: String,
    /// Display name
    pub name: String,
    /// Shift for Sunday, None = rest day
    pub sunday_shift_id: Option<i64>,
    /// Shift for Monday, None = rest day
    pub monday_shift_id: Option<i64>,
    /// Shift for Tuesday, None = rest day
    pub tuesday_shift_id: Option<i64>,
    /// Shift for Wednesday, None = rest day
    pub wednesday_shift_id: Option<i64>,
    /// Shift for Thursday, None = rest day
    pub thursday_shift_id: Option<i64>,
    /// Shift for Friday, None = rest day
    pub friday_shift_id: Option<i64>,
    /// Shift for Saturday, None = rest day
    pub saturday_shift_id: Option<i64>,
}

impl Model {
    /// Live shift reference for one weekday.
    #[must_use]
    pub const fn shift_id_for(&self, weekday: Weekday) -> Option<i64> {
        match weekday {
            Weekday::Sun => self.sunday_shift_id,
            Weekday::Mon => self.monday_shift_id,
            Weekday::Tue => self.tuesday_shift_id,
            Weekday::Wed => self.wednesday_shift_id,
            Weekday::Thu => self.thursday_shift_id,
            Weekday::Fri => self.friday_shift_id,
            Weekday::Sat => self.saturday_shift_id,
        }
    }

    /// All seven live references, Sunday first.
    #[must_use]
    pub const fn day_shift_ids(&self) -> [Option<i64>; 7] {
        [
            self.sunday_shift_id,
            self.monday_shift_id,
            self.tuesday_shift_id,
            self.wednesday_shift_id,
            self.thursday_shift_id,
            self.friday_shift_id,
            self.saturday_shift_id,
        ]
    }

    /// True when every weekday of the pattern is a rest day.
    #[must_use]
    pub fn is_all_rest(&self) -> bool {
        self.day_shift_ids().iter().all(Option::is_none)
    }
}

/// Defines relationships between `WeeklyPattern` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One pattern has many assignments
    #[sea_orm(has_many = "super::pattern_assignment::Entity")]
    PatternAssignments,
}

impl Related<super::pattern_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PatternAssignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Shift entity - Named shift definitions in the catalogue.
//!
//! Start and end are minutes-of-day (0-1439). A shift whose end conceptually
//! wraps past midnight carries `spans_midnight = true`; use
//! [`Model::effective_end_minutes`] for any arithmetic against
//! minutes-from-day-start. Edits apply prospectively only.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shift database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shifts")]
pub struct Model {
    /// Unique identifier for the shift
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-assigned code (e.g., "DAY", "NIGHT-A")
    #[sea_orm(unique)]
    pub code: String,
    /// Display name
    pub name: String,
    /// Scheduled start, minutes after the organizational day start (0-1439)
    pub start_minutes: i32,
    /// Scheduled end, minutes-of-day (0-1439 even when the shift wraps)
    pub end_minutes: i32,
    /// True when the shift ends on the following calendar day
    pub spans_midnight: bool,
    /// Unpaid break allowance in minutes
    pub break_minutes_unpaid: i32,
    /// Paid hours credited for a full day on this shift
    pub paid_hours_per_day: f64,
    /// Free-text notes
    pub notes: Option<String>,
}

impl Model {
    /// Scheduled end expressed as minutes from the day start, so it is
    /// directly comparable with punch offsets. Wrapping shifts report
    /// `end_minutes + 1440`.
    #[must_use]
    pub const fn effective_end_minutes(&self) -> i32 {
        if self.spans_midnight {
            self.end_minutes + 1440
        } else {
            self.end_minutes
        }
    }
}

/// Shifts are referenced by patterns, assignments and overrides; those hold
/// the foreign keys.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

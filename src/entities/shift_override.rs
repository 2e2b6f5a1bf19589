//! Shift override entity - Explicit single-day schedule assignment that
//! supersedes any pattern.
//!
//! A `None` shift is a deliberate forced rest day. At most one override is
//! expected per (employee, day); the lookup takes the first match rather
//! than enforcing a uniqueness constraint.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shift override database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shift_overrides")]
pub struct Model {
    /// Unique identifier for the override
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Employee the override applies to
    pub employee_id: i64,
    /// The single organizational calendar day the override covers
    pub work_date: Date,
    /// Explicit shift, or None for a forced rest day
    pub shift_id: Option<i64>,
    /// Provenance tag (e.g., "hr_portal", "import")
    pub source: String,
}

/// Defines relationships between `ShiftOverride` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each override belongs to one employee
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id"
    )]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

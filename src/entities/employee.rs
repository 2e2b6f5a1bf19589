//! Employee entity - Minimal identity roster consumed by the engine.
//!
//! The engine only ever reads this table (`employee_exists` checks); full
//! directory management lives outside this crate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employee database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    /// Unique identifier for the employee
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-assigned code (e.g., "EMP-001")
    #[sea_orm(unique)]
    pub employee_code: String,
    /// Display name
    pub full_name: String,
    /// Inactive employees keep their history but stop accruing attendance
    pub is_active: bool,
}

/// Defines relationships between Employee and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One employee has many punches
    #[sea_orm(has_many = "super::punch::Entity")]
    Punches,
    /// One employee has many attendance rows
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendances,
    /// One employee has many pattern assignments
    #[sea_orm(has_many = "super::pattern_assignment::Entity")]
    PatternAssignments,
    /// One employee has many shift overrides
    #[sea_orm(has_many = "super::shift_override::Entity")]
    ShiftOverrides,
}

impl Related<super::punch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Punches.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

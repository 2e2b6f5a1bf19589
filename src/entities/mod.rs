//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod attendance;
pub mod employee;
pub mod pattern_assignment;
pub mod punch;
pub mod shift;
pub mod shift_override;
pub mod weekly_pattern;

// Re-export specific types to avoid conflicts
pub use attendance::{Column as AttendanceColumn, Entity as Attendance, Model as AttendanceModel};
pub use employee::{Column as EmployeeColumn, Entity as Employee, Model as EmployeeModel};
pub use pattern_assignment::{
    Column as PatternAssignmentColumn, Entity as PatternAssignment, Model as PatternAssignmentModel,
};
pub use punch::{Column as PunchColumn, Entity as Punch, Model as PunchModel};
pub use shift::{Column as ShiftColumn, Entity as Shift, Model as ShiftModel};
pub use shift_override::{
    Column as ShiftOverrideColumn, Entity as ShiftOverride, Model as ShiftOverrideModel,
};
pub use weekly_pattern::{
    Column as WeeklyPatternColumn, Entity as WeeklyPattern, Model as WeeklyPatternModel,
};

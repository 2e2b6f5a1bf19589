//! Database configuration module.
//!
//! Handles `SQLite` connection and table creation using `SeaORM`. Tables are
//! generated from the entity definitions via `Schema::create_table_from_entity`
//! so the schema always matches the Rust structs; the one invariant the
//! entities cannot express - uniqueness of `(employee_id, work_date)` on
//! attendance - is created here as a real unique index.

use crate::entities::{
    Attendance, Employee, PatternAssignment, Punch, Shift, ShiftOverride, WeeklyPattern, attendance,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema, sea_query::Index};

/// Gets the database URL from the environment or returns the default local
/// `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/timeclock.sqlite".to_string())
}

/// Establishes a connection using `DATABASE_URL`, falling back to a default
/// local `SQLite` file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all tables plus the attendance uniqueness index.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    db.execute(builder.build(&schema.create_table_from_entity(Employee)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Shift)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(WeeklyPattern)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(PatternAssignment)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(ShiftOverride)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Attendance)))
        .await?;
    db.execute(builder.build(&schema.create_table_from_entity(Punch)))
        .await?;

    // One attendance row per employee-day, enforced structurally.
    let employee_day_index = Index::create()
        .name("idx_attendance_employee_day")
        .table(Attendance)
        .col(attendance::Column::EmployeeId)
        .col(attendance::Column::WorkDate)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&employee_day_index)).await?;

    Ok(())
}

//! Employee directory shim.
//!
//! Stands in for the external directory: the engine needs existence checks
//! before accepting punches or recomputing, plus a creation path for seeding
//! and tests. Identity data is never mutated here.

use crate::{
    entities::{Employee, employee},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Creates an employee record with a unique code.
pub async fn create_employee(
    db: &DatabaseConnection,
    employee_code: String,
    full_name: String,
) -> Result<employee::Model> {
    if employee_code.trim().is_empty() {
        return Err(Error::Config {
            message: "Employee code cannot be empty".to_string(),
        });
    }

    let model = employee::ActiveModel {
        employee_code: Set(employee_code.trim().to_string()),
        full_name: Set(full_name),
        is_active: Set(true),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

/// Finds an employee by id.
pub async fn get_employee_by_id<C: ConnectionTrait>(
    db: &C,
    employee_id: i64,
) -> Result<Option<employee::Model>> {
    Employee::find_by_id(employee_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an employee by code.
pub async fn get_employee_by_code(
    db: &DatabaseConnection,
    employee_code: &str,
) -> Result<Option<employee::Model>> {
    Employee::find()
        .filter(employee::Column::EmployeeCode.eq(employee_code))
        .one(db)
        .await
        .map_err(Into::into)
}

/// True when the employee exists.
pub async fn employee_exists<C: ConnectionTrait>(db: &C, employee_id: i64) -> Result<bool> {
    Ok(get_employee_by_id(db, employee_id).await?.is_some())
}

/// Errors with [`Error::EmployeeNotFound`] when the employee is missing.
pub async fn ensure_employee<C: ConnectionTrait>(db: &C, employee_id: i64) -> Result<()> {
    if employee_exists(db, employee_id).await? {
        Ok(())
    } else {
        Err(Error::EmployeeNotFound { employee_id })
    }
}

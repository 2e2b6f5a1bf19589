//! Unified error types for the attendance engine.
//!
//! Validation failures (unknown employee, bad shift times) and business-rule
//! punch rejections are distinct variants: rejections carry a machine-readable
//! [`RejectionReason`] with a stable `code()` token so calling surfaces can
//! localize and route messages independently of the human-readable text.

use crate::entities::punch::PunchType;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Employee {employee_id} not found")]
    EmployeeNotFound { employee_id: i64 },

    #[error("Shift {shift_id} not found")]
    ShiftNotFound { shift_id: i64 },

    #[error("Weekly pattern {pattern_id} not found")]
    PatternNotFound { pattern_id: i64 },

    #[error("Pattern assignment {assignment_id} not found")]
    AssignmentNotFound { assignment_id: i64 },

    #[error("Punch {punch_id} not found")]
    PunchNotFound { punch_id: i64 },

    #[error("Invalid shift time: {message}")]
    InvalidShiftTime { message: String },

    #[error("Punch rejected: {reason}")]
    PunchRejected { reason: RejectionReason },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Business-rule reason a punch was refused at the validation gate.
///
/// `code()` is the stable wire token; `Display` is the human message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// No resolvable shift schedule exists for the employee today.
    NoShiftToday,
    /// The clock-in arrived before the scheduled shift start.
    TooEarly,
    /// The clock-in arrived after the scheduled shift end.
    TooLate,
    /// The punch type does not match the expected position in the cycle.
    InvalidSequence {
        expected: PunchType,
        got: PunchType,
    },
}

impl RejectionReason {
    /// Stable machine-readable token, independent of the display message.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoShiftToday => "no_shift_today",
            Self::TooEarly => "too_early",
            Self::TooLate => "too_late",
            Self::InvalidSequence { .. } => "invalid_sequence",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoShiftToday => write!(f, "no scheduled shift today"),
            Self::TooEarly => write!(f, "too early to clock in"),
            Self::TooLate => write!(f, "too late to clock in"),
            Self::InvalidSequence { expected, got } => {
                write!(f, "wrong punch sequence: expected {expected:?}, got {got:?}")
            }
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

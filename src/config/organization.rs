//! Organization settings from environment variables.
//!
//! The engine runs every calendar computation in one fixed organizational
//! time zone, configured as a UTC offset in minutes. There is no daylight
//! saving handling; the offset is constant year-round.

use crate::core::calendar::OrgCalendar;
use crate::errors::{Error, Result};

const ORG_UTC_OFFSET_VAR: &str = "ORG_UTC_OFFSET_MINUTES";
const DEFAULT_UTC_OFFSET_MINUTES: i32 = 480; // UTC+8

/// Organization-level settings.
#[derive(Debug, Clone, Copy)]
pub struct OrganizationConfig {
    /// Minutes east of UTC for the organizational calendar
    pub utc_offset_minutes: i32,
}

impl OrganizationConfig {
    /// Reads settings from the environment. A missing offset falls back to
    /// the default; an unparseable one is a configuration error.
    pub fn from_env() -> Result<Self> {
        let utc_offset_minutes = match std::env::var(ORG_UTC_OFFSET_VAR) {
            Ok(raw) => raw.trim().parse().map_err(|_| Error::Config {
                message: format!("{ORG_UTC_OFFSET_VAR} must be an integer, got {raw:?}"),
            })?,
            Err(_) => DEFAULT_UTC_OFFSET_MINUTES,
        };
        Ok(Self { utc_offset_minutes })
    }

    /// Builds the organizational calendar for these settings.
    pub fn calendar(&self) -> Result<OrgCalendar> {
        OrgCalendar::new(self.utc_offset_minutes)
    }
}

//! Seed catalogue loading from config.toml
//!
//! Shift definitions and weekly patterns declared in a TOML file are used to
//! seed the database on first run or when entries are missing. Existing
//! codes are left untouched, so re-running the seed is harmless.

use crate::core::{pattern, shift};
use crate::errors::{Error, Result};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Shift definitions to seed
    #[serde(default)]
    pub shifts: Vec<ShiftConfig>,
    /// Weekly patterns to seed, referencing shifts by code
    #[serde(default)]
    pub patterns: Vec<PatternConfig>,
}

/// Configuration for a single shift definition
#[derive(Debug, Deserialize, Clone)]
pub struct ShiftConfig {
    /// Unique shift code (e.g., "DAY")
    pub code: String,
    /// Display name
    pub name: String,
    /// Scheduled start, minutes-of-day
    pub start_minutes: i32,
    /// Scheduled end, minutes-of-day
    pub end_minutes: i32,
    /// True when the shift ends the following calendar day
    #[serde(default)]
    pub spans_midnight: bool,
    /// Unpaid break allowance in minutes
    #[serde(default)]
    pub break_minutes_unpaid: i32,
    /// Paid hours credited for a full day
    pub paid_hours_per_day: f64,
    /// Free-text notes
    pub notes: Option<String>,
}

/// Configuration for a single weekly pattern; each weekday names a shift
/// code or is omitted for a rest day
#[derive(Debug, Deserialize, Clone)]
pub struct PatternConfig {
    /// Unique pattern code (e.g., "5X2-DAY")
    pub code: String,
    /// Display name
    pub name: String,
    pub sunday: Option<String>,
    pub monday: Option<String>,
    pub tuesday: Option<String>,
    pub wednesday: Option<String>,
    pub thursday: Option<String>,
    pub friday: Option<String>,
    pub saturday: Option<String>,
}

impl PatternConfig {
    fn day_codes(&self) -> [Option<&str>; 7] {
        [
            self.sunday.as_deref(),
            self.monday.as_deref(),
            self.tuesday.as_deref(),
            self.wednesday.as_deref(),
            self.thursday.as_deref(),
            self.friday.as_deref(),
            self.saturday.as_deref(),
        ]
    }
}

/// Loads the catalogue configuration from a TOML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the catalogue configuration from the default location (./config.toml).
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}

/// Seeds missing shifts and patterns by code. Patterns may only reference
/// shift codes that exist after the shift pass.
pub async fn seed_catalogue(db: &DatabaseConnection, config: &Config) -> Result<()> {
    let mut seeded_shifts = 0usize;
    for entry in &config.shifts {
        if shift::get_shift_by_code(db, &entry.code).await?.is_some() {
            continue;
        }
        shift::create_shift(
            db,
            shift::NewShift {
                code: entry.code.clone(),
                name: entry.name.clone(),
                start_minutes: entry.start_minutes,
                end_minutes: entry.end_minutes,
                spans_midnight: entry.spans_midnight,
                break_minutes_unpaid: entry.break_minutes_unpaid,
                paid_hours_per_day: entry.paid_hours_per_day,
                notes: entry.notes.clone(),
            },
        )
        .await?;
        seeded_shifts += 1;
    }

    let mut seeded_patterns = 0usize;
    for entry in &config.patterns {
        if pattern::get_pattern_by_code(db, &entry.code).await?.is_some() {
            continue;
        }
        let mut days = [None; 7];
        for (slot, code) in entry.day_codes().into_iter().enumerate() {
            if let Some(code) = code {
                let shift = shift::get_shift_by_code(db, code)
                    .await?
                    .ok_or_else(|| Error::Config {
                        message: format!(
                            "Pattern {} references unknown shift code {code:?}",
                            entry.code
                        ),
                    })?;
                days[slot] = Some(shift.id);
            }
        }
        pattern::create_pattern(db, entry.code.clone(), entry.name.clone(), days).await?;
        seeded_patterns += 1;
    }

    info!(seeded_shifts, seeded_patterns, "seeded catalogue");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    const SAMPLE: &str = r#"
        [[shifts]]
        code = "DAY"
        name = "Day shift"
        start_minutes = 540
        end_minutes = 1080
        paid_hours_per_day = 8.0

        [[shifts]]
        code = "NIGHT"
        name = "Night shift"
        start_minutes = 1320
        end_minutes = 360
        spans_midnight = true
        break_minutes_unpaid = 60
        paid_hours_per_day = 8.0

        [[patterns]]
        code = "5X2-DAY"
        name = "Weekday days"
        monday = "DAY"
        tuesday = "DAY"
        wednesday = "DAY"
        thursday = "DAY"
        friday = "DAY"
    "#;

    #[test]
    fn test_parse_catalogue_config() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.shifts.len(), 2);
        assert_eq!(config.shifts[0].code, "DAY");
        assert!(!config.shifts[0].spans_midnight);
        assert!(config.shifts[1].spans_midnight);
        assert_eq!(config.shifts[1].break_minutes_unpaid, 60);

        assert_eq!(config.patterns.len(), 1);
        let days = config.patterns[0].day_codes();
        assert_eq!(days[0], None);
        assert_eq!(days[1], Some("DAY"));
        assert_eq!(days[6], None);
    }

    #[tokio::test]
    async fn test_seed_catalogue_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let config: Config = toml::from_str(SAMPLE).unwrap();

        seed_catalogue(&db, &config).await?;
        let day = shift::get_shift_by_code(&db, "DAY").await?.unwrap();
        let pattern = pattern::get_pattern_by_code(&db, "5X2-DAY").await?.unwrap();
        assert_eq!(pattern.monday_shift_id, Some(day.id));
        assert_eq!(pattern.sunday_shift_id, None);

        // A second pass creates nothing new
        seed_catalogue(&db, &config).await?;
        let shifts = shift::get_all_shifts(&db).await?;
        assert_eq!(shifts.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_rejects_unknown_shift_code() -> Result<()> {
        let db = setup_test_db().await?;
        let config: Config = toml::from_str(
            r#"
            [[patterns]]
            code = "BROKEN"
            name = "Broken"
            monday = "MISSING"
        "#,
        )
        .unwrap();

        let result = seed_catalogue(&db, &config).await;
        assert!(matches!(result, Err(Error::Config { .. })));

        Ok(())
    }
}

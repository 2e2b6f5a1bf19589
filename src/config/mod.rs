/// Database configuration and connection management
pub mod database;

/// Seed catalogue (shifts and patterns) loading from config.toml
pub mod catalogue;

/// Organization settings from environment variables
pub mod organization;

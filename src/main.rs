//! End-of-day lock sweep runner.
//!
//! Connects to the attendance database, seeds the shift catalogue from
//! config.toml when one is present, and locks every still-open attendance
//! row for the current organizational day. Meant to be invoked by a daily
//! scheduler; all recompute work happens inside the library.

use chrono::Utc;
use dotenvy::dotenv;
use timeclock::config;
use timeclock::core::{day_lock::DayLockRegistry, recompute};
use timeclock::errors::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dotenv().ok();

    let org = config::organization::OrganizationConfig::from_env()?;
    let calendar = org.calendar()?;

    let db = config::database::create_connection().await?;
    config::database::create_tables(&db).await?;
    info!("Database initialized.");

    match config::catalogue::load_default_config() {
        Ok(catalogue) => config::catalogue::seed_catalogue(&db, &catalogue).await?,
        Err(e) => warn!("No seed catalogue loaded: {e}"),
    }

    let locks = DayLockRegistry::new();
    let now = Utc::now();
    let today = calendar.date_of(now);
    let locked = recompute::lock_day(&db, &calendar, &locks, today, now).await?;
    info!(%today, locked, "lock sweep finished");

    Ok(())
}

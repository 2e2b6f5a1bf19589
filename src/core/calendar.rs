//! Organizational calendar - Converts instants to calendar-day buckets in the
//! fixed organizational time zone.
//!
//! Every piece of day-bucketing in the engine goes through [`OrgCalendar`].
//! The organization runs on one fixed UTC offset with no daylight saving,
//! but nothing here assumes that offset is zero.

use crate::errors::{Error, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

/// Half-open `[start, end)` UTC bounds of one organizational calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBounds {
    /// The organizational calendar date of the bucket
    pub work_date: NaiveDate,
    /// First instant of the day (inclusive)
    pub start: DateTime<Utc>,
    /// First instant of the next day (exclusive)
    pub end: DateTime<Utc>,
}

/// Fixed-offset organizational calendar.
#[derive(Debug, Clone, Copy)]
pub struct OrgCalendar {
    utc_offset_minutes: i32,
}

impl OrgCalendar {
    /// Builds a calendar for the given UTC offset in minutes (e.g. 480 for
    /// UTC+8, -300 for UTC-5).
    pub fn new(utc_offset_minutes: i32) -> Result<Self> {
        if utc_offset_minutes <= -1440 || utc_offset_minutes >= 1440 {
            return Err(Error::Config {
                message: format!("UTC offset out of range: {utc_offset_minutes} minutes"),
            });
        }
        Ok(Self { utc_offset_minutes })
    }

    /// The configured offset in minutes east of UTC.
    #[must_use]
    pub const fn utc_offset_minutes(&self) -> i32 {
        self.utc_offset_minutes
    }

    fn offset(&self) -> Duration {
        Duration::minutes(i64::from(self.utc_offset_minutes))
    }

    /// Day bucket containing the given instant.
    #[must_use]
    pub fn day_bounds(&self, instant: DateTime<Utc>) -> DayBounds {
        let local_date = (instant + self.offset()).date_naive();
        self.day_bounds_for_date(local_date)
    }

    /// Day bucket for an organizational calendar date.
    #[must_use]
    pub fn day_bounds_for_date(&self, date: NaiveDate) -> DayBounds {
        let local_midnight = date.and_time(NaiveTime::MIN);
        let start = Utc.from_utc_datetime(&(local_midnight - self.offset()));
        DayBounds {
            work_date: date,
            start,
            end: start + Duration::days(1),
        }
    }

    /// The organizational calendar date containing the given instant.
    #[must_use]
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        (instant + self.offset()).date_naive()
    }

    /// Weekday of an organizational calendar date.
    #[must_use]
    pub fn weekday(&self, date: NaiveDate) -> Weekday {
        use chrono::Datelike;
        date.weekday()
    }

    /// Minutes elapsed from the bucket's day start to the instant. Negative
    /// when the instant precedes the bucket.
    #[must_use]
    pub fn minutes_into_day(bounds: &DayBounds, instant: DateTime<Utc>) -> i64 {
        (instant - bounds.start).num_minutes()
    }

    /// The instant at a minute offset from the bucket's day start. Offsets
    /// past 1439 land on the following calendar day (midnight-spanning
    /// schedule arithmetic).
    #[must_use]
    pub fn instant_at_minutes(bounds: &DayBounds, minutes: i64) -> DateTime<Utc> {
        bounds.start + Duration::minutes(minutes)
    }
}

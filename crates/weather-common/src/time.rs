//! Time handling for forecast batches and cache windows.
//!
//! Everything here runs in the forecast service's local time (KST, UTC+9,
//! no daylight saving), since batch publication and forecast slots are
//! expressed in that zone.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Offset of Korea Standard Time from UTC in seconds.
pub const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Korea Standard Time.
pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(KST_OFFSET_SECS).expect("UTC+9 is a valid offset")
}

/// Source of "now". Injected so resolutions can be replayed at a fixed instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in KST.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&kst())
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl FixedClock {
    /// Frozen at the given KST wall time, if it exists.
    pub fn kst(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<Self> {
        let local = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)?;
        local.and_local_timezone(kst()).single().map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// An hour-aligned window used to partition cache entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    start: DateTime<FixedOffset>,
}

impl TimeWindow {
    /// The window containing `now`.
    pub fn containing(now: DateTime<FixedOffset>) -> Self {
        let start = now
            - Duration::minutes(i64::from(now.minute()))
            - Duration::seconds(i64::from(now.second()))
            - Duration::nanoseconds(i64::from(now.nanosecond()));
        Self { start }
    }

    /// Same hour, one calendar day earlier.
    pub fn previous_day(&self) -> Self {
        Self {
            start: self.start - Duration::days(1),
        }
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    /// Cache key fragment, e.g. `2024-05-14_13`.
    pub fn cache_fragment(&self) -> String {
        self.start.format("%Y-%m-%d_%H").to_string()
    }

    /// Forecast date this window targets, `yyyyMMdd`.
    pub fn forecast_date(&self) -> String {
        self.start.format("%Y%m%d").to_string()
    }

    /// Forecast slot this window targets, `HH00`.
    pub fn forecast_time(&self) -> String {
        self.start.format("%H00").to_string()
    }

    /// Latest upstream batch that covers this window.
    pub fn batch(&self) -> BaseDateTime {
        BaseDateTime::latest_at(self.start)
    }

    /// Time left until the window closes, rounded up to whole minutes.
    pub fn remaining(&self, now: DateTime<FixedOffset>) -> std::time::Duration {
        let minutes = 60 - u64::from(now.minute()).min(59);
        std::time::Duration::from_secs(minutes * 60)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_fragment())
    }
}

/// Publication timestamp of an upstream forecast batch.
///
/// Batches are issued every three hours at 02, 05, 08, 11, 14, 17, 20 and 23.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseDateTime {
    pub date: NaiveDate,
    pub hour: u32,
}

impl BaseDateTime {
    /// Latest batch published no later than the hour of `now`.
    pub fn latest_at(now: DateTime<FixedOffset>) -> Self {
        let hour = now.hour();
        if hour <= 2 {
            return Self {
                date: (now - Duration::days(1)).date_naive(),
                hour: 23,
            };
        }

        Self {
            date: now.date_naive(),
            hour: hour - hour % 3 - 1,
        }
    }

    /// `base_date` query parameter (`yyyyMMdd`).
    pub fn base_date(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }

    /// `base_time` query parameter (`HH00`).
    pub fn base_time(&self) -> String {
        format!("{:02}00", self.hour)
    }
}

impl fmt::Display for BaseDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.base_date(), self.base_time())
    }
}

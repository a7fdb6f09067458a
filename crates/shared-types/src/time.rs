//! # Interval and Day Arithmetic
//!
//! Exposure Notification time is counted in 10-minute intervals since the Unix
//! epoch. Observation days are counted in the caller's local time zone, with the
//! offset applied once when a day is computed.

use std::fmt;

use chrono::{Local, Offset};
use serde::{Deserialize, Serialize};

/// Length of one rolling interval in seconds.
pub const INTERVAL_SECONDS: i64 = 600;

/// Nominal number of intervals a diagnosis key is valid for (24 hours).
pub const STANDARD_ROLLING_PERIOD: u32 = 144;

/// Seconds in one day.
pub const SECONDS_PER_DAY: i64 = 24 * 3600;

/// Number of 10-minute intervals since the Unix epoch (ENIN).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct IntervalNumber(pub u32);

impl IntervalNumber {
    /// Interval containing the given Unix timestamp (UTC).
    ///
    /// Timestamps before the epoch clamp to interval 0.
    pub fn from_timestamp(timestamp: i64) -> Self {
        let interval = timestamp.max(0) / INTERVAL_SECONDS;
        Self(u32::try_from(interval).unwrap_or(u32::MAX))
    }

    /// Unix timestamp at which this interval starts.
    pub fn start_timestamp(self) -> i64 {
        i64::from(self.0) * INTERVAL_SECONDS
    }

    /// UTC day this interval falls into.
    pub fn day(self) -> DaySinceEpoch {
        DaySinceEpoch(i64::from(self.0 / STANDARD_ROLLING_PERIOD))
    }
}

impl fmt::Display for IntervalNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Offset of the caller's local time zone, in seconds east of UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct TimeZoneOffset(pub i32);

impl TimeZoneOffset {
    pub const UTC: Self = Self(0);

    /// Read the host's current local offset.
    pub fn local() -> Self {
        Self(Local::now().offset().fix().local_minus_utc())
    }

    /// Offset in seconds.
    pub fn seconds(self) -> i64 {
        i64::from(self.0)
    }

    /// Shift a UTC timestamp into local time.
    pub fn to_local(self, timestamp: i64) -> i64 {
        timestamp + self.seconds()
    }
}

/// Days since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct DaySinceEpoch(pub i64);

impl DaySinceEpoch {
    /// Local day of a UTC timestamp.
    pub fn from_timestamp(timestamp: i64, offset: TimeZoneOffset) -> Self {
        Self(offset.to_local(timestamp).div_euclid(SECONDS_PER_DAY))
    }

    /// First interval number of this day, treating the day as a UTC day.
    pub fn first_interval(self) -> IntervalNumber {
        let interval = (self.0.max(0) * i64::from(STANDARD_ROLLING_PERIOD)).min(i64::from(u32::MAX));
        IntervalNumber(interval as u32)
    }

    /// Day `n` days earlier.
    pub fn minus_days(self, n: i64) -> Self {
        Self(self.0 - n)
    }
}

impl fmt::Display for DaySinceEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Seconds since local midnight for a UTC timestamp.
pub fn seconds_of_day(timestamp: i64, offset: TimeZoneOffset) -> i64 {
    offset.to_local(timestamp).rem_euclid(SECONDS_PER_DAY)
}

//! Size- and calendar-based rotation policy.

use std::{fmt, str::FromStr};

use chrono::{
    DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike,
};

use crate::error::ConfigError;

/// glog's default size threshold: 1800 MiB.
pub const DEFAULT_MAX_SIZE: u64 = 1024 * 1024 * 1800;

/// Calendar period after which a sink is rotated regardless of its size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Interval {
    /// Only the size threshold triggers rotation.
    #[default]
    None,
    Minute,
    Hour,
    Day,
    Month,
}

impl Interval {
    pub const fn name(self) -> &'static str {
        match self {
            Interval::None => "none",
            Interval::Minute => "minute",
            Interval::Hour => "hour",
            Interval::Day => "day",
            Interval::Month => "month",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Interval {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "none" => Ok(Interval::None),
            "minute" => Ok(Interval::Minute),
            "hour" => Ok(Interval::Hour),
            "day" => Ok(Interval::Day),
            "month" => Ok(Interval::Month),
            other => Err(ConfigError::UnknownInterval(other.to_string())),
        }
    }
}

/// When a sink must be replaced by a fresh one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RotationPolicy {
    /// A sink that already holds data is rotated before a write that would
    /// take it past this many bytes.
    pub max_size: u64,
    pub interval: Interval,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            interval: Interval::None,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub const fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    #[must_use]
    pub const fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    /// Whether appending `len` bytes to a sink holding `written` bytes would
    /// overflow it. An empty sink always takes the write, however large.
    pub const fn exceeds_size(&self, written: u64, len: u64) -> bool {
        written > 0 && written.saturating_add(len) > self.max_size
    }
}

/// The first instant of the interval following the one containing `t`.
///
/// Returns `None` for [`Interval::None`] or when the boundary is not
/// representable.
pub fn start_of_next_interval(t: NaiveDateTime, interval: Interval) -> Option<NaiveDateTime> {
    let midnight = |date: NaiveDate| date.and_hms_opt(0, 0, 0);
    match interval {
        Interval::None => None,
        Interval::Minute => {
            let start = t.date().and_hms_opt(t.hour(), t.minute(), 0)?;
            start.checked_add_signed(Duration::minutes(1))
        }
        Interval::Hour => {
            let start = t.date().and_hms_opt(t.hour(), 0, 0)?;
            start.checked_add_signed(Duration::hours(1))
        }
        Interval::Day => midnight(t.date().succ_opt()?),
        Interval::Month => {
            let (year, month) = if t.month() == 12 {
                (t.year().checked_add(1)?, 1)
            } else {
                (t.year(), t.month() + 1)
            };
            midnight(NaiveDate::from_ymd_opt(year, month, 1)?)
        }
    }
}

/// [`start_of_next_interval`] in the local time zone.
///
/// A boundary that falls into a DST gap resolves to the first valid local
/// instant after the gap; an ambiguous one to the earlier instant.
pub fn next_boundary(now: DateTime<Local>, interval: Interval) -> Option<DateTime<Local>> {
    let mut boundary = start_of_next_interval(now.naive_local(), interval)?;
    // DST gaps are at most a few hours wide.
    for _ in 0..(4 * 60) {
        match Local.from_local_datetime(&boundary) {
            LocalResult::Single(at) | LocalResult::Ambiguous(at, _) => return Some(at),
            LocalResult::None => boundary = boundary.checked_add_signed(Duration::minutes(1))?,
        }
    }
    None
}

//! Wall-clock access and user time offsets.
//!
//! Offsets come in two shapes:
//! - relative minutes: `"30"`, `"-15"`
//! - an absolute clock time for today: `"08:45"`
//!
//! Both are resolved against [`Clock::timestamp_now`], which is truncated to
//! the minute so stored and displayed times never disagree by seconds.

use chrono::{DateTime, Local, LocalResult, NaiveTime, TimeZone};
use thiserror::Error;

use crate::event::Timestamp;
use crate::log::DayKey;

/// Errors from parsing a time offset.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OffsetError {
    /// A clock time did not have exactly one `:`.
    #[error("invalid time offset: {0}")]
    Malformed(String),

    /// A clock time component was not a two-digit number.
    #[error("invalid time {0}, use numbers")]
    NotNumeric(String),

    /// A relative offset was not a whole number of minutes.
    #[error("invalid offset value {0}, use full minutes")]
    NotMinutes(String),

    /// Hour or minute outside the valid range.
    #[error("invalid time {0}, use valid h:min values")]
    OutOfRange(String),

    /// The clock time falls into a daylight saving gap today.
    #[error("time {0} does not exist today")]
    NonexistentLocalTime(String),
}

/// Source of the current local time.
pub trait Clock {
    /// The current instant in local time.
    fn now(&self) -> DateTime<Local>;

    /// The current time as epoch seconds, rounded down to the minute.
    fn timestamp_now(&self) -> Timestamp {
        minute_floor(&self.now())
    }

    /// The local calendar date of [`Clock::now`].
    fn today(&self) -> DayKey {
        DayKey::from(self.now().date_naive())
    }
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Local>);

impl FixedClock {
    pub const fn new(now: DateTime<Local>) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Resolves a user-supplied offset into signed seconds relative to
/// [`Clock::timestamp_now`].
///
/// Numbers must round-trip through two-digit zero-padded formatting, so
/// `"09:05"` and `"30"` are accepted while `"9:5"` and `"5"` are not.
pub fn resolve_offset<C: Clock + ?Sized>(clock: &C, raw: Option<&str>) -> Result<i64, OffsetError> {
    offset_from(&clock.now(), raw)
}

/// `timestamp_now()` shifted by the resolved offset.
///
/// The clock is read once; the offset and the base timestamp both derive
/// from that instant.
pub fn effective_timestamp<C: Clock + ?Sized>(
    clock: &C,
    raw: Option<&str>,
) -> Result<Timestamp, OffsetError> {
    let now = clock.now();
    let offset = offset_from(&now, raw)?;
    let timestamp = minute_floor(&now)
        .checked_add(offset)
        .ok_or_else(|| OffsetError::OutOfRange(raw.unwrap_or_default().to_string()))?;
    tracing::debug!(?raw, offset, timestamp, "resolved offset");
    Ok(timestamp)
}

fn minute_floor(now: &DateTime<Local>) -> Timestamp {
    let seconds = now.timestamp();
    seconds - seconds.rem_euclid(60)
}

fn offset_from(now: &DateTime<Local>, raw: Option<&str>) -> Result<i64, OffsetError> {
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        return Ok(0);
    };

    if raw.contains(':') {
        return resolve_clock_time(now, raw);
    }

    let minutes = parse_padded(raw).ok_or_else(|| OffsetError::NotMinutes(raw.to_string()))?;
    minutes
        .checked_mul(60)
        .ok_or_else(|| OffsetError::OutOfRange(raw.to_string()))
}

fn resolve_clock_time(now: &DateTime<Local>, raw: &str) -> Result<i64, OffsetError> {
    let Some((hour, minute)) = raw.split_once(':') else {
        return Err(OffsetError::Malformed(raw.to_string()));
    };
    if minute.contains(':') {
        return Err(OffsetError::Malformed(raw.to_string()));
    }

    let (Some(hour), Some(minute)) = (parse_padded(hour), parse_padded(minute)) else {
        return Err(OffsetError::NotNumeric(raw.to_string()));
    };
    if !(0..=23).contains(&hour) || !(0..=59).contains(&minute) {
        return Err(OffsetError::OutOfRange(raw.to_string()));
    }

    let time = u32::try_from(hour)
        .ok()
        .zip(u32::try_from(minute).ok())
        .and_then(|(hour, minute)| NaiveTime::from_hms_opt(hour, minute, 0))
        .ok_or_else(|| OffsetError::OutOfRange(raw.to_string()))?;

    let given = now.date_naive().and_time(time);
    let given = match Local.from_local_datetime(&given) {
        // Ambiguous (DST fall-back): use the earlier time
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => return Err(OffsetError::NonexistentLocalTime(raw.to_string())),
    };

    Ok(given.timestamp() - minute_floor(now))
}

/// Parses an integer that formats back to exactly `s` with `{:02}`.
fn parse_padded(s: &str) -> Option<i64> {
    let value: i64 = s.parse().ok()?;
    (format!("{value:02}") == s).then_some(value)
}

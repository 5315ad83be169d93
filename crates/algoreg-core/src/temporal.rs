//! # Temporal Types: UTC Timestamps and Clocks
//!
//! `Timestamp` is a UTC instant truncated to seconds and rendered as
//! `YYYY-MM-DDTHH:MM:SSZ`. Certification dates, mint dates and
//! contribution times all use it.
//!
//! Registries never call the wall clock directly. They read time through
//! a [`Clock`], so a test can pin or step time and a replay can reproduce
//! the exact timestamps of an earlier run.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimestampError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`]: current UTC time, truncated.
/// - [`Timestamp::from_utc()`]: from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`]: from an RFC 3339 string, rejecting non-UTC offsets.
/// - [`Timestamp::from_epoch_secs()`]: from Unix seconds.
///
/// Serialized as its [`Timestamp::to_iso8601()`] string and deserialized
/// through [`Timestamp::parse()`], so a snapshot obeys the same Z-only,
/// whole-second rule as any other input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 string.
    ///
    /// Only the `Z` suffix is accepted; explicit offsets, including
    /// `+00:00`, are rejected so that every stored timestamp renders the
    /// same way it was read.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        if !s.ends_with('Z') {
            return Err(TimestampError {
                input: s.to_string(),
                reason: "must use Z suffix (UTC only)".to_string(),
            });
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| TimestampError {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, TimestampError> {
        let dt = DateTime::from_timestamp(secs, 0).ok_or_else(|| TimestampError {
            input: secs.to_string(),
            reason: "out of range for a UTC datetime".to_string(),
        })?;
        Ok(Self(dt))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// This timestamp moved forward by `secs` seconds. Out-of-range results
    /// leave the timestamp unchanged.
    pub fn plus_secs(&self, secs: i64) -> Self {
        match chrono::Duration::try_seconds(secs).and_then(|d| self.0.checked_add_signed(d)) {
            Some(dt) => Self(dt),
            None => *self,
        }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl TryFrom<String> for Timestamp {
    type Error = TimestampError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.to_iso8601()
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

// ─── Clocks ──────────────────────────────────────────────────────────

/// The time source a registry stamps transitions with.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// Reads the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
///
/// Share one between registries with `Arc<ManualClock>`.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<Timestamp>,
}

impl ManualClock {
    /// A clock frozen at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Jump to `ts`.
    pub fn set(&self, ts: Timestamp) {
        let mut guard = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *guard = ts;
    }

    /// Step forward by `secs` seconds.
    pub fn advance_secs(&self, secs: i64) {
        let mut guard = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *guard = guard.plus_secs(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 15, 12, 30, 45).unwrap();
        let ts = Timestamp::from_utc(dt.with_nanosecond(123_456_789).unwrap());
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:30:45Z");
    }

    #[test]
    fn test_parse_z_suffix_accepted() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        assert_eq!(ts.to_string(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn test_parse_offsets_rejected() {
        assert!(Timestamp::parse("2026-01-15T12:00:00+00:00").is_err());
        assert!(Timestamp::parse("2026-01-15T17:00:00+05:00").is_err());
        assert!(Timestamp::parse("not-a-date").is_err());
    }

    #[test]
    fn test_epoch_roundtrip() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        assert_eq!(Timestamp::from_epoch_secs(ts.epoch_secs()).unwrap(), ts);
    }

    #[test]
    fn test_serde_roundtrip() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
        assert_eq!(json, "\"2026-01-15T12:00:00Z\"");
    }

    #[test]
    fn test_deserialize_rejects_offsets() {
        assert!(serde_json::from_str::<Timestamp>("\"2026-01-15T17:00:00+05:00\"").is_err());
        assert!(serde_json::from_str::<Timestamp>("\"2026-01-15T12:00:00+00:00\"").is_err());
        assert!(serde_json::from_str::<Timestamp>("1768478400").is_err());
    }

    #[test]
    fn test_deserialize_truncates_subseconds() {
        let ts: Timestamp = serde_json::from_str("\"2026-01-15T12:00:00.750Z\"").unwrap();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"2026-01-15T12:00:00Z\"");
    }

    #[test]
    fn test_manual_clock_is_frozen_until_moved() {
        let start = Timestamp::parse("2026-03-01T00:00:00Z").unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start);

        clock.advance_secs(90);
        assert_eq!(clock.now().to_iso8601(), "2026-03-01T00:01:30Z");

        let later = Timestamp::parse("2027-01-01T00:00:00Z").unwrap();
        clock.set(later);
        assert_eq!(clock.now(), later);
    }

    #[test]
    fn test_shared_clock_through_arc() {
        let start = Timestamp::parse("2026-03-01T00:00:00Z").unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let other = Arc::clone(&clock);
        clock.advance_secs(5);
        assert_eq!(other.now(), start.plus_secs(5));
    }
}

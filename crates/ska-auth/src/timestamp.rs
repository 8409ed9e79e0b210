//! Expiry timestamps.
//!
//! Signatures expire at a Unix timestamp carried as text on the wire, e.g.
//! `1628717009.0`. The text itself is part of the signed base string, so
//! [`ValidUntil`] keeps it verbatim next to the parsed instant.
//!
//! Conversion helpers come in two flavours: `try_*` functions return a
//! [`SkaResult`] and the plain ones swallow the error into an `Option`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ska_core::{SkaError, SkaResult};

/// Human readable timestamp format used by [`datetime_to_timestamp`].
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Expiry instant of a signature.
///
/// # Examples
///
/// ```
/// use ska_auth::timestamp::ValidUntil;
///
/// let valid_until: ValidUntil = "1628717009.0".parse().unwrap();
/// assert_eq!(valid_until.as_str(), "1628717009.0");
/// assert_eq!(valid_until.datetime().timestamp(), 1_628_717_009);
/// assert!(valid_until.is_expired());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidUntil {
    raw: String,
    at: DateTime<Utc>,
}

impl ValidUntil {
    /// Parse a Unix timestamp, keeping the given text as the wire form.
    pub fn parse(raw: impl Into<String>) -> SkaResult<Self> {
        let raw = raw.into();
        let at = try_unix_timestamp_to_date(&raw)?;
        Ok(Self { raw, at })
    }

    /// Build from a float Unix timestamp, rendered like `1628717009.0`.
    pub fn from_unix_timestamp(secs: f64) -> SkaResult<Self> {
        let raw = format_unix_timestamp(secs);
        let at = date_from_secs(secs).ok_or_else(|| {
            SkaError::invalid_timestamp(raw.clone(), "out of the representable range")
        })?;
        Ok(Self { raw, at })
    }

    /// Build from an instant, dropping sub-second precision.
    #[must_use]
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let secs = dt.timestamp();
        let at = DateTime::from_timestamp(secs, 0).unwrap_or(dt);
        Self {
            raw: format_unix_timestamp(datetime_to_unix_timestamp(&at)),
            at,
        }
    }

    /// `lifetime` seconds from now.
    pub fn after(lifetime: u64) -> SkaResult<Self> {
        Self::after_from(Utc::now(), lifetime)
    }

    /// `lifetime` seconds from `now`.
    pub fn after_from(now: DateTime<Utc>, lifetime: u64) -> SkaResult<Self> {
        let at = i64::try_from(lifetime)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|delta| now.checked_add_signed(delta))
            .ok_or(SkaError::InvalidLifetime(lifetime))?;
        Ok(Self::from_datetime(at))
    }

    /// The wire form, exactly as it enters the base string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed instant.
    #[must_use]
    pub fn datetime(&self) -> DateTime<Utc> {
        self.at
    }

    /// Whether the instant is not strictly after the current time.
    ///
    /// Reads the clock on every call.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Whether the instant is not strictly after `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.at <= now
    }
}

impl fmt::Display for ValidUntil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ValidUntil {
    type Err = SkaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ValidUntil {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ValidUntil {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

/// Render a float Unix timestamp, keeping a `.0` on whole seconds.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn format_unix_timestamp(secs: f64) -> String {
    if secs.fract() == 0.0 && secs.abs() < 1e16 {
        format!("{secs:.1}")
    } else {
        format!("{secs}")
    }
}

/// Parse a Unix timestamp given as text (anything parsable to a float).
///
/// # Errors
///
/// Returns [`SkaError::InvalidTimestamp`] if the text is not a finite number
/// or lies outside the representable date range.
pub fn try_unix_timestamp_to_date(timestamp: &str) -> SkaResult<DateTime<Utc>> {
    let secs: f64 = timestamp
        .trim()
        .parse()
        .map_err(|_| SkaError::invalid_timestamp(timestamp, "not a number"))?;
    if !secs.is_finite() {
        return Err(SkaError::invalid_timestamp(timestamp, "not a finite number"));
    }
    date_from_secs(secs)
        .ok_or_else(|| SkaError::invalid_timestamp(timestamp, "out of the representable range"))
}

/// Lenient [`try_unix_timestamp_to_date`].
#[must_use]
pub fn unix_timestamp_to_date(timestamp: &str) -> Option<DateTime<Utc>> {
    try_unix_timestamp_to_date(timestamp).ok()
}

/// Parse a human readable timestamp in [`TIMESTAMP_FORMAT`], read as UTC.
///
/// # Errors
///
/// Returns [`SkaError::InvalidTimestamp`] if the text does not match the format.
pub fn try_timestamp_to_date(timestamp: &str) -> SkaResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| SkaError::invalid_timestamp(timestamp, e.to_string()))
}

/// Lenient [`try_timestamp_to_date`].
#[must_use]
pub fn timestamp_to_date(timestamp: &str) -> Option<DateTime<Utc>> {
    try_timestamp_to_date(timestamp).ok()
}

/// Format an instant in [`TIMESTAMP_FORMAT`].
#[must_use]
pub fn datetime_to_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Whole-second Unix timestamp of an instant.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn datetime_to_unix_timestamp(dt: &DateTime<Utc>) -> f64 {
    dt.timestamp() as f64
}

/// Convert float seconds to an instant; `None` when out of range.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn date_from_secs(secs: f64) -> Option<DateTime<Utc>> {
    // Beyond ~1e15 seconds chrono has no representation anyway.
    if !secs.is_finite() || secs.abs() >= 1e15 {
        return None;
    }
    let whole = secs.floor();
    let nanos = (((secs - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(whole as i64, nanos)
}

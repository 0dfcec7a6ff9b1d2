//! # Timestamps
//!
//! UTC timestamps truncated to whole seconds. Carrier filenames carry the
//! Unix-seconds form (`254-12-1700000000.svg`).

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScoutError;

/// A UTC timestamp with seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time, truncated.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt.with_nanosecond(0).unwrap_or(dt))
    }

    /// From Unix epoch seconds.
    ///
    /// # Errors
    ///
    /// Returns `ScoutError::Serialization` if the value is out of range.
    pub fn from_unix_seconds(secs: i64) -> Result<Self, ScoutError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| ScoutError::Serialization(format!("invalid Unix timestamp: {secs}")))
    }

    /// Unix epoch seconds.
    pub fn unix_seconds(&self) -> i64 {
        self.0.timestamp()
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// ISO8601 with `Z` suffix.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

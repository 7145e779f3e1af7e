//! Identity timestamps
//!
//! Every entity carries a changelog date that orders its generated artifacts
//! across runs. Dates are 14-digit UTC `YYYYMMDDHHMMSS` strings, so their
//! lexical order is their chronological order.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const FORMAT: &str = "%Y%m%d%H%M%S";

/// A stable per-entity identity timestamp
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangelogDate(String);

impl ChangelogDate {
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.format(FORMAT).to_string())
    }

    /// Date for the entity declared at `index`, counted from `base`
    pub fn with_increment(base: DateTime<Utc>, index: usize) -> Self {
        let offset = i64::try_from(index).unwrap_or(i64::MAX);
        Self::from_datetime(base + Duration::seconds(offset))
    }

    /// Parsed instant, when the stored value is a well-formed date
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(&self.0, FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChangelogDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ChangelogDate {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ChangelogDate {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Start of the fresh dates of one run.
///
/// Never earlier than one second past the latest known date, so a new entity
/// always sorts after everything generated before it.
pub fn fresh_base(now: DateTime<Utc>, latest_prior: Option<&ChangelogDate>) -> DateTime<Utc> {
    latest_prior
        .and_then(ChangelogDate::to_datetime)
        .map(|latest| latest + Duration::seconds(1))
        .filter(|after_latest| *after_latest > now)
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_format() {
        let date = ChangelogDate::from_datetime(at(2026, 10, 16, 9, 5, 3));
        assert_eq!(date.as_str(), "20261016090503");
        assert_eq!(date.to_datetime(), Some(at(2026, 10, 16, 9, 5, 3)));
    }

    #[test]
    fn test_increment_is_strictly_increasing() {
        let base = at(2026, 12, 31, 23, 59, 58);
        let dates: Vec<_> = (0..4).map(|i| ChangelogDate::with_increment(base, i)).collect();
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(dates[3].as_str(), "20270101000001");
    }

    #[test]
    fn test_fresh_base_after_future_prior() {
        let now = at(2026, 1, 1, 0, 0, 0);
        let prior = ChangelogDate::from("20300101000000");
        assert_eq!(fresh_base(now, Some(&prior)), at(2030, 1, 1, 0, 0, 1));
    }

    #[test]
    fn test_fresh_base_keeps_now_for_older_prior() {
        let now = at(2026, 1, 1, 0, 0, 0);
        let prior = ChangelogDate::from("20200101000000");
        assert_eq!(fresh_base(now, Some(&prior)), now);
        assert_eq!(fresh_base(now, None), now);
    }

    #[test]
    fn test_malformed_prior_is_ignored() {
        let now = at(2026, 1, 1, 0, 0, 0);
        let prior = ChangelogDate::from("not-a-date");
        assert_eq!(prior.to_datetime(), None);
        assert_eq!(fresh_base(now, Some(&prior)), now);
    }
}

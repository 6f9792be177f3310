//! Batch (ordering window) computation.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// State of the ordering window at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Batch gating is switched off, or the window is incomplete.
    Inactive,
    /// The window has not started yet.
    Upcoming,
    /// Checkout is open.
    Open,
    /// The window has ended.
    Closed,
}

impl BatchStatus {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inactive => write!(f, "inactive"),
            Self::Upcoming => write!(f, "upcoming"),
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// An admin-configured ordering window.
///
/// Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchWindow {
    pub active: bool,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl BatchWindow {
    /// Display status of the window at `now`.
    ///
    /// An active window without both ends reports `Inactive`.
    #[must_use]
    pub fn status_at(&self, now: DateTime<Utc>) -> BatchStatus {
        match (self.active, self.start, self.end) {
            (true, Some(start), Some(end)) => {
                if now < start {
                    BatchStatus::Upcoming
                } else if now <= end {
                    BatchStatus::Open
                } else {
                    BatchStatus::Closed
                }
            }
            _ => BatchStatus::Inactive,
        }
    }

    /// Whether checkout is allowed at `now`.
    ///
    /// When gating is off, checkout is always allowed. When it is on, an
    /// incomplete window rejects every checkout. This differs from
    /// [`Self::status_at`], which reports such a window as `Inactive`.
    #[must_use]
    pub fn permits_checkout_at(&self, now: DateTime<Utc>) -> bool {
        if !self.active {
            return true;
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= now && now <= end,
            _ => false,
        }
    }
}

/// Parse a stored batch instant.
///
/// Accepts RFC 3339 (with offset), and the offset-less forms produced by
/// `datetime-local` inputs (`2025-01-01T08:00`, optionally with seconds) or a
/// bare date. Offset-less values are read as wall-clock time at `offset`.
/// Blank or unparseable input yields `None`.
#[must_use]
pub fn parse_instant(raw: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, h, m, 0).unwrap()
    }

    fn window() -> BatchWindow {
        BatchWindow {
            active: true,
            start: Some(at(8, 0)),
            end: Some(at(17, 0)),
        }
    }

    #[test]
    fn test_status_follows_window() {
        let w = window();
        assert_eq!(w.status_at(at(7, 59)), BatchStatus::Upcoming);
        assert_eq!(w.status_at(at(8, 0)), BatchStatus::Open);
        assert_eq!(w.status_at(at(12, 0)), BatchStatus::Open);
        assert_eq!(w.status_at(at(17, 0)), BatchStatus::Open);
        assert_eq!(w.status_at(at(17, 1)), BatchStatus::Closed);
    }

    #[test]
    fn test_inactive_ignores_bounds() {
        let w = BatchWindow {
            active: false,
            ..window()
        };
        for now in [at(0, 0), at(12, 0), at(23, 0)] {
            assert_eq!(w.status_at(now), BatchStatus::Inactive);
            assert!(w.permits_checkout_at(now));
        }
    }

    #[test]
    fn test_active_incomplete_window() {
        let w = BatchWindow {
            end: None,
            ..window()
        };
        assert_eq!(w.status_at(at(12, 0)), BatchStatus::Inactive);
        assert!(!w.permits_checkout_at(at(12, 0)));
    }

    #[test]
    fn test_checkout_gate_matches_open_status() {
        let w = window();
        for now in [at(7, 0), at(8, 0), at(16, 59), at(17, 0), at(18, 0)] {
            assert_eq!(w.permits_checkout_at(now), w.status_at(now).is_open());
        }
    }

    #[test]
    fn test_parse_instant_forms() {
        let wib = FixedOffset::east_opt(7 * 3600).unwrap();
        assert_eq!(parse_instant("2025-01-01T15:00", wib), Some(at(8, 0)));
        assert_eq!(parse_instant("2025-01-01T15:00:00", wib), Some(at(8, 0)));
        assert_eq!(parse_instant("2025-01-01 15:00", wib), Some(at(8, 0)));
        assert_eq!(
            parse_instant("2025-01-01T08:00:00Z", wib),
            Some(at(8, 0))
        );
        assert_eq!(
            parse_instant("2025-01-01T10:00:00+02:00", wib),
            Some(at(8, 0))
        );
        assert_eq!(
            parse_instant("2025-01-02", wib),
            Some(at(17, 0))
        );
        assert_eq!(parse_instant("", wib), None);
        assert_eq!(parse_instant("tomorrow", wib), None);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&BatchStatus::Upcoming).unwrap(),
            "\"upcoming\""
        );
    }
}

//! Expiry date parsing and urgency classification.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::SOON_THRESHOLD_DAYS;

/// Parse a `YYYY-MM-DD` string into a calendar date.
///
/// The string is split into its year, month and day components and the date
/// is rebuilt from them. No timestamp or time zone is ever involved, so the
/// result cannot shift by a day depending on the host's UTC offset.
pub fn parse_expiry_date(value: &str) -> Option<NaiveDate> {
    let mut parts = value.trim().split('-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let day = parts.next()?.parse::<u32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn format_expiry_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Urgency of a dated item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Urgency {
    Expired,
    Soon,
    Ok,
}

impl Urgency {
    pub fn from_days_remaining(days_remaining: i64) -> Self {
        if days_remaining < 0 {
            Urgency::Expired
        } else if days_remaining <= SOON_THRESHOLD_DAYS {
            Urgency::Soon
        } else {
            Urgency::Ok
        }
    }

    pub fn label(&self, days_remaining: i64) -> String {
        match self {
            Urgency::Expired => "⚠️ EXPIRED".to_string(),
            Urgency::Soon => "⚠️ EAT SOON".to_string(),
            Urgency::Ok => format!("({} days left)", days_remaining),
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Urgency::Expired => write!(f, "EXPIRED"),
            Urgency::Soon => write!(f, "SOON"),
            Urgency::Ok => write!(f, "OK"),
        }
    }
}

/// Classification of an item's expiry relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    Known {
        /// Negative when the item expired that many days ago
        days_remaining: i64,
        urgency: Urgency,
    },
    /// No usable expiry date; rendered neutrally
    Unknown,
}

impl ExpiryStatus {
    /// Classify an expiry date against `today` (a calendar date, no time of day).
    pub fn classify(expiry_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        match expiry_date {
            Some(expiry) => {
                let days_remaining = (expiry - today).num_days();
                ExpiryStatus::Known {
                    days_remaining,
                    urgency: Urgency::from_days_remaining(days_remaining),
                }
            }
            None => ExpiryStatus::Unknown,
        }
    }

    pub fn urgency(&self) -> Option<Urgency> {
        match self {
            ExpiryStatus::Known { urgency, .. } => Some(*urgency),
            ExpiryStatus::Unknown => None,
        }
    }

    pub fn days_remaining(&self) -> Option<i64> {
        match self {
            ExpiryStatus::Known { days_remaining, .. } => Some(*days_remaining),
            ExpiryStatus::Unknown => None,
        }
    }

    pub fn label(&self) -> Option<String> {
        match self {
            ExpiryStatus::Known {
                days_remaining,
                urgency,
            } => Some(urgency.label(*days_remaining)),
            ExpiryStatus::Unknown => None,
        }
    }

    /// Lowercase presentation key: expired, soon, ok or unknown
    pub fn key(&self) -> &'static str {
        match self.urgency() {
            Some(Urgency::Expired) => "expired",
            Some(Urgency::Soon) => "soon",
            Some(Urgency::Ok) => "ok",
            None => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_expiry_date() {
        assert_eq!(parse_expiry_date("2024-06-10"), Some(date(2024, 6, 10)));
        assert_eq!(parse_expiry_date("2024-6-9"), Some(date(2024, 6, 9)));
        assert_eq!(parse_expiry_date(" 2024-06-10 "), Some(date(2024, 6, 10)));
        assert_eq!(parse_expiry_date("2024-02-30"), None);
        assert_eq!(parse_expiry_date("2024-06"), None);
        assert_eq!(parse_expiry_date("2024-06-10-01"), None);
        assert_eq!(parse_expiry_date("2024-06-10T00:00:00Z"), None);
        assert_eq!(parse_expiry_date(""), None);
    }

    #[test]
    fn test_parse_keeps_calendar_day() {
        // Midnight-ish dates must never roll back to the previous day
        let parsed = parse_expiry_date("2024-01-01").unwrap();
        assert_eq!(format_expiry_date(parsed), "2024-01-01");
    }

    #[test]
    fn test_scenario_today_2024_06_10() {
        let today = date(2024, 6, 10);

        let a = ExpiryStatus::classify(Some(date(2024, 6, 9)), today);
        assert_eq!(a.urgency(), Some(Urgency::Expired));
        assert_eq!(a.days_remaining(), Some(-1));
        assert_eq!(a.label().as_deref(), Some("⚠️ EXPIRED"));

        let b = ExpiryStatus::classify(Some(date(2024, 6, 12)), today);
        assert_eq!(b.urgency(), Some(Urgency::Soon));
        assert_eq!(b.days_remaining(), Some(2));
        assert_eq!(b.label().as_deref(), Some("⚠️ EAT SOON"));

        let c = ExpiryStatus::classify(Some(date(2024, 6, 20)), today);
        assert_eq!(c.urgency(), Some(Urgency::Ok));
        assert_eq!(c.days_remaining(), Some(10));
        assert_eq!(c.label().as_deref(), Some("(10 days left)"));
    }

    #[test]
    fn test_classification_boundaries() {
        let today = date(2024, 3, 1);
        for offset in -400..=400 {
            let status = ExpiryStatus::classify(Some(today + Duration::days(offset)), today);
            let expected = if offset < 0 {
                Urgency::Expired
            } else if offset <= 3 {
                Urgency::Soon
            } else {
                Urgency::Ok
            };
            assert_eq!(status.urgency(), Some(expected), "offset {}", offset);
            assert_eq!(status.days_remaining(), Some(offset));
        }
    }

    #[test]
    fn test_today_is_soon() {
        let today = date(2024, 6, 10);
        let status = ExpiryStatus::classify(Some(today), today);
        assert_eq!(status.urgency(), Some(Urgency::Soon));
        assert_eq!(status.days_remaining(), Some(0));
    }

    #[test]
    fn test_dst_transition_days_count_as_whole_days() {
        // Spans the March and October DST switches in most northern zones
        let today = date(2024, 3, 29);
        let status = ExpiryStatus::classify(Some(date(2024, 4, 2)), today);
        assert_eq!(status.days_remaining(), Some(4));
        assert_eq!(status.urgency(), Some(Urgency::Ok));

        let today = date(2024, 10, 25);
        let status = ExpiryStatus::classify(Some(date(2024, 10, 28)), today);
        assert_eq!(status.days_remaining(), Some(3));
        assert_eq!(status.urgency(), Some(Urgency::Soon));
    }

    #[test]
    fn test_missing_date_is_unknown() {
        let status = ExpiryStatus::classify(None, date(2024, 6, 10));
        assert_eq!(status, ExpiryStatus::Unknown);
        assert_eq!(status.urgency(), None);
        assert_eq!(status.label(), None);
        assert_eq!(status.key(), "unknown");
    }
}

//! Travel durations stored as `H:MM` strings in the trip dataset

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PlannerError;
use crate::Result;

/// A travel duration in whole minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TravelDuration {
    minutes: u32,
}

impl TravelDuration {
    #[must_use]
    pub const fn from_minutes(minutes: u32) -> Self {
        Self { minutes }
    }

    /// Parse the dataset format `H:MM`.
    ///
    /// Hours may have any number of digits, minutes must be exactly two digits
    /// below 60. Anything else is reported as a data integrity error.
    pub fn parse(text: &str) -> Result<Self> {
        let malformed = || {
            PlannerError::data_integrity(format!(
                "Invalid duration '{text}', expected H:MM with zero-padded minutes"
            ))
        };

        let (hours, minutes) = text.trim().split_once(':').ok_or_else(malformed)?;
        if hours.is_empty()
            || minutes.len() != 2
            || !hours.bytes().all(|b| b.is_ascii_digit())
            || !minutes.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }

        let hours: u32 = hours.parse().map_err(|_| malformed())?;
        let minutes: u32 = minutes.parse().map_err(|_| malformed())?;
        if minutes >= 60 {
            return Err(malformed());
        }

        hours
            .checked_mul(60)
            .and_then(|m| m.checked_add(minutes))
            .map(Self::from_minutes)
            .ok_or_else(malformed)
    }

    #[must_use]
    pub const fn total_minutes(self) -> u32 {
        self.minutes
    }

    #[must_use]
    pub const fn hours(self) -> u32 {
        self.minutes / 60
    }

    /// Minutes past the full hour
    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.minutes % 60
    }

    /// Doubles the total minutes (round trips)
    #[must_use]
    pub const fn doubled(self) -> Self {
        Self::from_minutes(self.minutes.saturating_mul(2))
    }

    /// Dataset style `H:MM`, hours unpadded
    #[must_use]
    pub fn to_compact_string(self) -> String {
        format!("{}:{:02}", self.hours(), self.minutes())
    }
}

/// Display style `HH:MM`
impl fmt::Display for TravelDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours(), self.minutes())
    }
}

/// Double an `H:MM` duration string, returning the compact `H:MM` form.
pub fn double_duration(text: &str) -> Result<String> {
    Ok(TravelDuration::parse(text)?.doubled().to_compact_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0:00", 0)]
    #[case("0:45", 45)]
    #[case("1:30", 90)]
    #[case("03:05", 185)]
    #[case("27:59", 1679)]
    fn test_parse_valid(#[case] input: &str, #[case] expected: u32) {
        assert_eq!(TravelDuration::parse(input).unwrap().total_minutes(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("130")]
    #[case("1:3")]
    #[case("1:300")]
    #[case("a:30")]
    #[case("1:xx")]
    #[case(":30")]
    #[case("1:75")]
    #[case("-1:30")]
    #[case("N/A")]
    fn test_parse_malformed(#[case] input: &str) {
        let err = TravelDuration::parse(input).unwrap_err();
        assert!(matches!(err, PlannerError::DataIntegrity { .. }));
        assert!(err.to_string().contains(input));
    }

    #[test]
    fn test_double_duration() {
        assert_eq!(double_duration("1:30").unwrap(), "3:00");
        assert_eq!(double_duration("0:45").unwrap(), "1:30");
        assert_eq!(double_duration("12:35").unwrap(), "25:10");
        assert!(double_duration("broken").is_err());
    }

    #[test]
    fn test_display_pads_hours() {
        let duration = TravelDuration::from_minutes(185);
        assert_eq!(duration.to_string(), "03:05");
        assert_eq!(duration.to_compact_string(), "3:05");
        assert_eq!(TravelDuration::from_minutes(0).to_string(), "00:00");
        assert_eq!(TravelDuration::from_minutes(1500).to_string(), "25:00");
    }

    #[rstest]
    #[case("0:05")]
    #[case("9:59")]
    #[case("14:00")]
    fn test_parse_format_parse_is_stable(#[case] input: &str) {
        let parsed = TravelDuration::parse(input).unwrap();
        assert_eq!(TravelDuration::parse(&parsed.to_string()).unwrap(), parsed);
        assert_eq!(TravelDuration::parse(&parsed.to_compact_string()).unwrap(), parsed);
    }
}

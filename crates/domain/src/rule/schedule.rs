//! Schedule — a time-of-day window attached to a rule.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

const TIME_FORMAT: &str = "%H:%M";

/// Daily activation window, `HH:MM` bounds in 24-hour format.
///
/// `days` is kept as configured; the controller has no calendar and does
/// not evaluate it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schedule {
    pub start_time: String,
    pub end_time: String,
    pub days: Vec<String>,
}

impl Schedule {
    #[must_use]
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
            days: Vec::new(),
        }
    }

    /// Whether either bound is missing.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.start_time.trim().is_empty() || self.end_time.trim().is_empty()
    }

    /// Parsed `(start, end)` bounds; `None` if blank or malformed.
    #[must_use]
    pub fn window(&self) -> Option<(NaiveTime, NaiveTime)> {
        if self.is_blank() {
            return None;
        }
        let start = NaiveTime::parse_from_str(self.start_time.trim(), TIME_FORMAT).ok()?;
        let end = NaiveTime::parse_from_str(self.end_time.trim(), TIME_FORMAT).ok()?;
        Some((start, end))
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start_time, self.end_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_report_blank_when_a_bound_is_missing() {
        assert!(Schedule::new("", "16:00").is_blank());
        assert!(Schedule::new("13:00", " ").is_blank());
        assert!(Schedule::default().is_blank());
        assert!(!Schedule::new("13:00", "16:00").is_blank());
    }

    #[test]
    fn should_parse_window_bounds() {
        let (start, end) = Schedule::new("13:00", "16:30").window().unwrap();
        assert_eq!(start, NaiveTime::from_hms_opt(13, 0, 0).unwrap());
        assert_eq!(end, NaiveTime::from_hms_opt(16, 30, 0).unwrap());
    }

    #[test]
    fn should_return_none_for_malformed_bounds() {
        assert!(Schedule::new("1pm", "16:00").window().is_none());
    }

    #[test]
    fn should_deserialize_with_days() {
        let json = serde_json::json!({
            "start_time": "08:00",
            "end_time": "09:00",
            "days": ["mon", "tue"]
        });
        let s: Schedule = serde_json::from_value(json).unwrap();
        assert_eq!(s.days.len(), 2);
        assert_eq!(s.to_string(), "08:00..09:00");
    }
}

//! Remaining-time calculation for countdown events.

use crate::libs::event::CountdownEvent;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

/// Time left until a target, split into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CountdownTime {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub total_seconds: i64,
    pub is_expired: bool,
}

impl CountdownTime {
    pub fn expired() -> Self {
        Self {
            is_expired: true,
            ..Self::default()
        }
    }

    pub fn from_seconds(total_seconds: i64) -> Self {
        if total_seconds <= 0 {
            return Self::expired();
        }

        Self {
            days: total_seconds / 86_400,
            hours: (total_seconds % 86_400) / 3_600,
            minutes: (total_seconds % 3_600) / 60,
            seconds: total_seconds % 60,
            total_seconds,
            is_expired: false,
        }
    }

    /// Compact clock-style rendering: `3d 04h 05m 06s`, `04h 05m 06s`, `05m 06s`, `6s`.
    pub fn to_formatted_string(&self, include_seconds: bool) -> String {
        if self.is_expired {
            return "Expired".to_string();
        }
        if self.days > 0 {
            if include_seconds {
                format!("{}d {:02}h {:02}m {:02}s", self.days, self.hours, self.minutes, self.seconds)
            } else {
                format!("{}d {:02}h {:02}m", self.days, self.hours, self.minutes)
            }
        } else if self.hours > 0 {
            if include_seconds {
                format!("{:02}h {:02}m {:02}s", self.hours, self.minutes, self.seconds)
            } else {
                format!("{:02}h {:02}m", self.hours, self.minutes)
            }
        } else if self.minutes > 0 {
            if include_seconds {
                format!("{:02}m {:02}s", self.minutes, self.seconds)
            } else {
                format!("{}m", self.minutes)
            }
        } else {
            format!("{}s", self.seconds)
        }
    }

    /// Largest non-zero unit only.
    pub fn to_short_string(&self) -> String {
        if self.is_expired {
            "Expired".to_string()
        } else if self.days > 0 {
            format!("{} days", self.days)
        } else if self.hours > 0 {
            format!("{} hours", self.hours)
        } else if self.minutes > 0 {
            format!("{} minutes", self.minutes)
        } else {
            format!("{} seconds", self.seconds)
        }
    }
}

pub fn calculate(event: &CountdownEvent, now: NaiveDateTime) -> CountdownTime {
    if event.target_date_time <= now {
        return CountdownTime::expired();
    }
    CountdownTime::from_seconds((event.target_date_time - now).num_seconds())
}

pub fn calculate_multiple(events: &[CountdownEvent], now: NaiveDateTime) -> BTreeMap<i64, CountdownTime> {
    events.iter().filter_map(|event| event.id.map(|id| (id, calculate(event, now)))).collect()
}

/// The active event whose target is the nearest one still ahead.
pub fn next_upcoming(events: &[CountdownEvent], now: NaiveDateTime) -> Option<&CountdownEvent> {
    events
        .iter()
        .filter(|e| e.is_active && e.target_date_time > now)
        .min_by_key(|e| e.target_date_time)
}

/// Share of the span between creation and target that has already elapsed, 0-100.
///
/// An event whose target is not after its creation time counts as complete.
pub fn progress_percentage(event: &CountdownEvent, now: NaiveDateTime) -> f64 {
    let total = (event.target_date_time - event.created_at).num_seconds();
    if total <= 0 {
        return 100.0;
    }
    let elapsed = (now - event.created_at).num_seconds();
    (elapsed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn splits_seconds_into_units() {
        let time = CountdownTime::from_seconds(3 * 86_400 + 4 * 3_600 + 5 * 60 + 6);
        assert_eq!((time.days, time.hours, time.minutes, time.seconds), (3, 4, 5, 6));
        assert_eq!(time.to_formatted_string(true), "3d 04h 05m 06s");
        assert_eq!(time.to_formatted_string(false), "3d 04h 05m");
        assert_eq!(time.to_short_string(), "3 days");
    }

    #[test]
    fn formats_smaller_units() {
        assert_eq!(CountdownTime::from_seconds(3_725).to_formatted_string(true), "01h 02m 05s");
        assert_eq!(CountdownTime::from_seconds(125).to_formatted_string(true), "02m 05s");
        assert_eq!(CountdownTime::from_seconds(125).to_formatted_string(false), "2m");
        assert_eq!(CountdownTime::from_seconds(9).to_formatted_string(false), "9s");
        assert_eq!(CountdownTime::from_seconds(9).to_short_string(), "9 seconds");
    }

    #[test]
    fn non_positive_seconds_are_expired() {
        assert!(CountdownTime::from_seconds(0).is_expired);
        assert!(CountdownTime::from_seconds(-10).is_expired);
        assert_eq!(CountdownTime::from_seconds(-10).to_formatted_string(true), "Expired");
    }

    #[test]
    fn target_equal_to_now_is_expired() {
        let event = CountdownEvent::new("Now", at(10, 12), at(1, 0));
        assert!(calculate(&event, at(10, 12)).is_expired);
        assert_eq!(calculate(&event, at(10, 11)).total_seconds, 3_600);
    }

    #[test]
    fn next_upcoming_skips_inactive_and_past() {
        let now = at(5, 0);
        let mut first = CountdownEvent::new("Inactive", at(6, 0), at(1, 0));
        first.is_active = false;
        let past = CountdownEvent::new("Past", at(4, 0), at(1, 0));
        let later = CountdownEvent::new("Later", at(9, 0), at(1, 0));
        let sooner = CountdownEvent::new("Sooner", at(7, 0), at(1, 0));
        let events = vec![first, past, later, sooner];
        assert_eq!(next_upcoming(&events, now).map(|e| e.title.as_str()), Some("Sooner"));
    }

    #[test]
    fn progress_is_clamped() {
        let event = CountdownEvent::new("Half", at(11, 0), at(1, 0));
        assert!((progress_percentage(&event, at(6, 0)) - 50.0).abs() < f64::EPSILON);
        assert_eq!(progress_percentage(&event, at(20, 0)), 100.0);
        let degenerate = CountdownEvent::new("Zero", at(1, 0), at(1, 0));
        assert_eq!(progress_percentage(&degenerate, at(1, 0)), 100.0);
    }
}

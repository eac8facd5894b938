//! Field-level validation and input sanitising for countdown events.

use crate::libs::error::CountJoyError;
use crate::libs::event::{CountdownEvent, DEFAULT_CATEGORY};
use chrono::{Months, NaiveDateTime};
use serde::Serialize;
use std::fmt;

pub const TITLE_MIN_LENGTH: usize = 2;
pub const TITLE_MAX_LENGTH: usize = 100;
pub const DESCRIPTION_MAX_LENGTH: usize = 500;
pub const ICON_MAX_LENGTH: usize = 50;
pub const PRIORITY_RANGE: std::ops::RangeInclusive<i32> = 0..=10;
pub const REMINDER_MAX_MINUTES: i64 = 365 * 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.to_string()).collect()
    }

    fn push(&mut self, field: &'static str, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }
}

pub struct EventValidator;

impl EventValidator {
    pub fn validate(event: &CountdownEvent, now: NaiveDateTime) -> ValidationResult {
        let mut result = ValidationResult::default();

        let title_length = event.title.chars().count();
        if event.title.trim().is_empty() {
            result.push("title", "Title cannot be empty");
        } else if title_length < TITLE_MIN_LENGTH {
            result.push("title", "Title must be at least 2 characters");
        } else if title_length > TITLE_MAX_LENGTH {
            result.push("title", "Title cannot exceed 100 characters");
        }

        if let Some(description) = &event.description {
            if description.chars().count() > DESCRIPTION_MAX_LENGTH {
                result.push("description", "Description cannot exceed 500 characters");
            }
        }

        if event.category.trim().is_empty() {
            result.push("category", "Category cannot be empty");
        }

        let earliest = now.checked_sub_months(Months::new(12 * 10)).unwrap_or(NaiveDateTime::MIN);
        let latest = now.checked_add_months(Months::new(12 * 100)).unwrap_or(NaiveDateTime::MAX);
        if event.target_date_time < earliest {
            result.push("target_date_time", "Target date is too far in the past");
        } else if event.target_date_time > latest {
            result.push("target_date_time", "Target date is too far in the future");
        }

        if event.reminder_enabled && event.reminder_minutes.is_none() {
            result.push("reminder_minutes", "Reminder time must be set when reminders are enabled");
        }
        if let Some(minutes) = event.reminder_minutes {
            if minutes < 0 {
                result.push("reminder_minutes", "Reminder time cannot be negative");
            }
            if minutes > REMINDER_MAX_MINUTES {
                result.push("reminder_minutes", "Reminder time is too far in advance");
            }
        }

        if !PRIORITY_RANGE.contains(&event.priority) {
            result.push("priority", "Priority must be between 0 and 10");
        }

        if let Some(icon) = &event.icon {
            if icon.chars().count() > ICON_MAX_LENGTH {
                result.push("icon", "Icon identifier is too long");
            }
        }

        result
    }

    /// Trims text fields, cuts them to their maximum lengths and clamps the priority.
    pub fn sanitize(event: CountdownEvent) -> CountdownEvent {
        let category = event.category.trim();
        CountdownEvent {
            title: truncate(event.title.trim(), TITLE_MAX_LENGTH),
            description: event
                .description
                .as_deref()
                .map(|d| truncate(d.trim(), DESCRIPTION_MAX_LENGTH))
                .filter(|d| !d.is_empty()),
            category: if category.is_empty() { DEFAULT_CATEGORY.to_string() } else { category.to_string() },
            icon: event.icon.as_deref().map(|i| truncate(i.trim(), ICON_MAX_LENGTH)).filter(|i| !i.is_empty()),
            priority: event.priority.clamp(*PRIORITY_RANGE.start(), *PRIORITY_RANGE.end()),
            ..event
        }
    }
}

/// Sanitizes `event`, then validates it. Every failing field is reported.
pub fn prepare(event: CountdownEvent, now: NaiveDateTime) -> Result<CountdownEvent, CountJoyError> {
    let event = EventValidator::sanitize(event);
    let result = EventValidator::validate(&event, now);
    if result.is_valid() {
        Ok(event)
    } else {
        Err(CountJoyError::Validation(result.messages().join("; ")))
    }
}

fn truncate(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap().and_hms_opt(10, 0, 0).unwrap()
    }

    #[test]
    fn sanitize_trims_and_clamps() {
        let mut event = CountdownEvent::new("  Launch  ", now() + Duration::days(3), now());
        event.category = "   ".into();
        event.description = Some("   ".into());
        event.priority = 42;

        let clean = EventValidator::sanitize(event);
        assert_eq!(clean.title, "Launch");
        assert_eq!(clean.category, DEFAULT_CATEGORY);
        assert_eq!(clean.description, None);
        assert_eq!(clean.priority, 10);
    }

    #[test]
    fn validate_reports_every_failing_field() {
        let mut event = CountdownEvent::new("x", now() + Duration::days(3), now());
        event.reminder_enabled = true;
        event.priority = -1;

        let result = EventValidator::validate(&event, now());
        let fields: Vec<&str> = result.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["title", "reminder_minutes", "priority"]);
    }

    #[test]
    fn target_window_is_bounded() {
        let past = CountdownEvent::new("Ancient", now() - Duration::days(365 * 11), now());
        assert!(!EventValidator::validate(&past, now()).is_valid());

        let recent_past = CountdownEvent::new("Yesterday", now() - Duration::days(1), now());
        assert!(EventValidator::validate(&recent_past, now()).is_valid());
    }

    #[test]
    fn prepare_joins_messages() {
        let event = CountdownEvent::new("   ", now() + Duration::days(1), now());
        let err = prepare(event, now()).unwrap_err();
        assert_eq!(err, CountJoyError::Validation("Title cannot be empty".into()));
    }
}

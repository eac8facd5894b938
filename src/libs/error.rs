//! Typed domain errors.
//!
//! Commands work with `anyhow::Result` throughout; the variants here cover
//! failures that callers (and tests) need to tell apart: parse failures for
//! user input and lookups of records that do not exist.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CountJoyError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD or YYYY-MM-DD HH:MM")]
    InvalidDate(String),

    #[error("Unknown recurrence pattern '{0}'")]
    UnknownPattern(String),

    #[error("Unknown recurrence end type '{0}'")]
    UnknownEndType(String),

    #[error("Unknown weekday '{0}'")]
    UnknownWeekday(String),

    #[error("Unknown milestone type '{0}'")]
    UnknownMilestoneType(String),

    #[error("Unknown celebration effect '{0}'")]
    UnknownCelebrationEffect(String),

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    #[error("Unknown priority '{0}'")]
    UnknownPriority(String),

    #[error("Invalid quiet hours '{0}', expected HH:MM-HH:MM")]
    InvalidQuietHours(String),

    #[error("Unknown time range '{0}'")]
    UnknownTimeRange(String),

    #[error("Event with ID {0} not found")]
    EventNotFound(i64),

    #[error("Milestone '{0}' not found")]
    MilestoneNotFound(String),

    #[error("Event {0} has no recurrence rule")]
    RuleNotFound(i64),

    #[error("Event is an occurrence of series {0}; set the rule on the series instead")]
    OccurrenceOfSeries(i64),

    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("Event validation failed: {0}")]
    Validation(String),
}

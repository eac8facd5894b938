//! Countdown event model, categories, priorities and list filtering.
//!
//! A [`CountdownEvent`] is the central record of the application: a titled
//! moment in the future that countjoy counts down to. Time-dependent
//! helpers take an explicit `now` so that the same event can be evaluated
//! against the wall clock in commands and against fixed instants in tests.

use crate::libs::countdown::CountdownTime;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::error::CountJoyError;

pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownEvent {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub target_date_time: NaiveDateTime,
    pub reminder_enabled: bool,
    /// Minutes before the target at which the reminder fires.
    pub reminder_minutes: Option<i64>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_active: bool,
    pub priority: i32,
    /// Original event of the series this occurrence was generated from.
    pub parent_event_id: Option<i64>,
    pub reminder_sent_at: Option<NaiveDateTime>,
    /// Set by a snooze; the reminder fires again at this moment.
    pub reminder_snoozed_until: Option<NaiveDateTime>,
}

impl CountdownEvent {
    pub fn new(title: &str, target_date_time: NaiveDateTime, now: NaiveDateTime) -> Self {
        Self {
            id: None,
            title: title.to_string(),
            description: None,
            category: DEFAULT_CATEGORY.to_string(),
            target_date_time,
            reminder_enabled: false,
            reminder_minutes: None,
            color: None,
            icon: None,
            created_at: now,
            updated_at: now,
            is_active: true,
            priority: 0,
            parent_event_id: None,
            reminder_sent_at: None,
            reminder_snoozed_until: None,
        }
    }

    pub fn is_valid(&self, now: NaiveDateTime) -> bool {
        !self.title.trim().is_empty() && self.target_date_time > now
    }

    pub fn has_expired(&self, now: NaiveDateTime) -> bool {
        self.target_date_time < now
    }

    /// Title truncated to `max_length` characters, ending in "..." when cut.
    pub fn display_title(&self, max_length: usize) -> String {
        if self.title.chars().count() <= max_length {
            self.title.clone()
        } else {
            let kept: String = self.title.chars().take(max_length.saturating_sub(3)).collect();
            format!("{}...", kept)
        }
    }

    /// Calendar days between today and the target date, 0 once the target has passed.
    pub fn days_remaining(&self, now: NaiveDateTime) -> i64 {
        if now > self.target_date_time {
            0
        } else {
            (self.target_date_time.date() - now.date()).num_days()
        }
    }

    pub fn detailed_time_remaining(&self, now: NaiveDateTime) -> CountdownTime {
        CountdownTime::from_seconds((self.target_date_time - now).num_seconds())
    }

    /// Human phrase such as "5 days, 3 hours, 20 minutes, 15 seconds".
    pub fn formatted_countdown(&self, now: NaiveDateTime, include_seconds: bool) -> String {
        let detailed = self.detailed_time_remaining(now);
        if detailed.is_expired {
            return "Expired".to_string();
        }

        let mut parts = Vec::new();
        if detailed.days > 0 {
            parts.push(plural(detailed.days, "day"));
        }
        if detailed.hours > 0 {
            parts.push(plural(detailed.hours, "hour"));
        }
        if detailed.minutes > 0 {
            parts.push(plural(detailed.minutes, "minute"));
        }
        if include_seconds && detailed.seconds > 0 {
            parts.push(plural(detailed.seconds, "second"));
        }

        if parts.is_empty() {
            if include_seconds {
                plural(detailed.seconds, "second")
            } else {
                "Less than a minute".to_string()
            }
        } else {
            parts.join(", ")
        }
    }

    /// Moment at which the reminder for this event is due, if reminders are on.
    pub fn reminder_at(&self) -> Option<NaiveDateTime> {
        if !self.reminder_enabled {
            return None;
        }
        self.reminder_minutes.map(|minutes| self.target_date_time - Duration::minutes(minutes))
    }

    /// A fresh, unsaved copy titled "<title> (Copy)".
    pub fn duplicate(&self, now: NaiveDateTime) -> Self {
        Self {
            id: None,
            title: format!("{} (Copy)", self.title),
            created_at: now,
            updated_at: now,
            parent_event_id: None,
            reminder_sent_at: None,
            reminder_snoozed_until: None,
            ..self.clone()
        }
    }

    pub fn priority_level(&self) -> EventPriority {
        EventPriority::from_value(self.priority)
    }
}

fn plural(value: i64, unit: &str) -> String {
    if value == 1 {
        format!("{} {}", value, unit)
    } else {
        format!("{} {}s", value, unit)
    }
}

/// Predefined categories. Events store the display name, so custom
/// category names remain possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    General,
    Personal,
    Work,
    Birthday,
    Anniversary,
    Holiday,
    Meeting,
    Deadline,
    Travel,
    Education,
    Health,
    Sports,
    Entertainment,
    Finance,
    Custom,
}

impl EventCategory {
    pub const ALL: [EventCategory; 15] = [
        EventCategory::General,
        EventCategory::Personal,
        EventCategory::Work,
        EventCategory::Birthday,
        EventCategory::Anniversary,
        EventCategory::Holiday,
        EventCategory::Meeting,
        EventCategory::Deadline,
        EventCategory::Travel,
        EventCategory::Education,
        EventCategory::Health,
        EventCategory::Sports,
        EventCategory::Entertainment,
        EventCategory::Finance,
        EventCategory::Custom,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EventCategory::General => "GENERAL",
            EventCategory::Personal => "PERSONAL",
            EventCategory::Work => "WORK",
            EventCategory::Birthday => "BIRTHDAY",
            EventCategory::Anniversary => "ANNIVERSARY",
            EventCategory::Holiday => "HOLIDAY",
            EventCategory::Meeting => "MEETING",
            EventCategory::Deadline => "DEADLINE",
            EventCategory::Travel => "TRAVEL",
            EventCategory::Education => "EDUCATION",
            EventCategory::Health => "HEALTH",
            EventCategory::Sports => "SPORTS",
            EventCategory::Entertainment => "ENTERTAINMENT",
            EventCategory::Finance => "FINANCE",
            EventCategory::Custom => "CUSTOM",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EventCategory::General => "General",
            EventCategory::Personal => "Personal",
            EventCategory::Work => "Work",
            EventCategory::Birthday => "Birthday",
            EventCategory::Anniversary => "Anniversary",
            EventCategory::Holiday => "Holiday",
            EventCategory::Meeting => "Meeting",
            EventCategory::Deadline => "Deadline",
            EventCategory::Travel => "Travel",
            EventCategory::Education => "Education",
            EventCategory::Health => "Health",
            EventCategory::Sports => "Sports",
            EventCategory::Entertainment => "Entertainment",
            EventCategory::Finance => "Finance",
            EventCategory::Custom => "Custom",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            EventCategory::General => "event",
            EventCategory::Personal => "person",
            EventCategory::Work => "work",
            EventCategory::Birthday => "cake",
            EventCategory::Anniversary => "favorite",
            EventCategory::Holiday => "beach_access",
            EventCategory::Meeting => "groups",
            EventCategory::Deadline => "schedule",
            EventCategory::Travel => "flight",
            EventCategory::Education => "school",
            EventCategory::Health => "health_and_safety",
            EventCategory::Sports => "sports",
            EventCategory::Entertainment => "movie",
            EventCategory::Finance => "attach_money",
            EventCategory::Custom => "star",
        }
    }

    pub fn default_color(&self) -> &'static str {
        match self {
            EventCategory::General => "#6200EE",
            EventCategory::Personal => "#2196F3",
            EventCategory::Work => "#4CAF50",
            EventCategory::Birthday => "#E91E63",
            EventCategory::Anniversary => "#FF5722",
            EventCategory::Holiday => "#009688",
            EventCategory::Meeting => "#3F51B5",
            EventCategory::Deadline => "#F44336",
            EventCategory::Travel => "#00BCD4",
            EventCategory::Education => "#9C27B0",
            EventCategory::Health => "#8BC34A",
            EventCategory::Sports => "#FF9800",
            EventCategory::Entertainment => "#795548",
            EventCategory::Finance => "#FFEB3B",
            EventCategory::Custom => "#607D8B",
        }
    }

    /// Matches either the constant name or the display name; unknown names map to `General`.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == name || c.display_name() == name)
            .unwrap_or(EventCategory::General)
    }

    pub fn all_display_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.display_name()).collect()
    }
}

impl FromStr for EventCategory {
    type Err = CountJoyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(normalized) || c.display_name().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| CountJoyError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPriority {
    Low,
    Medium,
    High,
}

impl EventPriority {
    pub const ALL: [EventPriority; 3] = [EventPriority::Low, EventPriority::Medium, EventPriority::High];

    pub fn value(&self) -> i32 {
        match self {
            EventPriority::Low => 0,
            EventPriority::Medium => 1,
            EventPriority::High => 2,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EventPriority::Low => "Low",
            EventPriority::Medium => "Medium",
            EventPriority::High => "High",
        }
    }

    /// Exact value match; values above `High` count as `High`, anything else as `Medium`.
    pub fn from_value(value: i32) -> Self {
        match value {
            0 => EventPriority::Low,
            1 => EventPriority::Medium,
            v if v >= 2 => EventPriority::High,
            _ => EventPriority::Medium,
        }
    }
}

impl FromStr for EventPriority {
    type Err = CountJoyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        if let Ok(value) = normalized.parse::<i32>() {
            return Ok(Self::from_value(value));
        }
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.display_name().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| CountJoyError::UnknownPriority(s.to_string()))
    }
}

/// A raw priority number, or one of the level names.
pub fn parse_priority(input: &str) -> Result<i32, CountJoyError> {
    match input.trim().parse::<i32>() {
        Ok(value) => Ok(value),
        Err(_) => input.parse::<EventPriority>().map(|p| p.value()),
    }
}

impl fmt::Display for EventPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortOption {
    #[default]
    Date,
    Name,
    Priority,
    Category,
}

/// Criteria applied by [`filter_and_sort`] when listing events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub priority: Option<i32>,
    pub include_past: bool,
    pub include_inactive: bool,
}

impl EventFilter {
    pub fn matches(&self, event: &CountdownEvent, now: NaiveDateTime) -> bool {
        if !self.include_inactive && !event.is_active {
            return false;
        }
        if !self.include_past && event.has_expired(now) {
            return false;
        }
        if let Some(query) = self.search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            let in_title = event.title.to_lowercase().contains(&query);
            let in_description = event.description.as_deref().is_some_and(|d| d.to_lowercase().contains(&query));
            if !in_title && !in_description {
                return false;
            }
        }
        if let Some(category) = &self.category {
            let wanted = EventCategory::from_name(category);
            let same_known = EventCategory::from_name(&event.category) == wanted && wanted != EventCategory::General;
            if !event.category.eq_ignore_ascii_case(category) && !same_known {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if event.priority != priority {
                return false;
            }
        }
        true
    }
}

pub fn filter_and_sort(events: Vec<CountdownEvent>, filter: &EventFilter, sort: SortOption, now: NaiveDateTime) -> Vec<CountdownEvent> {
    let mut filtered: Vec<CountdownEvent> = events.into_iter().filter(|e| filter.matches(e, now)).collect();
    filtered.sort_by(|a, b| compare(a, b, sort));
    filtered
}

fn compare(a: &CountdownEvent, b: &CountdownEvent, sort: SortOption) -> Ordering {
    match sort {
        SortOption::Date => a.target_date_time.cmp(&b.target_date_time),
        SortOption::Name => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortOption::Priority => b.priority.cmp(&a.priority).then(a.target_date_time.cmp(&b.target_date_time)),
        SortOption::Category => a.category.cmp(&b.category).then(a.target_date_time.cmp(&b.target_date_time)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("birthday".parse::<EventCategory>().unwrap(), EventCategory::Birthday);
        assert_eq!("HEALTH".parse::<EventCategory>().unwrap(), EventCategory::Health);
        assert!("gardening".parse::<EventCategory>().is_err());
    }

    #[test]
    fn priority_accepts_numbers_and_names() {
        assert_eq!(parse_priority("7").unwrap(), 7);
        assert_eq!(parse_priority("high").unwrap(), 2);
        assert_eq!(parse_priority("Low").unwrap(), 0);
        assert!(parse_priority("urgent").is_err());
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap()
    }

    #[test]
    fn formatted_countdown_lists_non_zero_units() {
        let now = at(2025, 1, 1, 0, 0, 0);
        let event = CountdownEvent::new("Trip", at(2025, 1, 6, 3, 20, 15), now);
        assert_eq!(event.formatted_countdown(now, true), "5 days, 3 hours, 20 minutes, 15 seconds");
        assert_eq!(event.formatted_countdown(now, false), "5 days, 3 hours, 20 minutes");
    }

    #[test]
    fn formatted_countdown_under_a_minute() {
        let now = at(2025, 1, 1, 0, 0, 0);
        let event = CountdownEvent::new("Soon", at(2025, 1, 1, 0, 0, 1), now);
        assert_eq!(event.formatted_countdown(now, true), "1 second");
        assert_eq!(event.formatted_countdown(now, false), "Less than a minute");

        let past = CountdownEvent::new("Past", at(2024, 12, 31, 0, 0, 0), now);
        assert_eq!(past.formatted_countdown(now, true), "Expired");
    }

    #[test]
    fn display_title_truncates() {
        let now = at(2025, 1, 1, 0, 0, 0);
        let event = CountdownEvent::new("A very long title that keeps going on", at(2025, 2, 1, 0, 0, 0), now);
        assert_eq!(event.display_title(10), "A very ...");
        assert_eq!(event.display_title(100), event.title);
    }

    #[test]
    fn days_remaining_uses_calendar_dates() {
        let now = at(2025, 1, 1, 23, 0, 0);
        let event = CountdownEvent::new("Tomorrow", at(2025, 1, 2, 1, 0, 0), now);
        assert_eq!(event.days_remaining(now), 1);
        assert_eq!(event.days_remaining(at(2025, 1, 3, 0, 0, 0)), 0);
    }

    #[test]
    fn filter_keeps_event_due_right_now() {
        let now = at(2025, 3, 1, 12, 0, 0);
        let filter = EventFilter::default();
        assert!(filter.matches(&CountdownEvent::new("Now", now, now), now));
        assert!(!filter.matches(&CountdownEvent::new("Gone", at(2025, 3, 1, 11, 59, 59), now), now));
    }

    #[test]
    fn category_lookup_falls_back_to_general() {
        assert_eq!(EventCategory::from_name("BIRTHDAY"), EventCategory::Birthday);
        assert_eq!(EventCategory::from_name("Travel"), EventCategory::Travel);
        assert_eq!(EventCategory::from_name("Gardening"), EventCategory::General);
    }

    #[test]
    fn priority_parsing() {
        assert_eq!("high".parse::<EventPriority>().unwrap(), EventPriority::High);
        assert_eq!("0".parse::<EventPriority>().unwrap(), EventPriority::Low);
        assert!("urgent".parse::<EventPriority>().is_err());
    }
}

//! Reminder timing: quiet hours, snoozing, hour alerts and suggested times.
//!
//! The watcher consults [`QuietHours`] before reporting anything for a
//! non-urgent event, raises an [`HourAlert`] when an event is 24, 12, 6, 3
//! or 1 hour(s) away, and fires reminders that [`snooze`] has re-armed.
//! [`suggested_reminder_times`] proposes reminder moments from the event's
//! category.

use crate::db::db::Db;
use crate::db::events::Events;
use crate::libs::error::CountJoyError;
use crate::libs::event::{CountdownEvent, EventCategory};
use crate::libs::messages::Message;
use crate::msg_bail_anyhow;
use anyhow::Result;
use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hours before the target at which an [`HourAlert`] is raised.
pub const HOUR_ALERTS: [i64; 5] = [24, 12, 6, 3, 1];

/// Daily window in which only urgent events notify.
///
/// Both ends are inclusive. A window whose start is after its end spans
/// midnight; equal ends make an empty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl QuietHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start < self.end {
            self.start <= time && time <= self.end
        } else if self.start > self.end {
            time >= self.start || time <= self.end
        } else {
            false
        }
    }
}

/// Parses `HH:MM-HH:MM`.
impl FromStr for QuietHours {
    type Err = CountJoyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CountJoyError::InvalidQuietHours(s.to_string());
        let (start, end) = s.split_once('-').ok_or_else(invalid)?;
        let parse = |value: &str| NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| invalid());
        Ok(Self::new(parse(start)?, parse(end)?))
    }
}

impl fmt::Display for QuietHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// An event that has just entered one of the [`HOUR_ALERTS`] hours.
#[derive(Debug, Clone)]
pub struct HourAlert {
    pub event: CountdownEvent,
    pub hours: i64,
}

/// The alert for `event` when the whole hours left equal one of [`HOUR_ALERTS`].
///
/// A pass per hour, which the watcher makes during an event's last day,
/// sees each threshold once.
pub fn hour_alert(event: &CountdownEvent, now: NaiveDateTime) -> Option<HourAlert> {
    if event.target_date_time <= now {
        return None;
    }
    let hours = (event.target_date_time - now).num_hours();
    HOUR_ALERTS.contains(&hours).then(|| HourAlert {
        event: event.clone(),
        hours,
    })
}

/// Reminder moments for `event` that still lie ahead of `now`, earliest first.
///
/// | Category                | Days before (hour of day)                  |
/// |-------------------------|--------------------------------------------|
/// | Birthday, Anniversary   | 7 (09), 3 (18), 1 (10)                     |
/// | Deadline, Meeting       | 14 (09), 7 (09), 3 (14), 1 (16), then 3h before |
/// | Holiday, Travel         | 30 (19), 14 (19), 7 (20)                   |
/// | anything else           | 7 (10), 3 (10), 1 (10)                     |
///
/// A lead time is offered only when at least that many whole days remain.
pub fn suggested_reminder_times(event: &CountdownEvent, now: NaiveDateTime) -> Vec<NaiveDateTime> {
    let target = event.target_date_time;
    let days_until = (target - now).num_days();

    let plan: &[(i64, u32)] = match EventCategory::from_name(&event.category) {
        EventCategory::Birthday | EventCategory::Anniversary => &[(7, 9), (3, 18), (1, 10)],
        EventCategory::Deadline | EventCategory::Meeting => &[(14, 9), (7, 9), (3, 14), (1, 16)],
        EventCategory::Holiday | EventCategory::Travel => &[(30, 19), (14, 19), (7, 20)],
        _ => &[(7, 10), (3, 10), (1, 10)],
    };

    let mut suggestions: Vec<NaiveDateTime> = plan
        .iter()
        .filter(|(days, _)| days_until >= *days)
        .filter_map(|&(days, hour)| {
            let day = target.date().checked_sub_signed(Duration::days(days))?;
            day.and_hms_opt(hour, 0, 0)
        })
        .collect();

    if matches!(
        EventCategory::from_name(&event.category),
        EventCategory::Deadline | EventCategory::Meeting
    ) && days_until >= 0
    {
        suggestions.push(target - Duration::hours(3));
    }

    suggestions.retain(|at| *at > now);
    suggestions.sort();
    suggestions
}

/// Re-arms the reminder of event `id` to fire `minutes` from `now`.
///
/// Fails when the event has no reminder, when `minutes` is not positive,
/// or when the new moment would not fall before the target. Returns the
/// moment the reminder fires again.
pub fn snooze(db: &Db, id: i64, minutes: i64, now: NaiveDateTime) -> Result<NaiveDateTime> {
    let events = Events::new(db);
    let event = events.require(id)?;

    if !event.reminder_enabled {
        msg_bail_anyhow!(Message::ReminderNotEnabled(event.title));
    }
    if minutes <= 0 {
        msg_bail_anyhow!(Message::SnoozeMustBePositive);
    }

    let until = Duration::try_minutes(minutes)
        .and_then(|delay| now.checked_add_signed(delay))
        .filter(|until| *until < event.target_date_time);
    let Some(until) = until else {
        msg_bail_anyhow!(Message::SnoozePastEvent(event.title));
    };

    events.snooze_reminder(id, until)?;
    Ok(until)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn at(month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn quiet_hours_within_a_day() {
        let quiet = QuietHours::new(time(13, 0), time(15, 0));
        assert!(quiet.contains(time(13, 0)));
        assert!(quiet.contains(time(15, 0)));
        assert!(!quiet.contains(time(12, 59)));
        assert!(!quiet.contains(time(22, 0)));
    }

    #[test]
    fn quiet_hours_across_midnight() {
        let quiet: QuietHours = "22:00-07:00".parse().unwrap();
        assert!(quiet.contains(time(23, 30)));
        assert!(quiet.contains(time(6, 59)));
        assert!(!quiet.contains(time(12, 0)));
        assert_eq!(quiet.to_string(), "22:00-07:00");

        assert!(!QuietHours::new(time(8, 0), time(8, 0)).contains(time(8, 0)));
        assert!("22:00".parse::<QuietHours>().is_err());
        assert!("25:00-07:00".parse::<QuietHours>().is_err());
    }

    #[test]
    fn hour_alert_thresholds() {
        let event = CountdownEvent::new("Launch", at(3, 10, 12), at(3, 1, 0));

        assert_eq!(hour_alert(&event, at(3, 9, 12)).map(|a| a.hours), Some(24));
        assert_eq!(hour_alert(&event, at(3, 10, 6) - Duration::minutes(30)).map(|a| a.hours), Some(6));
        assert_eq!(hour_alert(&event, at(3, 10, 11)).map(|a| a.hours), Some(1));
        assert!(hour_alert(&event, at(3, 10, 2)).is_none());
        assert!(hour_alert(&event, at(3, 10, 12)).is_none());
    }

    #[test]
    fn birthday_suggestions() {
        let mut event = CountdownEvent::new("Ana", at(6, 20, 0), at(6, 1, 0));
        event.category = "Birthday".to_string();

        assert_eq!(
            suggested_reminder_times(&event, at(6, 1, 8)),
            vec![at(6, 13, 9), at(6, 17, 18), at(6, 19, 10)]
        );
        // Four days out there is no time left for the one week reminder
        assert_eq!(suggested_reminder_times(&event, at(6, 15, 20)), vec![at(6, 17, 18), at(6, 19, 10)]);
    }

    #[test]
    fn deadline_suggestions_end_three_hours_before() {
        let mut event = CountdownEvent::new("Report", at(6, 20, 17), at(6, 1, 0));
        event.category = "Deadline".to_string();

        assert_eq!(
            suggested_reminder_times(&event, at(6, 18, 8)),
            vec![at(6, 19, 16), at(6, 20, 14)]
        );
    }

    #[test]
    fn unknown_category_uses_default_plan() {
        let mut event = CountdownEvent::new("Recital", at(6, 20, 19), at(6, 1, 0));
        event.category = "Music".to_string();

        assert_eq!(
            suggested_reminder_times(&event, at(6, 1, 8)),
            vec![at(6, 13, 10), at(6, 17, 10), at(6, 19, 10)]
        );
        assert!(suggested_reminder_times(&event, at(6, 20, 20)).is_empty());
    }
}

//! Periodic checks for milestones, reminders and recurring events.
//!
//! One pass ([`Watcher::run_once`]) walks the active events, records newly
//! reached milestones, fires due reminders, raises hour alerts and
//! materialises the next occurrence of every due recurring event.
//! [`Watcher::run`] repeats passes forever, sleeping between them for an
//! interval that shrinks as the nearest event approaches.
//!
//! During quiet hours an event that is not high priority is left untouched:
//! its milestones stay pending and its reminder unsent until a later pass.
//! Hour alerts that fall into quiet hours are dropped.

use crate::db::db::Db;
use crate::db::events::{EventQuery, Events};
use crate::libs::config::{Config, WatcherConfig};
use crate::libs::countdown;
use crate::libs::event::{CountdownEvent, EventPriority};
use crate::libs::formatter;
use crate::libs::generator::RecurrenceGenerator;
use crate::libs::messages::Message;
use crate::libs::milestone::{check_milestones, AchievedMilestone};
use crate::libs::recurrence::RecurrenceCalculator;
use crate::libs::reminder::{hour_alert, HourAlert};
use crate::{msg_debug, msg_error, msg_info, msg_print, msg_success, msg_warning};
use anyhow::Result;
use chrono::NaiveDateTime;
use std::time::Duration;

/// What a single pass found and did.
#[derive(Debug, Default)]
pub struct WatchReport {
    pub checked_events: usize,
    pub achievements: Vec<AchievedMilestone>,
    pub reminders: Vec<CountdownEvent>,
    pub alerts: Vec<HourAlert>,
    pub generated: Vec<CountdownEvent>,
    /// Events held back by quiet hours.
    pub deferred: usize,
}

impl WatchReport {
    pub fn is_empty(&self) -> bool {
        self.achievements.is_empty() && self.reminders.is_empty() && self.alerts.is_empty() && self.generated.is_empty()
    }
}

/// Periodic checker for milestones, reminders, hour alerts and series generation.
///
/// One [`Watcher::run_once`] call is a complete pass; `countjoy watch` loops it
/// with [`adaptive_interval`] and `countjoy check` runs it once.
pub struct Watcher {
    config: WatcherConfig,
    calculator: RecurrenceCalculator,
}

impl Watcher {
    /// Watcher using the `[watcher]` and `[recurrence]` sections of `config`.
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.watcher(),
            calculator: RecurrenceCalculator::with_holidays(config.recurrence().holidays),
        }
    }

    pub fn with_settings(config: WatcherConfig, calculator: RecurrenceCalculator) -> Self {
        Self { config, calculator }
    }

    /// Runs one pass over the active events as of `now`.
    ///
    /// Reached milestones are marked achieved, due reminders are marked sent and
    /// finished series get their next occurrence. During quiet hours, non-urgent
    /// events are left untouched and only counted in [`WatchReport::deferred`].
    ///
    /// # Errors
    ///
    /// Propagates database failures, including those of series generation.
    pub fn run_once(&self, db: &Db, now: NaiveDateTime) -> Result<WatchReport> {
        let events = Events::new(db);
        let watched = self.watched(events.fetch(EventQuery::Active)?);
        let mut report = WatchReport {
            checked_events: watched.len(),
            ..WatchReport::default()
        };

        for event in &watched {
            let Some(id) = event.id else { continue };
            if self.held_by_quiet_hours(event, now) {
                report.deferred += 1;
                continue;
            }

            let achieved = check_milestones(db, id, now)?;
            report
                .achievements
                .extend(achieved.into_iter().filter(|a| a.milestone.notification_enabled));

            if self.config.reminders && reminder_due(event, now) {
                events.mark_reminder_sent(id, now)?;
                report.reminders.push(CountdownEvent {
                    reminder_sent_at: Some(now),
                    ..event.clone()
                });
            }

            if self.config.hour_alerts {
                report.alerts.extend(hour_alert(event, now));
            }
        }

        report.generated = RecurrenceGenerator::new(db, self.calculator.clone()).check_and_generate(now)?;

        msg_debug!(Message::WatcherPassCompleted(
            report.checked_events,
            report.achievements.len(),
            report.reminders.len(),
            report.generated.len()
        ));

        Ok(report)
    }

    /// Runs passes until the process is stopped.
    pub async fn run(&self) -> Result<()> {
        msg_info!(Message::WatcherRunning(self.config.check_interval_hours));

        loop {
            let now = formatter::now();
            let hours = match self.cycle(now) {
                Ok(hours) => hours,
                Err(e) => {
                    msg_error!(Message::WatcherPassFailed(e.to_string()));
                    self.config.check_interval_hours.max(1)
                }
            };

            msg_debug!(Message::WatcherNextCheck(hours));
            tokio::time::sleep(Duration::from_secs(hours * 3600)).await;
        }
    }

    fn cycle(&self, now: NaiveDateTime) -> Result<u64> {
        let db = Db::new()?;
        let report = self.run_once(&db, now)?;
        announce(&report, now);

        let upcoming = self.watched(Events::new(&db).fetch(EventQuery::Active)?);
        Ok(adaptive_interval(&upcoming, now, &self.config))
    }

    fn held_by_quiet_hours(&self, event: &CountdownEvent, now: NaiveDateTime) -> bool {
        let Some(quiet) = self.config.quiet_hours else {
            return false;
        };
        let urgent = event.priority >= EventPriority::High.value();
        quiet.contains(now.time()) && !(urgent && self.config.quiet_hours_override_urgent)
    }

    fn watched(&self, events: Vec<CountdownEvent>) -> Vec<CountdownEvent> {
        if !self.config.urgent_only {
            return events;
        }
        events
            .into_iter()
            .filter(|e| e.priority >= EventPriority::High.value())
            .collect()
    }
}

/// A reminder is due between its reminder time and the target, once.
/// A snoozed reminder waits for its snooze to run out instead.
pub fn reminder_due(event: &CountdownEvent, now: NaiveDateTime) -> bool {
    if !event.reminder_enabled || event.reminder_sent_at.is_some() || event.target_date_time <= now {
        return false;
    }
    match event.reminder_snoozed_until {
        Some(until) => until <= now,
        None => event.reminder_at().is_some_and(|at| at <= now),
    }
}

/// Hours to wait before the next pass, based on the nearest upcoming event.
pub fn adaptive_interval(events: &[CountdownEvent], now: NaiveDateTime, config: &WatcherConfig) -> u64 {
    let base = config.check_interval_hours.max(1);
    if !config.adaptive {
        return base;
    }

    let Some(next) = countdown::next_upcoming(events, now) else {
        return base;
    };

    let hours_until = (next.target_date_time - now).num_hours();
    let interval = match hours_until {
        ..=24 => 1,
        25..=72 => 3,
        73..=168 => 6,
        _ => 12,
    };

    interval.min(base)
}

/// Prints the outcome of a pass.
pub fn announce(report: &WatchReport, now: NaiveDateTime) {
    for achieved in &report.achievements {
        msg_success!(Message::MilestoneAchieved(
            achieved.milestone.celebration_effect.symbol().to_string(),
            achieved.event.title.clone(),
            achieved.milestone.title.clone(),
            achieved.milestone.message.clone()
        ));
    }

    for event in &report.reminders {
        msg_print!(Message::ReminderFired(
            event.title.clone(),
            countdown::calculate(event, now).to_short_string()
        ));
    }

    for alert in &report.alerts {
        msg_warning!(Message::HourAlert(alert.event.title.clone(), alert.hours));
    }

    for event in &report.generated {
        msg_info!(Message::OccurrenceCreated(event.title.clone(), event.target_date_time.to_string()));
    }

    if report.deferred > 0 {
        msg_info!(Message::NotificationsDeferred(report.deferred));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    fn event_in(hours: i64) -> CountdownEvent {
        CountdownEvent::new("Soon", now() + ChronoDuration::hours(hours), now() - ChronoDuration::days(1))
    }

    #[test]
    fn interval_tightens_as_event_approaches() {
        let config = WatcherConfig {
            check_interval_hours: 24,
            ..WatcherConfig::default()
        };
        assert_eq!(adaptive_interval(&[event_in(10)], now(), &config), 1);
        assert_eq!(adaptive_interval(&[event_in(48)], now(), &config), 3);
        assert_eq!(adaptive_interval(&[event_in(100)], now(), &config), 6);
        assert_eq!(adaptive_interval(&[event_in(500)], now(), &config), 12);
    }

    #[test]
    fn interval_is_capped_by_configuration() {
        let config = WatcherConfig::default();
        assert_eq!(adaptive_interval(&[event_in(500)], now(), &config), 6);
        assert_eq!(adaptive_interval(&[], now(), &config), 6);

        let fixed = WatcherConfig {
            adaptive: false,
            ..WatcherConfig::default()
        };
        assert_eq!(adaptive_interval(&[event_in(2)], now(), &fixed), 6);
    }

    #[test]
    fn reminder_fires_once_inside_its_window() {
        let mut event = event_in(2);
        event.reminder_enabled = true;
        event.reminder_minutes = Some(60);
        assert!(!reminder_due(&event, now()));

        event.reminder_minutes = Some(180);
        assert!(reminder_due(&event, now()));

        event.reminder_sent_at = Some(now());
        assert!(!reminder_due(&event, now()));
    }

    #[test]
    fn snoozed_reminder_waits() {
        let mut event = event_in(2);
        event.reminder_enabled = true;
        event.reminder_minutes = Some(180);
        event.reminder_snoozed_until = Some(now() + ChronoDuration::minutes(30));
        assert!(!reminder_due(&event, now()));
        assert!(reminder_due(&event, now() + ChronoDuration::minutes(30)));

        event.reminder_enabled = false;
        assert!(!reminder_due(&event, now() + ChronoDuration::minutes(30)));
    }

    #[test]
    fn past_events_get_no_reminder() {
        let mut event = event_in(-1);
        event.reminder_enabled = true;
        event.reminder_minutes = Some(120);
        assert!(!reminder_due(&event, now()));
    }
}

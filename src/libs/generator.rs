//! Materialises occurrences of recurring events.
//!
//! A series is an original event plus the child events generated from it
//! (`parent_event_id` points at the original). The rule attached to the
//! original keeps two bookkeeping dates: `last_occurrence_date`, the date of
//! the latest occurrence that exists as an event, and `next_occurrence_date`,
//! the date of the one that will be generated next. A rule is due once its
//! latest occurrence date has arrived.

use crate::db::db::Db;
use crate::db::events::{EventQuery, Events};
use crate::db::recurrence_rules::RecurrenceRules;
use crate::libs::error::CountJoyError;
use crate::libs::event::CountdownEvent;
use crate::libs::messages::Message;
use crate::libs::recurrence::{RecurrenceCalculator, RecurrenceRule, MAX_CANDIDATE_STEPS};
use crate::{msg_debug, msg_error_anyhow};
use anyhow::Result;
use chrono::NaiveDateTime;

pub struct RecurrenceGenerator<'a> {
    db: &'a Db,
    calculator: RecurrenceCalculator,
}

impl<'a> RecurrenceGenerator<'a> {
    pub fn new(db: &'a Db, calculator: RecurrenceCalculator) -> Self {
        Self { db, calculator }
    }

    /// Inserts the next occurrence of the series that lies strictly after `now`.
    ///
    /// The series is walked from the original's target so that occurrences
    /// that passed without being generated count toward an `AfterOccurrences`
    /// limit. Generated occurrences always count, including ones whose date
    /// was later excluded by a single-occurrence edit. Returns `None` once
    /// the series has ended.
    pub fn generate_next_occurrence(
        &self,
        original: &CountdownEvent,
        rule: &RecurrenceRule,
        now: NaiveDateTime,
    ) -> Result<Option<CountdownEvent>> {
        let series_id = original.id.ok_or_else(|| msg_error_anyhow!(Message::EventIdRequired))?;
        let events = Events::new(self.db);
        let rules = RecurrenceRules::new(self.db);

        let latest = events
            .latest_occurrence(series_id)?
            .map(|e| e.target_date_time)
            .unwrap_or(original.target_date_time)
            .max(original.target_date_time);

        // edited occurrences turn into exceptions but still exist as children
        let materialised = events.count_children(series_id)?;
        let next = self
            .next_after(rule, original.target_date_time, latest.max(now))
            .map(|(target, position)| (target, position.max(materialised + 1)))
            .filter(|&(_, position)| !rule.limit_reached(position - 1));

        let Some((target, position)) = next else {
            rules.update_occurrence_dates(&rule.id, Some(latest.date()), None)?;
            msg_debug!(Message::SeriesEnded(series_id));
            return Ok(None);
        };

        let mut occurrence = CountdownEvent {
            id: None,
            target_date_time: target,
            created_at: now,
            updated_at: now,
            parent_event_id: Some(series_id),
            reminder_sent_at: None,
            reminder_snoozed_until: None,
            ..original.clone()
        };
        occurrence.id = Some(events.insert(&occurrence)?);

        let following = self
            .calculator
            .occurrences_after(rule, original.target_date_time, target, position, 1)
            .first()
            .map(|next| next.date());
        rules.update_occurrence_dates(&rule.id, Some(target.date()), following)?;

        msg_debug!(Message::OccurrenceGenerated(series_id, target.to_string()));

        Ok(Some(occurrence))
    }

    /// Generates one occurrence for every due rule whose original event is active.
    pub fn check_and_generate(&self, now: NaiveDateTime) -> Result<Vec<CountdownEvent>> {
        let events = Events::new(self.db);
        let mut generated = Vec::new();

        for rule in RecurrenceRules::new(self.db).due_by(now.date())? {
            let Some(original) = events.get(rule.event_id)? else {
                continue;
            };
            if !original.is_active {
                continue;
            }
            if let Some(occurrence) = self.generate_next_occurrence(&original, &rule, now)? {
                generated.push(occurrence);
            }
        }

        Ok(generated)
    }

    pub fn preview_future_occurrences(&self, event: &CountdownEvent, rule: &RecurrenceRule, count: usize) -> Vec<NaiveDateTime> {
        self.calculator.calculate_next_occurrences(rule, event.target_date_time, count)
    }

    /// Validates `rule`, binds it to `event` and stores it, replacing any
    /// previous rule. The event's own target is the series' first occurrence.
    ///
    /// Generated occurrences cannot start series of their own and are
    /// rejected with [`CountJoyError::OccurrenceOfSeries`].
    pub fn attach_rule(&self, event: &CountdownEvent, mut rule: RecurrenceRule) -> Result<RecurrenceRule> {
        let event_id = event.id.ok_or_else(|| msg_error_anyhow!(Message::EventIdRequired))?;
        if let Some(series_id) = event.parent_event_id {
            return Err(CountJoyError::OccurrenceOfSeries(series_id).into());
        }
        rule.validate()?;

        rule.event_id = event_id;
        rule.last_occurrence_date = Some(event.target_date_time.date());
        rule.next_occurrence_date = self
            .calculator
            .calculate_next_occurrences(&rule, event.target_date_time, 1)
            .first()
            .map(|next| next.date());

        RecurrenceRules::new(self.db).upsert(&rule)?;
        Ok(rule)
    }

    /// Drops the series' occurrences that are still ahead and the rule itself.
    /// Returns how many occurrences were deleted.
    pub fn delete_future_occurrences(&self, event_id: i64, now: NaiveDateTime) -> Result<usize> {
        let deleted = Events::new(self.db).delete_future_children(event_id, now)?;
        RecurrenceRules::new(self.db).delete_by_event(event_id)?;
        Ok(deleted)
    }

    /// Saves an edited occurrence.
    ///
    /// With `update_all` the descriptive fields are copied onto every future
    /// occurrence of the series. Otherwise only this event changes and, when
    /// it belongs to a series, its previous date becomes an exception so the
    /// edit is not overwritten by a regenerated occurrence. Returns how many
    /// other occurrences were updated.
    pub fn update_occurrence(&self, event: &CountdownEvent, update_all: bool, now: NaiveDateTime) -> Result<usize> {
        let id = event.id.ok_or_else(|| msg_error_anyhow!(Message::EventIdRequired))?;
        let events = Events::new(self.db);
        let rules = RecurrenceRules::new(self.db);
        let stored = events.require(id)?;
        let series_id = event.parent_event_id.unwrap_or(id);

        let mut updated = event.clone();
        updated.updated_at = now;
        events.update(&updated)?;

        if update_all {
            let mut touched = 0;
            for mut occurrence in events.fetch(EventQuery::Children(series_id))? {
                if occurrence.id == Some(id) || occurrence.target_date_time <= now {
                    continue;
                }
                copy_descriptive_fields(event, &mut occurrence);
                occurrence.updated_at = now;
                events.update(&occurrence)?;
                touched += 1;
            }
            return Ok(touched);
        }

        if let Some(mut rule) = rules.by_event(series_id)? {
            rule.add_exception(stored.target_date_time.date());
            rules.update(&rule)?;
        }

        Ok(0)
    }

    /// The first occurrence after `after`, with its 1-based position in the series.
    fn next_after(&self, rule: &RecurrenceRule, anchor: NaiveDateTime, after: NaiveDateTime) -> Option<(NaiveDateTime, u32)> {
        let mut current = anchor;
        let mut position = 0u32;

        for _ in 0..MAX_CANDIDATE_STEPS {
            let next = *self.calculator.occurrences_after(rule, anchor, current, position, 1).first()?;
            position += 1;
            if next > after {
                return Some((next, position));
            }
            current = next;
        }

        None
    }
}

fn copy_descriptive_fields(source: &CountdownEvent, target: &mut CountdownEvent) {
    target.title = source.title.clone();
    target.description = source.description.clone();
    target.category = source.category.clone();
    target.priority = source.priority;
    target.color = source.color.clone();
    target.icon = source.icon.clone();
    target.reminder_enabled = source.reminder_enabled;
    target.reminder_minutes = source.reminder_minutes;
}

/// Loads the rule of `event_id`, failing when the event has none.
pub fn require_rule(db: &Db, event_id: i64) -> Result<RecurrenceRule> {
    RecurrenceRules::new(db)
        .by_event(event_id)?
        .ok_or_else(|| CountJoyError::RuleNotFound(event_id).into())
}

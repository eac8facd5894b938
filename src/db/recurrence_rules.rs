//! Storage for recurrence rules.
//!
//! Each event has at most one rule (`event_id` is unique). Weekday sets and
//! exception dates are stored as comma-separated text.

use crate::db::db::Db;
use crate::libs::error::CountJoyError;
use crate::libs::recurrence::{decode_dates, decode_days, encode_dates, encode_days, RecurrenceEndType, RecurrencePattern, RecurrenceRule};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

const RULE_COLUMNS: &str = "id, event_id, pattern, interval_value, days_of_week, day_of_month, week_of_month, month_of_year,
    end_type, end_date, occurrence_count, exceptions, skip_weekends, skip_holidays, last_occurrence_date, next_occurrence_date";

const UPSERT_RULE: &str = "INSERT OR REPLACE INTO recurrence_rules (
    id, event_id, pattern, interval_value, days_of_week, day_of_month, week_of_month, month_of_year,
    end_type, end_date, occurrence_count, exceptions, skip_weekends, skip_holidays, last_occurrence_date, next_occurrence_date
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)";

const UPDATE_RULE: &str = "UPDATE recurrence_rules SET
    pattern = ?2, interval_value = ?3, days_of_week = ?4, day_of_month = ?5, week_of_month = ?6, month_of_year = ?7,
    end_type = ?8, end_date = ?9, occurrence_count = ?10, exceptions = ?11, skip_weekends = ?12, skip_holidays = ?13,
    last_occurrence_date = ?14, next_occurrence_date = ?15
WHERE id = ?1";

const UPDATE_OCCURRENCE_DATES: &str = "UPDATE recurrence_rules SET last_occurrence_date = ?2, next_occurrence_date = ?3 WHERE id = ?1";


const DELETE_RULE_BY_EVENT: &str = "DELETE FROM recurrence_rules WHERE event_id = ?1";

/// Repository for `recurrence_rules`.
///
/// An event has at most one rule (`event_id` is unique); the rule is removed
/// together with its event.
pub struct RecurrenceRules<'a> {
    conn: &'a Connection,
}

impl<'a> RecurrenceRules<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { conn: &db.conn }
    }

    /// Inserts the rule, replacing any rule the event already had.
    pub fn upsert(&self, rule: &RecurrenceRule) -> Result<()> {
        self.conn.execute(
            UPSERT_RULE,
            params![
                rule.id,
                rule.event_id,
                rule.pattern.as_str(),
                rule.interval,
                encode_days(&rule.days_of_week),
                rule.day_of_month,
                rule.week_of_month,
                rule.month_of_year,
                rule.end_type.as_str(),
                rule.end_date,
                rule.occurrence_count,
                encode_dates(&rule.exceptions),
                rule.skip_weekends,
                rule.skip_holidays,
                rule.last_occurrence_date,
                rule.next_occurrence_date,
            ],
        )?;
        Ok(())
    }

    /// Saves an edited rule under its existing id.
    ///
    /// # Errors
    ///
    /// [`CountJoyError::RuleNotFound`] when the rule was deleted meanwhile.
    pub fn update(&self, rule: &RecurrenceRule) -> Result<()> {
        let affected = self.conn.execute(
            UPDATE_RULE,
            params![
                rule.id,
                rule.pattern.as_str(),
                rule.interval,
                encode_days(&rule.days_of_week),
                rule.day_of_month,
                rule.week_of_month,
                rule.month_of_year,
                rule.end_type.as_str(),
                rule.end_date,
                rule.occurrence_count,
                encode_dates(&rule.exceptions),
                rule.skip_weekends,
                rule.skip_holidays,
                rule.last_occurrence_date,
                rule.next_occurrence_date,
            ],
        )?;
        if affected == 0 {
            return Err(CountJoyError::RuleNotFound(rule.event_id).into());
        }
        Ok(())
    }

    /// Moves the series bookkeeping forward; `next = None` marks the series as finished.
    pub fn update_occurrence_dates(&self, rule_id: &str, last: Option<NaiveDate>, next: Option<NaiveDate>) -> Result<()> {
        self.conn.execute(UPDATE_OCCURRENCE_DATES, params![rule_id, last, next])?;
        Ok(())
    }

    /// The rule attached to `event_id`, if it repeats.
    pub fn by_event(&self, event_id: i64) -> Result<Option<RecurrenceRule>> {
        let sql = format!("SELECT {} FROM recurrence_rules WHERE event_id = ?1", RULE_COLUMNS);
        let rule = self.conn.query_row(&sql, params![event_id], map_rule).optional()?;
        Ok(rule)
    }

    /// Every stored rule ordered by event id.
    pub fn all(&self) -> Result<Vec<RecurrenceRule>> {
        let sql = format!("SELECT {} FROM recurrence_rules ORDER BY event_id", RULE_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rules = stmt.query_map([], map_rule)?.collect::<Result<Vec<_>, _>>()?;
        Ok(rules)
    }

    /// Rules whose latest occurrence falls on or before `date` and that still have a next one.
    pub fn due_by(&self, date: NaiveDate) -> Result<Vec<RecurrenceRule>> {
        let sql = format!(
            "SELECT {} FROM recurrence_rules
             WHERE next_occurrence_date IS NOT NULL AND last_occurrence_date IS NOT NULL AND last_occurrence_date <= ?1
             ORDER BY next_occurrence_date",
            RULE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rules = stmt.query_map(params![date], map_rule)?.collect::<Result<Vec<_>, _>>()?;
        Ok(rules)
    }

    /// Removes the event's rule; returns whether one existed.
    pub fn delete_by_event(&self, event_id: i64) -> Result<bool> {
        let affected = self.conn.execute(DELETE_RULE_BY_EVENT, params![event_id])?;
        Ok(affected > 0)
    }
}

fn map_rule(row: &Row) -> rusqlite::Result<RecurrenceRule> {
    let pattern: String = row.get(2)?;
    let end_type: String = row.get(8)?;
    let days: String = row.get(4)?;
    let exceptions: String = row.get(11)?;

    Ok(RecurrenceRule {
        id: row.get(0)?,
        event_id: row.get(1)?,
        pattern: pattern.parse().unwrap_or(RecurrencePattern::Daily),
        interval: row.get(3)?,
        days_of_week: decode_days(&days),
        day_of_month: row.get(5)?,
        week_of_month: row.get(6)?,
        month_of_year: row.get(7)?,
        end_type: end_type.parse().unwrap_or(RecurrenceEndType::Never),
        end_date: row.get(9)?,
        occurrence_count: row.get(10)?,
        exceptions: decode_dates(&exceptions),
        skip_weekends: row.get(12)?,
        skip_holidays: row.get(13)?,
        last_occurrence_date: row.get(14)?,
        next_occurrence_date: row.get(15)?,
    })
}

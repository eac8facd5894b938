//! Countdown event persistence.
//!
//! ```rust,no_run
//! use chrono::Local;
//! use countjoy::db::{db::Db, events::{EventQuery, Events}};
//! use countjoy::libs::event::CountdownEvent;
//!
//! let db = Db::new()?;
//! let events = Events::new(&db);
//! let now = Local::now().naive_local();
//! let id = events.insert(&CountdownEvent::new("Launch", now + chrono::Duration::days(7), now))?;
//! let upcoming = events.fetch(EventQuery::Active)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::db::db::Db;
use crate::libs::error::CountJoyError;
use crate::libs::event::CountdownEvent;
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const EVENT_COLUMNS: &str = "id, title, description, category, target_date_time, reminder_enabled, reminder_minutes,
    color, icon, created_at, updated_at, is_active, priority, parent_event_id, reminder_sent_at, reminder_snoozed_until";

const INSERT_EVENT: &str = "INSERT INTO countdown_events (
    title, description, category, target_date_time, reminder_enabled, reminder_minutes,
    color, icon, created_at, updated_at, is_active, priority, parent_event_id, reminder_sent_at, reminder_snoozed_until
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)";

const UPDATE_EVENT: &str = "UPDATE countdown_events SET
    title = ?2, description = ?3, category = ?4, target_date_time = ?5, reminder_enabled = ?6, reminder_minutes = ?7,
    color = ?8, icon = ?9, updated_at = ?10, is_active = ?11, priority = ?12, parent_event_id = ?13, reminder_sent_at = ?14,
    reminder_snoozed_until = ?15
WHERE id = ?1";

const DELETE_EVENT: &str = "DELETE FROM countdown_events WHERE id = ?1";

const SET_ACTIVE: &str = "UPDATE countdown_events SET is_active = ?2, updated_at = ?3 WHERE id = ?1";

const MARK_REMINDER_SENT: &str = "UPDATE countdown_events SET reminder_sent_at = ?2, reminder_snoozed_until = NULL WHERE id = ?1";

const SNOOZE_REMINDER: &str = "UPDATE countdown_events SET reminder_sent_at = NULL, reminder_snoozed_until = ?2 WHERE id = ?1";

const SELECT_CATEGORIES: &str = "SELECT DISTINCT category FROM countdown_events ORDER BY category";

const COUNT_CHILDREN: &str = "SELECT COUNT(*) FROM countdown_events WHERE parent_event_id = ?1";

const DELETE_FUTURE_CHILDREN: &str = "DELETE FROM countdown_events WHERE parent_event_id = ?1 AND target_date_time > ?2";

/// Which events [`Events::fetch`] returns. Results are ordered by target date.
#[derive(Debug, Clone)]
pub enum EventQuery {
    All,
    Active,
    ByIds(Vec<i64>),
    /// Occurrences generated from the given series event.
    Children(i64),
}

/// Repository for `countdown_events`, borrowing the connection of a [`Db`].
pub struct Events<'a> {
    conn: &'a Connection,
}

impl<'a> Events<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { conn: &db.conn }
    }

    /// Stores a new event and returns its id.
    pub fn insert(&self, event: &CountdownEvent) -> Result<i64> {
        let affected = self.conn.execute(
            INSERT_EVENT,
            params![
                event.title,
                event.description,
                event.category,
                event.target_date_time,
                event.reminder_enabled,
                event.reminder_minutes,
                event.color,
                event.icon,
                event.created_at,
                event.updated_at,
                event.is_active,
                event.priority,
                event.parent_event_id,
                event.reminder_sent_at,
                event.reminder_snoozed_until,
            ],
        )?;

        if affected == 0 {
            return Err(msg_error_anyhow!(Message::EventCreateFailed));
        }

        Ok(self.conn.last_insert_rowid())
    }

    /// Saves `event` over its stored row; `created_at` is kept.
    ///
    /// # Errors
    ///
    /// Fails when `event` has no id or when no row has that id
    /// ([`CountJoyError::EventNotFound`]).
    pub fn update(&self, event: &CountdownEvent) -> Result<()> {
        let id = event.id.ok_or_else(|| msg_error_anyhow!(Message::EventIdRequired))?;
        let affected = self.conn.execute(
            UPDATE_EVENT,
            params![
                id,
                event.title,
                event.description,
                event.category,
                event.target_date_time,
                event.reminder_enabled,
                event.reminder_minutes,
                event.color,
                event.icon,
                event.updated_at,
                event.is_active,
                event.priority,
                event.parent_event_id,
                event.reminder_sent_at,
                event.reminder_snoozed_until,
            ],
        )?;

        if affected == 0 {
            return Err(CountJoyError::EventNotFound(id).into());
        }

        Ok(())
    }

    /// Deletes the event together with its milestones and recurrence rule.
    pub fn delete(&self, id: i64) -> Result<()> {
        let affected = self.conn.execute(DELETE_EVENT, params![id])?;

        if affected == 0 {
            return Err(CountJoyError::EventNotFound(id).into());
        }

        Ok(())
    }

    /// Loads one event, `None` when the id is unknown.
    pub fn get(&self, id: i64) -> Result<Option<CountdownEvent>> {
        let sql = format!("SELECT {} FROM countdown_events WHERE id = ?1", EVENT_COLUMNS);
        let event = self.conn.query_row(&sql, params![id], map_event).optional()?;
        Ok(event)
    }

    /// Like [`Events::get`] but treats a missing event as an error.
    pub fn require(&self, id: i64) -> Result<CountdownEvent> {
        self.get(id)?.ok_or_else(|| CountJoyError::EventNotFound(id).into())
    }

    /// Events selected by `query`, ordered by target date and then id.
    ///
    /// An empty [`EventQuery::ByIds`] list returns nothing without touching the database.
    pub fn fetch(&self, query: EventQuery) -> Result<Vec<CountdownEvent>> {
        let (condition, values): (String, Vec<i64>) = match query {
            EventQuery::All => (String::new(), Vec::new()),
            EventQuery::Active => ("WHERE is_active = 1".to_string(), Vec::new()),
            EventQuery::ByIds(ids) => {
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                let placeholders = vec!["?"; ids.len()].join(", ");
                (format!("WHERE id IN ({})", placeholders), ids)
            }
            EventQuery::Children(parent) => ("WHERE parent_event_id = ?".to_string(), vec![parent]),
        };

        let sql = format!("SELECT {} FROM countdown_events {} ORDER BY target_date_time, id", EVENT_COLUMNS, condition);
        let mut stmt = self.conn.prepare(&sql)?;
        let events = stmt.query_map(params_from_iter(values.iter()), map_event)?.collect::<Result<Vec<_>, _>>()?;

        Ok(events)
    }

    /// Archives (`active = false`) or restores an event.
    pub fn set_active(&self, id: i64, active: bool, now: NaiveDateTime) -> Result<()> {
        let affected = self.conn.execute(SET_ACTIVE, params![id, active, now])?;

        if affected == 0 {
            return Err(CountJoyError::EventNotFound(id).into());
        }

        Ok(())
    }

    /// Records that the reminder fired at `at` and ends any snooze.
    pub fn mark_reminder_sent(&self, id: i64, at: NaiveDateTime) -> Result<()> {
        self.conn.execute(MARK_REMINDER_SENT, params![id, at])?;
        Ok(())
    }

    /// Re-arms the reminder of `id` to fire at `until`.
    pub fn snooze_reminder(&self, id: i64, until: NaiveDateTime) -> Result<()> {
        let affected = self.conn.execute(SNOOZE_REMINDER, params![id, until])?;
        if affected == 0 {
            return Err(CountJoyError::EventNotFound(id).into());
        }
        Ok(())
    }

    pub fn categories(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(SELECT_CATEGORIES)?;
        let categories = stmt.query_map([], |row| row.get(0))?.collect::<Result<Vec<String>, _>>()?;
        Ok(categories)
    }

    /// The series event or its generated occurrence with the latest target.
    pub fn latest_occurrence(&self, series_id: i64) -> Result<Option<CountdownEvent>> {
        let sql = format!(
            "SELECT {} FROM countdown_events WHERE id = ?1 OR parent_event_id = ?1 ORDER BY target_date_time DESC, id DESC LIMIT 1",
            EVENT_COLUMNS
        );
        let event = self.conn.query_row(&sql, params![series_id], map_event).optional()?;
        Ok(event)
    }

    /// Number of occurrences generated from series `parent_id`, past ones included.
    pub fn count_children(&self, parent_id: i64) -> Result<u32> {
        let count: u32 = self.conn.query_row(COUNT_CHILDREN, params![parent_id], |row| row.get(0))?;
        Ok(count)
    }

    /// Removes generated occurrences whose target lies after `now`; returns how many went.
    pub fn delete_future_children(&self, parent_id: i64, now: NaiveDateTime) -> Result<usize> {
        let deleted = self.conn.execute(DELETE_FUTURE_CHILDREN, params![parent_id, now])?;
        Ok(deleted)
    }
}

fn map_event(row: &Row) -> rusqlite::Result<CountdownEvent> {
    Ok(CountdownEvent {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        target_date_time: row.get(4)?,
        reminder_enabled: row.get(5)?,
        reminder_minutes: row.get(6)?,
        color: row.get(7)?,
        icon: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
        is_active: row.get(11)?,
        priority: row.get(12)?,
        parent_event_id: row.get(13)?,
        reminder_sent_at: row.get(14)?,
        reminder_snoozed_until: row.get(15)?,
    })
}

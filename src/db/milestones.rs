//! Milestone persistence.

use crate::db::db::Db;
use crate::libs::error::CountJoyError;
use crate::libs::milestone::{Milestone, MilestoneType};
use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};

const MILESTONE_COLUMNS: &str =
    "id, event_id, milestone_type, value, title, message, notification_enabled, achieved, achieved_at, celebration_effect";

const INSERT_MILESTONE: &str = "INSERT OR REPLACE INTO milestones (
    id, event_id, milestone_type, value, title, message, notification_enabled, achieved, achieved_at, celebration_effect
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

const UPDATE_MILESTONE: &str = "UPDATE milestones SET
    milestone_type = ?2, value = ?3, title = ?4, message = ?5, notification_enabled = ?6,
    achieved = ?7, achieved_at = ?8, celebration_effect = ?9
WHERE id = ?1";

const MARK_ACHIEVED: &str = "UPDATE milestones SET achieved = 1, achieved_at = ?2 WHERE id = ?1";

const DELETE_MILESTONE: &str = "DELETE FROM milestones WHERE id = ?1";

const DELETE_BY_EVENT: &str = "DELETE FROM milestones WHERE event_id = ?1";

/// Repository for `milestones`. Rows are keyed by the milestone's UUID string.
pub struct Milestones<'a> {
    conn: &'a Connection,
}

impl<'a> Milestones<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { conn: &db.conn }
    }

    /// Stores one milestone, replacing a row with the same id.
    pub fn insert(&self, milestone: &Milestone) -> Result<()> {
        insert_with(self.conn, milestone)
    }

    /// Stores all milestones in one transaction, replacing rows with the same id.
    pub fn insert_many(&self, milestones: &[Milestone]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for milestone in milestones {
            insert_with(&tx, milestone)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Saves an edited milestone. The owning event cannot change.
    ///
    /// # Errors
    ///
    /// [`CountJoyError::MilestoneNotFound`] when no row has the milestone's id.
    pub fn update(&self, milestone: &Milestone) -> Result<()> {
        let affected = self.conn.execute(
            UPDATE_MILESTONE,
            params![
                milestone.id,
                milestone.milestone_type.as_str(),
                milestone.value,
                milestone.title,
                milestone.message,
                milestone.notification_enabled,
                milestone.achieved,
                milestone.achieved_at,
                milestone.celebration_effect.as_str(),
            ],
        )?;

        if affected == 0 {
            return Err(CountJoyError::MilestoneNotFound(milestone.id.clone()).into());
        }

        Ok(())
    }

    /// Flags the milestone as reached at `at`.
    pub fn mark_achieved(&self, id: &str, at: NaiveDateTime) -> Result<()> {
        let affected = self.conn.execute(MARK_ACHIEVED, params![id, at])?;

        if affected == 0 {
            return Err(CountJoyError::MilestoneNotFound(id.to_string()).into());
        }

        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let affected = self.conn.execute(DELETE_MILESTONE, params![id])?;

        if affected == 0 {
            return Err(CountJoyError::MilestoneNotFound(id.to_string()).into());
        }

        Ok(())
    }

    /// Removes all milestones of an event; returns how many went.
    pub fn delete_by_event(&self, event_id: i64) -> Result<usize> {
        Ok(self.conn.execute(DELETE_BY_EVENT, params![event_id])?)
    }

    pub fn get(&self, id: &str) -> Result<Option<Milestone>> {
        let sql = format!("SELECT {} FROM milestones WHERE id = ?1", MILESTONE_COLUMNS);
        Ok(self.conn.query_row(&sql, params![id], map_milestone).optional()?)
    }

    /// Milestones of an event, lowest percentage first, then furthest time-based first.
    pub fn by_event(&self, event_id: i64) -> Result<Vec<Milestone>> {
        self.select(
            "WHERE event_id = ?1 ORDER BY milestone_type, CASE WHEN milestone_type = 'TIME_BASED' THEN -value ELSE value END",
            event_id,
        )
    }

    /// Milestones of an event that are still pending.
    pub fn unachieved(&self, event_id: i64) -> Result<Vec<Milestone>> {
        self.select("WHERE event_id = ?1 AND achieved = 0 ORDER BY milestone_type, value", event_id)
    }

    pub fn all(&self) -> Result<Vec<Milestone>> {
        let sql = format!("SELECT {} FROM milestones ORDER BY event_id, milestone_type, value", MILESTONE_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let milestones = stmt.query_map([], map_milestone)?.collect::<Result<Vec<_>, _>>()?;
        Ok(milestones)
    }

    /// Achieved milestones across all events, most recent first.
    pub fn achievement_history(&self) -> Result<Vec<Milestone>> {
        let sql = format!("SELECT {} FROM milestones WHERE achieved = 1 ORDER BY achieved_at DESC", MILESTONE_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let milestones = stmt.query_map([], map_milestone)?.collect::<Result<Vec<_>, _>>()?;
        Ok(milestones)
    }

    fn select(&self, clause: &str, event_id: i64) -> Result<Vec<Milestone>> {
        let sql = format!("SELECT {} FROM milestones {}", MILESTONE_COLUMNS, clause);
        let mut stmt = self.conn.prepare(&sql)?;
        let milestones = stmt.query_map(params![event_id], map_milestone)?.collect::<Result<Vec<_>, _>>()?;
        Ok(milestones)
    }
}

fn insert_with(conn: &Connection, milestone: &Milestone) -> Result<()> {
    conn.execute(
        INSERT_MILESTONE,
        params![
            milestone.id,
            milestone.event_id,
            milestone.milestone_type.as_str(),
            milestone.value,
            milestone.title,
            milestone.message,
            milestone.notification_enabled,
            milestone.achieved,
            milestone.achieved_at,
            milestone.celebration_effect.as_str(),
        ],
    )?;
    Ok(())
}

fn map_milestone(row: &Row) -> rusqlite::Result<Milestone> {
    let milestone_type: String = row.get(2)?;
    let effect: String = row.get(9)?;

    Ok(Milestone {
        id: row.get(0)?,
        event_id: row.get(1)?,
        milestone_type: milestone_type.parse().unwrap_or(MilestoneType::Custom),
        value: row.get(3)?,
        title: row.get(4)?,
        message: row.get(5)?,
        notification_enabled: row.get(6)?,
        achieved: row.get(7)?,
        achieved_at: row.get(8)?,
        celebration_effect: effect.parse().unwrap_or_default(),
    })
}


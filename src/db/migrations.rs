//! Versioned schema migrations.
//!
//! Each migration is a numbered function applied inside a transaction. The
//! `migrations` table records what has been applied, so opening an older
//! database file upgrades it in place.
//!
//! ```rust,no_run
//! use countjoy::db::migrations::{get_db_version, init_with_migrations};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open("countjoy.db")?;
//! init_with_migrations(&mut conn)?;
//! let version = get_db_version(&conn)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_info, msg_success};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

/// Registry of every schema change, in version order.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: countdown events and their lookup indices
        self.add_migration(1, "create_countdown_events", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS countdown_events (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    description TEXT,
                    category TEXT NOT NULL DEFAULT 'General',
                    target_date_time TIMESTAMP NOT NULL,
                    reminder_enabled BOOLEAN NOT NULL DEFAULT FALSE,
                    reminder_minutes INTEGER,
                    color TEXT,
                    icon TEXT,
                    created_at TIMESTAMP NOT NULL,
                    updated_at TIMESTAMP NOT NULL,
                    is_active BOOLEAN NOT NULL DEFAULT TRUE,
                    priority INTEGER NOT NULL DEFAULT 0
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_events_category ON countdown_events(category)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_events_target ON countdown_events(target_date_time)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_events_active ON countdown_events(is_active)", [])?;
            Ok(())
        });

        // Version 2: milestones attached to events
        self.add_migration(2, "create_milestones", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS milestones (
                    id TEXT PRIMARY KEY,
                    event_id INTEGER NOT NULL,
                    milestone_type TEXT NOT NULL,
                    value REAL NOT NULL,
                    title TEXT NOT NULL,
                    message TEXT NOT NULL,
                    notification_enabled BOOLEAN NOT NULL DEFAULT TRUE,
                    achieved BOOLEAN NOT NULL DEFAULT FALSE,
                    achieved_at TIMESTAMP,
                    celebration_effect TEXT NOT NULL DEFAULT 'CONFETTI',
                    FOREIGN KEY (event_id) REFERENCES countdown_events(id) ON DELETE CASCADE
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_milestones_event ON milestones(event_id)", [])?;
            Ok(())
        });

        // Version 3: one recurrence rule per event
        self.add_migration(3, "create_recurrence_rules", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS recurrence_rules (
                    id TEXT PRIMARY KEY,
                    event_id INTEGER NOT NULL UNIQUE,
                    pattern TEXT NOT NULL,
                    interval_value INTEGER NOT NULL DEFAULT 1,
                    days_of_week TEXT NOT NULL DEFAULT '',
                    day_of_month INTEGER,
                    week_of_month INTEGER,
                    month_of_year INTEGER,
                    end_type TEXT NOT NULL DEFAULT 'NEVER',
                    end_date DATE,
                    occurrence_count INTEGER,
                    exceptions TEXT NOT NULL DEFAULT '',
                    skip_weekends BOOLEAN NOT NULL DEFAULT FALSE,
                    skip_holidays BOOLEAN NOT NULL DEFAULT FALSE,
                    last_occurrence_date DATE,
                    next_occurrence_date DATE,
                    FOREIGN KEY (event_id) REFERENCES countdown_events(id) ON DELETE CASCADE
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_rules_next ON recurrence_rules(next_occurrence_date)", [])?;
            Ok(())
        });

        // Version 4: link generated occurrences to their series and remember sent reminders
        self.add_migration(4, "add_occurrence_tracking", |tx| {
            tx.execute(
                "ALTER TABLE countdown_events ADD COLUMN parent_event_id INTEGER
                    REFERENCES countdown_events(id) ON DELETE SET NULL",
                [],
            )?;
            tx.execute("ALTER TABLE countdown_events ADD COLUMN reminder_sent_at TIMESTAMP", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_events_parent ON countdown_events(parent_event_id)", [])?;
            Ok(())
        });

        // Version 5: snoozed reminders fire again at a set moment
        self.add_migration(5, "add_reminder_snooze", |tx| {
            tx.execute("ALTER TABLE countdown_events ADD COLUMN reminder_snoozed_until TIMESTAMP", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the recorded version in a single transaction.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;

        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e);
                }
            }
        }

        tx.commit()?;
        msg_debug!(Message::AllMigrationsCompleted);

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0)).unwrap_or(Some(0));

        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i32 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;

        Ok(count > 0)
    }

    /// Applied migrations as `(version, name, applied_at)`.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;

        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }

    /// Forgets migrations above `target_version`. Schema objects are left in place.
    #[cfg(debug_assertions)]
    pub fn rollback_to(&self, conn: &mut Connection, target_version: u32) -> Result<()> {
        let current_version = self.get_current_version(conn)?;

        if target_version >= current_version {
            msg_info!(Message::NothingToRollback);
            return Ok(());
        }

        msg_info!(Message::RollingBack(current_version, target_version));
        conn.execute("DELETE FROM migrations WHERE version > ?1", params![target_version])?;
        msg_success!(Message::RollbackCompleted(target_version));
        Ok(())
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    let current = manager.get_current_version(conn)?;
    Ok(current < manager.latest_version())
}

//! SQLite connection management.
//!
//! `Db` owns the single connection the repositories borrow. Every
//! constructor except [`Db::new_without_migrations`] brings the schema up to
//! date before returning, and all of them enable foreign-key enforcement so
//! milestones and recurrence rules follow their event on delete.

use crate::db::migrations::init_with_migrations;
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;

pub const DB_FILE_NAME: &str = "countjoy.db";

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the database in the user's data directory and applies pending migrations.
    pub fn new() -> Result<Db> {
        let db_file_path = DataStorage::new().get_path(DB_FILE_NAME)?;
        Self::open(db_file_path)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Db> {
        let mut conn = Connection::open(path)?;
        Self::configure(&conn)?;
        init_with_migrations(&mut conn)?;
        Ok(Db { conn })
    }

    pub fn in_memory() -> Result<Db> {
        let mut conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        init_with_migrations(&mut conn)?;
        Ok(Db { conn })
    }

    /// Raw connection to the data-directory database, schema left untouched.
    pub fn new_without_migrations() -> Result<Connection> {
        let db_file_path = DataStorage::new().get_path(DB_FILE_NAME)?;
        let conn = Connection::open(db_file_path)?;
        Self::configure(&conn)?;
        Ok(conn)
    }

    fn configure(conn: &Connection) -> Result<()> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    }
}

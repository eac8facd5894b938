//! SQLite persistence.
//!
//! [`db::Db`] owns the connection and applies [`migrations`] on open. The
//! repositories borrow it:
//!
//! ```rust,no_run
//! use countjoy::db::{db::Db, events::Events};
//! use countjoy::libs::{event::CountdownEvent, formatter};
//!
//! let db = Db::new()?;
//! let now = formatter::now();
//! let id = Events::new(&db).insert(&CountdownEvent::new("Launch", formatter::in_days(now, 30)?, now))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection setup and constructors.
pub mod db;

/// Versioned schema changes and the `migrations` bookkeeping table.
pub mod migrations;

/// Countdown events, including generated occurrences of recurring series.
pub mod events;

/// Milestones attached to events.
pub mod milestones;

/// One recurrence rule per series event.
pub mod recurrence_rules;

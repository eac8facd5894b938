//! # CountJoy
//!
//! Countdowns to the events that matter: birthdays, deadlines, trips.
//!
//! Events carry optional milestones ("Halfway There!", "One Week!") that are
//! celebrated as the target approaches, and recurrence rules that materialise
//! the next occurrence of a repeating event. A background watcher checks both
//! and fires reminders. Everything is stored in a local SQLite database.
//!
//! ```rust,no_run
//! use countjoy::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;

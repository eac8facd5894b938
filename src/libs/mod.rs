//! Domain logic and application infrastructure.
//!
//! - Events and countdowns: [`event`], [`countdown`], [`validation`], [`template`]
//! - Milestones: [`milestone`]
//! - Recurrence: [`recurrence`] (rules and date stepping), [`generator`] (occurrence materialisation)
//! - Background checks: [`watcher`], [`reminder`], [`daemon`]
//! - Reporting: [`analytics`], [`export`], [`view`]
//! - Infrastructure: [`config`], [`data_storage`], [`error`], [`formatter`], [`messages`]

pub mod analytics;
pub mod config;
pub mod countdown;
pub mod daemon;
pub mod data_storage;
pub mod error;
pub mod event;
pub mod export;
pub mod formatter;
pub mod generator;
pub mod messages;
pub mod milestone;
pub mod recurrence;
pub mod reminder;
pub mod template;
pub mod validation;
pub mod view;
pub mod watcher;

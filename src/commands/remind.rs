use crate::{
    db::{db::Db, events::Events},
    libs::{
        config::Config,
        formatter,
        messages::Message,
        reminder::{snooze, suggested_reminder_times},
        view::View,
    },
    msg_info, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct RemindArgs {
    #[command(subcommand)]
    command: RemindCommand,
}

#[derive(Debug, Subcommand)]
enum RemindCommand {
    /// Fire an event's reminder again later
    Snooze {
        id: i64,
        /// Defaults to the first configured snooze length
        #[arg(short, long)]
        minutes: Option<i64>,
    },
    /// Suggest reminder times from the event's category
    Suggest {
        id: i64,
        /// Set the reminder to the earliest suggestion
        #[arg(long)]
        apply: bool,
    },
}

pub fn cmd(args: RemindArgs) -> Result<()> {
    let now = formatter::now();
    let config = Config::read()?;
    let date_format = config.display().date_format;
    let db = Db::new()?;

    match args.command {
        RemindCommand::Snooze { id, minutes } => {
            let minutes = minutes.unwrap_or_else(|| config.watcher().default_snooze());
            let until = snooze(&db, id, minutes, now)?;
            let title = Events::new(&db).require(id)?.title;
            msg_success!(Message::ReminderSnoozed(title, formatter::format_date_time(&until, &date_format)));
        }
        RemindCommand::Suggest { id, apply } => {
            let events = Events::new(&db);
            let mut event = events.require(id)?;
            let suggestions = suggested_reminder_times(&event, now);

            let Some(&first) = suggestions.first() else {
                msg_info!(Message::NoSuggestions(event.title));
                return Ok(());
            };
            View::reminder_suggestions(&suggestions, event.target_date_time, &date_format);

            if apply {
                event.reminder_enabled = true;
                event.reminder_minutes = Some((event.target_date_time - first).num_minutes());
                event.reminder_sent_at = None;
                event.reminder_snoozed_until = None;
                event.updated_at = now;
                events.update(&event)?;
                msg_success!(Message::ReminderSetFromSuggestion(
                    event.title,
                    formatter::format_date_time(&first, &date_format)
                ));
            }
        }
    }

    Ok(())
}

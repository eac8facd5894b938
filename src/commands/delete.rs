use crate::{
    db::{db::Db, events::Events},
    libs::{formatter, generator::RecurrenceGenerator, messages::Message, recurrence::RecurrenceCalculator},
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct DeleteArgs {
    id: i64,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
    /// Also delete the series' occurrences that are still ahead
    #[arg(long)]
    future: bool,
}

pub fn cmd(args: DeleteArgs) -> Result<()> {
    let now = formatter::now();
    let db = Db::new()?;
    let events = Events::new(&db);
    let event = events.require(args.id)?;

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::ConfirmDeleteEvent(event.title.clone()).to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::OperationCancelled);
            return Ok(());
        }
    }

    if args.future {
        let deleted = RecurrenceGenerator::new(&db, RecurrenceCalculator::new()).delete_future_occurrences(args.id, now)?;
        msg_info!(Message::OccurrencesDeleted(deleted));
    }

    events.delete(args.id)?;
    msg_success!(Message::EventDeleted(event.title));
    Ok(())
}

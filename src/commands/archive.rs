use crate::{
    db::{db::Db, events::Events},
    libs::{formatter, messages::Message},
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ArchiveArgs {
    id: i64,
}

/// Marks an event inactive. Archived events count as completed in statistics.
pub fn archive(args: ArchiveArgs) -> Result<()> {
    set_active(args.id, false)
}

pub fn restore(args: ArchiveArgs) -> Result<()> {
    set_active(args.id, true)
}

fn set_active(id: i64, active: bool) -> Result<()> {
    let db = Db::new()?;
    let events = Events::new(&db);
    let event = events.require(id)?;

    if event.is_active == active {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }

    events.set_active(id, active, formatter::now())?;
    if active {
        msg_success!(Message::EventRestored(event.title));
    } else {
        msg_success!(Message::EventArchived(event.title));
    }
    Ok(())
}

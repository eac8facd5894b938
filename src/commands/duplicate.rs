use crate::{
    db::{db::Db, events::Events, milestones::Milestones},
    libs::{formatter, messages::Message, milestone::Milestone},
    msg_success,
};
use anyhow::Result;
use clap::Args;
use uuid::Uuid;

#[derive(Debug, Args)]
pub struct DuplicateArgs {
    id: i64,
    /// Copy the event's milestones as well, reset to unachieved
    #[arg(short, long)]
    milestones: bool,
}

pub fn cmd(args: DuplicateArgs) -> Result<()> {
    let now = formatter::now();
    let db = Db::new()?;
    let events = Events::new(&db);

    let copy = events.require(args.id)?.duplicate(now);
    let new_id = events.insert(&copy)?;

    if args.milestones {
        let repo = Milestones::new(&db);
        let copies: Vec<Milestone> = repo
            .by_event(args.id)?
            .into_iter()
            .map(|m| Milestone {
                id: Uuid::new_v4().to_string(),
                event_id: new_id,
                achieved: false,
                achieved_at: None,
                ..m
            })
            .collect();
        repo.insert_many(&copies)?;
    }

    msg_success!(Message::EventDuplicated(args.id, new_id));
    Ok(())
}

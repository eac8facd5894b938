use crate::{
    db::{db::Db, events::Events, milestones::Milestones, recurrence_rules::RecurrenceRules},
    libs::{config::Config, formatter, view::View},
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ShowArgs {
    id: i64,
}

pub fn cmd(args: ShowArgs) -> Result<()> {
    let now = formatter::now();
    let display = Config::read()?.display();
    let db = Db::new()?;

    let event = Events::new(&db).require(args.id)?;
    let milestones = Milestones::new(&db).by_event(args.id)?;
    let series_id = event.parent_event_id.unwrap_or(args.id);
    let rule = RecurrenceRules::new(&db).by_event(series_id)?;

    View::event_detail(&event, &milestones, rule.as_ref(), now, &display);
    Ok(())
}

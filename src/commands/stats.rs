use crate::{
    db::{
        db::Db,
        events::{EventQuery, Events},
        milestones::Milestones,
    },
    libs::{analytics::{self, TimeRange}, formatter, messages::Message, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[arg(short, long, value_enum, default_value_t = TimeRange::AllTime)]
    range: TimeRange,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

pub fn cmd(args: StatsArgs) -> Result<()> {
    let now = formatter::now();
    let db = Db::new()?;

    let events = Events::new(&db).fetch(EventQuery::All)?;
    if events.is_empty() {
        msg_info!(Message::NoEventsFound);
        return Ok(());
    }
    let milestones = Milestones::new(&db).all()?;

    let report = analytics::report(&events, &milestones, args.range, now);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    msg_print!(Message::StatsHeader(report.time_range.display_name().to_string()), true);
    View::report(&report);
    Ok(())
}

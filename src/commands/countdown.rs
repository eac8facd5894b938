use crate::{
    db::{
        db::Db,
        events::{EventQuery, Events},
    },
    libs::{config::Config, countdown, formatter, messages::Message, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct CountdownArgs {
    /// Show a single event; all upcoming events otherwise
    id: Option<i64>,
    /// Largest unit only, e.g. "5 days"
    #[arg(short, long)]
    short: bool,
    #[arg(long)]
    no_seconds: bool,
}

pub fn cmd(args: CountdownArgs) -> Result<()> {
    let now = formatter::now();
    let display = Config::read()?.display();
    let include_seconds = display.include_seconds && !args.no_seconds;
    let db = Db::new()?;
    let events = Events::new(&db);

    if let Some(id) = args.id {
        let event = events.require(id)?;
        let time = countdown::calculate(&event, now);
        let remaining = if args.short {
            time.to_short_string()
        } else {
            event.formatted_countdown(now, include_seconds)
        };
        msg_print!(Message::CountdownLine(event.title, remaining));
        return Ok(());
    }

    let upcoming: Vec<_> = events
        .fetch(EventQuery::Active)?
        .into_iter()
        .filter(|e| e.target_date_time > now)
        .collect();
    if upcoming.is_empty() {
        msg_info!(Message::NoEventsFound);
        return Ok(());
    }

    View::countdowns(&upcoming, now, include_seconds, args.short);
    Ok(())
}

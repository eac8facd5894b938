use crate::{
    db::{
        db::Db,
        events::{EventQuery, Events},
    },
    libs::{
        config::Config,
        event::{filter_and_sort, parse_priority, EventFilter, SortOption},
        formatter,
        messages::Message,
        view::View,
    },
    msg_info,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Match against title and description
    #[arg(short, long)]
    search: Option<String>,
    #[arg(short, long)]
    category: Option<String>,
    #[arg(short, long, value_parser = parse_priority)]
    priority: Option<i32>,
    #[arg(long, value_enum, default_value_t = SortOption::Date)]
    sort: SortOption,
    /// Include events whose target has passed
    #[arg(short, long)]
    all: bool,
    /// Include archived events
    #[arg(short, long)]
    inactive: bool,
}

pub fn cmd(args: ListArgs) -> Result<()> {
    let now = formatter::now();
    let display = Config::read()?.display();
    let db = Db::new()?;

    let filter = EventFilter {
        search: args.search,
        category: args.category,
        priority: args.priority,
        include_past: args.all,
        include_inactive: args.inactive,
    };

    let events = filter_and_sort(Events::new(&db).fetch(EventQuery::All)?, &filter, args.sort, now);
    if events.is_empty() {
        msg_info!(Message::NoEventsFound);
        return Ok(());
    }

    View::events(&events, now, &display);
    Ok(())
}

use crate::{
    db::{db::Db, events::Events},
    libs::{
        config::Config,
        event::{parse_priority, CountdownEvent},
        formatter,
        generator::RecurrenceGenerator,
        messages::Message,
        recurrence::RecurrenceCalculator,
        validation,
    },
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct EditArgs {
    id: i64,
    #[arg(short, long)]
    title: Option<String>,
    #[arg(short, long)]
    date: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(short, long)]
    category: Option<String>,
    #[arg(short, long, value_parser = parse_priority)]
    priority: Option<i32>,
    /// Reminder in minutes before the target; 0 turns it off
    #[arg(short, long)]
    reminder: Option<i64>,
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    icon: Option<String>,
    /// Apply the changes to every future occurrence of the series
    #[arg(long)]
    series: bool,
}

pub fn cmd(args: EditArgs) -> Result<()> {
    let now = formatter::now();
    let config = Config::read()?;
    let db = Db::new()?;

    let current = Events::new(&db).require(args.id)?;
    let edited = apply_changes(current.clone(), &args)?;
    if edited == current {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }

    let edited = validation::prepare(edited, now)?;
    let generator = RecurrenceGenerator::new(&db, RecurrenceCalculator::with_holidays(config.recurrence().holidays));
    let touched = generator.update_occurrence(&edited, args.series, now)?;

    msg_success!(Message::EventUpdated(args.id));
    if args.series {
        msg_info!(Message::OccurrencesUpdated(touched));
    }
    Ok(())
}

fn apply_changes(mut event: CountdownEvent, args: &EditArgs) -> Result<CountdownEvent> {
    if let Some(title) = &args.title {
        event.title = title.clone();
    }
    if let Some(date) = &args.date {
        let target = formatter::parse_date_time(date)?;
        if target != event.target_date_time {
            event.target_date_time = target;
            event.reminder_sent_at = None;
            event.reminder_snoozed_until = None;
        }
    }
    if let Some(description) = &args.description {
        event.description = Some(description.clone());
    }
    if let Some(category) = &args.category {
        event.category = category.clone();
    }
    if let Some(priority) = args.priority {
        event.priority = priority;
    }
    match args.reminder {
        Some(0) => {
            event.reminder_enabled = false;
            event.reminder_minutes = None;
        }
        Some(minutes) => {
            event.reminder_enabled = true;
            event.reminder_minutes = Some(minutes);
            event.reminder_sent_at = None;
            event.reminder_snoozed_until = None;
        }
        None => {}
    }
    if let Some(color) = &args.color {
        event.color = Some(color.clone());
    }
    if let Some(icon) = &args.icon {
        event.icon = Some(icon.clone());
    }
    Ok(event)
}

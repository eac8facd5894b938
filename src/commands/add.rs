use crate::{
    db::{db::Db, events::Events},
    libs::{
        config::Config,
        event::{parse_priority, CountdownEvent},
        formatter,
        messages::Message,
        milestone::{create_milestones, MilestoneMode},
        template, validation,
    },
    msg_error_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use chrono::NaiveDateTime;
use clap::Args;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Event title; defaults to the template's title when a template is used
    title: Option<String>,
    /// Target date, `YYYY-MM-DD` or `YYYY-MM-DD HH:MM`
    #[arg(short, long, conflicts_with = "in_days")]
    date: Option<String>,
    /// Target this many days from now
    #[arg(long)]
    in_days: Option<i64>,
    #[arg(long)]
    description: Option<String>,
    #[arg(short, long)]
    category: Option<String>,
    /// low, medium, high or a number from 0 to 10
    #[arg(short, long, value_parser = parse_priority)]
    priority: Option<i32>,
    /// Remind this many minutes before the target
    #[arg(short, long)]
    reminder: Option<i64>,
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    icon: Option<String>,
    /// Start from a built-in template (see `countjoy templates`)
    #[arg(short, long)]
    template: Option<String>,
    /// Milestone templates to attach; defaults to the configured sets
    #[arg(short, long, value_enum)]
    milestones: Option<MilestoneMode>,
}

pub fn cmd(args: AddArgs) -> Result<()> {
    let now = formatter::now();
    let config = Config::read()?;
    let db = Db::new()?;

    let event = build_event(&args, now)?;
    let event = validation::prepare(event, now)?;
    let id = Events::new(&db).insert(&event)?;

    msg_success!(Message::EventCreated(id, event.title.clone()));

    let mode = args.milestones.unwrap_or_else(|| {
        let defaults = config.milestones();
        MilestoneMode::from_flags(defaults.percentage_templates, defaults.time_templates)
    });
    let created = create_milestones(&db, id, mode.use_percentage(), mode.use_time(), Vec::new())?;
    if !created.is_empty() {
        msg_info!(Message::MilestonesCreated(created.len()));
    }

    Ok(())
}

fn build_event(args: &AddArgs, now: NaiveDateTime) -> Result<CountdownEvent> {
    let target = match (&args.date, args.in_days) {
        (Some(date), _) => Some(formatter::parse_date_time(date)?),
        (None, Some(days)) => Some(formatter::in_days(now, days)?),
        (None, None) => None,
    };

    let mut event = match &args.template {
        Some(id) => {
            let template = template::find(id).ok_or_else(|| msg_error_anyhow!(Message::TemplateNotFound(id.clone())))?;
            template.to_event(args.title.as_deref(), target, now)
        }
        None => {
            let title = args.title.as_deref().ok_or_else(|| msg_error_anyhow!(Message::TitleRequired))?;
            let target = target.ok_or_else(|| msg_error_anyhow!(Message::TargetDateRequired))?;
            CountdownEvent::new(title, target, now)
        }
    };

    if let Some(description) = &args.description {
        event.description = Some(description.clone());
    }
    if let Some(category) = &args.category {
        event.category = category.clone();
    }
    if let Some(priority) = args.priority {
        event.priority = priority;
    }
    if let Some(minutes) = args.reminder {
        event.reminder_enabled = true;
        event.reminder_minutes = Some(minutes);
    }
    if let Some(color) = &args.color {
        event.color = Some(color.clone());
    }
    if let Some(icon) = &args.icon {
        event.icon = Some(icon.clone());
    }

    Ok(event)
}

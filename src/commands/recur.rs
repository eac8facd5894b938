use crate::{
    db::{db::Db, events::Events},
    libs::{
        config::Config,
        formatter,
        generator::{require_rule, RecurrenceGenerator},
        messages::Message,
        recurrence::{find_template, parse_weekday, RecurrenceCalculator, RecurrencePattern, RecurrenceRule},
        view::View,
    },
    msg_error_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::{NaiveDate, Weekday};
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct RecurArgs {
    #[command(subcommand)]
    command: RecurCommand,
}

#[derive(Debug, Subcommand)]
enum RecurCommand {
    /// Make an event repeat, replacing any existing rule
    Set(SetArgs),
    /// Show an event's rule
    Show { event_id: i64 },
    /// List the next occurrences without creating them
    Preview {
        event_id: i64,
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Stop repeating; occurrences still ahead are deleted
    Remove { event_id: i64 },
    /// Show the built-in rule presets
    Templates,
    /// Create the next occurrence of due series, or of one series
    Generate { event_id: Option<i64> },
}

#[derive(Debug, Args)]
struct SetArgs {
    event_id: i64,
    /// Preset such as weekly or quarterly (see `recur templates`)
    #[arg(short, long, conflicts_with = "pattern")]
    template: Option<String>,
    #[arg(short, long, value_enum)]
    pattern: Option<RecurrencePattern>,
    #[arg(short, long)]
    interval: Option<u32>,
    /// Comma-separated weekdays, e.g. mon,wed,fri
    #[arg(long, value_delimiter = ',', value_parser = parse_weekday)]
    days: Vec<Weekday>,
    #[arg(long)]
    day_of_month: Option<u32>,
    /// 1-4, or 5 for the last week
    #[arg(long)]
    week_of_month: Option<u32>,
    #[arg(long)]
    month: Option<u32>,
    /// Last date an occurrence may fall on
    #[arg(long, conflicts_with = "count", value_parser = formatter::parse_date)]
    until: Option<NaiveDate>,
    /// Number of occurrences after the first
    #[arg(long)]
    count: Option<u32>,
    #[arg(long)]
    skip_weekends: bool,
    /// Skip the holidays listed in the configuration
    #[arg(long)]
    skip_holidays: bool,
    /// Comma-separated dates to leave out
    #[arg(long, value_delimiter = ',', value_parser = formatter::parse_date)]
    except: Vec<NaiveDate>,
}

pub fn cmd(args: RecurArgs) -> Result<()> {
    let config = Config::read()?;
    let recurrence = config.recurrence();
    let db = Db::new()?;
    let generator = RecurrenceGenerator::new(&db, RecurrenceCalculator::with_holidays(recurrence.holidays));
    let date_format = config.display().date_format;

    match args.command {
        RecurCommand::Set(set) => {
            let event = Events::new(&db).require(set.event_id)?;
            let rule = generator.attach_rule(&event, build_rule(&set)?)?;
            msg_success!(Message::RuleAttached(event.title, rule.summary()));
            if let Some(next) = rule.next_occurrence_date {
                msg_info!(Message::NextOccurrence(next.to_string()));
            }
        }
        RecurCommand::Show { event_id } => {
            let event = Events::new(&db).require(event_id)?;
            let rule = require_rule(&db, event.parent_event_id.unwrap_or(event_id))?;
            msg_print!(Message::RuleSummary(event.title, rule.summary()));
            match rule.next_occurrence_date {
                Some(next) => msg_info!(Message::NextOccurrence(next.to_string())),
                None => msg_info!(Message::SeriesFinished),
            }
        }
        RecurCommand::Preview { event_id, count } => {
            let event = Events::new(&db).require(event_id)?;
            let rule = require_rule(&db, event_id)?;
            let dates = generator.preview_future_occurrences(&event, &rule, count.unwrap_or(recurrence.preview_count));
            if dates.is_empty() {
                msg_info!(Message::SeriesFinished);
            } else {
                View::occurrences(&dates, &date_format);
            }
        }
        RecurCommand::Remove { event_id } => {
            require_rule(&db, event_id)?;
            let deleted = generator.delete_future_occurrences(event_id, formatter::now())?;
            msg_success!(Message::RuleRemoved(event_id));
            msg_info!(Message::OccurrencesDeleted(deleted));
        }
        RecurCommand::Templates => View::recurrence_templates(),
        RecurCommand::Generate { event_id } => {
            let now = formatter::now();
            let generated = match event_id {
                Some(id) => {
                    let event = Events::new(&db).require(id)?;
                    let rule = require_rule(&db, id)?;
                    generator.generate_next_occurrence(&event, &rule, now)?.into_iter().collect()
                }
                None => generator.check_and_generate(now)?,
            };

            if generated.is_empty() {
                msg_info!(Message::NoOccurrencesDue);
            }
            for occurrence in generated {
                msg_success!(Message::OccurrenceCreated(occurrence.title, occurrence.target_date_time.to_string()));
            }
        }
    }

    Ok(())
}

fn build_rule(args: &SetArgs) -> Result<RecurrenceRule> {
    let mut rule = match (&args.template, args.pattern) {
        (Some(key), _) => find_template(key)
            .ok_or_else(|| msg_error_anyhow!(Message::TemplateNotFound(key.clone())))?
            .to_rule(args.event_id),
        (None, Some(pattern)) => RecurrenceRule::new(args.event_id, pattern),
        (None, None) => return Err(msg_error_anyhow!(Message::PatternRequired)),
    };

    if let Some(interval) = args.interval {
        rule.interval = interval;
    }
    if !args.days.is_empty() {
        rule.set_days(&args.days);
    }
    rule.day_of_month = args.day_of_month.or(rule.day_of_month);
    rule.week_of_month = args.week_of_month.or(rule.week_of_month);
    rule.month_of_year = args.month.or(rule.month_of_year);
    if let Some(until) = args.until {
        rule = rule.ends_on(until);
    }
    if let Some(count) = args.count {
        rule = rule.ends_after(count);
    }
    rule.skip_weekends = args.skip_weekends;
    rule.skip_holidays = args.skip_holidays;
    for date in &args.except {
        rule.add_exception(*date);
    }

    Ok(rule)
}

use crate::{
    db::{
        db::Db,
        events::{EventQuery, Events},
        milestones::Milestones,
    },
    libs::{
        error::CountJoyError,
        formatter,
        messages::Message,
        milestone::{check_milestones, create_milestones, CelebrationEffect, Milestone, MilestoneMode, MilestoneType},
        view::View,
        watcher::{announce, WatchReport},
    },
    msg_bail_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MilestoneArgs {
    #[command(subcommand)]
    command: MilestoneCommand,
}

#[derive(Debug, Subcommand)]
enum MilestoneCommand {
    /// Add a milestone to an event
    Add {
        event_id: i64,
        #[arg(short = 'T', long = "type", value_enum)]
        milestone_type: MilestoneType,
        /// Percent elapsed, or days remaining for time-based milestones
        #[arg(short, long, default_value_t = 0.0)]
        value: f64,
        #[arg(short, long)]
        title: String,
        #[arg(short, long, default_value = "")]
        message: String,
        #[arg(short, long, value_enum, default_value_t = CelebrationEffect::Confetti)]
        effect: CelebrationEffect,
        /// Record the achievement without announcing it
        #[arg(long)]
        silent: bool,
    },
    /// List milestones of one event, or of all events
    List { event_id: Option<i64> },
    /// Delete a milestone by id or unique id prefix
    Delete { id: String },
    /// Mark a milestone achieved now
    Achieve { id: String },
    /// Show the built-in templates, or attach them to an event
    Templates {
        #[arg(long)]
        apply: Option<i64>,
        #[arg(long, value_enum, default_value_t = MilestoneMode::Both)]
        mode: MilestoneMode,
    },
    /// Achieved milestones, most recent first
    History,
    /// Evaluate milestones now and announce new achievements
    Check { event_id: Option<i64> },
}

pub fn cmd(args: MilestoneArgs) -> Result<()> {
    let db = Db::new()?;

    match args.command {
        MilestoneCommand::Add {
            event_id,
            milestone_type,
            value,
            title,
            message,
            effect,
            silent,
        } => {
            Events::new(&db).require(event_id)?;
            let mut milestone = Milestone::new(event_id, milestone_type, value, &title, &message);
            milestone.celebration_effect = effect;
            milestone.notification_enabled = !silent;
            Milestones::new(&db).insert(&milestone)?;
            msg_success!(Message::MilestoneAdded(milestone.title));
        }
        MilestoneCommand::List { event_id } => {
            let repo = Milestones::new(&db);
            let milestones = match event_id {
                Some(id) => repo.by_event(id)?,
                None => repo.all()?,
            };
            if milestones.is_empty() {
                msg_info!(Message::NoMilestonesFound);
            } else {
                View::milestones(&milestones);
            }
        }
        MilestoneCommand::Delete { id } => {
            let milestone = resolve(&db, &id)?;
            Milestones::new(&db).delete(&milestone.id)?;
            msg_success!(Message::MilestoneDeleted(milestone.title));
        }
        MilestoneCommand::Achieve { id } => {
            let milestone = resolve(&db, &id)?;
            if milestone.achieved {
                msg_info!(Message::MilestoneAlreadyAchieved(milestone.title));
                return Ok(());
            }
            Milestones::new(&db).mark_achieved(&milestone.id, formatter::now())?;
            msg_success!(Message::MilestoneMarkedAchieved(milestone.title));
        }
        MilestoneCommand::Templates { apply, mode } => match apply {
            Some(event_id) => {
                Events::new(&db).require(event_id)?;
                let created = create_milestones(&db, event_id, mode.use_percentage(), mode.use_time(), Vec::new())?;
                msg_success!(Message::MilestonesCreated(created.len()));
            }
            None => View::milestone_templates(),
        },
        MilestoneCommand::History => {
            let history = Milestones::new(&db).achievement_history()?;
            if history.is_empty() {
                msg_info!(Message::NoMilestonesFound);
            } else {
                msg_print!(Message::MilestoneHistoryHeader, true);
                View::milestones(&history);
            }
        }
        MilestoneCommand::Check { event_id } => {
            let now = formatter::now();
            let ids: Vec<i64> = match event_id {
                Some(id) => vec![id],
                None => Events::new(&db).fetch(EventQuery::Active)?.into_iter().filter_map(|e| e.id).collect(),
            };

            let mut report = WatchReport {
                checked_events: ids.len(),
                ..WatchReport::default()
            };
            for id in ids {
                report.achievements.extend(check_milestones(&db, id, now)?);
            }

            if report.is_empty() {
                msg_info!(Message::NoNewAchievements);
            } else {
                announce(&report, now);
            }
        }
    }

    Ok(())
}

fn resolve(db: &Db, id: &str) -> Result<Milestone> {
    let repo = Milestones::new(db);
    if let Some(milestone) = repo.get(id)? {
        return Ok(milestone);
    }

    let mut matches: Vec<Milestone> = repo.all()?.into_iter().filter(|m| m.id.starts_with(id)).collect();
    match matches.len() {
        0 => Err(CountJoyError::MilestoneNotFound(id.to_string()).into()),
        1 => Ok(matches.remove(0)),
        n => msg_bail_anyhow!(Message::AmbiguousMilestoneId(id.to_string(), n)),
    }
}

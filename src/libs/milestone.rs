//! Milestones: progress markers attached to a countdown event.
//!
//! Percentage milestones fire once the given share of the time between the
//! event's creation and its target has elapsed. Time milestones fire once
//! the number of whole days left drops to their value. Custom milestones are
//! only ever achieved by hand.

use crate::db::db::Db;
use crate::db::events::Events;
use crate::db::milestones::Milestones;
use crate::libs::countdown;
use crate::libs::error::CountJoyError;
use crate::libs::event::CountdownEvent;
use anyhow::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MilestoneType {
    #[value(name = "percentage")]
    PercentageBased,
    #[value(name = "time")]
    TimeBased,
    Custom,
}

impl MilestoneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneType::PercentageBased => "PERCENTAGE_BASED",
            MilestoneType::TimeBased => "TIME_BASED",
            MilestoneType::Custom => "CUSTOM",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MilestoneType::PercentageBased => "Percentage",
            MilestoneType::TimeBased => "Time",
            MilestoneType::Custom => "Custom",
        }
    }

    /// Human readable form of a milestone value of this type.
    pub fn format_value(&self, value: f64) -> String {
        match self {
            MilestoneType::PercentageBased => format!("{}%", value),
            MilestoneType::TimeBased if value == 1.0 => "1 day left".to_string(),
            MilestoneType::TimeBased => format!("{} days left", value),
            MilestoneType::Custom => "-".to_string(),
        }
    }
}

impl FromStr for MilestoneType {
    type Err = CountJoyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PERCENTAGE_BASED" | "PERCENTAGE" => Ok(MilestoneType::PercentageBased),
            "TIME_BASED" | "TIME" => Ok(MilestoneType::TimeBased),
            "CUSTOM" => Ok(MilestoneType::Custom),
            _ => Err(CountJoyError::UnknownMilestoneType(s.to_string())),
        }
    }
}

impl fmt::Display for MilestoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CelebrationEffect {
    None,
    #[default]
    Confetti,
    Fireworks,
    Stars,
    Balloons,
    Sparkles,
}

impl CelebrationEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            CelebrationEffect::None => "NONE",
            CelebrationEffect::Confetti => "CONFETTI",
            CelebrationEffect::Fireworks => "FIREWORKS",
            CelebrationEffect::Stars => "STARS",
            CelebrationEffect::Balloons => "BALLOONS",
            CelebrationEffect::Sparkles => "SPARKLES",
        }
    }

    /// Symbol printed next to an achievement announcement.
    pub fn symbol(&self) -> &'static str {
        match self {
            CelebrationEffect::None => "",
            CelebrationEffect::Confetti => "🎉",
            CelebrationEffect::Fireworks => "🎆",
            CelebrationEffect::Stars => "⭐",
            CelebrationEffect::Balloons => "🎈",
            CelebrationEffect::Sparkles => "✨",
        }
    }
}

impl FromStr for CelebrationEffect {
    type Err = CountJoyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NONE" => Ok(CelebrationEffect::None),
            "CONFETTI" => Ok(CelebrationEffect::Confetti),
            "FIREWORKS" => Ok(CelebrationEffect::Fireworks),
            "STARS" => Ok(CelebrationEffect::Stars),
            "BALLOONS" => Ok(CelebrationEffect::Balloons),
            "SPARKLES" => Ok(CelebrationEffect::Sparkles),
            _ => Err(CountJoyError::UnknownCelebrationEffect(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub event_id: i64,
    pub milestone_type: MilestoneType,
    /// Percentage (0-100) or days left, depending on the type.
    pub value: f64,
    pub title: String,
    pub message: String,
    pub notification_enabled: bool,
    pub achieved: bool,
    pub achieved_at: Option<NaiveDateTime>,
    pub celebration_effect: CelebrationEffect,
}

impl Milestone {
    pub fn new(event_id: i64, milestone_type: MilestoneType, value: f64, title: &str, message: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            milestone_type,
            value,
            title: title.to_string(),
            message: message.to_string(),
            notification_enabled: true,
            achieved: false,
            achieved_at: None,
            celebration_effect: CelebrationEffect::default(),
        }
    }

    /// Whether this milestone is reached for `event` at `now`. Already
    /// achieved milestones are not re-evaluated.
    pub fn is_reached(&self, event: &CountdownEvent, now: NaiveDateTime) -> bool {
        match self.milestone_type {
            MilestoneType::PercentageBased => countdown::progress_percentage(event, now) >= self.value,
            MilestoneType::TimeBased => {
                let remaining_days = (event.target_date_time - now).num_days();
                remaining_days >= 0 && remaining_days as f64 <= self.value.trunc()
            }
            MilestoneType::Custom => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MilestoneTemplate {
    pub milestone_type: MilestoneType,
    pub value: f64,
    pub title: &'static str,
    pub message: &'static str,
}

impl MilestoneTemplate {
    pub fn to_milestone(&self, event_id: i64) -> Milestone {
        Milestone::new(event_id, self.milestone_type, self.value, self.title, self.message)
    }
}

const fn template(milestone_type: MilestoneType, value: f64, title: &'static str, message: &'static str) -> MilestoneTemplate {
    MilestoneTemplate {
        milestone_type,
        value,
        title,
        message,
    }
}

pub const PERCENTAGE_TEMPLATES: [MilestoneTemplate; 5] = [
    template(MilestoneType::PercentageBased, 10.0, "Just Started!", "Great beginning! 10% complete"),
    template(MilestoneType::PercentageBased, 25.0, "Quarter Way!", "You're 25% there! Keep going!"),
    template(MilestoneType::PercentageBased, 50.0, "Halfway There!", "Amazing! You've reached the halfway point!"),
    template(MilestoneType::PercentageBased, 75.0, "Three Quarters!", "Almost there! 75% complete!"),
    template(MilestoneType::PercentageBased, 90.0, "Final Stretch!", "You're in the final stretch! 90% complete!"),
];

pub const TIME_TEMPLATES: [MilestoneTemplate; 5] = [
    template(MilestoneType::TimeBased, 365.0, "One Year to Go!", "365 days remaining"),
    template(MilestoneType::TimeBased, 100.0, "100 Days!", "100 days left on your countdown"),
    template(MilestoneType::TimeBased, 30.0, "One Month!", "Just 30 days to go!"),
    template(MilestoneType::TimeBased, 7.0, "One Week!", "Only 7 days remaining!"),
    template(MilestoneType::TimeBased, 1.0, "Tomorrow!", "Just 1 day left!"),
];

/// Which milestone sets to create for a new event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MilestoneMode {
    #[default]
    None,
    Percentage,
    Time,
    Both,
}

impl MilestoneMode {
    pub fn from_flags(use_percentage: bool, use_time: bool) -> Self {
        match (use_percentage, use_time) {
            (true, true) => MilestoneMode::Both,
            (true, false) => MilestoneMode::Percentage,
            (false, true) => MilestoneMode::Time,
            (false, false) => MilestoneMode::None,
        }
    }

    pub fn use_percentage(&self) -> bool {
        matches!(self, MilestoneMode::Percentage | MilestoneMode::Both)
    }

    pub fn use_time(&self) -> bool {
        matches!(self, MilestoneMode::Time | MilestoneMode::Both)
    }
}

/// An achievement produced by [`check_milestones`].
#[derive(Debug, Clone)]
pub struct AchievedMilestone {
    pub milestone: Milestone,
    pub event: CountdownEvent,
}

/// Builds milestones from the chosen template sets plus `custom` and stores
/// them in one transaction. Returns the stored milestones.
pub fn create_milestones(
    db: &Db,
    event_id: i64,
    use_percentage: bool,
    use_time: bool,
    custom: Vec<Milestone>,
) -> Result<Vec<Milestone>> {
    let mut milestones = Vec::new();

    if use_percentage {
        milestones.extend(PERCENTAGE_TEMPLATES.iter().map(|t| t.to_milestone(event_id)));
    }
    if use_time {
        milestones.extend(TIME_TEMPLATES.iter().map(|t| t.to_milestone(event_id)));
    }
    milestones.extend(custom);

    if !milestones.is_empty() {
        Milestones::new(db).insert_many(&milestones)?;
    }

    Ok(milestones)
}

/// Evaluates the event's unachieved milestones at `now`, persists the ones
/// that are reached and returns them. A missing event yields nothing.
pub fn check_milestones(db: &Db, event_id: i64, now: NaiveDateTime) -> Result<Vec<AchievedMilestone>> {
    let Some(event) = Events::new(db).get(event_id)? else {
        return Ok(Vec::new());
    };

    let repo = Milestones::new(db);
    let mut achieved = Vec::new();

    for milestone in repo.unachieved(event_id)? {
        if !milestone.is_reached(&event, now) {
            continue;
        }
        repo.mark_achieved(&milestone.id, now)?;
        achieved.push(AchievedMilestone {
            milestone: Milestone {
                achieved: true,
                achieved_at: Some(now),
                ..milestone
            },
            event: event.clone(),
        });
    }

    Ok(achieved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn percentage_milestone_uses_elapsed_share() {
        let created = at(2025, 1, 1, 0);
        let event = CountdownEvent::new("Trip", created + Duration::days(10), created);
        let half = PERCENTAGE_TEMPLATES[2].to_milestone(1);

        assert!(!half.is_reached(&event, created + Duration::days(4)));
        assert!(half.is_reached(&event, created + Duration::days(5)));
    }

    #[test]
    fn zero_span_counts_as_complete() {
        let created = at(2025, 1, 1, 0);
        let event = CountdownEvent::new("Now", created, created);
        assert!(PERCENTAGE_TEMPLATES[4].to_milestone(1).is_reached(&event, created));
    }

    #[test]
    fn time_milestone_truncates_remaining_days() {
        let now = at(2025, 1, 1, 0);
        let week = TIME_TEMPLATES[3].to_milestone(1);

        let in_seven_and_half = CountdownEvent::new("A", now + Duration::hours(7 * 24 + 12), now);
        assert!(week.is_reached(&in_seven_and_half, now));

        let in_eight = CountdownEvent::new("B", now + Duration::days(8), now);
        assert!(!week.is_reached(&in_eight, now));
    }

    #[test]
    fn time_milestone_ignores_past_targets() {
        let now = at(2025, 1, 10, 0);
        let past = CountdownEvent::new("Past", now - Duration::days(2), now - Duration::days(20));
        assert!(!TIME_TEMPLATES[4].to_milestone(1).is_reached(&past, now));
    }

    #[test]
    fn custom_milestones_are_never_automatic() {
        let now = at(2025, 1, 1, 0);
        let event = CountdownEvent::new("A", now, now - Duration::days(3));
        let custom = Milestone::new(1, MilestoneType::Custom, 0.0, "Booked", "Tickets booked");
        assert!(!custom.is_reached(&event, now));
    }

    #[test]
    fn parses_stored_and_short_type_names() {
        assert_eq!("PERCENTAGE_BASED".parse::<MilestoneType>().unwrap(), MilestoneType::PercentageBased);
        assert_eq!("time".parse::<MilestoneType>().unwrap(), MilestoneType::TimeBased);
        assert!("weekly".parse::<MilestoneType>().is_err());
        assert_eq!("sparkles".parse::<CelebrationEffect>().unwrap(), CelebrationEffect::Sparkles);
        assert_eq!(CelebrationEffect::default(), CelebrationEffect::Confetti);
    }
}

//! Statistics over events and milestones.
//!
//! All functions are pure: callers load events and milestones from the
//! database and pass an explicit `now`. An inactive (archived) event counts
//! as completed.

use crate::libs::error::CountJoyError;
use crate::libs::event::{CountdownEvent, EventCategory};
use crate::libs::milestone::Milestone;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeRange {
    Today,
    ThisWeek,
    ThisMonth,
    Last30Days,
    ThisYear,
    #[default]
    AllTime,
}

impl TimeRange {
    /// How far back the range reaches; `None` for all time.
    pub fn span(&self) -> Option<Duration> {
        match self {
            TimeRange::Today => Some(Duration::days(1)),
            TimeRange::ThisWeek => Some(Duration::days(7)),
            TimeRange::ThisMonth | TimeRange::Last30Days => Some(Duration::days(30)),
            TimeRange::ThisYear => Some(Duration::days(365)),
            TimeRange::AllTime => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TimeRange::Today => "Today",
            TimeRange::ThisWeek => "This week",
            TimeRange::ThisMonth => "This month",
            TimeRange::Last30Days => "Last 30 days",
            TimeRange::ThisYear => "This year",
            TimeRange::AllTime => "All time",
        }
    }

    /// Events created inside the range.
    pub fn filter(&self, events: &[CountdownEvent], now: NaiveDateTime) -> Vec<CountdownEvent> {
        match self.span() {
            Some(span) => {
                let start = now - span;
                events.iter().filter(|e| e.created_at > start).cloned().collect()
            }
            None => events.to_vec(),
        }
    }
}

impl FromStr for TimeRange {
    type Err = CountJoyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "TODAY" => Ok(TimeRange::Today),
            "THIS_WEEK" | "WEEK" => Ok(TimeRange::ThisWeek),
            "THIS_MONTH" | "MONTH" => Ok(TimeRange::ThisMonth),
            "LAST_30_DAYS" => Ok(TimeRange::Last30Days),
            "THIS_YEAR" | "YEAR" => Ok(TimeRange::ThisYear),
            "ALL_TIME" | "ALL" => Ok(TimeRange::AllTime),
            _ => Err(CountJoyError::UnknownTimeRange(s.to_string())),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Counts and averages over a set of events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventStatistics {
    pub total_events: usize,
    pub active_events: usize,
    pub completed_events: usize,
    /// Mean span from creation to target of completed events, in seconds.
    pub average_duration_secs: i64,
    pub success_rate: f64,
    pub events_by_category: BTreeMap<String, usize>,
    pub events_by_priority: BTreeMap<i32, usize>,
    pub creation_trend: Vec<DateCount>,
    pub completion_trend: Vec<DateCount>,
    pub upcoming_events: Vec<CountdownEvent>,
    pub recently_completed: Vec<CountdownEvent>,
}

impl EventStatistics {
    pub fn average_duration(&self) -> Duration {
        Duration::seconds(self.average_duration_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDistribution {
    pub category: String,
    pub count: usize,
    pub percentage: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub range: String,
    pub count: usize,
}

/// Achievement figures over a set of milestones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneStats {
    pub total_milestones: usize,
    pub achieved_milestones: usize,
    pub achievement_rate: f64,
    pub most_achieved_type: Option<String>,
    pub recent_achievements: Vec<Milestone>,
}

/// Creation habits: busiest weekday and hour, streaks, lead times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductivityInsights {
    pub most_productive_day: String,
    pub most_productive_hour: u32,
    pub average_events_per_week: f64,
    pub average_completion_secs: i64,
    pub streak_days: u32,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub generated_at: NaiveDateTime,
    pub time_range: TimeRange,
    pub statistics: EventStatistics,
    pub category_distribution: Vec<CategoryDistribution>,
    pub duration_histogram: Vec<HistogramBin>,
    pub milestone_stats: MilestoneStats,
    pub productivity_insights: ProductivityInsights,
}

/// Builds the full report for events created inside `range`.
pub fn report(events: &[CountdownEvent], milestones: &[Milestone], range: TimeRange, now: NaiveDateTime) -> AnalyticsReport {
    let filtered = range.filter(events, now);

    AnalyticsReport {
        generated_at: now,
        time_range: range,
        statistics: event_statistics(&filtered, now),
        category_distribution: category_distribution(&filtered),
        duration_histogram: duration_histogram(&filtered),
        milestone_stats: milestone_stats(milestones),
        productivity_insights: productivity_insights(&filtered, now),
    }
}

/// Summarises `events` as of `now`.
///
/// # Arguments
///
/// * `events` - events to count, archived ones included
/// * `now` - moment separating upcoming from past events
///
/// # Returns
///
/// Totals, per-day creation counts and the average lead time. An empty slice
/// yields zeroes rather than NaN averages.
pub fn event_statistics(events: &[CountdownEvent], now: NaiveDateTime) -> EventStatistics {
    let total_events = events.len();
    let active_events = events.iter().filter(|e| e.is_active).count();
    let completed: Vec<&CountdownEvent> = events.iter().filter(|e| !e.is_active).collect();

    let success_rate = if total_events > 0 {
        completed.len() as f64 / total_events as f64 * 100.0
    } else {
        0.0
    };

    let mut events_by_category = BTreeMap::new();
    let mut events_by_priority = BTreeMap::new();
    for event in events {
        *events_by_category.entry(event.category.clone()).or_insert(0) += 1;
        *events_by_priority.entry(event.priority).or_insert(0) += 1;
    }

    let mut upcoming: Vec<CountdownEvent> = events
        .iter()
        .filter(|e| e.is_active && e.target_date_time > now)
        .cloned()
        .collect();
    upcoming.sort_by_key(|e| e.target_date_time);
    upcoming.truncate(5);

    let mut recently_completed: Vec<CountdownEvent> = completed.iter().map(|e| (*e).clone()).collect();
    recently_completed.sort_by(|a, b| b.target_date_time.cmp(&a.target_date_time));
    recently_completed.truncate(5);

    EventStatistics {
        total_events,
        active_events,
        completed_events: completed.len(),
        average_duration_secs: average_span_secs(&completed),
        success_rate,
        events_by_category,
        events_by_priority,
        creation_trend: trend(events.iter().map(|e| e.created_at.date())),
        completion_trend: trend(completed.iter().map(|e| e.target_date_time.date())),
        upcoming_events: upcoming,
        recently_completed,
    }
}

/// Share of events per category, largest first.
pub fn category_distribution(events: &[CountdownEvent]) -> Vec<CategoryDistribution> {
    let total = events.len();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for event in events {
        *counts.entry(event.category.as_str()).or_insert(0) += 1;
    }

    let mut distribution: Vec<CategoryDistribution> = counts
        .into_iter()
        .map(|(category, count)| CategoryDistribution {
            category: category.to_string(),
            count,
            percentage: if total > 0 { count as f64 / total as f64 * 100.0 } else { 0.0 },
            color: EventCategory::from_name(category).default_color().to_string(),
        })
        .collect();

    distribution.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    distribution
}

/// Events bucketed by the span between creation and target.
pub fn duration_histogram(events: &[CountdownEvent]) -> Vec<HistogramBin> {
    const BINS: [(&str, i64); 5] = [
        ("< 1 day", 1),
        ("1-7 days", 7),
        ("1-4 weeks", 28),
        ("1-3 months", 90),
        ("> 3 months", i64::MAX),
    ];

    let mut counts = [0usize; BINS.len()];
    for event in events {
        let days = (event.target_date_time - event.created_at).num_days();
        let index = BINS
            .iter()
            .position(|(_, limit)| days < *limit)
            .unwrap_or(BINS.len() - 1);
        counts[index] += 1;
    }

    BINS.iter()
        .zip(counts)
        .map(|((range, _), count)| HistogramBin {
            range: range.to_string(),
            count,
        })
        .collect()
}

/// Achieved versus pending milestones and the achievement rate in percent.
pub fn milestone_stats(milestones: &[Milestone]) -> MilestoneStats {
    let total = milestones.len();
    let achieved: Vec<&Milestone> = milestones.iter().filter(|m| m.achieved).collect();

    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    for milestone in &achieved {
        *by_type.entry(milestone.milestone_type.as_str()).or_insert(0) += 1;
    }
    let most_achieved_type = by_type
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(name, _)| name.to_string());

    let mut recent: Vec<Milestone> = achieved.iter().map(|m| (*m).clone()).collect();
    recent.sort_by(|a, b| b.achieved_at.cmp(&a.achieved_at));
    recent.truncate(10);

    MilestoneStats {
        total_milestones: total,
        achieved_milestones: achieved.len(),
        achievement_rate: if total > 0 { achieved.len() as f64 / total as f64 * 100.0 } else { 0.0 },
        most_achieved_type,
        recent_achievements: recent,
    }
}

/// When events get created and how far ahead they are planned.
pub fn productivity_insights(events: &[CountdownEvent], now: NaiveDateTime) -> ProductivityInsights {
    let mut by_day: BTreeMap<u32, usize> = BTreeMap::new();
    let mut by_hour: BTreeMap<u32, usize> = BTreeMap::new();
    for event in events {
        *by_day.entry(event.created_at.weekday().num_days_from_monday()).or_insert(0) += 1;
        *by_hour.entry(event.created_at.hour()).or_insert(0) += 1;
    }

    let most_productive_day = busiest(&by_day)
        .map(|day| weekday_name(day).to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let most_productive_hour = busiest(&by_hour).unwrap_or(0);

    let first_created = events.iter().map(|e| e.created_at).min().unwrap_or(now);
    let weeks = ((now - first_created).num_weeks()).max(1);
    let average_events_per_week = events.len() as f64 / weeks as f64;

    let completed: Vec<&CountdownEvent> = events.iter().filter(|e| !e.is_active).collect();

    ProductivityInsights {
        suggestions: suggestions(events, &most_productive_day, most_productive_hour),
        most_productive_day,
        most_productive_hour,
        average_events_per_week,
        average_completion_secs: average_span_secs(&completed),
        streak_days: streak_days(events, now.date()),
    }
}

/// Consecutive days, ending today, on which at least one event was created.
pub fn streak_days(events: &[CountdownEvent], today: NaiveDate) -> u32 {
    let dates: BTreeSet<NaiveDate> = events.iter().map(|e| e.created_at.date()).collect();
    let mut streak = 0;
    let mut current = today;

    while dates.contains(&current) {
        streak += 1;
        match current.pred_opt() {
            Some(previous) => current = previous,
            None => break,
        }
    }

    streak
}

fn suggestions(events: &[CountdownEvent], day: &str, hour: u32) -> Vec<String> {
    if events.is_empty() {
        return vec!["Start creating countdown events to track your goals!".to_string()];
    }

    let mut suggestions = vec![
        format!("You're most productive on {}s - schedule important events then!", day),
        format!("Your peak productivity hour is {}:00 - use this time wisely!", hour),
    ];

    let completion_rate = events.iter().filter(|e| !e.is_active).count() as f64 / events.len() as f64;
    if completion_rate < 0.5 {
        suggestions.push("Try breaking down large goals into smaller milestones".to_string());
    }
    if events.len() < 5 {
        suggestions.push("Add more events to better track your progress".to_string());
    }

    suggestions
}

fn average_span_secs(events: &[&CountdownEvent]) -> i64 {
    if events.is_empty() {
        return 0;
    }
    let total: i64 = events.iter().map(|e| (e.target_date_time - e.created_at).num_seconds()).sum();
    total / events.len() as i64
}

fn trend(dates: impl Iterator<Item = NaiveDate>) -> Vec<DateCount> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in dates {
        *counts.entry(date).or_insert(0) += 1;
    }
    counts.into_iter().map(|(date, count)| DateCount { date, count }).collect()
}

/// Key with the highest count; ties go to the smallest key.
fn busiest(counts: &BTreeMap<u32, usize>) -> Option<u32> {
    counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(key, _)| *key)
}

fn weekday_name(days_from_monday: u32) -> &'static str {
    let weekday = Weekday::try_from(days_from_monday as u8).unwrap_or(Weekday::Mon);
    match weekday {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn event(created: NaiveDateTime, target: NaiveDateTime, active: bool) -> CountdownEvent {
        let mut event = CountdownEvent::new("E", target, created);
        event.is_active = active;
        event
    }

    #[test]
    fn time_range_filters_by_creation() {
        let now = at(30, 12);
        let events = vec![event(at(29, 12), at(30, 18), true), event(at(10, 12), at(30, 18), true)];
        assert_eq!(TimeRange::ThisWeek.filter(&events, now).len(), 1);
        assert_eq!(TimeRange::AllTime.filter(&events, now).len(), 2);
        assert_eq!("last-30-days".parse::<TimeRange>().unwrap(), TimeRange::Last30Days);
    }

    #[test]
    fn histogram_buckets_by_span() {
        let events = vec![
            event(at(1, 0), at(1, 12), true),
            event(at(1, 0), at(4, 0), true),
            event(at(1, 0), at(20, 0), true),
        ];
        let counts: Vec<usize> = duration_histogram(&events).iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 0, 0]);
    }

    #[test]
    fn streak_counts_back_from_today() {
        let events = vec![event(at(28, 9), at(30, 0), true), event(at(29, 9), at(30, 0), true), event(at(30, 9), at(30, 20), true)];
        assert_eq!(streak_days(&events, at(30, 0).date()), 3);
        assert_eq!(streak_days(&events, at(27, 0).date()), 0);
    }

    #[test]
    fn empty_input_gives_starter_suggestion() {
        let insights = productivity_insights(&[], at(30, 0));
        assert_eq!(insights.most_productive_day, "N/A");
        assert_eq!(insights.suggestions, vec!["Start creating countdown events to track your goals!".to_string()]);
    }
}

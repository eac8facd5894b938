//! Table rendering for the terminal.

use super::analytics::AnalyticsReport;
use super::config::DisplayConfig;
use super::countdown;
use super::event::CountdownEvent;
use super::formatter::{format_date_time, format_duration};
use super::milestone::{Milestone, MilestoneTemplate, PERCENTAGE_TEMPLATES, TIME_TEMPLATES};
use super::recurrence::{RecurrenceRule, RECURRENCE_TEMPLATES};
use super::template::EventTemplate;
use chrono::NaiveDateTime;
use prettytable::{format, row, Table};

pub struct View {}

impl View {
    pub fn events(events: &[CountdownEvent], now: NaiveDateTime, display: &DisplayConfig) {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

        table.set_titles(row!["ID", "TITLE", "CATEGORY", "PRIORITY", "TARGET", "REMAINING", "SERIES"]);
        for event in events {
            table.add_row(row![
                event.id.unwrap_or(0),
                event.display_title(display.title_width),
                event.category,
                event.priority_level(),
                format_date_time(&event.target_date_time, &display.date_format),
                countdown::calculate(event, now).to_formatted_string(display.include_seconds),
                event.parent_event_id.map(|id| id.to_string()).unwrap_or_default()
            ]);
        }
        table.printstd();
    }

    pub fn event_detail(
        event: &CountdownEvent,
        milestones: &[Milestone],
        rule: Option<&RecurrenceRule>,
        now: NaiveDateTime,
        display: &DisplayConfig,
    ) {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_CLEAN);

        table.add_row(row![b -> "ID", event.id.unwrap_or(0)]);
        table.add_row(row![b -> "Title", event.title]);
        if let Some(description) = &event.description {
            table.add_row(row![b -> "Description", description]);
        }
        table.add_row(row![b -> "Category", event.category]);
        table.add_row(row![b -> "Priority", event.priority_level()]);
        table.add_row(row![b -> "Target", format_date_time(&event.target_date_time, &display.date_format)]);
        table.add_row(row![b -> "Remaining", event.formatted_countdown(now, display.include_seconds)]);
        table.add_row(row![b -> "Progress", format!("{:.1}%", countdown::progress_percentage(event, now))]);
        if let Some(at) = event.reminder_at() {
            let sent = if event.reminder_sent_at.is_some() { " (sent)" } else { "" };
            table.add_row(row![b -> "Reminder", format!("{}{}", format_date_time(&at, &display.date_format), sent)]);
        }
        if let Some(color) = &event.color {
            table.add_row(row![b -> "Color", color]);
        }
        if let Some(icon) = &event.icon {
            table.add_row(row![b -> "Icon", icon]);
        }
        table.add_row(row![b -> "Active", if event.is_active { "yes" } else { "no" }]);
        if let Some(parent) = event.parent_event_id {
            table.add_row(row![b -> "Series", parent]);
        }
        if let Some(rule) = rule {
            table.add_row(row![b -> "Repeats", rule.summary()]);
            if let Some(next) = rule.next_occurrence_date {
                table.add_row(row![b -> "Next occurrence", next]);
            }
        }
        table.printstd();

        if !milestones.is_empty() {
            println!();
            Self::milestones(milestones);
        }
    }

    pub fn milestones(milestones: &[Milestone]) {
        let mut table = Table::new();

        table.set_titles(row!["ID", "EVENT", "TYPE", "VALUE", "TITLE", "ACHIEVED"]);
        for milestone in milestones {
            let achieved = match milestone.achieved_at {
                Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
                None if milestone.achieved => "yes".to_string(),
                None => String::new(),
            };
            table.add_row(row![
                short_id(&milestone.id),
                milestone.event_id,
                milestone.milestone_type.display_name(),
                milestone.milestone_type.format_value(milestone.value),
                format!("{} {}", milestone.celebration_effect.symbol(), milestone.title),
                achieved
            ]);
        }
        table.printstd();
    }

    pub fn milestone_templates() {
        let mut table = Table::new();

        table.set_titles(row!["TYPE", "VALUE", "TITLE", "MESSAGE"]);
        let templates: Vec<&MilestoneTemplate> = PERCENTAGE_TEMPLATES.iter().chain(TIME_TEMPLATES.iter()).collect();
        for template in templates {
            table.add_row(row![
                template.milestone_type.display_name(),
                template.milestone_type.format_value(template.value),
                template.title,
                template.message
            ]);
        }
        table.printstd();
    }

    pub fn occurrences(dates: &[NaiveDateTime], date_format: &str) {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

        table.set_titles(row!["#", "DATE", "WEEKDAY"]);
        for (index, date) in dates.iter().enumerate() {
            table.add_row(row![index + 1, format_date_time(date, date_format), date.format("%A")]);
        }
        table.printstd();
    }

    /// Suggested reminder moments with their lead time before `target`.
    pub fn reminder_suggestions(times: &[NaiveDateTime], target: NaiveDateTime, date_format: &str) {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

        table.set_titles(row!["#", "REMIND AT", "BEFORE"]);
        for (index, at) in times.iter().enumerate() {
            table.add_row(row![index + 1, format_date_time(at, date_format), format_duration(&(target - *at))]);
        }
        table.printstd();
    }

    pub fn event_templates(templates: &[EventTemplate]) {
        let mut table = Table::new();

        table.set_titles(row!["ID", "NAME", "CATEGORY", "PRIORITY", "DEFAULT DATE", "REMINDER"]);
        for template in templates {
            let default_date = match (template.annual_date, template.days_from_now) {
                (Some((month, day)), _) => format!("every {:02}-{:02}", month, day),
                (None, Some(days)) => format!("in {} days", days),
                (None, None) => String::new(),
            };
            let reminder = template
                .reminder_days_before
                .map(|days| format!("{}d before", days))
                .unwrap_or_default();
            table.add_row(row![
                template.id,
                template.name,
                template.category.display_name(),
                template.priority,
                default_date,
                reminder
            ]);
        }
        table.printstd();
    }

    pub fn recurrence_templates() {
        let mut table = Table::new();

        table.set_titles(row!["KEY", "NAME", "DESCRIPTION"]);
        for template in RECURRENCE_TEMPLATES.iter() {
            table.add_row(row![template.key, template.name, template.description]);
        }
        table.printstd();
    }

    /// Large-type countdown list: one line per event.
    pub fn countdowns(events: &[CountdownEvent], now: NaiveDateTime, include_seconds: bool, short: bool) {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_CLEAN);

        for event in events {
            let time = countdown::calculate(event, now);
            let remaining = if short {
                time.to_short_string()
            } else {
                time.to_formatted_string(include_seconds)
            };
            table.add_row(row![b -> event.title, r -> remaining]);
        }
        table.printstd();
    }

    pub fn report(report: &AnalyticsReport) {
        let stats = &report.statistics;

        let mut summary = Table::new();
        summary.set_format(*format::consts::FORMAT_CLEAN);
        summary.add_row(row![b -> "Range", report.time_range.display_name()]);
        summary.add_row(row![b -> "Total events", stats.total_events]);
        summary.add_row(row![b -> "Active", stats.active_events]);
        summary.add_row(row![b -> "Completed", stats.completed_events]);
        summary.add_row(row![b -> "Success rate", format!("{:.1}%", stats.success_rate)]);
        summary.add_row(row![b -> "Average duration", format_duration(&stats.average_duration())]);
        summary.printstd();

        if !report.category_distribution.is_empty() {
            println!();
            let mut table = Table::new();
            table.set_titles(row!["CATEGORY", "COUNT", "SHARE"]);
            for entry in &report.category_distribution {
                table.add_row(row![entry.category, entry.count, format!("{:.1}%", entry.percentage)]);
            }
            table.printstd();
        }

        if report.duration_histogram.iter().any(|bin| bin.count > 0) {
            println!();
            let mut table = Table::new();
            table.set_titles(row!["DURATION", "EVENTS"]);
            for bin in &report.duration_histogram {
                table.add_row(row![bin.range, bin.count]);
            }
            table.printstd();
        }

        let milestones = &report.milestone_stats;
        let insights = &report.productivity_insights;
        println!();
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_CLEAN);
        table.add_row(row![
            b -> "Milestones",
            format!(
                "{}/{} achieved ({:.1}%)",
                milestones.achieved_milestones, milestones.total_milestones, milestones.achievement_rate
            )
        ]);
        if let Some(kind) = &milestones.most_achieved_type {
            table.add_row(row![b -> "Most achieved", kind]);
        }
        table.add_row(row![b -> "Most productive day", insights.most_productive_day]);
        table.add_row(row![b -> "Most productive hour", format!("{:02}:00", insights.most_productive_hour)]);
        table.add_row(row![b -> "Events per week", format!("{:.1}", insights.average_events_per_week)]);
        table.add_row(row![b -> "Streak", format!("{} day(s)", insights.streak_days)]);
        table.printstd();

        for suggestion in &insights.suggestions {
            println!("  - {}", suggestion);
        }
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

//! Export of events, milestones and analytics to CSV, JSON and Excel.
//!
//! The output file defaults to `countjoy_export_<timestamp>.<ext>` in the
//! current directory. Exporting `all` to JSON writes a single document;
//! CSV and Excel get one file per data set with `_events`, `_milestones`
//! and `_report` suffixes.

use crate::{
    db::{db::Db, events::{EventQuery, Events}, milestones::Milestones, recurrence_rules::RecurrenceRules},
    libs::{
        analytics::{self, AnalyticsReport, TimeRange},
        event::CountdownEvent,
        formatter::format_duration,
        messages::Message,
        milestone::Milestone,
    },
    msg_error_anyhow, msg_info,
};
use anyhow::Result;
use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Excel,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportData {
    Events,
    Milestones,
    Report,
    All,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportEvent {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub target: String,
    pub priority: i32,
    pub reminder_minutes: Option<i64>,
    pub active: bool,
    pub created_at: String,
    pub series_id: Option<i64>,
    pub remaining: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMilestone {
    pub id: String,
    pub event_id: i64,
    pub event_title: String,
    pub milestone_type: String,
    pub value: f64,
    pub title: String,
    pub message: String,
    pub achieved: bool,
    pub achieved_at: String,
    pub celebration_effect: String,
}

/// Writes gathered rows to a file in one [`ExportFormat`].
pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>, now: NaiveDateTime) -> Self {
        let default_name = format!("countjoy_export_{}", now.format("%Y%m%d_%H%M%S"));
        let output_path = output_path.unwrap_or_else(|| PathBuf::from(format!("{}.{}", default_name, format.extension())));

        Self { format, output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Writes the requested data set and returns the files created.
    pub fn export(&self, db: &Db, data: ExportData, range: TimeRange, now: NaiveDateTime) -> Result<Vec<PathBuf>> {
        match data {
            ExportData::Events => {
                let rows = gather_events(db, range, now)?;
                match self.format {
                    ExportFormat::Csv => write_csv(&self.output_path, &rows)?,
                    ExportFormat::Json => write_json(&self.output_path, &rows)?,
                    ExportFormat::Excel => self.export_events_excel(&rows)?,
                }
            }
            ExportData::Milestones => {
                let rows = gather_milestones(db)?;
                match self.format {
                    ExportFormat::Csv => write_csv(&self.output_path, &rows)?,
                    ExportFormat::Json => write_json(&self.output_path, &rows)?,
                    ExportFormat::Excel => self.export_milestones_excel(&rows)?,
                }
            }
            ExportData::Report => {
                let report = gather_report(db, range, now)?;
                match self.format {
                    ExportFormat::Csv => self.export_report_csv(&report)?,
                    ExportFormat::Json => write_json(&self.output_path, &report)?,
                    ExportFormat::Excel => self.export_report_excel(&report)?,
                }
            }
            ExportData::All => return self.export_all(db, range, now),
        }

        Ok(vec![self.output_path.clone()])
    }

    fn export_all(&self, db: &Db, range: TimeRange, now: NaiveDateTime) -> Result<Vec<PathBuf>> {
        msg_info!(Message::ExportingAllData);

        if self.format == ExportFormat::Json {
            let all_data = serde_json::json!({
                "export_date": now.format("%Y-%m-%d %H:%M:%S").to_string(),
                "time_range": range,
                "events": gather_events(db, range, now)?,
                "milestones": gather_milestones(db)?,
                "recurrence_rules": RecurrenceRules::new(db).all()?,
                "report": gather_report(db, range, now)?,
            });
            write_json(&self.output_path, &all_data)?;
            return Ok(vec![self.output_path.clone()]);
        }

        let base = self
            .output_path
            .file_stem()
            .ok_or_else(|| msg_error_anyhow!(Message::InvalidExportPath(self.output_path.display().to_string())))?
            .to_string_lossy()
            .to_string();

        let mut written = Vec::new();
        for (suffix, data) in [("events", ExportData::Events), ("milestones", ExportData::Milestones), ("report", ExportData::Report)] {
            let path = self.output_path.with_file_name(format!("{}_{}.{}", base, suffix, self.format.extension()));
            written.extend(Exporter::new(self.format, Some(path), now).export(db, data, range, now)?);
        }
        Ok(written)
    }

    fn export_report_csv(&self, report: &AnalyticsReport) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new().flexible(true).from_path(&self.output_path)?;
        let stats = &report.statistics;

        wtr.write_record(["SUMMARY", ""])?;
        wtr.write_record(["Time Range", report.time_range.display_name()])?;
        wtr.write_record(["Total Events", &stats.total_events.to_string()])?;
        wtr.write_record(["Active Events", &stats.active_events.to_string()])?;
        wtr.write_record(["Completed Events", &stats.completed_events.to_string()])?;
        wtr.write_record(["Success Rate", &format!("{:.1}%", stats.success_rate)])?;
        wtr.write_record(["Average Duration", &format_duration(&stats.average_duration())])?;

        wtr.write_record([""])?;
        wtr.write_record(["CATEGORIES", "", ""])?;
        wtr.write_record(["Category", "Count", "Percentage"])?;
        for entry in &report.category_distribution {
            wtr.write_record([entry.category.clone(), entry.count.to_string(), format!("{:.1}%", entry.percentage)])?;
        }

        wtr.write_record([""])?;
        wtr.write_record(["DURATIONS", ""])?;
        for bin in &report.duration_histogram {
            wtr.write_record([bin.range.clone(), bin.count.to_string()])?;
        }

        let milestones = &report.milestone_stats;
        wtr.write_record([""])?;
        wtr.write_record(["MILESTONES", ""])?;
        wtr.write_record(["Total", &milestones.total_milestones.to_string()])?;
        wtr.write_record(["Achieved", &milestones.achieved_milestones.to_string()])?;
        wtr.write_record(["Achievement Rate", &format!("{:.1}%", milestones.achievement_rate)])?;

        let insights = &report.productivity_insights;
        wtr.write_record([""])?;
        wtr.write_record(["INSIGHTS", ""])?;
        wtr.write_record(["Most Productive Day", &insights.most_productive_day])?;
        wtr.write_record(["Most Productive Hour", &format!("{}:00", insights.most_productive_hour)])?;
        wtr.write_record(["Events Per Week", &format!("{:.1}", insights.average_events_per_week)])?;
        wtr.write_record(["Streak Days", &insights.streak_days.to_string()])?;
        for suggestion in &insights.suggestions {
            wtr.write_record(["Suggestion", suggestion])?;
        }

        wtr.flush()?;
        Ok(())
    }

    fn export_events_excel(&self, rows: &[ExportEvent]) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let header_format = header_format();

        write_headers(
            worksheet,
            0,
            &["ID", "Title", "Description", "Category", "Target", "Priority", "Reminder (min)", "Active", "Created", "Series", "Remaining"],
            &header_format,
        )?;

        for (i, event) in rows.iter().enumerate() {
            let row = i as u32 + 1;
            worksheet.write_number(row, 0, event.id as f64)?;
            worksheet.write_string(row, 1, &event.title)?;
            worksheet.write_string(row, 2, &event.description)?;
            worksheet.write_string(row, 3, &event.category)?;
            worksheet.write_string(row, 4, &event.target)?;
            worksheet.write_number(row, 5, event.priority as f64)?;
            if let Some(minutes) = event.reminder_minutes {
                worksheet.write_number(row, 6, minutes as f64)?;
            }
            worksheet.write_boolean(row, 7, event.active)?;
            worksheet.write_string(row, 8, &event.created_at)?;
            if let Some(series) = event.series_id {
                worksheet.write_number(row, 9, series as f64)?;
            }
            worksheet.write_string(row, 10, &event.remaining)?;
        }

        worksheet.autofit();
        workbook.save(&self.output_path)?;
        Ok(())
    }

    fn export_milestones_excel(&self, rows: &[ExportMilestone]) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let header_format = header_format();

        write_headers(
            worksheet,
            0,
            &["Event ID", "Event", "Type", "Value", "Title", "Message", "Achieved", "Achieved At", "Effect"],
            &header_format,
        )?;

        for (i, milestone) in rows.iter().enumerate() {
            let row = i as u32 + 1;
            worksheet.write_number(row, 0, milestone.event_id as f64)?;
            worksheet.write_string(row, 1, &milestone.event_title)?;
            worksheet.write_string(row, 2, &milestone.milestone_type)?;
            worksheet.write_number(row, 3, milestone.value)?;
            worksheet.write_string(row, 4, &milestone.title)?;
            worksheet.write_string(row, 5, &milestone.message)?;
            worksheet.write_boolean(row, 6, milestone.achieved)?;
            worksheet.write_string(row, 7, &milestone.achieved_at)?;
            worksheet.write_string(row, 8, &milestone.celebration_effect)?;
        }

        worksheet.autofit();
        workbook.save(&self.output_path)?;
        Ok(())
    }

    fn export_report_excel(&self, report: &AnalyticsReport) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let header_format = header_format();
        let title_format = Format::new().set_bold().set_font_size(14.0);
        let stats = &report.statistics;

        worksheet.write_string_with_format(0, 0, format!("CountJoy Report - {}", report.time_range.display_name()), &title_format)?;

        let mut row = 2;
        worksheet.write_string_with_format(row, 0, "SUMMARY", &header_format)?;
        for (label, value) in [
            ("Total Events", stats.total_events.to_string()),
            ("Active Events", stats.active_events.to_string()),
            ("Completed Events", stats.completed_events.to_string()),
            ("Success Rate", format!("{:.1}%", stats.success_rate)),
            ("Average Duration", format_duration(&stats.average_duration())),
        ] {
            row += 1;
            worksheet.write_string(row, 0, label)?;
            worksheet.write_string(row, 1, &value)?;
        }

        row += 2;
        write_headers(worksheet, row, &["Category", "Count", "Percentage"], &header_format)?;
        for entry in &report.category_distribution {
            row += 1;
            worksheet.write_string(row, 0, &entry.category)?;
            worksheet.write_number(row, 1, entry.count as f64)?;
            worksheet.write_string(row, 2, format!("{:.1}%", entry.percentage))?;
        }

        row += 2;
        write_headers(worksheet, row, &["Duration", "Events"], &header_format)?;
        for bin in &report.duration_histogram {
            row += 1;
            worksheet.write_string(row, 0, &bin.range)?;
            worksheet.write_number(row, 1, bin.count as f64)?;
        }

        let milestones = &report.milestone_stats;
        row += 2;
        worksheet.write_string_with_format(row, 0, "MILESTONES", &header_format)?;
        row += 1;
        worksheet.write_string(row, 0, "Achieved")?;
        worksheet.write_string(row, 1, format!("{} / {}", milestones.achieved_milestones, milestones.total_milestones))?;
        row += 1;
        worksheet.write_string(row, 0, "Achievement Rate")?;
        worksheet.write_string(row, 1, format!("{:.1}%", milestones.achievement_rate))?;

        row += 2;
        worksheet.write_string_with_format(row, 0, "SUGGESTIONS", &header_format)?;
        for suggestion in &report.productivity_insights.suggestions {
            row += 1;
            worksheet.write_string(row, 0, suggestion)?;
        }

        worksheet.autofit();
        workbook.save(&self.output_path)?;
        Ok(())
    }
}

/// Export rows for events created inside `range`.
pub fn gather_events(db: &Db, range: TimeRange, now: NaiveDateTime) -> Result<Vec<ExportEvent>> {
    let events = range.filter(&Events::new(db).fetch(EventQuery::All)?, now);
    Ok(events.iter().map(|event| to_export_event(event, now)).collect())
}

/// Export rows for every milestone, each carrying its event's title.
///
/// Milestones of a vanished event get an empty title.
pub fn gather_milestones(db: &Db) -> Result<Vec<ExportMilestone>> {
    let titles: HashMap<i64, String> = Events::new(db)
        .fetch(EventQuery::All)?
        .into_iter()
        .filter_map(|e| e.id.map(|id| (id, e.title)))
        .collect();

    Ok(Milestones::new(db)
        .all()?
        .into_iter()
        .map(|milestone| to_export_milestone(&milestone, titles.get(&milestone.event_id).cloned().unwrap_or_default()))
        .collect())
}

/// Analytics over the whole database, restricted to `range`.
pub fn gather_report(db: &Db, range: TimeRange, now: NaiveDateTime) -> Result<AnalyticsReport> {
    let events = Events::new(db).fetch(EventQuery::All)?;
    let milestones = Milestones::new(db).all()?;
    Ok(analytics::report(&events, &milestones, range, now))
}

fn to_export_event(event: &CountdownEvent, now: NaiveDateTime) -> ExportEvent {
    ExportEvent {
        id: event.id.unwrap_or(0),
        title: event.title.clone(),
        description: event.description.clone().unwrap_or_default(),
        category: event.category.clone(),
        target: event.target_date_time.format(DATE_TIME_FORMAT).to_string(),
        priority: event.priority,
        reminder_minutes: event.reminder_minutes.filter(|_| event.reminder_enabled),
        active: event.is_active,
        created_at: event.created_at.format(DATE_TIME_FORMAT).to_string(),
        series_id: event.parent_event_id,
        remaining: event.formatted_countdown(now, false),
    }
}

fn to_export_milestone(milestone: &Milestone, event_title: String) -> ExportMilestone {
    ExportMilestone {
        id: milestone.id.clone(),
        event_id: milestone.event_id,
        event_title,
        milestone_type: milestone.milestone_type.as_str().to_string(),
        value: milestone.value,
        title: milestone.title.clone(),
        message: milestone.message.clone(),
        achieved: milestone.achieved,
        achieved_at: milestone
            .achieved_at
            .map(|at| at.format(DATE_TIME_FORMAT).to_string())
            .unwrap_or_default(),
        celebration_effect: milestone.celebration_effect.as_str().to_string(),
    }
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    File::create(path)?.write_all(json.as_bytes())?;
    Ok(())
}

fn header_format() -> Format {
    Format::new().set_bold().set_background_color(rust_xlsxwriter::Color::Gray)
}

fn write_headers(worksheet: &mut Worksheet, row: u32, headers: &[&str], format: &Format) -> Result<()> {
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(row, col as u16, *header, format)?;
    }
    Ok(())
}

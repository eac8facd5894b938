//! Application configuration stored as `config.json` in the data directory.
//!
//! Every section is optional; a missing section (or a missing file) falls
//! back to that section's defaults, so a fresh install works without running
//! `countjoy init`.

use super::data_storage::DataStorage;
use crate::libs::formatter::parse_date;
use crate::libs::reminder::QuietHours;
use crate::libs::messages::Message;
use crate::{msg_print, msg_warning};
use anyhow::Result;
use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: &'static str,
    pub name: &'static str,
}

const CONFIG_MODULES: [ConfigModule; 4] = [
    ConfigModule { key: "watcher", name: "Watcher" },
    ConfigModule { key: "display", name: "Display" },
    ConfigModule { key: "milestones", name: "Milestones" },
    ConfigModule { key: "recurrence", name: "Recurrence" },
];

/// Background checks for milestones, reminders and recurring events.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WatcherConfig {
    /// Upper bound for the pause between two checks.
    pub check_interval_hours: u64,
    /// Check more often as the nearest event gets closer.
    pub adaptive: bool,
    /// Only look at high-priority events.
    pub urgent_only: bool,
    pub reminders: bool,
    /// Notifications for other than high-priority events wait until the window ends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet_hours: Option<QuietHours>,
    /// Let high-priority events notify during quiet hours.
    pub quiet_hours_override_urgent: bool,
    /// Announce events 24, 12, 6, 3 and 1 hour(s) ahead.
    pub hour_alerts: bool,
    /// Snooze lengths in minutes; the first is used when none is given.
    pub snooze_minutes: Vec<i64>,
}

impl WatcherConfig {
    pub fn default_snooze(&self) -> i64 {
        self.snooze_minutes.first().copied().unwrap_or(60)
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            check_interval_hours: 6,
            adaptive: true,
            urgent_only: false,
            reminders: true,
            quiet_hours: None,
            quiet_hours_override_urgent: true,
            hour_alerts: true,
            snooze_minutes: vec![60, 180, 1440],
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub include_seconds: bool,
    pub title_width: usize,
    pub date_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            include_seconds: true,
            title_width: 30,
            date_format: "%Y-%m-%d %H:%M".to_string(),
        }
    }
}

/// Template sets applied to new events when `add` gets no `--milestones`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MilestonesConfig {
    pub percentage_templates: bool,
    pub time_templates: bool,
}

impl Default for MilestonesConfig {
    fn default() -> Self {
        Self {
            percentage_templates: true,
            time_templates: false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RecurrenceConfig {
    /// Dates skipped by rules with `skip_holidays`.
    pub holidays: Vec<NaiveDate>,
    pub preview_count: usize,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            holidays: Vec::new(),
            preview_count: 10,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watcher: Option<WatcherConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestones: Option<MilestonesConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceConfig>,
}

impl Config {
    pub fn read() -> Result<Config> {
        Self::read_from(&DataStorage::new())
    }

    pub fn read_from(storage: &DataStorage) -> Result<Config> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&DataStorage::new())
    }

    pub fn save_to(&self, storage: &DataStorage) -> Result<()> {
        let config_file_path = storage.get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    pub fn watcher(&self) -> WatcherConfig {
        self.watcher.clone().unwrap_or_default()
    }

    pub fn display(&self) -> DisplayConfig {
        self.display.clone().unwrap_or_default()
    }

    pub fn milestones(&self) -> MilestonesConfig {
        self.milestones.clone().unwrap_or_default()
    }

    pub fn recurrence(&self) -> RecurrenceConfig {
        self.recurrence.clone().unwrap_or_default()
    }

    /// Interactive wizard that edits the selected sections of the current config.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let theme = ColorfulTheme::default();

        let selected = MultiSelect::with_theme(&theme)
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&CONFIG_MODULES.iter().map(|module| module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match CONFIG_MODULES[selection].key {
                "watcher" => {
                    let default = config.watcher();
                    msg_print!(Message::ConfigModuleWatcher);
                    let quiet_hours: String = Input::with_theme(&theme)
                        .with_prompt(Message::PromptQuietHours.to_string())
                        .default(default.quiet_hours.map(|q| q.to_string()).unwrap_or_default())
                        .allow_empty(true)
                        .interact_text()?;
                    config.watcher = Some(WatcherConfig {
                        check_interval_hours: Input::with_theme(&theme)
                            .with_prompt(Message::PromptCheckInterval.to_string())
                            .default(default.check_interval_hours)
                            .validate_with(|hours: &u64| if *hours == 0 { Err(Message::IntervalMustBePositive.to_string()) } else { Ok(()) })
                            .interact_text()?,
                        adaptive: Confirm::with_theme(&theme)
                            .with_prompt(Message::PromptAdaptiveChecks.to_string())
                            .default(default.adaptive)
                            .interact()?,
                        urgent_only: Confirm::with_theme(&theme)
                            .with_prompt(Message::PromptUrgentOnly.to_string())
                            .default(default.urgent_only)
                            .interact()?,
                        reminders: Confirm::with_theme(&theme)
                            .with_prompt(Message::PromptRemindersEnabled.to_string())
                            .default(default.reminders)
                            .interact()?,
                        quiet_hours: parse_quiet_hours(&quiet_hours),
                        hour_alerts: Confirm::with_theme(&theme)
                            .with_prompt(Message::PromptHourAlerts.to_string())
                            .default(default.hour_alerts)
                            .interact()?,
                        ..default
                    });
                }
                "display" => {
                    let default = config.display();
                    msg_print!(Message::ConfigModuleDisplay);
                    config.display = Some(DisplayConfig {
                        include_seconds: Confirm::with_theme(&theme)
                            .with_prompt(Message::PromptIncludeSeconds.to_string())
                            .default(default.include_seconds)
                            .interact()?,
                        title_width: Input::with_theme(&theme)
                            .with_prompt(Message::PromptTitleWidth.to_string())
                            .default(default.title_width)
                            .interact_text()?,
                        date_format: Input::with_theme(&theme)
                            .with_prompt(Message::PromptDateFormat.to_string())
                            .default(default.date_format)
                            .interact_text()?,
                    });
                }
                "milestones" => {
                    let default = config.milestones();
                    msg_print!(Message::ConfigModuleMilestones);
                    config.milestones = Some(MilestonesConfig {
                        percentage_templates: Confirm::with_theme(&theme)
                            .with_prompt(Message::PromptPercentageTemplates.to_string())
                            .default(default.percentage_templates)
                            .interact()?,
                        time_templates: Confirm::with_theme(&theme)
                            .with_prompt(Message::PromptTimeTemplates.to_string())
                            .default(default.time_templates)
                            .interact()?,
                    });
                }
                "recurrence" => {
                    let default = config.recurrence();
                    msg_print!(Message::ConfigModuleRecurrence);
                    let holidays: String = Input::with_theme(&theme)
                        .with_prompt(Message::PromptHolidays.to_string())
                        .default(default.holidays.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(","))
                        .allow_empty(true)
                        .interact_text()?;
                    config.recurrence = Some(RecurrenceConfig {
                        holidays: parse_holidays(&holidays),
                        preview_count: Input::with_theme(&theme)
                            .with_prompt(Message::PromptPreviewCount.to_string())
                            .default(default.preview_count)
                            .interact_text()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}

/// Parses `HH:MM-HH:MM`; empty input turns quiet hours off, invalid input is warned about and dropped.
pub fn parse_quiet_hours(input: &str) -> Option<QuietHours> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    match input.parse() {
        Ok(quiet) => Some(quiet),
        Err(_) => {
            msg_warning!(Message::QuietHoursSkipped(input.to_string()));
            None
        }
    }
}

/// Parses a comma separated list of ISO dates, warning about and skipping bad entries.
pub fn parse_holidays(input: &str) -> Vec<NaiveDate> {
    let mut holidays: Vec<NaiveDate> = input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .filter_map(|item| match parse_date(item) {
            Ok(date) => Some(date),
            Err(_) => {
                msg_warning!(Message::HolidaySkipped(item.to_string()));
                None
            }
        })
        .collect();
    holidays.sort();
    holidays.dedup();
    holidays
}

//! Wording for every [`Message`].
//!
//! Messages with parameters interpolate them here, so callers never format
//! user-facing text themselves:
//!
//! ```rust
//! use countjoy::libs::messages::Message;
//!
//! let text = Message::EventCreated(3, "Launch".to_string()).to_string();
//! assert_eq!(text, "Event 'Launch' created with ID 3");
//! ```

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === EVENT MESSAGES ===
            Message::EventCreated(id, title) => format!("Event '{}' created with ID {}", title, id),
            Message::EventUpdated(id) => format!("Event {} updated", id),
            Message::EventDeleted(title) => format!("Event '{}' deleted", title),
            Message::EventArchived(title) => format!("Event '{}' archived", title),
            Message::EventRestored(title) => format!("Event '{}' restored", title),
            Message::EventDuplicated(source, copy) => format!("Event {} copied as event {}", source, copy),
            Message::EventCreateFailed => "Failed to create event".to_string(),
            Message::EventIdRequired => "The event has not been saved yet".to_string(),
            Message::NoEventsFound => "No events found.".to_string(),
            Message::NoChangesDetected => "No changes detected.".to_string(),
            Message::ConfirmDeleteEvent(title) => format!("Delete event '{}' and its milestones?", title),
            Message::OperationCancelled => "Operation cancelled.".to_string(),
            Message::TitleRequired => "A title is required unless a template is used".to_string(),
            Message::TargetDateRequired => "A target is required: pass --date or --in-days".to_string(),
            Message::TemplateNotFound(id) => format!("Template '{}' not found", id),
            Message::CountdownLine(title, remaining) => format!("{}: {}", title, remaining),

            // === MILESTONE MESSAGES ===
            Message::MilestoneAdded(title) => format!("Milestone '{}' added", title),
            Message::MilestoneDeleted(title) => format!("Milestone '{}' deleted", title),
            Message::MilestoneMarkedAchieved(title) => format!("Milestone '{}' marked as achieved", title),
            Message::MilestoneAlreadyAchieved(title) => format!("Milestone '{}' was already achieved", title),
            Message::MilestonesCreated(count) => format!("{} milestone(s) created", count),
            Message::NoMilestonesFound => "No milestones found.".to_string(),
            Message::NoNewAchievements => "No new milestones reached.".to_string(),
            Message::MilestoneHistoryHeader => "Achieved milestones:".to_string(),
            Message::AmbiguousMilestoneId(id, count) => {
                format!("'{}' matches {} milestones, use a longer prefix", id, count)
            }
            Message::MilestoneAchieved(symbol, event, milestone, message) => {
                if message.is_empty() {
                    format!("{} {}: {}", symbol, event, milestone)
                } else {
                    format!("{} {}: {} {}", symbol, event, milestone, message)
                }
            }

            // === RECURRENCE MESSAGES ===
            Message::RuleAttached(title, summary) => format!("'{}' now repeats: {}", title, summary),
            Message::RuleSummary(title, summary) => format!("{}: {}", title, summary),
            Message::RuleRemoved(id) => format!("Recurrence removed from event {}", id),
            Message::PatternRequired => "Pass --pattern or --template".to_string(),
            Message::NextOccurrence(date) => format!("Next occurrence: {}", date),
            Message::SeriesFinished => "The series has no further occurrences.".to_string(),
            Message::SeriesEnded(id) => format!("Series {} has ended", id),
            Message::NoOccurrencesDue => "No occurrences are due.".to_string(),
            Message::OccurrenceGenerated(id, target) => format!("Series {}: generated occurrence for {}", id, target),
            Message::OccurrenceCreated(title, target) => format!("Next '{}' scheduled for {}", title, target),
            Message::OccurrencesDeleted(count) => format!("{} upcoming occurrence(s) deleted", count),
            Message::OccurrencesUpdated(count) => format!("{} upcoming occurrence(s) updated", count),

            // === WATCHER MESSAGES ===
            Message::WatcherRunning(hours) => format!("Watcher running, checking at least every {}h", hours),
            Message::WatcherRunningWithPid(pid) => format!("Watcher is running (PID: {})", pid),
            Message::WatcherPassCompleted(events, achievements, reminders, generated) => format!(
                "Checked {} event(s): {} milestone(s), {} reminder(s), {} occurrence(s)",
                events, achievements, reminders, generated
            ),
            Message::WatcherPassFailed(error) => format!("Watcher pass failed: {}", error),
            Message::WatcherNextCheck(hours) => format!("Next check in {}h", hours),
            Message::NothingToReport(events) => format!("Checked {} event(s), nothing new.", events),
            Message::ReminderFired(title, remaining) => format!("⏰ Reminder: '{}' in {}", title, remaining),
            Message::HourAlert(title, hours) => match hours {
                24 => format!("⏳ 24 Hours Remaining! One day until {}", title),
                12 => format!("⏳ 12 Hours to Go! Half a day until {}", title),
                6 => format!("⏳ 6 Hours Left! {} is almost here", title),
                3 => format!("⏳ 3 Hour Warning! Get ready for {}", title),
                1 => format!("⏳ Final Hour! {} starts in 1 hour", title),
                _ => format!("⏳ {} hours until {}", hours, title),
            },
            Message::NotificationsDeferred(count) => format!("Quiet hours: {} event(s) will be checked later", count),
            Message::ReminderNotEnabled(title) => format!("'{}' has no reminder set", title),
            Message::SnoozeMustBePositive => "Snooze length must be at least one minute".to_string(),
            Message::SnoozePastEvent(title) => format!("Cannot snooze past '{}' itself", title),
            Message::ReminderSnoozed(title, at) => format!("Reminder for '{}' snoozed until {}", title, at),
            Message::NoSuggestions(title) => format!("No reminder times left to suggest for '{}'", title),
            Message::ReminderSetFromSuggestion(title, at) => format!("Reminder for '{}' set for {}", title, at),
            Message::WatcherStarted(pid) => format!("Watcher started in background (PID: {})", pid),
            Message::WatcherStopped(pid) => format!("Watcher stopped (PID: {})", pid),
            Message::WatcherNotRunning => "Watcher is not running.".to_string(),
            Message::WatcherStoppingExisting(pid) => format!("Stopping running watcher (PID: {})", pid),
            Message::WatcherFailedToStopExisting(error) => format!("Failed to stop running watcher: {}", error),
            Message::WatcherExited => "Watcher exited.".to_string(),
            Message::WatcherShuttingDown => "Watcher shutting down.".to_string(),
            Message::WatcherReceivedSigterm => "Received SIGTERM".to_string(),
            Message::WatcherReceivedSigint => "Received SIGINT".to_string(),
            Message::WatcherReceivedCtrlC => "Received Ctrl-C".to_string(),
            Message::WatcherSignalHandlingNotSupported => "Signal handling is not supported on this platform".to_string(),
            Message::SignalHandlerFailed(error) => format!("Failed to install signal handler: {}", error),
            Message::DaemonModeNotSupported => "Background mode is not supported on this platform".to_string(),
            Message::CurrentExecutableUnavailable(error) => format!("Cannot locate the current executable: {}", error),
            Message::InvalidPidFileContent => "Invalid PID file content".to_string(),
            Message::FailedToOpenProcess(code) => format!("Failed to open process (error {})", code),
            Message::FailedToTerminateProcess(code) => format!("Failed to terminate process (error {})", code),
            Message::ProcessTerminationNotSupported => "Process termination is not supported on this platform".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved.".to_string(),
            Message::DataDirectory(path) => format!("Data directory: {}", path),
            Message::ConfigModuleWatcher => "Watcher".to_string(),
            Message::ConfigModuleDisplay => "Display".to_string(),
            Message::ConfigModuleMilestones => "Milestones".to_string(),
            Message::ConfigModuleRecurrence => "Recurrence".to_string(),
            Message::PromptSelectModules => "Select sections to configure".to_string(),
            Message::PromptCheckInterval => "Maximum hours between checks".to_string(),
            Message::IntervalMustBePositive => "The interval must be at least 1 hour".to_string(),
            Message::PromptAdaptiveChecks => "Check more often as events approach?".to_string(),
            Message::PromptUrgentOnly => "Only watch high-priority events?".to_string(),
            Message::PromptRemindersEnabled => "Fire reminders?".to_string(),
            Message::PromptQuietHours => "Quiet hours as HH:MM-HH:MM (empty for none)".to_string(),
            Message::PromptHourAlerts => "Announce the last 24, 12, 6, 3 and 1 hour(s)?".to_string(),
            Message::QuietHoursSkipped(value) => format!("Ignoring invalid quiet hours '{}'", value),
            Message::PromptIncludeSeconds => "Show seconds in countdowns?".to_string(),
            Message::PromptTitleWidth => "Maximum title width in tables".to_string(),
            Message::PromptDateFormat => "Date format (strftime)".to_string(),
            Message::PromptPercentageTemplates => "Add progress milestones to new events?".to_string(),
            Message::PromptTimeTemplates => "Add days-remaining milestones to new events?".to_string(),
            Message::PromptHolidays => "Holidays to skip (comma-separated YYYY-MM-DD)".to_string(),
            Message::PromptPreviewCount => "Occurrences shown by preview".to_string(),
            Message::HolidaySkipped(value) => format!("Ignoring invalid holiday '{}'", value),

            // === STATISTICS AND EXPORT MESSAGES ===
            Message::StatsHeader(range) => format!("Statistics: {}", range),
            Message::ExportingData(data, format) => format!("Exporting {} as {}...", data, format),
            Message::ExportingAllData => "Exporting all data...".to_string(),
            Message::ExportCompleted(path) => format!("Export completed: {}", path),
            Message::InvalidExportPath(path) => format!("Invalid export path: {}", path),

            // === DATABASE MESSAGES ===
            Message::DatabaseVersion(current, latest) => format!("Database version: {} (latest: {})", current, latest),
            Message::DatabaseNeedsUpdate => "Database needs migration.".to_string(),
            Message::DatabaseUpToDate => "Database is up to date.".to_string(),
            Message::MigrationHistory => "Migration history:".to_string(),
            Message::MigrationHistoryEntry(version, name, applied_at) => {
                format!("  v{}: {} (applied: {})", version, name, applied_at)
            }
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All migrations completed".to_string(),
            Message::NothingToRollback => "Nothing to roll back".to_string(),
            Message::RollingBack(from, to) => format!("Rolling back from v{} to v{}", from, to),
            Message::RollbackCompleted(version) => format!("Rolled back to v{}", version),
        };
        write!(f, "{}", text)
    }
}

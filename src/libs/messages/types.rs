#[derive(Debug, Clone)]
pub enum Message {
    // === EVENT MESSAGES ===
    EventCreated(i64, String), // id, title
    EventUpdated(i64),
    EventDeleted(String),
    EventArchived(String),
    EventRestored(String),
    EventDuplicated(i64, i64), // source id, copy id
    EventCreateFailed,
    EventIdRequired,
    NoEventsFound,
    NoChangesDetected,
    ConfirmDeleteEvent(String),
    OperationCancelled,
    TitleRequired,
    TargetDateRequired,
    TemplateNotFound(String),
    CountdownLine(String, String), // title, remaining

    // === MILESTONE MESSAGES ===
    MilestoneAdded(String),
    MilestoneDeleted(String),
    MilestoneMarkedAchieved(String),
    MilestoneAlreadyAchieved(String),
    MilestonesCreated(usize),
    NoMilestonesFound,
    NoNewAchievements,
    MilestoneHistoryHeader,
    AmbiguousMilestoneId(String, usize),
    MilestoneAchieved(String, String, String, String), // symbol, event, milestone, message

    // === RECURRENCE MESSAGES ===
    RuleAttached(String, String), // title, summary
    RuleSummary(String, String),
    RuleRemoved(i64),
    PatternRequired,
    NextOccurrence(String),
    SeriesFinished,
    SeriesEnded(i64),
    NoOccurrencesDue,
    OccurrenceGenerated(i64, String),
    OccurrenceCreated(String, String), // title, target
    OccurrencesDeleted(usize),
    OccurrencesUpdated(usize),

    // === WATCHER MESSAGES ===
    WatcherRunning(u64),
    WatcherRunningWithPid(u32),
    WatcherPassCompleted(usize, usize, usize, usize), // events, achievements, reminders, generated
    WatcherPassFailed(String),
    WatcherNextCheck(u64),
    NothingToReport(usize),
    ReminderFired(String, String), // title, remaining
    HourAlert(String, i64),        // title, hours left
    NotificationsDeferred(usize),
    ReminderNotEnabled(String),
    SnoozeMustBePositive,
    SnoozePastEvent(String),
    ReminderSnoozed(String, String), // title, fires at
    NoSuggestions(String),
    ReminderSetFromSuggestion(String, String), // title, fires at
    WatcherStarted(u32),
    WatcherStopped(u32),
    WatcherNotRunning,
    WatcherStoppingExisting(String),
    WatcherFailedToStopExisting(String),
    WatcherExited,
    WatcherShuttingDown,
    WatcherReceivedSigterm,
    WatcherReceivedSigint,
    WatcherReceivedCtrlC,
    WatcherSignalHandlingNotSupported,
    SignalHandlerFailed(String),
    DaemonModeNotSupported,
    CurrentExecutableUnavailable(String),
    InvalidPidFileContent,
    FailedToOpenProcess(u32),
    FailedToTerminateProcess(u32),
    ProcessTerminationNotSupported,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    DataDirectory(String),
    ConfigModuleWatcher,
    ConfigModuleDisplay,
    ConfigModuleMilestones,
    ConfigModuleRecurrence,
    PromptSelectModules,
    PromptCheckInterval,
    IntervalMustBePositive,
    PromptAdaptiveChecks,
    PromptUrgentOnly,
    PromptRemindersEnabled,
    PromptQuietHours,
    PromptHourAlerts,
    QuietHoursSkipped(String),
    PromptIncludeSeconds,
    PromptTitleWidth,
    PromptDateFormat,
    PromptPercentageTemplates,
    PromptTimeTemplates,
    PromptHolidays,
    PromptPreviewCount,
    HolidaySkipped(String),

    // === STATISTICS AND EXPORT MESSAGES ===
    StatsHeader(String),
    ExportingData(String, String), // data set, format
    ExportingAllData,
    ExportCompleted(String),
    InvalidExportPath(String),

    // === DATABASE MESSAGES ===
    DatabaseVersion(u32, u32), // current, latest
    DatabaseNeedsUpdate,
    DatabaseUpToDate,
    MigrationHistory,
    MigrationHistoryEntry(u32, String, String),
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    NothingToRollback,
    RollingBack(u32, u32),
    RollbackCompleted(u32),
}

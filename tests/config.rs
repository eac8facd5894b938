#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use countjoy::libs::config::{parse_holidays, parse_quiet_hours, Config, DisplayConfig, RecurrenceConfig, WatcherConfig, CONFIG_FILE_NAME};
    use countjoy::libs::data_storage::DataStorage;
    use std::fs;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ConfigTestContext {
        _dir: TempDir,
        storage: DataStorage,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let dir = TempDir::new().unwrap();
            let storage = DataStorage::at(dir.path().join("countjoy"));
            ConfigTestContext { _dir: dir, storage }
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_missing_file_gives_defaults(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(&ctx.storage).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.watcher().check_interval_hours, 6);
        assert!(config.milestones().percentage_templates);
        assert!(!config.milestones().time_templates);
        assert_eq!(config.recurrence().preview_count, 10);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_back(ctx: &mut ConfigTestContext) {
        let config = Config {
            watcher: Some(WatcherConfig {
                check_interval_hours: 2,
                urgent_only: true,
                quiet_hours: parse_quiet_hours("22:30-06:45"),
                snooze_minutes: vec![15, 60],
                ..WatcherConfig::default()
            }),
            display: Some(DisplayConfig {
                include_seconds: false,
                ..DisplayConfig::default()
            }),
            milestones: None,
            recurrence: Some(RecurrenceConfig {
                holidays: vec![NaiveDate::from_ymd_opt(2025, 12, 25).unwrap()],
                preview_count: 4,
            }),
        };

        config.save_to(&ctx.storage).unwrap();
        assert!(ctx.storage.base_path().join(CONFIG_FILE_NAME).exists());

        let stored = Config::read_from(&ctx.storage).unwrap();
        assert_eq!(stored, config);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_sections_fill_defaults(ctx: &mut ConfigTestContext) {
        let path = ctx.storage.get_path(CONFIG_FILE_NAME).unwrap();
        fs::write(&path, r#"{ "watcher": { "urgent_only": true }, "display": { "title_width": 12 } }"#).unwrap();

        let config = Config::read_from(&ctx.storage).unwrap();
        assert!(config.watcher().urgent_only);
        assert!(config.watcher().reminders);
        assert_eq!(config.watcher().quiet_hours, None);
        assert_eq!(config.watcher().default_snooze(), 60);
        assert_eq!(config.display().title_width, 12);
        assert_eq!(config.display().date_format, "%Y-%m-%d %H:%M");
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_broken_file_is_an_error(ctx: &mut ConfigTestContext) {
        let path = ctx.storage.get_path(CONFIG_FILE_NAME).unwrap();
        fs::write(&path, "{ not json").unwrap();

        assert!(Config::read_from(&ctx.storage).is_err());
    }

    #[test]
    fn test_parse_holidays() {
        let holidays = parse_holidays("2025-12-25, 2025-01-01,nonsense,,2025-12-25");

        assert_eq!(
            holidays,
            vec![
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 12, 25).unwrap(),
            ]
        );
        assert!(parse_holidays("").is_empty());
    }

    #[test]
    fn test_parse_quiet_hours() {
        let quiet = parse_quiet_hours(" 22:30-06:45 ").unwrap();
        assert_eq!(quiet.to_string(), "22:30-06:45");
        assert!(parse_quiet_hours("").is_none());
        assert!(parse_quiet_hours("late evening").is_none());
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use countjoy::db::db::Db;
    use countjoy::db::events::Events;
    use countjoy::libs::analytics::TimeRange;
    use countjoy::libs::event::CountdownEvent;
    use countjoy::libs::export::{ExportData, ExportEvent, ExportFormat, ExportMilestone, Exporter};
    use countjoy::libs::milestone::create_milestones;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ExportTestContext {
        db: Db,
        dir: TempDir,
        now: NaiveDateTime,
    }

    impl TestContext for ExportTestContext {
        fn setup() -> Self {
            let db = Db::in_memory().unwrap();
            let now = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
            let events = Events::new(&db);

            let mut wedding = CountdownEvent::new("Wedding", now + Duration::days(40), now - Duration::days(5));
            wedding.category = "Anniversary".to_string();
            wedding.description = Some("Lisbon, 16:00".to_string());
            let wedding_id = events.insert(&wedding).unwrap();
            create_milestones(&db, wedding_id, true, false, Vec::new()).unwrap();

            // Created long before the range of recent exports
            let old = CountdownEvent::new("Old trip", now - Duration::days(100), now - Duration::days(200));
            events.insert(&old).unwrap();

            ExportTestContext {
                db,
                dir: TempDir::new().unwrap(),
                now,
            }
        }
    }

    impl ExportTestContext {
        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn export(&self, format: ExportFormat, data: ExportData, range: TimeRange, name: &str) -> Vec<PathBuf> {
            Exporter::new(format, Some(self.path(name)), self.now)
                .export(&self.db, data, range, self.now)
                .unwrap()
        }
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_events_csv(ctx: &mut ExportTestContext) {
        let written = ctx.export(ExportFormat::Csv, ExportData::Events, TimeRange::AllTime, "events.csv");
        assert_eq!(written, vec![ctx.path("events.csv")]);

        let mut reader = csv::Reader::from_path(&written[0]).unwrap();
        let rows: Vec<ExportEvent> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Old trip");
        assert_eq!(rows[1].title, "Wedding");
        assert_eq!(rows[1].description, "Lisbon, 16:00");
        assert_eq!(rows[1].target, "2025-07-11 12:00");
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_respects_time_range(ctx: &mut ExportTestContext) {
        let written = ctx.export(ExportFormat::Json, ExportData::Events, TimeRange::Last30Days, "recent.json");

        let rows: Vec<ExportEvent> = serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Wedding");
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_milestones_json(ctx: &mut ExportTestContext) {
        let written = ctx.export(ExportFormat::Json, ExportData::Milestones, TimeRange::AllTime, "milestones.json");

        let rows: Vec<ExportMilestone> = serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|m| m.event_title == "Wedding"));
        assert!(rows.iter().all(|m| !m.achieved && m.achieved_at.is_empty()));
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_all_json_is_one_document(ctx: &mut ExportTestContext) {
        let written = ctx.export(ExportFormat::Json, ExportData::All, TimeRange::AllTime, "all.json");
        assert_eq!(written.len(), 1);

        let document: serde_json::Value = serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(document["events"].as_array().unwrap().len(), 2);
        assert_eq!(document["milestones"].as_array().unwrap().len(), 5);
        assert!(document["recurrence_rules"].as_array().unwrap().is_empty());
        assert_eq!(document["report"]["statistics"]["total_events"], 2);
        assert_eq!(document["time_range"], "ALL_TIME");
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_all_csv_splits_files(ctx: &mut ExportTestContext) {
        let written = ctx.export(ExportFormat::Csv, ExportData::All, TimeRange::AllTime, "backup.csv");

        assert_eq!(
            written,
            vec![ctx.path("backup_events.csv"), ctx.path("backup_milestones.csv"), ctx.path("backup_report.csv")]
        );
        assert!(written.iter().all(|path| path.exists()));

        let report = fs::read_to_string(ctx.path("backup_report.csv")).unwrap();
        assert!(report.contains("Total Events,2"));
        assert!(report.contains("Anniversary"));
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_excel(ctx: &mut ExportTestContext) {
        for data in [ExportData::Events, ExportData::Milestones, ExportData::Report] {
            let name = format!("{:?}.xlsx", data).to_lowercase();
            let written = ctx.export(ExportFormat::Excel, data, TimeRange::AllTime, &name);
            assert!(fs::metadata(&written[0]).unwrap().len() > 0);
        }
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_default_file_name(ctx: &mut ExportTestContext) {
        let exporter = Exporter::new(ExportFormat::Excel, None, ctx.now);
        assert_eq!(exporter.output_path(), PathBuf::from("countjoy_export_20250601_120000.xlsx").as_path());
    }
}

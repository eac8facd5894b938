#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use countjoy::db::db::Db;
    use countjoy::db::events::{EventQuery, Events};
    use countjoy::db::recurrence_rules::RecurrenceRules;
    use countjoy::libs::error::CountJoyError;
    use countjoy::libs::event::CountdownEvent;
    use countjoy::libs::generator::{require_rule, RecurrenceGenerator};
    use countjoy::libs::recurrence::{RecurrenceCalculator, RecurrencePattern, RecurrenceRule};
    use test_context::{test_context, TestContext};

    fn at(month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    struct SeriesTestContext {
        db: Db,
        original: CountdownEvent,
    }

    impl TestContext for SeriesTestContext {
        fn setup() -> Self {
            let db = Db::in_memory().unwrap();
            // Monday standup
            let mut original = CountdownEvent::new("Standup", at(1, 6, 9), at(1, 1, 8));
            original.id = Some(Events::new(&db).insert(&original).unwrap());

            SeriesTestContext { db, original }
        }
    }

    impl SeriesTestContext {
        fn generator(&self) -> RecurrenceGenerator<'_> {
            RecurrenceGenerator::new(&self.db, RecurrenceCalculator::new())
        }

        fn attach(&self, rule: RecurrenceRule) -> RecurrenceRule {
            self.generator().attach_rule(&self.original, rule).unwrap()
        }

        fn series_id(&self) -> i64 {
            self.original.id.unwrap()
        }
    }

    #[test_context(SeriesTestContext)]
    #[test]
    fn test_attach_rule_sets_bookkeeping_dates(ctx: &mut SeriesTestContext) {
        let rule = ctx.attach(RecurrenceRule::new(0, RecurrencePattern::Weekly));

        assert_eq!(rule.event_id, ctx.series_id());
        assert_eq!(rule.last_occurrence_date, Some(date(1, 6)));
        assert_eq!(rule.next_occurrence_date, Some(date(1, 13)));
        assert_eq!(require_rule(&ctx.db, ctx.series_id()).unwrap(), rule);
    }

    #[test_context(SeriesTestContext)]
    #[test]
    fn test_attach_rejects_invalid_rule(ctx: &mut SeriesTestContext) {
        let rule = RecurrenceRule::new(0, RecurrencePattern::Daily).with_interval(0);

        assert!(ctx.generator().attach_rule(&ctx.original, rule).is_err());
        assert!(RecurrenceRules::new(&ctx.db).by_event(ctx.series_id()).unwrap().is_none());
    }

    #[test_context(SeriesTestContext)]
    #[test]
    fn test_attach_rejects_generated_occurrence(ctx: &mut SeriesTestContext) {
        ctx.attach(RecurrenceRule::new(0, RecurrencePattern::Weekly));
        let generated = ctx.generator().check_and_generate(at(1, 7, 10)).unwrap();

        let err = ctx
            .generator()
            .attach_rule(&generated[0], RecurrenceRule::new(0, RecurrencePattern::Daily))
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<CountJoyError>(),
            Some(&CountJoyError::OccurrenceOfSeries(ctx.series_id()))
        );
        assert!(RecurrenceRules::new(&ctx.db).by_event(generated[0].id.unwrap()).unwrap().is_none());
    }

    #[test_context(SeriesTestContext)]
    #[test]
    fn test_attach_replaces_previous_rule(ctx: &mut SeriesTestContext) {
        ctx.attach(RecurrenceRule::new(0, RecurrencePattern::Weekly));
        ctx.attach(RecurrenceRule::new(0, RecurrencePattern::Daily));

        let rules = RecurrenceRules::new(&ctx.db).all().unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].pattern, RecurrencePattern::Daily);
        assert_eq!(rules[0].next_occurrence_date, Some(date(1, 7)));
    }

    #[test_context(SeriesTestContext)]
    #[test]
    fn test_generate_weekly_series(ctx: &mut SeriesTestContext) {
        ctx.attach(RecurrenceRule::new(0, RecurrencePattern::Weekly));
        let generator = ctx.generator();

        // Due once the original's date has arrived
        let generated = generator.check_and_generate(at(1, 7, 10)).unwrap();
        assert_eq!(generated.len(), 1);
        assert_eq!(generated[0].target_date_time, at(1, 13, 9));
        assert_eq!(generated[0].parent_event_id, Some(ctx.series_id()));
        assert_eq!(generated[0].title, "Standup");

        let rule = require_rule(&ctx.db, ctx.series_id()).unwrap();
        assert_eq!(rule.last_occurrence_date, Some(date(1, 13)));
        assert_eq!(rule.next_occurrence_date, Some(date(1, 20)));

        // The new occurrence lies ahead, so nothing else is due yet
        assert!(generator.check_and_generate(at(1, 8, 10)).unwrap().is_empty());

        let children = Events::new(&ctx.db).fetch(EventQuery::Children(ctx.series_id())).unwrap();
        assert_eq!(children.len(), 1);
    }

    #[test_context(SeriesTestContext)]
    #[test]
    fn test_generation_skips_missed_occurrences(ctx: &mut SeriesTestContext) {
        ctx.attach(RecurrenceRule::new(0, RecurrencePattern::Weekly));

        // Three weeks without a check
        let generated = ctx.generator().check_and_generate(at(1, 28, 12)).unwrap();
        assert_eq!(generated.len(), 1);
        assert_eq!(generated[0].target_date_time, at(2, 3, 9));

        let rule = require_rule(&ctx.db, ctx.series_id()).unwrap();
        assert_eq!(rule.next_occurrence_date, Some(date(2, 10)));
    }

    #[test_context(SeriesTestContext)]
    #[test]
    fn test_series_ends_after_occurrence_count(ctx: &mut SeriesTestContext) {
        ctx.attach(RecurrenceRule::new(0, RecurrencePattern::Weekly).ends_after(2));
        let generator = ctx.generator();

        generator.check_and_generate(at(1, 7, 10)).unwrap();
        let second = generator.check_and_generate(at(1, 14, 10)).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].target_date_time, at(1, 20, 9));

        let rule = require_rule(&ctx.db, ctx.series_id()).unwrap();
        assert_eq!(rule.last_occurrence_date, Some(date(1, 20)));
        assert_eq!(rule.next_occurrence_date, None);

        // Finished series are never due again
        assert!(generator.check_and_generate(at(3, 1, 10)).unwrap().is_empty());
        assert!(generator.generate_next_occurrence(&ctx.original, &rule, at(3, 1, 10)).unwrap().is_none());
        assert_eq!(Events::new(&ctx.db).count_children(ctx.series_id()).unwrap(), 2);
    }

    #[test_context(SeriesTestContext)]
    #[test]
    fn test_series_ends_by_date(ctx: &mut SeriesTestContext) {
        ctx.attach(RecurrenceRule::new(0, RecurrencePattern::Weekly).ends_on(date(1, 15)));
        let generator = ctx.generator();

        assert_eq!(generator.check_and_generate(at(1, 7, 10)).unwrap().len(), 1);
        let rule = require_rule(&ctx.db, ctx.series_id()).unwrap();
        assert_eq!(rule.next_occurrence_date, None);
        assert!(generator.check_and_generate(at(1, 21, 10)).unwrap().is_empty());
    }

    #[test_context(SeriesTestContext)]
    #[test]
    fn test_inactive_series_is_not_generated(ctx: &mut SeriesTestContext) {
        ctx.attach(RecurrenceRule::new(0, RecurrencePattern::Daily));
        Events::new(&ctx.db).set_active(ctx.series_id(), false, at(1, 2, 8)).unwrap();

        assert!(ctx.generator().check_and_generate(at(1, 7, 10)).unwrap().is_empty());
    }

    #[test_context(SeriesTestContext)]
    #[test]
    fn test_preview_does_not_store(ctx: &mut SeriesTestContext) {
        let rule = ctx.attach(RecurrenceRule::new(0, RecurrencePattern::Weekly).with_interval(2));

        let dates = ctx.generator().preview_future_occurrences(&ctx.original, &rule, 3);
        assert_eq!(dates, vec![at(1, 20, 9), at(2, 3, 9), at(2, 17, 9)]);
        assert_eq!(Events::new(&ctx.db).count_children(ctx.series_id()).unwrap(), 0);
    }

    #[test_context(SeriesTestContext)]
    #[test]
    fn test_delete_future_occurrences(ctx: &mut SeriesTestContext) {
        ctx.attach(RecurrenceRule::new(0, RecurrencePattern::Weekly));
        let generator = ctx.generator();
        generator.check_and_generate(at(1, 7, 10)).unwrap();
        generator.check_and_generate(at(1, 14, 10)).unwrap();

        // The 01-13 occurrence has passed, 01-20 is still ahead
        let deleted = generator.delete_future_occurrences(ctx.series_id(), at(1, 15, 0)).unwrap();
        assert_eq!(deleted, 1);

        let remaining = Events::new(&ctx.db).fetch(EventQuery::Children(ctx.series_id())).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].target_date_time, at(1, 13, 9));
        assert!(require_rule(&ctx.db, ctx.series_id()).is_err());
    }

    #[test_context(SeriesTestContext)]
    #[test]
    fn test_update_all_future_occurrences(ctx: &mut SeriesTestContext) {
        ctx.attach(RecurrenceRule::new(0, RecurrencePattern::Weekly));
        let generator = ctx.generator();
        generator.check_and_generate(at(1, 7, 10)).unwrap();
        generator.check_and_generate(at(1, 14, 10)).unwrap();

        let mut edited = ctx.original.clone();
        edited.title = "Team sync".to_string();
        edited.priority = 2;
        let touched = generator.update_occurrence(&edited, true, at(1, 15, 0)).unwrap();
        assert_eq!(touched, 1);

        let children = Events::new(&ctx.db).fetch(EventQuery::Children(ctx.series_id())).unwrap();
        assert_eq!(children[0].title, "Standup");
        assert_eq!(children[1].title, "Team sync");
        assert_eq!(children[1].priority, 2);
        assert_eq!(Events::new(&ctx.db).require(ctx.series_id()).unwrap().title, "Team sync");
    }

    #[test_context(SeriesTestContext)]
    #[test]
    fn test_update_single_occurrence_records_exception(ctx: &mut SeriesTestContext) {
        ctx.attach(RecurrenceRule::new(0, RecurrencePattern::Weekly));
        let generated = ctx.generator().check_and_generate(at(1, 7, 10)).unwrap();

        let mut moved = generated[0].clone();
        moved.target_date_time = at(1, 14, 9);
        let touched = ctx.generator().update_occurrence(&moved, false, at(1, 8, 0)).unwrap();
        assert_eq!(touched, 0);

        let rule = require_rule(&ctx.db, ctx.series_id()).unwrap();
        assert_eq!(rule.exceptions, vec![date(1, 13)]);
        let stored = Events::new(&ctx.db).require(moved.id.unwrap()).unwrap();
        assert_eq!(stored.target_date_time, at(1, 14, 9));
    }

    #[test_context(SeriesTestContext)]
    #[test]
    fn test_edited_occurrence_still_counts_toward_limit(ctx: &mut SeriesTestContext) {
        ctx.attach(RecurrenceRule::new(0, RecurrencePattern::Weekly).ends_after(3));
        let generator = ctx.generator();
        let generated = generator.check_and_generate(at(1, 7, 10)).unwrap();

        let mut renamed = generated[0].clone();
        renamed.title = "Standup (moved room)".to_string();
        generator.update_occurrence(&renamed, false, at(1, 8, 0)).unwrap();

        for day in 8..=31 {
            generator.check_and_generate(at(1, day, 10)).unwrap();
        }
        for day in 1..=28 {
            generator.check_and_generate(at(2, day, 10)).unwrap();
        }

        let targets: Vec<NaiveDateTime> = Events::new(&ctx.db)
            .fetch(EventQuery::Children(ctx.series_id()))
            .unwrap()
            .into_iter()
            .map(|e| e.target_date_time)
            .collect();
        assert_eq!(targets, vec![at(1, 13, 9), at(1, 20, 9), at(1, 27, 9)]);

        let rule = require_rule(&ctx.db, ctx.series_id()).unwrap();
        assert_eq!(rule.exceptions, vec![date(1, 13)]);
        assert_eq!(rule.next_occurrence_date, None);
    }

    #[test_context(SeriesTestContext)]
    #[test]
    fn test_children_survive_original_deletion(ctx: &mut SeriesTestContext) {
        ctx.attach(RecurrenceRule::new(0, RecurrencePattern::Weekly));
        let generated = ctx.generator().check_and_generate(at(1, 7, 10)).unwrap();

        Events::new(&ctx.db).delete(ctx.series_id()).unwrap();

        let orphan = Events::new(&ctx.db).require(generated[0].id.unwrap()).unwrap();
        assert_eq!(orphan.parent_event_id, None);
        assert!(RecurrenceRules::new(&ctx.db).all().unwrap().is_empty());
    }
}

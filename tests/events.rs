#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use countjoy::db::db::Db;
    use countjoy::db::events::{EventQuery, Events};
    use countjoy::libs::error::CountJoyError;
    use countjoy::libs::event::{filter_and_sort, CountdownEvent, EventFilter, SortOption};
    use countjoy::libs::template;
    use countjoy::libs::validation;
    use test_context::{test_context, TestContext};

    struct EventTestContext {
        db: Db,
        now: NaiveDateTime,
    }

    impl TestContext for EventTestContext {
        fn setup() -> Self {
            EventTestContext {
                db: Db::in_memory().unwrap(),
                now: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap().and_hms_opt(9, 0, 0).unwrap(),
            }
        }
    }

    impl EventTestContext {
        fn insert(&self, title: &str, days: i64) -> i64 {
            let event = CountdownEvent::new(title, self.now + Duration::days(days), self.now);
            Events::new(&self.db).insert(&event).unwrap()
        }
    }

    #[test_context(EventTestContext)]
    #[test]
    fn test_event_insert_and_get(ctx: &mut EventTestContext) {
        let mut event = CountdownEvent::new("Release", ctx.now + Duration::days(10), ctx.now);
        event.description = Some("Ship v2".to_string());
        event.reminder_enabled = true;
        event.reminder_minutes = Some(90);
        event.color = Some("#FF9800".to_string());

        let events = Events::new(&ctx.db);
        let id = events.insert(&event).unwrap();
        let stored = events.get(id).unwrap().unwrap();

        assert_eq!(stored.id, Some(id));
        assert_eq!(CountdownEvent { id: None, ..stored }, event);
    }

    #[test_context(EventTestContext)]
    #[test]
    fn test_event_update(ctx: &mut EventTestContext) {
        let id = ctx.insert("Draft", 5);
        let events = Events::new(&ctx.db);

        let mut event = events.require(id).unwrap();
        event.title = "Final".to_string();
        event.priority = 7;
        events.update(&event).unwrap();

        let updated = events.require(id).unwrap();
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.priority, 7);
    }

    #[test_context(EventTestContext)]
    #[test]
    fn test_missing_event_is_typed_error(ctx: &mut EventTestContext) {
        let events = Events::new(&ctx.db);
        assert!(events.get(404).unwrap().is_none());

        let err = events.require(404).unwrap_err();
        assert_eq!(err.downcast_ref::<CountJoyError>(), Some(&CountJoyError::EventNotFound(404)));
        assert!(events.set_active(404, false, ctx.now).is_err());
    }

    #[test_context(EventTestContext)]
    #[test]
    fn test_archive_and_restore(ctx: &mut EventTestContext) {
        let first = ctx.insert("First", 1);
        ctx.insert("Second", 2);
        let events = Events::new(&ctx.db);

        events.set_active(first, false, ctx.now).unwrap();
        let active = events.fetch(EventQuery::Active).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "Second");

        events.set_active(first, true, ctx.now).unwrap();
        assert_eq!(events.fetch(EventQuery::Active).unwrap().len(), 2);
    }

    #[test_context(EventTestContext)]
    #[test]
    fn test_fetch_orders_by_target(ctx: &mut EventTestContext) {
        let late = ctx.insert("Late", 30);
        let early = ctx.insert("Early", 3);
        let events = Events::new(&ctx.db);

        let all = events.fetch(EventQuery::All).unwrap();
        let ids: Vec<i64> = all.iter().filter_map(|e| e.id).collect();
        assert_eq!(ids, vec![early, late]);

        let picked = events.fetch(EventQuery::ByIds(vec![late])).unwrap();
        assert_eq!(picked.len(), 1);
        assert!(events.fetch(EventQuery::ByIds(vec![])).unwrap().is_empty());
    }

    #[test_context(EventTestContext)]
    #[test]
    fn test_delete_event(ctx: &mut EventTestContext) {
        let id = ctx.insert("Gone soon", 4);
        let events = Events::new(&ctx.db);

        events.delete(id).unwrap();
        assert!(events.get(id).unwrap().is_none());
    }

    #[test_context(EventTestContext)]
    #[test]
    fn test_duplicate_is_stored_as_new_event(ctx: &mut EventTestContext) {
        let id = ctx.insert("Party", 12);
        let events = Events::new(&ctx.db);

        let copy = events.require(id).unwrap().duplicate(ctx.now);
        let copy_id = events.insert(&copy).unwrap();

        assert_ne!(copy_id, id);
        assert_eq!(events.require(copy_id).unwrap().title, "Party (Copy)");
    }

    #[test_context(EventTestContext)]
    #[test]
    fn test_list_filters_and_sorting(ctx: &mut EventTestContext) {
        let events = Events::new(&ctx.db);
        for (title, category, priority, days) in [
            ("Mom's birthday", "Birthday", 2, 20),
            ("Dentist", "Health", 1, 3),
            ("Tax return", "Finance", 2, 60),
            ("Old meetup", "Meeting", 0, -2),
        ] {
            let mut event = CountdownEvent::new(title, ctx.now + Duration::days(days), ctx.now - Duration::days(7));
            event.category = category.to_string();
            event.priority = priority;
            events.insert(&event).unwrap();
        }
        let all = events.fetch(EventQuery::All).unwrap();

        let upcoming = filter_and_sort(all.clone(), &EventFilter::default(), SortOption::Date, ctx.now);
        let titles: Vec<&str> = upcoming.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Dentist", "Mom's birthday", "Tax return"]);

        let urgent = EventFilter {
            priority: Some(2),
            ..EventFilter::default()
        };
        let by_name = filter_and_sort(all.clone(), &urgent, SortOption::Name, ctx.now);
        assert_eq!(by_name[0].title, "Mom's birthday");
        assert_eq!(by_name.len(), 2);

        let everything = EventFilter {
            include_past: true,
            search: Some("MEET".to_string()),
            ..EventFilter::default()
        };
        assert_eq!(filter_and_sort(all, &everything, SortOption::Date, ctx.now).len(), 1);
    }

    #[test_context(EventTestContext)]
    #[test]
    fn test_template_event_passes_validation(ctx: &mut EventTestContext) {
        let event = template::find("project_deadline").unwrap().to_event(None, None, ctx.now);
        let event = validation::prepare(event, ctx.now).unwrap();
        let id = Events::new(&ctx.db).insert(&event).unwrap();

        let stored = Events::new(&ctx.db).require(id).unwrap();
        assert_eq!(stored.category, "Deadline");
        assert_eq!(stored.reminder_minutes, Some(3 * 24 * 60));
        assert_eq!(stored.target_date_time, ctx.now + Duration::days(14));
    }

    #[test_context(EventTestContext)]
    #[test]
    fn test_categories_are_distinct(ctx: &mut EventTestContext) {
        let events = Events::new(&ctx.db);
        for category in ["Work", "Travel", "Work"] {
            let mut event = CountdownEvent::new("Item", ctx.now + Duration::days(1), ctx.now);
            event.category = category.to_string();
            events.insert(&event).unwrap();
        }

        assert_eq!(events.categories().unwrap(), vec!["Travel".to_string(), "Work".to_string()]);
    }
}

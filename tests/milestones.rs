#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use countjoy::db::db::Db;
    use countjoy::db::events::Events;
    use countjoy::db::milestones::Milestones;
    use countjoy::libs::event::CountdownEvent;
    use countjoy::libs::milestone::{
        check_milestones, create_milestones, CelebrationEffect, Milestone, MilestoneType, PERCENTAGE_TEMPLATES, TIME_TEMPLATES,
    };
    use test_context::{test_context, TestContext};

    struct MilestoneTestContext {
        db: Db,
        created: NaiveDateTime,
        event_id: i64,
    }

    impl TestContext for MilestoneTestContext {
        fn setup() -> Self {
            let db = Db::in_memory().unwrap();
            let created = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
            // A 20 day countdown
            let event = CountdownEvent::new("Marathon", created + Duration::days(20), created);
            let event_id = Events::new(&db).insert(&event).unwrap();

            MilestoneTestContext { db, created, event_id }
        }
    }

    #[test_context(MilestoneTestContext)]
    #[test]
    fn test_create_default_milestones(ctx: &mut MilestoneTestContext) {
        let created = create_milestones(&ctx.db, ctx.event_id, true, true, Vec::new()).unwrap();
        assert_eq!(created.len(), PERCENTAGE_TEMPLATES.len() + TIME_TEMPLATES.len());

        let stored = Milestones::new(&ctx.db).by_event(ctx.event_id).unwrap();
        let titles: Vec<&str> = stored.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Just Started!",
                "Quarter Way!",
                "Halfway There!",
                "Three Quarters!",
                "Final Stretch!",
                "One Year to Go!",
                "100 Days!",
                "One Month!",
                "One Week!",
                "Tomorrow!",
            ]
        );
        assert!(stored.iter().all(|m| !m.achieved));
    }

    #[test_context(MilestoneTestContext)]
    #[test]
    fn test_create_time_milestones_only(ctx: &mut MilestoneTestContext) {
        let custom = Milestone::new(ctx.event_id, MilestoneType::Custom, 0.0, "Buy shoes", "Done");
        let created = create_milestones(&ctx.db, ctx.event_id, false, true, vec![custom]).unwrap();

        assert_eq!(created.len(), 6);
        assert!(created.iter().all(|m| m.milestone_type != MilestoneType::PercentageBased));
    }

    #[test_context(MilestoneTestContext)]
    #[test]
    fn test_check_milestones_achieves_reached_once(ctx: &mut MilestoneTestContext) {
        create_milestones(&ctx.db, ctx.event_id, true, true, Vec::new()).unwrap();

        // Halfway, ten days left
        let halfway = ctx.created + Duration::days(10);
        let achieved = check_milestones(&ctx.db, ctx.event_id, halfway).unwrap();
        let mut titles: Vec<&str> = achieved.iter().map(|a| a.milestone.title.as_str()).collect();
        titles.sort();
        assert_eq!(
            titles,
            vec!["100 Days!", "Halfway There!", "Just Started!", "One Month!", "One Year to Go!", "Quarter Way!"]
        );
        assert!(achieved.iter().all(|a| a.milestone.achieved_at == Some(halfway)));
        assert!(achieved.iter().all(|a| a.event.title == "Marathon"));

        // Nothing new at the same moment
        assert!(check_milestones(&ctx.db, ctx.event_id, halfway).unwrap().is_empty());

        // Six days left, 70% elapsed
        let later = check_milestones(&ctx.db, ctx.event_id, ctx.created + Duration::days(14)).unwrap();
        assert_eq!(later.len(), 1);
        assert_eq!(later[0].milestone.title, "One Week!");

        let history = Milestones::new(&ctx.db).achievement_history().unwrap();
        assert_eq!(history.len(), 7);
        assert_eq!(history[0].title, "One Week!");
    }

    #[test_context(MilestoneTestContext)]
    #[test]
    fn test_custom_milestones_are_never_auto_achieved(ctx: &mut MilestoneTestContext) {
        let custom = Milestone::new(ctx.event_id, MilestoneType::Custom, 0.0, "Register", "Registered!");
        Milestones::new(&ctx.db).insert(&custom).unwrap();

        let after_target = ctx.created + Duration::days(30);
        assert!(check_milestones(&ctx.db, ctx.event_id, after_target).unwrap().is_empty());
    }

    #[test_context(MilestoneTestContext)]
    #[test]
    fn test_check_missing_event_yields_nothing(ctx: &mut MilestoneTestContext) {
        assert!(check_milestones(&ctx.db, 999, ctx.created).unwrap().is_empty());
    }

    #[test_context(MilestoneTestContext)]
    #[test]
    fn test_milestone_update_and_delete(ctx: &mut MilestoneTestContext) {
        let repo = Milestones::new(&ctx.db);
        let mut milestone = Milestone::new(ctx.event_id, MilestoneType::PercentageBased, 60.0, "Past sixty", "");
        repo.insert(&milestone).unwrap();

        milestone.celebration_effect = CelebrationEffect::Fireworks;
        milestone.notification_enabled = false;
        repo.update(&milestone).unwrap();
        assert_eq!(repo.get(&milestone.id).unwrap(), Some(milestone.clone()));

        repo.mark_achieved(&milestone.id, ctx.created).unwrap();
        assert!(repo.unachieved(ctx.event_id).unwrap().is_empty());

        repo.delete(&milestone.id).unwrap();
        assert!(repo.get(&milestone.id).unwrap().is_none());
        assert!(repo.delete(&milestone.id).is_err());
        assert!(repo.mark_achieved("missing", ctx.created).is_err());
    }

    #[test_context(MilestoneTestContext)]
    #[test]
    fn test_milestones_removed_with_event(ctx: &mut MilestoneTestContext) {
        create_milestones(&ctx.db, ctx.event_id, true, false, Vec::new()).unwrap();
        Events::new(&ctx.db).delete(ctx.event_id).unwrap();

        assert!(Milestones::new(&ctx.db).all().unwrap().is_empty());
    }
}

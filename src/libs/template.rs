//! Built-in templates for quickly creating common events.

use crate::libs::event::{CountdownEvent, EventCategory, EventPriority};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// Target used when a template names neither an offset nor a calendar date.
pub const DEFAULT_DAYS_FROM_NOW: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: EventCategory,
    pub priority: EventPriority,
    pub default_title: &'static str,
    pub default_description: Option<&'static str>,
    pub days_from_now: Option<i64>,
    /// Month and day of a yearly date such as a public holiday.
    pub annual_date: Option<(u32, u32)>,
    pub reminder_days_before: Option<i64>,
    pub icon: &'static str,
    pub color: &'static str,
}

impl EventTemplate {
    /// The target the template suggests when no explicit date is given.
    pub fn default_target(&self, now: NaiveDateTime) -> NaiveDateTime {
        if let Some(date) = self.annual_date.and_then(|(month, day)| next_annual_date(now.date(), month, day)) {
            return date.and_time(now.time());
        }
        now + Duration::days(self.days_from_now.unwrap_or(DEFAULT_DAYS_FROM_NOW))
    }

    pub fn to_event(&self, title: Option<&str>, target: Option<NaiveDateTime>, now: NaiveDateTime) -> CountdownEvent {
        let target = target.unwrap_or_else(|| self.default_target(now));
        let mut event = CountdownEvent::new(title.unwrap_or(self.default_title), target, now);

        event.description = self.default_description.map(str::to_string);
        event.category = self.category.display_name().to_string();
        event.priority = self.priority.value();
        event.icon = Some(self.icon.to_string());
        event.color = Some(self.color.to_string());
        if let Some(days) = self.reminder_days_before {
            event.reminder_enabled = true;
            event.reminder_minutes = Some(days * 24 * 60);
        }

        event
    }
}

fn next_annual_date(today: NaiveDate, month: u32, day: u32) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if this_year > today {
        Some(this_year)
    } else {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    }
}

#[allow(clippy::too_many_arguments)]
const fn template(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: EventCategory,
    priority: EventPriority,
    default_title: &'static str,
    default_description: Option<&'static str>,
    days_from_now: Option<i64>,
    reminder_days_before: i64,
    icon: &'static str,
    color: &'static str,
) -> EventTemplate {
    EventTemplate {
        id,
        name,
        description,
        category,
        priority,
        default_title,
        default_description,
        days_from_now,
        annual_date: None,
        reminder_days_before: Some(reminder_days_before),
        icon,
        color,
    }
}

const fn annual(base: EventTemplate, month: u32, day: u32) -> EventTemplate {
    EventTemplate {
        annual_date: Some((month, day)),
        ..base
    }
}

use EventCategory as C;
use EventPriority as P;

pub static EVENT_TEMPLATES: [EventTemplate; 19] = [
    template("birthday_family", "Family Birthday", "Birthday celebration for a family member", C::Birthday, P::High, "Birthday", Some("Don't forget to get a gift!"), Some(30), 7, "cake", "#E91E63"),
    template("birthday_friend", "Friend's Birthday", "Birthday celebration for a friend", C::Birthday, P::Medium, "Friend's Birthday", Some("Send birthday wishes!"), Some(30), 1, "cake", "#E91E63"),
    template("wedding_anniversary", "Wedding Anniversary", "Wedding anniversary celebration", C::Anniversary, P::High, "Wedding Anniversary", Some("Plan something special!"), Some(365), 14, "favorite", "#F44336"),
    template("work_anniversary", "Work Anniversary", "Work anniversary milestone", C::Anniversary, P::Low, "Work Anniversary", None, Some(365), 1, "work", "#607D8B"),
    annual(template("christmas", "Christmas", "Christmas holiday", C::Holiday, P::Medium, "Christmas", Some("Time for family and gifts!"), None, 7, "beach_access", "#4CAF50"), 12, 25),
    annual(template("new_year", "New Year", "New Year celebration", C::Holiday, P::Medium, "New Year", Some("Time to celebrate!"), None, 1, "beach_access", "#4CAF50"), 1, 1),
    template("project_deadline", "Project Deadline", "Important project deadline", C::Deadline, P::High, "Project Deadline", Some("Complete and submit the project"), Some(14), 3, "schedule", "#FF9800"),
    template("meeting", "Important Meeting", "Business or team meeting", C::Meeting, P::Medium, "Meeting", Some("Prepare agenda and materials"), Some(7), 1, "groups", "#2196F3"),
    template("vacation", "Vacation", "Vacation trip", C::Travel, P::Medium, "Vacation Trip", Some("Pack and prepare for the trip"), Some(30), 7, "flight", "#00BCD4"),
    template("business_trip", "Business Trip", "Business travel", C::Travel, P::High, "Business Trip", Some("Prepare documents and materials"), Some(14), 3, "flight", "#00BCD4"),
    template("exam", "Exam", "Important exam or test", C::Education, P::High, "Exam", Some("Study and prepare!"), Some(7), 3, "school", "#9C27B0"),
    template("graduation", "Graduation", "Graduation ceremony", C::Education, P::High, "Graduation", Some("Celebrate the achievement!"), Some(90), 14, "school", "#9C27B0"),
    template("doctor_appointment", "Doctor Appointment", "Medical appointment", C::Health, P::Medium, "Doctor Appointment", Some("Bring medical records"), Some(7), 1, "health_and_safety", "#4CAF50"),
    template("fitness_goal", "Fitness Goal", "Fitness or health goal deadline", C::Health, P::Medium, "Fitness Goal", Some("Stay on track!"), Some(30), 7, "health_and_safety", "#4CAF50"),
    template("sports_event", "Sports Event", "Sports game or competition", C::Sports, P::Low, "Sports Event", Some("Don't miss the game!"), Some(7), 1, "sports", "#FF5722"),
    template("concert", "Concert", "Music concert or show", C::Entertainment, P::Medium, "Concert", Some("Get tickets ready!"), Some(30), 3, "movie", "#673AB7"),
    template("movie_release", "Movie Release", "Movie or show release date", C::Entertainment, P::Low, "Movie Release", Some("Book tickets in advance!"), Some(14), 1, "movie", "#673AB7"),
    template("bill_payment", "Bill Payment", "Monthly bill payment due", C::Finance, P::High, "Bill Payment Due", Some("Pay before the due date"), Some(30), 3, "attach_money", "#FFEB3B"),
    template("tax_deadline", "Tax Deadline", "Tax filing deadline", C::Finance, P::High, "Tax Filing Deadline", Some("Prepare and submit tax documents"), Some(90), 14, "attach_money", "#FFEB3B"),
];

pub fn find(id: &str) -> Option<&'static EventTemplate> {
    EVENT_TEMPLATES.iter().find(|t| t.id.eq_ignore_ascii_case(id))
}

pub fn by_category(category: EventCategory) -> Vec<&'static EventTemplate> {
    EVENT_TEMPLATES.iter().filter(|t| t.category == category).collect()
}

/// The most commonly used templates.
pub fn popular() -> &'static [EventTemplate] {
    &EVENT_TEMPLATES[..6]
}

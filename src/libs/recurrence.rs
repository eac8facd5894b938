//! Recurrence rules and the occurrence calculator.
//!
//! A [`RecurrenceRule`] describes how an event repeats: the pattern and its
//! interval, optional anchors (weekdays, day of month, week of month, month
//! of year), how the series ends, and which dates must be left out.
//! [`RecurrenceCalculator`] turns a rule plus a starting occurrence into the
//! list of upcoming occurrence date-times.
//!
//! ## Stepping rules
//!
//! | Pattern           | Next occurrence                                                      |
//! |-------------------|----------------------------------------------------------------------|
//! | `Daily`           | `interval` days later                                                |
//! | `Weekly`          | `interval` weeks later, or the next listed weekday                   |
//! | `MonthlyByDate`   | same day of month `interval` months later, clamped to month length   |
//! | `MonthlyByDay`    | Nth weekday (e.g. 2nd Tuesday) `interval` months later               |
//! | `Yearly`          | same month and day `interval` years later, Feb 29 falls back to 28   |
//!
//! Candidates falling on exception dates, on weekends (`skip_weekends`) or on
//! configured holidays (`skip_holidays`) are stepped over without counting
//! toward `AfterOccurrences`. The time of day of the starting occurrence is
//! kept for every generated one.

use super::error::CountJoyError;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Upper bound on candidate dates examined per calculation.
pub const MAX_CANDIDATE_STEPS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    MonthlyByDate,
    MonthlyByDay,
    Yearly,
}

impl RecurrencePattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrencePattern::Daily => "DAILY",
            RecurrencePattern::Weekly => "WEEKLY",
            RecurrencePattern::MonthlyByDate => "MONTHLY_BY_DATE",
            RecurrencePattern::MonthlyByDay => "MONTHLY_BY_DAY",
            RecurrencePattern::Yearly => "YEARLY",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RecurrencePattern::Daily => "Daily",
            RecurrencePattern::Weekly => "Weekly",
            RecurrencePattern::MonthlyByDate => "Monthly (by date)",
            RecurrencePattern::MonthlyByDay => "Monthly (by day)",
            RecurrencePattern::Yearly => "Yearly",
        }
    }
}

impl FromStr for RecurrencePattern {
    type Err = CountJoyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "DAILY" => Ok(RecurrencePattern::Daily),
            "WEEKLY" => Ok(RecurrencePattern::Weekly),
            "MONTHLY_BY_DATE" => Ok(RecurrencePattern::MonthlyByDate),
            "MONTHLY_BY_DAY" => Ok(RecurrencePattern::MonthlyByDay),
            "YEARLY" => Ok(RecurrencePattern::Yearly),
            _ => Err(CountJoyError::UnknownPattern(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrenceEndType {
    #[default]
    Never,
    ByDate,
    AfterOccurrences,
}

impl RecurrenceEndType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceEndType::Never => "NEVER",
            RecurrenceEndType::ByDate => "BY_DATE",
            RecurrenceEndType::AfterOccurrences => "AFTER_OCCURRENCES",
        }
    }
}

impl FromStr for RecurrenceEndType {
    type Err = CountJoyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NEVER" => Ok(RecurrenceEndType::Never),
            "BY_DATE" => Ok(RecurrenceEndType::ByDate),
            "AFTER_OCCURRENCES" => Ok(RecurrenceEndType::AfterOccurrences),
            _ => Err(CountJoyError::UnknownEndType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub id: String,
    pub event_id: i64,
    pub pattern: RecurrencePattern,
    pub interval: u32,
    /// Kept sorted Monday first, without duplicates.
    pub days_of_week: Vec<Weekday>,
    pub day_of_month: Option<u32>,
    /// 1-5, where 5 means the last such weekday of the month.
    pub week_of_month: Option<u32>,
    pub month_of_year: Option<u32>,
    pub end_type: RecurrenceEndType,
    pub end_date: Option<NaiveDate>,
    pub occurrence_count: Option<u32>,
    pub exceptions: Vec<NaiveDate>,
    pub skip_weekends: bool,
    pub skip_holidays: bool,
    /// Date of the most recent occurrence that exists as an event.
    pub last_occurrence_date: Option<NaiveDate>,
    /// Date of the occurrence that will be generated next.
    pub next_occurrence_date: Option<NaiveDate>,
}

impl RecurrenceRule {
    pub fn new(event_id: i64, pattern: RecurrencePattern) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            pattern,
            interval: 1,
            days_of_week: Vec::new(),
            day_of_month: None,
            week_of_month: None,
            month_of_year: None,
            end_type: RecurrenceEndType::Never,
            end_date: None,
            occurrence_count: None,
            exceptions: Vec::new(),
            skip_weekends: false,
            skip_holidays: false,
            last_occurrence_date: None,
            next_occurrence_date: None,
        }
    }

    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_days(mut self, days: &[Weekday]) -> Self {
        self.set_days(days);
        self
    }

    pub fn set_days(&mut self, days: &[Weekday]) {
        let mut sorted: Vec<Weekday> = days.to_vec();
        sorted.sort_by_key(|d| d.num_days_from_monday());
        sorted.dedup();
        self.days_of_week = sorted;
    }

    pub fn ends_on(mut self, end_date: NaiveDate) -> Self {
        self.end_type = RecurrenceEndType::ByDate;
        self.end_date = Some(end_date);
        self
    }

    pub fn ends_after(mut self, count: u32) -> Self {
        self.end_type = RecurrenceEndType::AfterOccurrences;
        self.occurrence_count = Some(count);
        self
    }

    pub fn add_exception(&mut self, date: NaiveDate) {
        if !self.exceptions.contains(&date) {
            self.exceptions.push(date);
            self.exceptions.sort();
        }
    }

    /// Whether `produced` occurrences exhaust an `AfterOccurrences` rule.
    pub fn limit_reached(&self, produced: u32) -> bool {
        match (self.end_type, self.occurrence_count) {
            (RecurrenceEndType::AfterOccurrences, Some(limit)) => produced >= limit,
            _ => false,
        }
    }

    /// Rejects values the calculator cannot step with.
    pub fn validate(&self) -> Result<(), CountJoyError> {
        if self.interval == 0 {
            return Err(CountJoyError::InvalidRule("interval must be at least 1".into()));
        }
        if let Some(day) = self.day_of_month {
            if !(1..=31).contains(&day) {
                return Err(CountJoyError::InvalidRule("day of month must be between 1 and 31".into()));
            }
        }
        if let Some(week) = self.week_of_month {
            if !(1..=5).contains(&week) {
                return Err(CountJoyError::InvalidRule("week of month must be between 1 and 5".into()));
            }
        }
        if let Some(month) = self.month_of_year {
            if !(1..=12).contains(&month) {
                return Err(CountJoyError::InvalidRule("month of year must be between 1 and 12".into()));
            }
        }
        if self.end_type == RecurrenceEndType::ByDate && self.end_date.is_none() {
            return Err(CountJoyError::InvalidRule("an end date is required".into()));
        }
        if self.end_type == RecurrenceEndType::AfterOccurrences && self.occurrence_count.unwrap_or(0) == 0 {
            return Err(CountJoyError::InvalidRule("occurrence count must be at least 1".into()));
        }
        Ok(())
    }

    /// Short human description, e.g. "Every 2 weeks on Mon, Wed until 2025-12-31".
    pub fn summary(&self) -> String {
        let unit = match self.pattern {
            RecurrencePattern::Daily => "day",
            RecurrencePattern::Weekly => "week",
            RecurrencePattern::MonthlyByDate | RecurrencePattern::MonthlyByDay => "month",
            RecurrencePattern::Yearly => "year",
        };
        let mut text = if self.interval == 1 {
            format!("Every {}", unit)
        } else {
            format!("Every {} {}s", self.interval, unit)
        };

        match self.pattern {
            RecurrencePattern::Weekly if !self.days_of_week.is_empty() => {
                let days: Vec<String> = self.days_of_week.iter().map(|d| d.to_string()).collect();
                text.push_str(&format!(" on {}", days.join(", ")));
            }
            RecurrencePattern::MonthlyByDate => {
                if let Some(day) = self.day_of_month {
                    text.push_str(&format!(" on day {}", day));
                }
            }
            RecurrencePattern::MonthlyByDay => {
                if let (Some(week), Some(day)) = (self.week_of_month, self.days_of_week.first()) {
                    text.push_str(&format!(" on the {} {}", ordinal(week), day));
                }
            }
            RecurrencePattern::Yearly => {
                if let Some(month) = self.month_of_year {
                    text.push_str(&format!(" in month {}", month));
                }
            }
            _ => {}
        }

        match (self.end_type, self.end_date, self.occurrence_count) {
            (RecurrenceEndType::ByDate, Some(date), _) => text.push_str(&format!(" until {}", date)),
            (RecurrenceEndType::AfterOccurrences, _, Some(count)) => text.push_str(&format!(", {} times", count)),
            _ => {}
        }
        if self.skip_weekends {
            text.push_str(", skipping weekends");
        }
        if self.skip_holidays {
            text.push_str(", skipping holidays");
        }
        text
    }
}

fn ordinal(n: u32) -> String {
    match n {
        1 => "1st".into(),
        2 => "2nd".into(),
        3 => "3rd".into(),
        5 => "last".into(),
        n => format!("{}th", n),
    }
}

pub fn parse_weekday(value: &str) -> Result<Weekday, CountJoyError> {
    match value.trim().to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tues" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thurs" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(CountJoyError::UnknownWeekday(value.to_string())),
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}

/// `MONDAY,FRIDAY` storage form of a weekday set.
pub fn encode_days(days: &[Weekday]) -> String {
    days.iter().map(|d| weekday_name(*d)).collect::<Vec<_>>().join(",")
}

/// Inverse of [`encode_days`]; unrecognised items are dropped.
pub fn decode_days(value: &str) -> Vec<Weekday> {
    let mut days: Vec<Weekday> = value.split(',').filter_map(|item| parse_weekday(item).ok()).collect();
    days.sort_by_key(|d| d.num_days_from_monday());
    days.dedup();
    days
}

pub fn encode_dates(dates: &[NaiveDate]) -> String {
    dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect::<Vec<_>>().join(",")
}

pub fn decode_dates(value: &str) -> Vec<NaiveDate> {
    value
        .split(',')
        .filter_map(|item| NaiveDate::parse_from_str(item.trim(), "%Y-%m-%d").ok())
        .collect()
}

/// Named presets offered by `recur templates`.
#[derive(Debug, Clone, Copy)]
pub struct RecurrenceTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub pattern: RecurrencePattern,
    pub interval: u32,
    pub days_of_week: &'static [Weekday],
}

impl RecurrenceTemplate {
    pub fn to_rule(&self, event_id: i64) -> RecurrenceRule {
        RecurrenceRule::new(event_id, self.pattern).with_interval(self.interval).with_days(self.days_of_week)
    }
}

pub static RECURRENCE_TEMPLATES: [RecurrenceTemplate; 7] = [
    RecurrenceTemplate {
        key: "daily",
        name: "Daily",
        description: "Every day",
        pattern: RecurrencePattern::Daily,
        interval: 1,
        days_of_week: &[],
    },
    RecurrenceTemplate {
        key: "weekdays",
        name: "Weekdays",
        description: "Monday to Friday",
        pattern: RecurrencePattern::Weekly,
        interval: 1,
        days_of_week: &[Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
    },
    RecurrenceTemplate {
        key: "weekly",
        name: "Weekly",
        description: "Every week on the same day",
        pattern: RecurrencePattern::Weekly,
        interval: 1,
        days_of_week: &[],
    },
    RecurrenceTemplate {
        key: "biweekly",
        name: "Bi-weekly",
        description: "Every two weeks",
        pattern: RecurrencePattern::Weekly,
        interval: 2,
        days_of_week: &[],
    },
    RecurrenceTemplate {
        key: "monthly",
        name: "Monthly",
        description: "Same date every month",
        pattern: RecurrencePattern::MonthlyByDate,
        interval: 1,
        days_of_week: &[],
    },
    RecurrenceTemplate {
        key: "quarterly",
        name: "Quarterly",
        description: "Every 3 months",
        pattern: RecurrencePattern::MonthlyByDate,
        interval: 3,
        days_of_week: &[],
    },
    RecurrenceTemplate {
        key: "yearly",
        name: "Yearly",
        description: "Same date every year",
        pattern: RecurrencePattern::Yearly,
        interval: 1,
        days_of_week: &[],
    },
];

pub fn find_template(key: &str) -> Option<&'static RecurrenceTemplate> {
    RECURRENCE_TEMPLATES
        .iter()
        .find(|t| t.key.eq_ignore_ascii_case(key) || t.name.eq_ignore_ascii_case(key))
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecurrenceCalculator {
    holidays: Vec<NaiveDate>,
}

impl RecurrenceCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_holidays(holidays: Vec<NaiveDate>) -> Self {
        Self { holidays }
    }

    /// Up to `count` occurrences following `start`, which is treated as the series' first occurrence.
    pub fn calculate_next_occurrences(&self, rule: &RecurrenceRule, start: NaiveDateTime, count: usize) -> Vec<NaiveDateTime> {
        self.occurrences_after(rule, start, start, 0, count)
    }

    /// Continues a series from its latest occurrence `from`.
    ///
    /// `anchor` is the series' first occurrence and supplies the default day
    /// of month, weekday and week index. `already_generated` is the number of
    /// occurrences produced so far and counts toward `AfterOccurrences`.
    pub fn occurrences_after(
        &self,
        rule: &RecurrenceRule,
        anchor: NaiveDateTime,
        from: NaiveDateTime,
        already_generated: u32,
        count: usize,
    ) -> Vec<NaiveDateTime> {
        let mut occurrences = Vec::new();
        let mut current = from;
        let mut produced = already_generated;

        for _ in 0..MAX_CANDIDATE_STEPS {
            if occurrences.len() >= count || rule.limit_reached(produced) {
                break;
            }
            let Some(next) = Self::advance(rule, anchor, current) else {
                break;
            };
            current = next;

            if Self::past_end_date(rule, current.date()) {
                break;
            }
            if Self::is_exception(rule, current.date()) || self.should_skip(rule, current.date()) {
                continue;
            }

            occurrences.push(current);
            produced += 1;
        }

        occurrences
    }

    fn past_end_date(rule: &RecurrenceRule, date: NaiveDate) -> bool {
        match (rule.end_type, rule.end_date) {
            (RecurrenceEndType::ByDate, Some(end)) => date > end,
            _ => false,
        }
    }

    fn is_exception(rule: &RecurrenceRule, date: NaiveDate) -> bool {
        rule.exceptions.contains(&date)
    }

    fn should_skip(&self, rule: &RecurrenceRule, date: NaiveDate) -> bool {
        if rule.skip_weekends && matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return true;
        }
        rule.skip_holidays && self.holidays.contains(&date)
    }

    fn advance(rule: &RecurrenceRule, anchor: NaiveDateTime, current: NaiveDateTime) -> Option<NaiveDateTime> {
        let interval = rule.interval.max(1);
        let time = current.time();
        let date = match rule.pattern {
            RecurrencePattern::Daily => current.date().checked_add_signed(Duration::days(interval as i64))?,
            RecurrencePattern::Weekly => next_weekly(rule, current.date(), interval)?,
            RecurrencePattern::MonthlyByDate => {
                let (year, month) = add_months(current.year(), current.month(), interval)?;
                let day = rule.day_of_month.unwrap_or(anchor.day());
                clamped_date(year, month, day)?
            }
            RecurrencePattern::MonthlyByDay => {
                let (year, month) = add_months(current.year(), current.month(), interval)?;
                let weekday = rule.days_of_week.first().copied().unwrap_or(anchor.weekday());
                let week = rule.week_of_month.unwrap_or((anchor.day() - 1) / 7 + 1);
                nth_weekday_of_month(year, month, weekday, week)?
            }
            RecurrencePattern::Yearly => {
                let year = current.year().checked_add(i32::try_from(interval).ok()?)?;
                let month = rule.month_of_year.unwrap_or(anchor.month());
                let day = rule.day_of_month.unwrap_or(anchor.day());
                clamped_date(year, month, day)?
            }
        };
        Some(date.and_time(time))
    }
}

/// Next listed weekday after `date`; entering a new Monday-based week skips `interval - 1` weeks.
fn next_weekly(rule: &RecurrenceRule, date: NaiveDate, interval: u32) -> Option<NaiveDate> {
    if rule.days_of_week.is_empty() {
        return date.checked_add_signed(Duration::weeks(interval as i64));
    }

    let mut candidate = date;
    for _ in 0..8 {
        candidate = candidate.succ_opt()?;
        if candidate.weekday() == Weekday::Mon && interval > 1 {
            candidate = candidate.checked_add_signed(Duration::weeks(interval as i64 - 1))?;
        }
        if rule.days_of_week.contains(&candidate.weekday()) {
            return Some(candidate);
        }
    }
    None
}

fn add_months(year: i32, month: u32, months: u32) -> Option<(i32, u32)> {
    let total = year.checked_mul(12)?.checked_add(month as i32 - 1)?.checked_add(i32::try_from(months).ok()?)?;
    Some((total.div_euclid(12), total.rem_euclid(12) as u32 + 1))
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = add_months(year, month, 1)?;
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some(first_of_next.pred_opt()?.day())
}

fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = days_in_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, day.clamp(1, last))
}

/// The `week`-th `weekday` of the month; 5 or a missing fifth occurrence gives the last one.
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, week: u32) -> Option<NaiveDate> {
    if (1..=4).contains(&week) {
        return NaiveDate::from_weekday_of_month_opt(year, month, weekday, week as u8);
    }
    if let Some(fifth) = NaiveDate::from_weekday_of_month_opt(year, month, weekday, 5) {
        return Some(fifth);
    }
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn nine_am(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(9, 0, 0).unwrap()
    }

    fn dates(occurrences: Vec<NaiveDateTime>) -> Vec<NaiveDate> {
        occurrences.into_iter().map(|o| o.date()).collect()
    }

    #[test]
    fn monthly_by_date_clamps_without_drift() {
        let rule = RecurrenceRule::new(1, RecurrencePattern::MonthlyByDate);
        let next = RecurrenceCalculator::new().calculate_next_occurrences(&rule, nine_am(2025, 1, 31), 3);
        assert_eq!(next, vec![nine_am(2025, 2, 28), nine_am(2025, 3, 31), nine_am(2025, 4, 30)]);
    }

    #[test]
    fn monthly_by_day_follows_anchor_week_and_weekday() {
        let rule = RecurrenceRule::new(1, RecurrencePattern::MonthlyByDay);
        let calculator = RecurrenceCalculator::new();

        // 2025-01-15 is the third Wednesday
        let next = calculator.calculate_next_occurrences(&rule, nine_am(2025, 1, 15), 2);
        assert_eq!(dates(next), vec![date(2025, 2, 19), date(2025, 3, 19)]);

        // 2025-01-29 is a fifth Wednesday; months without one use the last
        let next = calculator.calculate_next_occurrences(&rule, nine_am(2025, 1, 29), 3);
        assert_eq!(dates(next), vec![date(2025, 2, 26), date(2025, 3, 26), date(2025, 4, 30)]);
    }

    #[test]
    fn yearly_from_leap_day() {
        let rule = RecurrenceRule::new(1, RecurrencePattern::Yearly);
        let next = RecurrenceCalculator::new().calculate_next_occurrences(&rule, nine_am(2024, 2, 29), 4);
        assert_eq!(
            dates(next),
            vec![date(2025, 2, 28), date(2026, 2, 28), date(2027, 2, 28), date(2028, 2, 29)]
        );
    }

    #[test]
    fn weekly_days_with_interval() {
        let rule = RecurrenceRule::new(1, RecurrencePattern::Weekly)
            .with_interval(2)
            .with_days(&[Weekday::Mon, Weekday::Wed]);
        let next = RecurrenceCalculator::new().calculate_next_occurrences(&rule, nine_am(2025, 1, 6), 4);
        assert_eq!(
            dates(next),
            vec![date(2025, 1, 8), date(2025, 1, 20), date(2025, 1, 22), date(2025, 2, 3)]
        );
    }

    #[test]
    fn skipped_weekends_do_not_count_toward_limit() {
        let mut rule = RecurrenceRule::new(1, RecurrencePattern::Daily).ends_after(3);
        rule.skip_weekends = true;
        // Friday start
        let next = RecurrenceCalculator::new().calculate_next_occurrences(&rule, nine_am(2025, 1, 3), 10);
        assert_eq!(dates(next), vec![date(2025, 1, 6), date(2025, 1, 7), date(2025, 1, 8)]);
    }

    #[test]
    fn holidays_skipped_only_when_enabled() {
        let calculator = RecurrenceCalculator::with_holidays(vec![date(2025, 1, 7)]);
        let mut rule = RecurrenceRule::new(1, RecurrencePattern::Daily).ends_after(2);

        let next = calculator.calculate_next_occurrences(&rule, nine_am(2025, 1, 5), 10);
        assert_eq!(dates(next), vec![date(2025, 1, 6), date(2025, 1, 7)]);

        rule.skip_holidays = true;
        let next = calculator.calculate_next_occurrences(&rule, nine_am(2025, 1, 5), 10);
        assert_eq!(dates(next), vec![date(2025, 1, 6), date(2025, 1, 8)]);
    }

    #[test]
    fn exceptions_do_not_count_toward_limit() {
        let mut rule = RecurrenceRule::new(1, RecurrencePattern::Daily).ends_after(2);
        rule.add_exception(date(2025, 1, 7));
        let next = RecurrenceCalculator::new().calculate_next_occurrences(&rule, nine_am(2025, 1, 5), 10);
        assert_eq!(dates(next), vec![date(2025, 1, 6), date(2025, 1, 8)]);
    }

    #[test]
    fn end_date_is_inclusive() {
        let rule = RecurrenceRule::new(1, RecurrencePattern::Weekly).ends_on(date(2025, 1, 20));
        let next = RecurrenceCalculator::new().calculate_next_occurrences(&rule, nine_am(2025, 1, 6), 10);
        assert_eq!(dates(next), vec![date(2025, 1, 13), date(2025, 1, 20)]);
    }

    #[test]
    fn continuing_counts_already_generated() {
        let rule = RecurrenceRule::new(1, RecurrencePattern::Daily).ends_after(3);
        let calculator = RecurrenceCalculator::new();
        let next = calculator.occurrences_after(&rule, nine_am(2025, 1, 1), nine_am(2025, 1, 3), 2, 10);
        assert_eq!(next, vec![nine_am(2025, 1, 4)]);
        assert!(calculator.occurrences_after(&rule, nine_am(2025, 1, 1), nine_am(2025, 1, 4), 3, 10).is_empty());
    }

    #[test]
    fn gives_up_when_every_candidate_is_skipped() {
        let mut rule = RecurrenceRule::new(1, RecurrencePattern::Weekly).with_days(&[Weekday::Sat]);
        rule.skip_weekends = true;
        let next = RecurrenceCalculator::new().calculate_next_occurrences(&rule, nine_am(2025, 1, 4), 1);
        assert!(next.is_empty());
    }

    #[test]
    fn add_months_wraps_years() {
        assert_eq!(add_months(2024, 11, 3), Some((2025, 2)));
        assert_eq!(add_months(2024, 1, 12), Some((2025, 1)));
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2025, 2), Some(28));
        assert_eq!(days_in_month(2025, 12), Some(31));
    }

    #[test]
    fn last_weekday_when_fifth_is_missing() {
        // February 2025 has four Fridays; the 28th is the last.
        assert_eq!(nth_weekday_of_month(2025, 2, Weekday::Fri, 5), Some(date(2025, 2, 28)));
        // May 2025 has five Thursdays.
        assert_eq!(nth_weekday_of_month(2025, 5, Weekday::Thu, 5), Some(date(2025, 5, 29)));
        assert_eq!(nth_weekday_of_month(2025, 5, Weekday::Tue, 2), Some(date(2025, 5, 13)));
    }

    #[test]
    fn day_storage_format() {
        let days = [Weekday::Fri, Weekday::Mon, Weekday::Mon];
        let rule = RecurrenceRule::new(1, RecurrencePattern::Weekly).with_days(&days);
        assert_eq!(encode_days(&rule.days_of_week), "MONDAY,FRIDAY");
        assert_eq!(decode_days("FRIDAY,bogus,MONDAY"), vec![Weekday::Mon, Weekday::Fri]);
        assert!(decode_days("").is_empty());
        assert_eq!(decode_dates("2025-01-01,nope"), vec![date(2025, 1, 1)]);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(RecurrenceRule::new(1, RecurrencePattern::Daily).with_interval(0).validate().is_err());
        let mut rule = RecurrenceRule::new(1, RecurrencePattern::MonthlyByDay);
        rule.week_of_month = Some(6);
        assert!(rule.validate().is_err());
        let mut rule = RecurrenceRule::new(1, RecurrencePattern::Daily);
        rule.end_type = RecurrenceEndType::ByDate;
        assert!(rule.validate().is_err());
        assert!(RecurrenceRule::new(1, RecurrencePattern::Daily).ends_after(3).validate().is_ok());
    }

    #[test]
    fn summary_mentions_anchors() {
        let rule = RecurrenceRule::new(1, RecurrencePattern::Weekly)
            .with_interval(2)
            .with_days(&[Weekday::Wed, Weekday::Mon])
            .ends_on(date(2025, 12, 31));
        assert_eq!(rule.summary(), "Every 2 weeks on Mon, Wed until 2025-12-31");
    }
}

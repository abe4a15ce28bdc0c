//! Plain-text and JSON output for the one-shot commands

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use noor_common::labels::{
    civil_date_label, format_countdown, format_time, hadith_heading, hijri_suffix,
    next_prayer_heading, prayer_label, Language,
};
use noor_common::oracle::CalculationMethod;
use noor_common::schedule::{is_highlighted, select_next, time_until_next};
use noor_common::{DailySchedule, PrayerName, Reflection};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Reference instant for next-prayer selection on a schedule for `date`
///
/// Only today's schedule has a next prayer; other days get `None`.
pub fn selection_reference(
    date: NaiveDate,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    (date == today).then_some(now)
}

/// Schedule table with the next prayer marked
///
/// `now` is `None` when the schedule is for a day other than today; the
/// table is then printed without a marker or next-prayer line.
pub fn render_schedule<Tz: TimeZone>(
    schedule: &DailySchedule,
    now: Option<DateTime<Utc>>,
    tz: &Tz,
    method: &CalculationMethod,
    language: Language,
    color: bool,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let next = now.and_then(|now| select_next(schedule, now));
    let marked = |name| now.is_some() && is_highlighted(name, next);
    let mut out = String::new();

    out.push_str(&format!(
        "{} | {} {}\n",
        civil_date_label(schedule.calendar_date(), language),
        schedule.hijri_date(),
        hijri_suffix(language)
    ));
    out.push_str(&format!(
        "{} | {} method\n\n",
        schedule.coordinate(),
        method
    ));

    for event in schedule.events() {
        let marker = if marked(event.name) { ">" } else { " " };
        let label = prayer_label(Some(event.name), language);
        let time = format_time(&event.instant.with_timezone(tz));
        let line = format!("{} {:<14} {}", marker, label, time);
        if color && marked(event.name) {
            out.push_str(&format!("{}\n", line.green().bold()));
        } else {
            out.push_str(&line);
            out.push('\n');
        }
    }

    if let Some(now) = now {
        out.push('\n');
        out.push_str(&render_next_line(schedule, now, tz, language));
    }
    out
}

/// "Next prayer: Asr at 03:45 PM (in 01:45:00)"
pub fn render_next_line<Tz: TimeZone>(
    schedule: &DailySchedule,
    now: DateTime<Utc>,
    tz: &Tz,
    language: Language,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let heading = next_prayer_heading(language);
    match (select_next(schedule, now), time_until_next(schedule, now)) {
        (Some(name), Some(remaining)) => format!(
            "{}: {} {} ({})\n",
            heading,
            prayer_label(Some(name), language),
            format_time(&schedule.event(name).instant.with_timezone(tz)),
            format_countdown(remaining)
        ),
        _ => format!("{}: {}\n", heading, prayer_label(None, language)),
    }
}

/// Hadith block
pub fn render_reflection(reflection: &Reflection, language: Language) -> String {
    format!(
        "{}\n\n\"{}\"\n  - {}\n\n{}\n",
        hadith_heading(language),
        reflection.hadith_text,
        reflection.reference_label,
        reflection.reflection_text
    )
}

#[derive(Debug, Serialize)]
pub struct ScheduleJson<'a> {
    pub schedule: &'a DailySchedule,
    pub method: CalculationMethod,
    pub location_denied: bool,
    pub next: Option<PrayerName>,
    pub seconds_until_next: Option<i64>,
}

impl<'a> ScheduleJson<'a> {
    pub fn new(
        schedule: &'a DailySchedule,
        method: CalculationMethod,
        location_denied: bool,
        now: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            schedule,
            method,
            location_denied,
            next: now.and_then(|now| select_next(schedule, now)),
            seconds_until_next: now
                .and_then(|now| time_until_next(schedule, now))
                .map(|d| d.num_seconds()),
        }
    }
}

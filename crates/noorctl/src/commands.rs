//! One-shot commands

use anyhow::{bail, Context, Result};
use chrono::{Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use noor_common::config::NoorConfig;
use noor_common::labels::{
    format_countdown, format_time, location_advisory, next_prayer_heading, prayer_label,
};
use noor_common::schedule::select_next;
use noor_common::PrayerName;
use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::app::{acquire_location, build_resolver, fetch_reflection};
use crate::cli::ConfigAction;
use crate::output::{
    render_next_line, render_reflection, render_schedule, selection_reference, ScheduleJson,
};

fn parse_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s)),
        None => Ok(Local::now().date_naive()),
    }
}

fn parse_local_time(at: Option<&str>, date: NaiveDate) -> Result<chrono::DateTime<Utc>> {
    let Some(s) = at else {
        return Ok(Utc::now());
    };
    let time = NaiveTime::parse_from_str(s, "%H:%M")
        .with_context(|| format!("Invalid time '{}', expected HH:MM", s))?;
    Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .with_context(|| format!("{} does not exist on {} in the local time zone", s, date))
}

/// Print the schedule for a date
pub async fn today(config: &NoorConfig, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_date(date.as_deref())?;
    let location = acquire_location(config).await?;
    let resolver = build_resolver(config);
    let schedule = resolver.resolve(location.coordinate(), date)?;
    let now = selection_reference(date, Local::now().date_naive(), Utc::now());
    let language = config.display.language;

    if json {
        let payload = ScheduleJson::new(&schedule, config.calculation, location.needs_advisory(), now);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if location.needs_advisory() {
        eprintln!("{}", location_advisory(language).yellow());
    }
    let color = std::io::stdout().is_terminal();
    print!(
        "{}",
        render_schedule(&schedule, now, &Local, &config.calculation, language, color)
    );
    Ok(())
}

/// Print the next prayer; after Isha, resolve tomorrow for its Fajr
pub async fn next(config: &NoorConfig, at: Option<String>, json: bool) -> Result<()> {
    let date = Local::now().date_naive();
    let reference = parse_local_time(at.as_deref(), date)?;
    let location = acquire_location(config).await?;
    let resolver = build_resolver(config);
    let schedule = resolver.resolve(location.coordinate(), date)?;
    let language = config.display.language;

    if location.needs_advisory() && !json {
        eprintln!("{}", location_advisory(language).yellow());
    }

    if select_next(&schedule, reference).is_some() {
        if json {
            let payload =
                ScheduleJson::new(&schedule, config.calculation, location.needs_advisory(), Some(reference));
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "next": payload.next,
                    "seconds_until_next": payload.seconds_until_next,
                    "tomorrow": false,
                }))?
            );
        } else {
            print!("{}", render_next_line(&schedule, reference, &Local, language));
        }
        return Ok(());
    }

    // Nothing left today: the next prayer is tomorrow's Fajr
    let tomorrow = resolver.resolve(location.coordinate(), date + Duration::days(1))?;
    let fajr = tomorrow.event(PrayerName::Fajr);
    let remaining = fajr.instant - reference;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "next": PrayerName::Fajr,
                "seconds_until_next": remaining.num_seconds(),
                "tomorrow": true,
            }))?
        );
    } else {
        println!(
            "{}: {} -> {} {} ({})",
            next_prayer_heading(language),
            prayer_label(None, language),
            prayer_label(Some(PrayerName::Fajr), language),
            format_time(&fajr.instant.with_timezone(&Local)),
            format_countdown(remaining)
        );
    }
    Ok(())
}

/// Fetch and print the reflection
pub async fn reflection(config: &NoorConfig, json: bool) -> Result<()> {
    let reflection = fetch_reflection(config).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&reflection)?);
    } else {
        print!("{}", render_reflection(&reflection, config.display.language));
    }
    Ok(())
}

/// Show, locate or initialise the configuration file
pub fn config(config: &NoorConfig, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            print!("{}", config.to_display_toml()?);
        }
        ConfigAction::Path => {
            println!("{}", NoorConfig::user_config_path()?.display());
        }
        ConfigAction::Init { force } => {
            let path = NoorConfig::user_config_path()?;
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            NoorConfig::default().save_to(&path)?;
            println!("{} {}", "Wrote".green(), path.display());
        }
    }
    Ok(())
}

//! Subcommand implementations. Each writes JSON (or summary lines) to stdout.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDateTime};
use kalendi_core::{
    calendar_days, expand_month, expand_with_options, format_recurrence_rule, parse_datetime,
    plan_reminders, Event, ExpandOptions,
};
use serde::Serialize;

use crate::input;

/// Window length for `reminders` when `--to` is omitted.
const DEFAULT_REMINDER_DAYS: i64 = 30;

pub fn expand(path: &Path, from: &str, to: &str, options: &ExpandOptions) -> Result<()> {
    let templates = input::read_events(path)?;
    let window_start = input::window_start(from)?;
    let window_end = input::window_end(to)?;

    let instances = expand_all(&templates, window_start, window_end, options)?;
    print_json(&instances)
}

pub fn describe(path: &Path) -> Result<()> {
    for event in input::read_events(path)? {
        let summary = match event.recurrence() {
            Some(rule) => format_recurrence_rule(rule),
            None => "Does not repeat".to_string(),
        };
        println!("{}: {}", event.title, summary);
    }
    Ok(())
}

pub fn month(
    path: &Path,
    year: i32,
    month: u32,
    selected: Option<&str>,
    today: Option<&str>,
    options: &ExpandOptions,
) -> Result<()> {
    let templates = input::read_events(path)?;
    let today = match today {
        Some(s) => input::day(s, "--today")?,
        None => Local::now().date_naive(),
    };
    let selected = match selected {
        Some(s) => input::day(s, "--selected")?,
        None => today,
    };

    let events = expand_month(&templates, year, month, options)
        .with_context(|| format!("Failed to expand {year}-{month:02}"))?;
    let days = calendar_days(year, month, selected, today, &events)?;
    print_json(&days)
}

pub fn reminders(
    path: &Path,
    now: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    options: &ExpandOptions,
) -> Result<()> {
    let templates = input::read_events(path)?;
    let now = match now {
        Some(s) => {
            parse_datetime(s).with_context(|| format!("Invalid --now value '{s}'"))?
        }
        None => Local::now().naive_local(),
    };
    let window_start = match from {
        Some(s) => input::window_start(s)?,
        None => now,
    };
    let window_end = match to {
        Some(s) => input::window_end(s)?,
        None => default_reminder_end(window_start)?,
    };

    let instances = expand_all(&templates, window_start, window_end, options)?;
    print_json(&plan_reminders(&instances, now))
}

fn default_reminder_end(window_start: NaiveDateTime) -> Result<NaiveDateTime> {
    window_start
        .checked_add_signed(Duration::days(DEFAULT_REMINDER_DAYS))
        .with_context(|| {
            format!("No {DEFAULT_REMINDER_DAYS}-day window fits after {window_start}; pass --to")
        })
}

/// Expand every template and merge the instances in start order.
fn expand_all(
    templates: &[Event],
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
    options: &ExpandOptions,
) -> Result<Vec<Event>> {
    let mut instances = Vec::new();
    for template in templates {
        let expanded = expand_with_options(template, window_start, window_end, options)
            .with_context(|| format!("Failed to expand event '{}'", template.id))?;
        instances.extend(expanded);
    }
    instances.sort_by_key(|event| event.start_date);
    Ok(instances)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

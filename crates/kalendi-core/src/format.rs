//! Human-readable labels for rules, dates, and times.

use chrono::{NaiveDate, NaiveTime};

use crate::event::RecurrenceRule;

/// Date layouts used by the calendar views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// `31/12/24`
    #[default]
    ShortYear,
    /// `31/12/2024`
    LongYear,
    /// `Tuesday, 31 December 2024`
    Full,
}

/// Summarize a rule, e.g. `"Weekly every 2 weeks (5 times)"` or
/// `"Monthly until 31/12/24"`.
///
/// The interval clause appears only when `interval > 1`. When both `count` and
/// `end_date` are set, only the count is shown.
///
/// # Examples
///
/// ```
/// use kalendi_core::{format_recurrence_rule, Frequency, RecurrenceRule};
///
/// let rule = RecurrenceRule::new(Frequency::Weekly, 2).with_count(5);
/// assert_eq!(format_recurrence_rule(&rule), "Weekly every 2 weeks (5 times)");
/// ```
pub fn format_recurrence_rule(rule: &RecurrenceRule) -> String {
    let mut text = rule.frequency.label().to_string();

    if rule.interval > 1 {
        text.push_str(&format!(" every {} {}", rule.interval, rule.frequency.unit_plural()));
    }

    if let Some(count) = rule.count {
        let unit = if count == 1 { "time" } else { "times" };
        text.push_str(&format!(" ({count} {unit})"));
    } else if let Some(until) = rule.end_date {
        text.push_str(&format!(
            " until {}",
            format_date(until.date(), DateFormat::ShortYear)
        ));
    }

    text
}

/// Format a calendar date.
pub fn format_date(date: NaiveDate, format: DateFormat) -> String {
    let pattern = match format {
        DateFormat::ShortYear => "%d/%m/%y",
        DateFormat::LongYear => "%d/%m/%Y",
        DateFormat::Full => "%A, %-d %B %Y",
    };
    date.format(pattern).to_string()
}

/// Format a time of day as 24-hour `HH:MM`.
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

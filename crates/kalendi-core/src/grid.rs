//! Month views: the Sunday-first day grid and the events that land on each day.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use crate::cadence::{days_in_month, end_of_day, start_of_day};
use crate::error::{KalendiError, Result};
use crate::event::Event;
use crate::expander::{expand_with_options, ExpandOptions};

/// One cell of a month grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub events: Vec<Event>,
    pub is_today: bool,
    pub is_selected: bool,
    pub is_current_month: bool,
}

/// The dates shown for `month` of `year`, Sunday first.
///
/// The grid starts with the trailing days of the previous month needed to fill
/// the first week and ends with the leading days of the next month needed to
/// fill the last week, so its length is always a multiple of 7.
///
/// # Errors
///
/// Returns [`KalendiError::InvalidDate`] if `month` is not in 1-12 or the grid
/// would leave the representable date range.
pub fn month_grid(year: i32, month: u32) -> Result<Vec<NaiveDate>> {
    let (first, last) = month_bounds(year, month)?;

    let leading = u64::from(first.weekday().num_days_from_sunday());
    let trailing = u64::from(6 - last.weekday().num_days_from_sunday());

    let grid_start = first
        .checked_sub_days(Days::new(leading))
        .ok_or_else(|| out_of_range(year, month))?;
    let grid_end = last
        .checked_add_days(Days::new(trailing))
        .ok_or_else(|| out_of_range(year, month))?;

    Ok(grid_start
        .iter_days()
        .take_while(|date| *date <= grid_end)
        .collect())
}

/// The events whose start falls on `date`, in input order.
pub fn events_on_day(events: &[Event], date: NaiveDate) -> Vec<&Event> {
    events
        .iter()
        .filter(|event| event.start_date.date() == date)
        .collect()
}

/// Build the grid cells for a month, attaching each day's events.
///
/// # Errors
///
/// Returns [`KalendiError::InvalidDate`] under the same conditions as
/// [`month_grid`].
pub fn calendar_days(
    year: i32,
    month: u32,
    selected: NaiveDate,
    today: NaiveDate,
    events: &[Event],
) -> Result<Vec<CalendarDay>> {
    let days = month_grid(year, month)?
        .into_iter()
        .map(|date| CalendarDay {
            date,
            day: date.day(),
            month: date.month(),
            year: date.year(),
            events: events_on_day(events, date).into_iter().cloned().collect(),
            is_today: date == today,
            is_selected: date == selected,
            is_current_month: date.month() == month && date.year() == year,
        })
        .collect();
    Ok(days)
}

/// The window a month view queries: first day 00:00 to last day 23:59:59.999.
///
/// # Errors
///
/// Returns [`KalendiError::InvalidDate`] if `month` is not in 1-12.
pub fn month_window(year: i32, month: u32) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let (first, last) = month_bounds(year, month)?;
    Ok((start_of_day(first), end_of_day(last)))
}

/// Expand every template over the month's window and merge the results in
/// start order. Events starting at the same instant keep their input order.
///
/// Non-recurring templates go through the same window filter as instances:
/// one that starts after the month, or that the filter rejects, is dropped.
///
/// # Errors
///
/// Returns [`KalendiError::InvalidDate`] for an invalid month, or the first
/// [`KalendiError::InvalidRule`] encountered among the templates.
pub fn expand_month(
    templates: &[Event],
    year: i32,
    month: u32,
    options: &ExpandOptions,
) -> Result<Vec<Event>> {
    let (window_start, window_end) = month_window(year, month)?;

    let mut events = Vec::new();
    for template in templates {
        if template.recurrence().is_none()
            && (template.start_date > window_end
                || !options
                    .window_filter
                    .admits(template.start_date, template.end_date, window_start))
        {
            continue;
        }
        events.extend(expand_with_options(template, window_start, window_end, options)?);
    }
    events.sort_by_key(|event| event.start_date);

    debug!(year, month, templates = templates.len(), events = events.len(), "expanded month");
    Ok(events)
}

fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| out_of_range(year, month))?;
    let last = days_in_month(year, month)
        .and_then(|days| first.with_day(days))
        .ok_or_else(|| out_of_range(year, month))?;
    Ok((first, last))
}

fn out_of_range(year: i32, month: u32) -> KalendiError {
    KalendiError::InvalidDate(format!("no such month: {year}-{month:02}"))
}

//! Calendar arithmetic for recurrence cadences.
//!
//! Under [`MonthOverflow::Rollover`] each occurrence is one interval after the
//! previous one, so a month-end start drifts once it rolls over: Jan 31
//! monthly yields Jan 31, Mar 2, Apr 2. Under [`MonthOverflow::Clamp`]
//! occurrence `n` is computed from the anchor (`anchor + n * interval` units),
//! so the anchor's day comes back whenever the month has it: Jan 31, Feb 29,
//! Mar 31.
//!
//! All arithmetic is on naive date-times. A "day" is a calendar day, which for
//! naive values is always 24 hours; there are no DST transitions to account for.

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::event::Frequency;

/// What happens when a monthly or yearly step lands on a day the target month
/// does not have (Jan 31 + 1 month, Feb 29 + 1 year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthOverflow {
    /// Excess days spill into the following month: Jan 31 + 1 month is
    /// Mar 2 in a leap year, Mar 3 otherwise; Feb 29 + 1 year is Mar 1.
    #[default]
    Rollover,
    /// Snap to the last day of the target month: Jan 31 + 1 month is Feb 29
    /// (or 28); Feb 29 + 1 year is Feb 28.
    Clamp,
}

/// The start of occurrence `n` (n >= 1) given the start of occurrence `n - 1`.
///
/// Rollover steps from `previous`; Clamp recomputes from `anchor`.
/// Returns `None` when the result falls outside the representable date range.
pub fn next_occurrence(
    anchor: NaiveDateTime,
    previous: NaiveDateTime,
    frequency: Frequency,
    interval: i32,
    n: u32,
    overflow: MonthOverflow,
) -> Option<NaiveDateTime> {
    match overflow {
        MonthOverflow::Rollover => nth_occurrence(previous, frequency, interval, 1, overflow),
        MonthOverflow::Clamp => nth_occurrence(anchor, frequency, interval, n, overflow),
    }
}

/// `anchor` advanced by `n * interval` units of `frequency`.
///
/// Returns `None` when the result falls outside the representable date range.
pub fn nth_occurrence(
    anchor: NaiveDateTime,
    frequency: Frequency,
    interval: i32,
    n: u32,
    overflow: MonthOverflow,
) -> Option<NaiveDateTime> {
    let steps = i64::from(interval).checked_mul(i64::from(n))?;
    match frequency {
        Frequency::Daily => add_days(anchor, steps),
        Frequency::Weekly => add_days(anchor, steps.checked_mul(7)?),
        Frequency::Monthly => add_months(anchor, steps, overflow),
        Frequency::Yearly => add_months(anchor, steps.checked_mul(12)?, overflow),
    }
}

/// Add whole calendar days, keeping the time of day.
pub fn add_days(dt: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    dt.checked_add_signed(Duration::try_days(days)?)
}

/// Add calendar months, keeping the time of day and resolving a missing
/// day-of-month per `overflow`.
pub fn add_months(dt: NaiveDateTime, months: i64, overflow: MonthOverflow) -> Option<NaiveDateTime> {
    let total = i64::from(dt.year())
        .checked_mul(12)?
        .checked_add(i64::from(dt.month0()))?
        .checked_add(months)?;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;

    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last_day = days_in_month(year, month)?;
    let day = dt.day();

    let date = if day <= last_day {
        first.with_day(day)?
    } else {
        match overflow {
            MonthOverflow::Clamp => first.with_day(last_day)?,
            MonthOverflow::Rollover => first.checked_add_days(Days::new(u64::from(day - 1)))?,
        }
    };

    Some(date.and_time(dt.time()))
}

/// Number of days in `month` (1-12) of `year`.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from((next - first).num_days()).ok()
}

/// 00:00:00.000 on `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59.999 on `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    // 23:59:59.999 is always a valid time.
    date.and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN))
}

// ── Tests ───────────────────────────────────────────────────────────────────

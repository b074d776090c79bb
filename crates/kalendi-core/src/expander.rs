//! Recurring event expansion.
//!
//! Turns one stored template plus its [`RecurrenceRule`] into the concrete
//! instances that fall inside a query window. Expansion is a pure function of
//! (template, window, options): no I/O, no shared state, and identical inputs
//! always produce identical output.
//!
//! # Termination
//!
//! Every expansion is bounded. A rule with `count` stops after that many
//! occurrences; a rule with an end date stops after the last occurrence at or
//! before it (a date-only end date covers its whole day); a rule with neither stops after
//! [`ExpandOptions::max_occurrences`] occurrences (default
//! [`DEFAULT_MAX_OCCURRENCES`]). Occurrences are counted from the template's
//! first occurrence, not from the window start.
//!
//! # Window filtering
//!
//! By default an occurrence is returned when its *start* lies inside
//! `[window_start, window_end]`. An occurrence that starts before the window and
//! ends inside it is skipped, not clipped. [`WindowFilter::Overlap`] includes
//! those as well.

use std::iter::FusedIterator;

use chrono::{Duration, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::cadence::{end_of_day, next_occurrence, MonthOverflow};
use crate::error::Result;
use crate::event::{EndCondition, Event, RecurrenceRule};

/// Occurrence cap for rules with neither `count` nor an end date.
pub const DEFAULT_MAX_OCCURRENCES: u32 = 999;

/// Which occurrences a window admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowFilter {
    /// The occurrence starts within the window.
    #[default]
    StartDate,
    /// The occurrence's `[start, end]` span intersects the window.
    Overlap,
}

impl WindowFilter {
    pub(crate) fn admits(self, start: NaiveDateTime, end: NaiveDateTime, window_start: NaiveDateTime) -> bool {
        match self {
            WindowFilter::StartDate => start >= window_start,
            WindowFilter::Overlap => start >= window_start || end >= window_start,
        }
    }
}

/// Options for [`expand_with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Safety cap applied when the rule has no end condition.
    pub max_occurrences: u32,
    pub window_filter: WindowFilter,
    pub month_overflow: MonthOverflow,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
            window_filter: WindowFilter::default(),
            month_overflow: MonthOverflow::default(),
        }
    }
}

/// Expand `template` into the instances starting within
/// `[window_start, window_end]`, using default options.
///
/// A template that is not recurring (or has no rule) is returned unchanged as a
/// single-element list regardless of the window.
///
/// `window_start <= window_end` is a precondition; an inverted window yields no
/// instances for a recurring template.
///
/// # Errors
///
/// Returns [`KalendiError::InvalidRule`](crate::KalendiError::InvalidRule) if
/// the rule's interval is not positive.
///
/// # Examples
///
/// ```
/// use kalendi_core::{expand, parse_datetime, Event, Frequency, RecurrenceRule};
///
/// let start = parse_datetime("2024-01-01T10:00").unwrap();
/// let end = parse_datetime("2024-01-01T11:00").unwrap();
/// let template = Event::new("gym", "Gym", start, end)
///     .with_rule(RecurrenceRule::new(Frequency::Weekly, 1).with_count(3));
///
/// let instances = expand(
///     &template,
///     parse_datetime("2024-01-01").unwrap(),
///     parse_datetime("2024-12-31").unwrap(),
/// )
/// .unwrap();
///
/// let ids: Vec<&str> = instances.iter().map(|e| e.id.as_str()).collect();
/// assert_eq!(ids, ["gym_0", "gym_1", "gym_2"]);
/// ```
pub fn expand(
    template: &Event,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Result<Vec<Event>> {
    expand_with_options(template, window_start, window_end, &ExpandOptions::default())
}

/// Expand `template` over `[window_start, window_end]` with explicit options.
///
/// # Errors
///
/// Returns [`KalendiError::InvalidRule`](crate::KalendiError::InvalidRule) if
/// the rule's interval is not positive.
pub fn expand_with_options(
    template: &Event,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
    options: &ExpandOptions,
) -> Result<Vec<Event>> {
    let instances: Vec<Event> = occurrences(template, window_start, window_end, options)?.collect();
    debug!(
        event_id = %template.id,
        instances = instances.len(),
        "expanded event"
    );
    Ok(instances)
}

/// Lazily expand `template` over the window.
///
/// Yields the same sequence [`expand_with_options`] returns, computing each
/// instance only when requested, so a caller can stop early.
///
/// # Errors
///
/// Returns [`KalendiError::InvalidRule`](crate::KalendiError::InvalidRule) if
/// the rule's interval is not positive.
pub fn occurrences<'a>(
    template: &'a Event,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
    options: &ExpandOptions,
) -> Result<Occurrences<'a>> {
    let Some(rule) = template.recurrence() else {
        debug!(event_id = %template.id, "event is not recurring, passing through");
        return Ok(Occurrences {
            template,
            state: State::PassThrough { done: false },
        });
    };

    rule.validate()?;

    let (limit, upper_bound) = match rule.end_condition() {
        EndCondition::Count(count) => (count, window_end),
        EndCondition::Until(until) => (options.max_occurrences, window_end.min(until_bound(until))),
        EndCondition::Unbounded => (options.max_occurrences, window_end),
    };

    debug!(
        event_id = %template.id,
        frequency = %rule.frequency,
        interval = rule.interval,
        limit,
        %window_start,
        %upper_bound,
        "expanding recurring event"
    );

    Ok(Occurrences {
        template,
        state: State::Recurring(Cursor {
            rule,
            duration: template.duration(),
            window_start,
            upper_bound,
            limit,
            index: 0,
            next_start: Some(template.start_date),
            filter: options.window_filter,
            overflow: options.month_overflow,
        }),
    })
}

/// Iterator over the instances of one template. Created by [`occurrences`].
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    template: &'a Event,
    state: State<'a>,
}

#[derive(Debug, Clone)]
enum State<'a> {
    PassThrough { done: bool },
    Recurring(Cursor<'a>),
}

#[derive(Debug, Clone)]
struct Cursor<'a> {
    rule: &'a RecurrenceRule,
    duration: Duration,
    window_start: NaiveDateTime,
    upper_bound: NaiveDateTime,
    limit: u32,
    index: u32,
    /// Start of occurrence `index`; `None` once the cadence leaves chrono's range.
    next_start: Option<NaiveDateTime>,
    filter: WindowFilter,
    overflow: MonthOverflow,
}

impl Cursor<'_> {
    fn finish(&mut self) {
        self.index = self.limit;
    }
}

impl Iterator for Occurrences<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        let template = self.template;
        let cursor = match &mut self.state {
            State::PassThrough { done } => {
                if *done {
                    return None;
                }
                *done = true;
                return Some(template.clone());
            }
            State::Recurring(cursor) => cursor,
        };

        while cursor.index < cursor.limit {
            let index = cursor.index;
            let Some(start) = cursor.next_start else {
                debug!(event_id = %template.id, index, "cadence left the representable date range");
                cursor.finish();
                return None;
            };

            if start > cursor.upper_bound {
                cursor.finish();
                return None;
            }

            let Some(end) = start.checked_add_signed(cursor.duration) else {
                cursor.finish();
                return None;
            };

            cursor.index += 1;
            cursor.next_start = next_occurrence(
                template.start_date,
                start,
                cursor.rule.frequency,
                cursor.rule.interval,
                cursor.index,
                cursor.overflow,
            );
            if cursor.index == cursor.limit
                && cursor.rule.end_condition() == EndCondition::Unbounded
            {
                debug!(
                    event_id = %template.id,
                    cap = cursor.limit,
                    "unbounded rule reached the occurrence cap"
                );
            }

            if cursor.filter.admits(start, end, cursor.window_start) {
                return Some(materialize(template, index, start, end));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.state {
            State::PassThrough { done } => {
                let n = usize::from(!*done);
                (n, Some(n))
            }
            State::Recurring(cursor) => {
                let remaining = usize::try_from(cursor.limit - cursor.index).ok();
                (0, remaining)
            }
        }
    }
}

impl FusedIterator for Occurrences<'_> {}

/// Last admissible start for an end date. A midnight end date is a date-only
/// bound and covers that whole day; any other time is an exact instant.
fn until_bound(until: NaiveDateTime) -> NaiveDateTime {
    if until.time() == NaiveTime::MIN {
        end_of_day(until.date())
    } else {
        until
    }
}

fn materialize(template: &Event, index: u32, start: NaiveDateTime, end: NaiveDateTime) -> Event {
    Event {
        id: format!("{}_{}", template.id, index),
        start_date: start,
        end_date: end,
        original_event_id: Some(template.id.clone()),
        ..template.clone()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

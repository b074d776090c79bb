//! # kalendi-core
//!
//! Deterministic recurring-event computation for calendar clients.
//!
//! A calendar backend stores each recurring event once, as a template carrying
//! its first occurrence and a recurrence rule. This crate turns templates into
//! the concrete instances a view or reminder scheduler needs, without I/O and
//! without any ambient clock or session.
//!
//! ## Modules
//!
//! - [`event`] — event and rule data model, ISO 8601 wire format
//! - [`cadence`] — day/week/month/year stepping and the month-end overflow policy
//! - [`expander`] — template + window → ordered instances (eager or lazy)
//! - [`format`] — rule summaries and date/time labels
//! - [`grid`] — Sunday-first month grids and per-day grouping
//! - [`reminder`] — when and how to remind about an instance
//! - [`error`] — error types

pub mod cadence;
pub mod error;
pub mod event;
pub mod expander;
pub mod format;
pub mod grid;
pub mod reminder;

pub use cadence::MonthOverflow;
pub use error::{KalendiError, Result};
pub use event::{
    format_datetime, parse_datetime, EndCondition, Event, Frequency, RecurrenceRule,
};
pub use expander::{
    expand, expand_with_options, occurrences, ExpandOptions, Occurrences, WindowFilter,
    DEFAULT_MAX_OCCURRENCES,
};
pub use format::{format_date, format_recurrence_rule, format_time, DateFormat};
pub use grid::{calendar_days, events_on_day, expand_month, month_grid, month_window, CalendarDay};
pub use reminder::{plan_reminder, plan_reminders, reminder_id, Reminder};

//! Reminder planning for event instances.
//!
//! Computes what a local notification scheduler should be asked to do for an
//! event: its fire time, id and text. Delivery is the scheduler's business and
//! nothing here reads a clock; the caller supplies `now`.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::event::{iso_datetime, Event};

/// Notification title used for every event reminder.
pub const REMINDER_TITLE: &str = "Event Reminder";

/// A reminder ready to hand to a notification scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// Scheduler-side identity; cancelling uses the same id.
    pub id: String,
    pub event_id: String,
    pub title: String,
    pub message: String,
    #[serde(with = "iso_datetime")]
    pub fire_at: NaiveDateTime,
}

/// The scheduler id for an event's reminder: `event-<event id>`.
pub fn reminder_id(event_id: &str) -> String {
    format!("event-{event_id}")
}

/// Plan the reminder for `event`, or `None` if there is nothing to schedule.
///
/// Nothing is scheduled when the event has no (or a zero) `reminder_time`, or
/// when the fire time `start_date - reminder_time` is not after `now`.
pub fn plan_reminder(event: &Event, now: NaiveDateTime) -> Option<Reminder> {
    let minutes = event.reminder_time.filter(|m| *m > 0)?;
    let fire_at = event
        .start_date
        .checked_sub_signed(Duration::minutes(i64::from(minutes)))?;
    if fire_at <= now {
        return None;
    }

    Some(Reminder {
        id: reminder_id(&event.id),
        event_id: event.id.clone(),
        title: REMINDER_TITLE.to_string(),
        message: format!("{} starts in {} minutes", event.title, minutes),
        fire_at,
    })
}

/// Plan reminders for a batch of events (typically expanded instances),
/// ordered by fire time.
pub fn plan_reminders<'a, I>(events: I, now: NaiveDateTime) -> Vec<Reminder>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut reminders: Vec<Reminder> = events
        .into_iter()
        .filter_map(|event| plan_reminder(event, now))
        .collect();
    reminders.sort_by_key(|reminder| reminder.fire_at);
    reminders
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{parse_datetime, Frequency, RecurrenceRule};
    use crate::expander::expand;

    fn dt(s: &str) -> NaiveDateTime {
        parse_datetime(s).unwrap()
    }

    fn meeting() -> Event {
        Event::new("m1", "Standup", dt("2024-01-01T10:00"), dt("2024-01-01T10:15"))
    }

    #[test]
    fn test_fires_before_start() {
        let reminder = plan_reminder(&meeting().with_reminder(15), dt("2024-01-01T08:00")).unwrap();
        assert_eq!(reminder.fire_at, dt("2024-01-01T09:45"));
        assert_eq!(reminder.id, "event-m1");
        assert_eq!(reminder.title, "Event Reminder");
        assert_eq!(reminder.message, "Standup starts in 15 minutes");
    }

    #[test]
    fn test_no_reminder_time() {
        assert_eq!(plan_reminder(&meeting(), dt("2024-01-01T08:00")), None);
        assert_eq!(plan_reminder(&meeting().with_reminder(0), dt("2024-01-01T08:00")), None);
    }

    #[test]
    fn test_past_fire_time_is_skipped() {
        let event = meeting().with_reminder(15);
        assert_eq!(plan_reminder(&event, dt("2024-01-01T09:45")), None);
        assert!(plan_reminder(&event, dt("2024-01-01T09:44")).is_some());
    }

    #[test]
    fn test_instances_get_distinct_ids() {
        let template = meeting()
            .with_reminder(5)
            .with_rule(RecurrenceRule::new(Frequency::Daily, 1).with_count(3));
        let instances = expand(&template, dt("2024-01-01"), dt("2024-01-31")).unwrap();

        let reminders = plan_reminders(&instances, dt("2024-01-01T12:00"));
        let ids: Vec<&str> = reminders.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["event-m1_1", "event-m1_2"]);
        assert_eq!(reminders[0].fire_at, dt("2024-01-02T09:55"));
    }

    #[test]
    fn test_plan_reminders_orders_by_fire_time() {
        let late = Event::new("late", "Late", dt("2024-01-02T10:00"), dt("2024-01-02T11:00"))
            .with_reminder(10);
        let early = Event::new("early", "Early", dt("2024-01-01T10:00"), dt("2024-01-01T11:00"))
            .with_reminder(60);
        let reminders = plan_reminders([&late, &early], dt("2024-01-01T00:00"));
        assert_eq!(reminders[0].event_id, "early");
        assert_eq!(reminders[1].event_id, "late");
    }
}

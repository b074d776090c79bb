//! Calendar event data model.
//!
//! A single [`Event`] type carries both roles an event plays in the calendar:
//!
//! - **template** — the stored, authoritative definition. A recurring template
//!   holds its first occurrence in `start_date`/`end_date` plus a
//!   [`RecurrenceRule`].
//! - **instance** — a concrete occurrence materialized from a template by the
//!   [expander](crate::expander). Instances have `original_event_id` set and are
//!   never persisted.
//!
//! All date fields are naive local-time instants. On the wire they are ISO 8601
//! strings; both the camelCase field names used by the mobile client and the
//! snake_case column names used by the backend are accepted.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{KalendiError, Result};

// ── Frequency ───────────────────────────────────────────────────────────────

/// The unit of a recurrence cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Capitalized label used in rule summaries (e.g., "Weekly").
    pub fn label(self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
        }
    }

    /// Plural unit name (e.g., "weeks" for "every 2 weeks").
    pub fn unit_plural(self) -> &'static str {
        match self {
            Frequency::Daily => "days",
            Frequency::Weekly => "weeks",
            Frequency::Monthly => "months",
            Frequency::Yearly => "years",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = KalendiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            _ => Err(KalendiError::InvalidRule(format!(
                "unknown frequency '{}': expected daily, weekly, monthly or yearly",
                s.trim()
            ))),
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = KalendiError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

// ── RecurrenceRule ──────────────────────────────────────────────────────────

/// Which end condition of a rule bounds the expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCondition {
    /// At most this many occurrences, counting the first.
    Count(u32),
    /// No occurrence after the calendar day of this instant.
    Until(NaiveDateTime),
    /// Neither is set; the expander's safety cap applies.
    Unbounded,
}

/// How a recurring event repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    pub frequency: Frequency,

    /// Step count in units of `frequency`. Must be positive.
    #[serde(default = "default_interval")]
    pub interval: i32,

    /// Inclusive last day on which an occurrence may start.
    #[serde(
        default,
        alias = "end_date",
        with = "iso_datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDateTime>,

    /// Maximum number of occurrences, including the first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,

    /// Weekdays for weekly rules (Sunday = 0). Carried, not expanded.
    #[serde(default, alias = "by_day", skip_serializing_if = "Option::is_none")]
    pub by_day: Option<Vec<u8>>,

    /// Days of month for monthly rules. Carried, not expanded.
    #[serde(
        default,
        alias = "by_month_day",
        skip_serializing_if = "Option::is_none"
    )]
    pub by_month_day: Option<Vec<u8>>,
}

fn default_interval() -> i32 {
    1
}

impl RecurrenceRule {
    /// A rule repeating every `interval` units of `frequency` with no end condition.
    pub fn new(frequency: Frequency, interval: i32) -> Self {
        Self {
            frequency,
            interval,
            end_date: None,
            count: None,
            by_day: None,
            by_month_day: None,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_end_date(mut self, end_date: NaiveDateTime) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Reject rules the expander cannot step through.
    ///
    /// # Errors
    ///
    /// Returns [`KalendiError::InvalidRule`] if `interval` is zero or negative.
    pub fn validate(&self) -> Result<()> {
        if self.interval <= 0 {
            return Err(KalendiError::InvalidRule(format!(
                "interval must be positive, got {}",
                self.interval
            )));
        }
        Ok(())
    }

    /// The authoritative end condition. `count` wins when both are present.
    pub fn end_condition(&self) -> EndCondition {
        match (self.count, self.end_date) {
            (Some(count), _) => EndCondition::Count(count),
            (None, Some(until)) => EndCondition::Until(until),
            (None, None) => EndCondition::Unbounded,
        }
    }
}

// ── Event ───────────────────────────────────────────────────────────────────

/// A calendar event: either a stored template or a materialized instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(alias = "start_date", with = "iso_datetime")]
    pub start_date: NaiveDateTime,

    #[serde(alias = "end_date", with = "iso_datetime")]
    pub end_date: NaiveDateTime,

    #[serde(default, alias = "all_day")]
    pub all_day: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default)]
    pub color: String,

    /// Minutes before `start_date` at which a reminder fires.
    #[serde(
        default,
        alias = "reminder_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub reminder_time: Option<u32>,

    /// Owner reference. Opaque to the core.
    #[serde(default, alias = "user_id")]
    pub user_id: String,

    #[serde(
        default,
        alias = "created_at",
        with = "iso_datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<NaiveDateTime>,

    #[serde(
        default,
        alias = "updated_at",
        with = "iso_datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<NaiveDateTime>,

    #[serde(default, alias = "is_recurring")]
    pub is_recurring: bool,

    #[serde(
        default,
        alias = "recurrence_rule",
        skip_serializing_if = "Option::is_none"
    )]
    pub recurrence_rule: Option<RecurrenceRule>,

    /// Set on instances only: the id of the template they came from.
    #[serde(
        default,
        alias = "original_event_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_event_id: Option<String>,
}

impl Event {
    /// A non-recurring event with empty display fields.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            start_date,
            end_date,
            all_day: false,
            location: None,
            color: String::new(),
            reminder_time: None,
            user_id: String::new(),
            created_at: None,
            updated_at: None,
            is_recurring: false,
            recurrence_rule: None,
            original_event_id: None,
        }
    }

    /// Attach a rule and mark the event recurring.
    pub fn with_rule(mut self, rule: RecurrenceRule) -> Self {
        self.is_recurring = true;
        self.recurrence_rule = Some(rule);
        self
    }

    pub fn with_reminder(mut self, minutes: u32) -> Self {
        self.reminder_time = Some(minutes);
        self
    }

    /// `end_date - start_date`. Negative for malformed events.
    pub fn duration(&self) -> Duration {
        self.end_date - self.start_date
    }

    /// The rule the expander acts on: present only when `is_recurring` is set.
    pub fn recurrence(&self) -> Option<&RecurrenceRule> {
        if self.is_recurring {
            self.recurrence_rule.as_ref()
        } else {
            None
        }
    }

    /// Whether this event was materialized from a template.
    pub fn is_instance(&self) -> bool {
        self.original_event_id.is_some()
    }
}

// ── ISO 8601 parsing and formatting ─────────────────────────────────────────

/// Parse an ISO 8601 date or date-time into a naive instant.
///
/// Accepts:
/// - RFC 3339 with an offset (`2024-01-01T10:00:00.000Z`) — the offset is
///   dropped and the wall-clock time as written is kept
/// - naive date-time with optional fraction (`2024-01-01T10:00:00`)
/// - date-time without seconds (`2024-01-01T10:00`)
/// - bare date (`2024-01-01`) — midnight
///
/// # Errors
///
/// Returns [`KalendiError::InvalidDate`] if none of the forms match.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    Err(KalendiError::InvalidDate(format!(
        "'{s}': expected an ISO 8601 date or date-time"
    )))
}

/// Format a naive instant as `YYYY-MM-DDTHH:MM:SS`, with a fraction only when
/// the sub-second part is non-zero.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

pub(crate) mod iso_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_datetime(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_datetime(&s).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            dt: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => super::serialize(dt, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(s) => super::super::parse_datetime(&s)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

//! Reading events and dates from the command line.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use kalendi_core::cadence::end_of_day;
use kalendi_core::{parse_datetime, Event};
use serde_json::Value;

/// Load events from a JSON file, or from stdin when `path` is `-`.
///
/// The document may be a single event object or an array of them.
pub fn read_events(path: &Path) -> Result<Vec<Event>> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read events from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    let document: Value = serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    let events = if document.is_array() {
        serde_json::from_value::<Vec<Event>>(document)
    } else {
        serde_json::from_value::<Event>(document).map(|event| vec![event])
    }
    .with_context(|| format!("Invalid event in {}", path.display()))?;
    tracing::debug!(count = events.len(), source = %path.display(), "loaded events");
    Ok(events)
}

/// Parse a window start.
pub fn window_start(s: &str) -> Result<NaiveDateTime> {
    parse_datetime(s).with_context(|| format!("Invalid --from value '{s}'"))
}

/// Parse a window end. A bare date covers the whole day.
pub fn window_end(s: &str) -> Result<NaiveDateTime> {
    if let Ok(date) = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        return Ok(end_of_day(date));
    }
    parse_datetime(s).with_context(|| format!("Invalid --to value '{s}'"))
}

/// Parse a `YYYY-MM-DD` day argument.
pub fn day(s: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid {flag} value '{s}'. Expected YYYY-MM-DD"))
}

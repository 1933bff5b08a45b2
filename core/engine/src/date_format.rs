//! FILENAME: core/engine/src/date_format.rs
//! PURPOSE: Parsing and display of record timestamps.
//! CONTEXT: Order times are stored either in a human-readable encoding such as
//! `25 July 2024 at 15:30:00 UTC+00:00` or as an ISO-like string. Both paths
//! produce a `Timestamp` and are rendered through one display template, so
//! exported rows never mix formats.
//!
//! The trailing label of the custom encoding is opaque: the clock fields are
//! always read as UTC and the label is only carried through to the output.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::warn;

/// Full English month names, matched case-sensitively.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Separator that marks the custom encoding.
const CUSTOM_SEPARATOR: &str = " at ";

/// `July 25, 2024, 3:30:00 PM`
const DISPLAY_TEMPLATE: &str = "%B %-d, %Y, %-I:%M:%S %p";

/// Label appended when no label was carried by the input.
const DEFAULT_LABEL: &str = "UTC";

/// Naive layouts tried by the generic path, after RFC 3339 and RFC 2822.
const GENERIC_LAYOUTS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

// ============================================================================
// TIMESTAMP
// ============================================================================

/// Result of parsing a record timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    Valid {
        instant: DateTime<Utc>,
        /// Trailing label from the custom encoding, e.g. `UTC+00:00`.
        label: Option<String>,
    },
    /// Input that neither path understood. Holds the stripped input.
    Invalid { raw: String },
}

impl Timestamp {
    pub fn is_valid(&self) -> bool {
        matches!(self, Timestamp::Valid { .. })
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Valid { instant, .. } => Some(*instant),
            Timestamp::Invalid { .. } => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Timestamp::Valid { label, .. } => label.as_deref(),
            Timestamp::Invalid { .. } => None,
        }
    }
}

// ============================================================================
// PARSE / FORMAT
// ============================================================================

/// Parse a stored timestamp. Never fails; unparseable input yields
/// `Timestamp::Invalid`.
pub fn parse(input: &str) -> Timestamp {
    let stripped = strip_quotes(input);

    let parsed = if stripped.contains(CUSTOM_SEPARATOR) {
        parse_custom(stripped)
    } else {
        parse_generic(stripped).map(|instant| (instant, None))
    };

    match parsed {
        Some((instant, label)) => Timestamp::Valid { instant, label },
        None => {
            warn!("unparseable timestamp {:?}", stripped);
            Timestamp::Invalid {
                raw: stripped.to_string(),
            }
        }
    }
}

/// Render a timestamp for display. Invalid timestamps render as their raw input.
pub fn format(timestamp: &Timestamp) -> String {
    match timestamp {
        Timestamp::Valid { instant, label } => format!(
            "{} {}",
            instant.format(DISPLAY_TEMPLATE),
            label.as_deref().unwrap_or(DEFAULT_LABEL)
        ),
        Timestamp::Invalid { raw } => raw.clone(),
    }
}

/// `format(&parse(input))`.
pub fn normalize(input: &str) -> String {
    format(&parse(input))
}

/// Zero-based index into `MONTH_NAMES`.
pub fn month_index(name: &str) -> Option<usize> {
    MONTH_NAMES.iter().position(|m| *m == name)
}

// ============================================================================
// HELPERS
// ============================================================================

fn strip_quotes(input: &str) -> &str {
    let s = input.strip_prefix('"').unwrap_or(input);
    s.strip_suffix('"').unwrap_or(s)
}

/// `<day> <MonthName> <year> at <H>:<M>:<S> [label]`
fn parse_custom(input: &str) -> Option<(DateTime<Utc>, Option<String>)> {
    let (date_part, time_part) = input.split_once(CUSTOM_SEPARATOR)?;

    let date_fields: Vec<&str> = date_part.split_whitespace().collect();
    let [day, month, year] = date_fields.as_slice() else {
        return None;
    };

    // Only the first token after the clock is the label; any further text is dropped
    let mut time_fields = time_part.split_whitespace();
    let clock = time_fields.next()?;
    let label = time_fields.next().map(str::to_string);

    let clock_fields: Vec<&str> = clock.split(':').collect();
    let [hours, minutes, seconds] = clock_fields.as_slice() else {
        return None;
    };

    let day = parse_numeral(day, 2)?;
    let month = month_index(month)? as u32 + 1;
    let year = if year.len() == 4 { parse_numeral(year, 4)? as i32 } else { return None };
    let hours = parse_numeral(hours, 2)?;
    let minutes = parse_numeral(minutes, 2)?;
    let seconds = parse_numeral(seconds, 2)?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hours, minutes, seconds)?;
    Some((Utc.from_utc_datetime(&naive), label))
}

fn parse_numeral(field: &str, max_digits: usize) -> Option<u32> {
    if field.is_empty() || field.len() > max_digits || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Standard timestamp strings. Naive values are taken as UTC.
fn parse_generic(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for layout in GENERIC_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, layout) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

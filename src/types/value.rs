//! Value records and date-like inputs

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Accepted `NaiveDateTime` layouts for text input (RFC 3339 is tried first)
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Accepted plain date layouts for text input
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Any value that can name a calendar day
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawDate")]
pub enum DateLike {
    /// Calendar day, used as-is
    Date(NaiveDate),
    /// Wall-clock local time, truncated to its day
    DateTime(NaiveDateTime),
    /// Milliseconds since the Unix epoch
    Timestamp(i64),
    /// Unparsed text, resolved lazily
    Text(String),
}

/// Wire shape of a date-like JSON value
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Millis(i64),
    Fractional(f64),
    Text(String),
}

impl From<RawDate> for DateLike {
    fn from(raw: RawDate) -> Self {
        match raw {
            RawDate::Millis(ms) => Self::Timestamp(ms),
            RawDate::Fractional(ms) => Self::Timestamp(ms.trunc() as i64),
            RawDate::Text(text) => Self::Text(text),
        }
    }
}

impl Serialize for DateLike {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Timestamp(ms) => serializer.serialize_i64(*ms),
            other => serializer.collect_str(other),
        }
    }
}

impl fmt::Display for DateLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            Self::Timestamp(ms) => write!(f, "{ms}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<NaiveDate> for DateLike {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<NaiveDateTime> for DateLike {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateLike {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::DateTime(dt.with_timezone(&Local).naive_local())
    }
}

impl From<&str> for DateLike {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl DateLike {
    /// Truncate to the local calendar day. `None` when the input names no valid day.
    pub fn to_local_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            Self::DateTime(dt) => Some(dt.date()),
            Self::Timestamp(ms) => Local
                .timestamp_millis_opt(*ms)
                .earliest()
                .map(|dt| dt.date_naive()),
            Self::Text(text) => parse_text_date(text.trim()),
        }
    }
}

fn parse_text_date(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// One externally supplied day value with arbitrary metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRecord {
    pub date: DateLike,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<f64>,
    /// Any other fields, passed through untouched
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl ValueRecord {
    pub fn new(date: impl Into<DateLike>, count: f64) -> Self {
        Self {
            date: date.into(),
            count: Some(count),
            metadata: Map::new(),
        }
    }

    /// Record without a count (still marks the day as present)
    pub fn marker(date: impl Into<DateLike>) -> Self {
        Self {
            date: date.into(),
            count: None,
            metadata: Map::new(),
        }
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Count as display text: whole numbers without a decimal point, absent as `0`
    pub fn count_label(&self) -> String {
        format_count(self.count)
    }
}

/// Format an optional count for labels and tooltips
pub fn format_count(count: Option<f64>) -> String {
    match count {
        Some(c) if c.fract() == 0.0 && c.abs() < 1e15 => format!("{}", c as i64),
        Some(c) => format!("{c}"),
        None => "0".to_string(),
    }
}

/// Timestamp parsing and calendar bucketing.
///
/// Export dates are local wall-clock times without a zone, second precision.
/// Each date is parsed once and carried with its bucket from then on.
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, StatsError};
use crate::export::{MessageRecord, ServiceRecord};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub const MONTH_LABELS: [&str; 12] = [
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

pub const WEEKDAY_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Parses an export date (`YYYY-MM-DDTHH:MM:SS`).
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|source| {
        StatsError::MalformedTimestamp {
            value: value.to_string(),
            source,
        }
    })
}

/// Calendar coordinates of a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarBucket {
    pub year: i32,
    /// 1..=12
    pub month: u32,
    /// 0 = Monday .. 6 = Sunday
    pub weekday: u32,
    /// 0..=23
    pub hour: u32,
}

impl CalendarBucket {
    pub fn from_datetime(at: &NaiveDateTime) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
            weekday: at.weekday().num_days_from_monday(),
            hour: at.hour(),
        }
    }
}

/// Calendar resolution of a histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Month,
    Weekday,
    Hour,
}

impl Granularity {
    pub fn slot_count(self) -> usize {
        match self {
            Granularity::Month => 12,
            Granularity::Weekday => 7,
            Granularity::Hour => 24,
        }
    }

    /// Slot index of a bucket, in calendar order starting at 0.
    pub fn slot(self, bucket: &CalendarBucket) -> usize {
        match self {
            Granularity::Month => (bucket.month - 1) as usize,
            Granularity::Weekday => bucket.weekday as usize,
            Granularity::Hour => bucket.hour as usize,
        }
    }

    /// Axis labels, one per slot.
    pub fn labels(self) -> Vec<String> {
        match self {
            Granularity::Month => MONTH_LABELS.iter().map(|l| l.to_string()).collect(),
            Granularity::Weekday => WEEKDAY_LABELS.iter().map(|l| l.to_string()).collect(),
            Granularity::Hour => (0..24).map(|h| format!("{:02}", h)).collect(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Month => "month",
            Granularity::Weekday => "weekday",
            Granularity::Hour => "hour",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything carrying a parsed timestamp and its bucket.
pub trait Dated {
    fn at(&self) -> &NaiveDateTime;
    fn bucket(&self) -> &CalendarBucket;
}

/// A message with its date parsed.
#[derive(Debug, Clone)]
pub struct IndexedMessage<'a> {
    pub record: &'a MessageRecord,
    pub at: NaiveDateTime,
    pub bucket: CalendarBucket,
}

/// A join or invite with its date parsed.
#[derive(Debug, Clone)]
pub struct IndexedEvent<'a> {
    pub record: &'a ServiceRecord,
    pub at: NaiveDateTime,
    pub bucket: CalendarBucket,
}

impl Dated for IndexedMessage<'_> {
    fn at(&self) -> &NaiveDateTime {
        &self.at
    }

    fn bucket(&self) -> &CalendarBucket {
        &self.bucket
    }
}

impl Dated for IndexedEvent<'_> {
    fn at(&self) -> &NaiveDateTime {
        &self.at
    }

    fn bucket(&self) -> &CalendarBucket {
        &self.bucket
    }
}

/// Parses every message date. The first malformed date aborts the whole run.
pub fn index_messages<'a>(records: &[&'a MessageRecord]) -> Result<Vec<IndexedMessage<'a>>> {
    records
        .iter()
        .map(|&record| {
            let at = parse_timestamp(&record.date)?;
            Ok(IndexedMessage {
                record,
                bucket: CalendarBucket::from_datetime(&at),
                at,
            })
        })
        .collect()
}

/// Parses join and invite dates. A missing or non-string date is an input
/// error, an unparsable one a malformed timestamp.
pub fn index_events<'a>(records: &[&'a ServiceRecord]) -> Result<Vec<IndexedEvent<'a>>> {
    records
        .iter()
        .map(|&record| {
            let at = parse_timestamp(record.date_str()?)?;
            Ok(IndexedEvent {
                record,
                bucket: CalendarBucket::from_datetime(&at),
                at,
            })
        })
        .collect()
}

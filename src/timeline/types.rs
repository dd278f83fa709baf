use chrono::{DateTime, Datelike, Month, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::enums::EntryType;
use crate::models::TimelineEntry;

/// Filter parameters sent from the timeline view.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TimelineQuery {
    /// Case-insensitive substring over title, special instructions and
    /// medicine names. Empty means no text filter.
    pub text: Option<String>,
    /// Keep only entries on this calendar day in the observer's zone.
    pub exact_date: Option<NaiveDate>,
}

impl TimelineQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            exact_date: None,
        }
    }

    pub fn on(date: NaiveDate) -> Self {
        Self {
            text: None,
            exact_date: Some(date),
        }
    }
}

/// Calendar month an entry falls in. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> Self {
        let local = timestamp.with_timezone(tz);
        Self {
            year: local.year(),
            month: local.month(),
        }
    }

    /// "February 2024"
    pub fn label(&self) -> String {
        match u8::try_from(self.month).ok().and_then(|m| Month::try_from(m).ok()) {
            Some(month) => format!("{} {}", month.name(), self.year),
            None => format!("{}-{:02}", self.year, self.month),
        }
    }
}

/// One month of entries, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineGroup {
    pub key: MonthKey,
    pub label: String,
    pub entries: Vec<TimelineEntry>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimelineError {
    #[error("Timeline entry requires a type")]
    MissingEntryType,
    #[error("A {entry_type} entry cannot carry {content} content")]
    ContentTypeMismatch { entry_type: EntryType, content: EntryType },
}

use std::collections::BTreeMap;

use chrono::TimeZone;

use crate::models::TimelineEntry;

use super::types::{MonthKey, TimelineGroup, TimelineQuery};

/// True when the entry passes both the text and the date filter.
pub fn matches_query<Tz: TimeZone>(entry: &TimelineEntry, query: &TimelineQuery, tz: &Tz) -> bool {
    matches_text(entry, query.text.as_deref()) && matches_date(entry, query, tz)
}

fn matches_text(entry: &TimelineEntry, text: Option<&str>) -> bool {
    let needle = match text {
        Some(t) if !t.is_empty() => t.to_lowercase(),
        _ => return true,
    };

    entry.title.to_lowercase().contains(&needle)
        || entry
            .content
            .special_instructions()
            .is_some_and(|s| s.to_lowercase().contains(&needle))
        || entry
            .content
            .medicines()
            .iter()
            .any(|m| m.name.to_lowercase().contains(&needle))
}

fn matches_date<Tz: TimeZone>(entry: &TimelineEntry, query: &TimelineQuery, tz: &Tz) -> bool {
    match query.exact_date {
        Some(date) => entry.date.with_timezone(tz).date_naive() == date,
        None => true,
    }
}

/// Filters entries, partitions them by calendar month in `tz`, and orders
/// both months and entries newest first.
pub fn group_entries<Tz: TimeZone>(
    entries: &[TimelineEntry],
    query: &TimelineQuery,
    tz: &Tz,
) -> Vec<TimelineGroup> {
    let mut months: BTreeMap<MonthKey, Vec<TimelineEntry>> = BTreeMap::new();

    for entry in entries.iter().filter(|e| matches_query(e, query, tz)) {
        months
            .entry(MonthKey::of(&entry.date, tz))
            .or_default()
            .push(entry.clone());
    }

    months
        .into_iter()
        .rev()
        .map(|(key, mut entries)| {
            entries.sort_by(|a, b| b.date.cmp(&a.date));
            TimelineGroup {
                key,
                label: key.label(),
                entries,
            }
        })
        .collect()
}

//! Parse, bucket, sort and cache of a schedule response.
//!
//! Every function here is best-effort: malformed records are dropped one by one,
//! unreadable cache entries read as empty, failed cache writes are only logged.
use std::collections::BTreeSet;

use chrono::NaiveDate;
use log::{debug, info, warn};
use similar::TextDiff;

use super::{
    kv_store::KeyValueStore,
    models::{
        catalog_model::SelectionContext,
        schedule_model::{RawRecord, ScheduleEntry, Section, SectionKey, SectionMode, Weekday},
    },
};

/// Date formats the timetable is known to send in `DATE_REG`.
const DATE_FORMATS: [&str; 2] = ["%d.%m.%Y", "%Y-%m-%d"];

/// Splits a response body into raw records. Elements that are not objects of the
/// expected shape are dropped, the rest of the batch is kept.
pub fn raw_records_from_json(body: serde_json::Value) -> Vec<RawRecord> {
    let serde_json::Value::Array(items) = body else {
        warn!("Schedule response is not an array, treating it as empty");
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<RawRecord>(item) {
            Ok(record) => Some(record),
            Err(err) => {
                debug!("Dropping unreadable schedule record: {}", err);
                None
            }
        })
        .collect()
}

/// Builds entries from raw records. A record without a pair order, or without anything
/// to place it by (neither a date nor a weekday), is dropped silently.
pub fn parse_entries(raw_records: Vec<RawRecord>) -> Vec<ScheduleEntry> {
    let total = raw_records.len();
    let entries = raw_records
        .into_iter()
        .filter_map(parse_entry)
        .collect::<Vec<_>>();
    if entries.len() != total {
        info!(
            "Dropped {} malformed schedule record(s) out of {}",
            total - entries.len(),
            total
        );
    }
    entries
}

fn parse_entry(raw: RawRecord) -> Option<ScheduleEntry> {
    let pair_order_name = raw.pair_order_name.filter(|order| !order.trim().is_empty())?;
    let pair_date = raw.pair_date.as_deref().and_then(parse_pair_date);
    let day_of_week = raw
        .day_of_week
        .as_deref()
        .and_then(Weekday::from_label)
        .or_else(|| pair_date.and_then(Weekday::from_date));
    if pair_date.is_none() && day_of_week.is_none() {
        return None;
    }

    Some(ScheduleEntry {
        pair_order_name,
        pair_time: raw.pair_time.unwrap_or_default(),
        pair_date,
        day_of_week,
        pair_name: raw.pair_name.unwrap_or_default(),
        pair_type: raw.pair_type.unwrap_or_default(),
        teacher_name: raw.teacher_name.unwrap_or_default(),
        auditorium_name: raw.auditorium_name.unwrap_or_default(),
        group_name: raw.group_name.unwrap_or_default(),
    })
}

pub fn parse_pair_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date, format).ok())
}

/// Groups entries into sections.
///
/// `ByDate` emits one section per distinct date in calendar order, `ByWeekday` one per
/// weekday from Monday to Saturday. A section is never empty. Inside a section entries
/// are ordered by plain string comparison of the pair order, so "10" comes before "2".
pub fn build_sections(entries: &[ScheduleEntry], mode: SectionMode) -> Vec<Section> {
    match mode {
        SectionMode::ByDate => {
            let dates = entries
                .iter()
                .filter_map(|entry| entry.pair_date)
                .collect::<BTreeSet<_>>();
            let undated = entries.iter().filter(|e| e.pair_date.is_none()).count();
            if undated > 0 {
                warn!("{} undated entries left out of date sections", undated);
            }
            dates
                .into_iter()
                .map(|date| Section {
                    key: SectionKey::Date(date),
                    entries: sorted_by_pair_order(
                        entries.iter().filter(|entry| entry.pair_date == Some(date)),
                    ),
                })
                .collect()
        }
        SectionMode::ByWeekday => Weekday::ALL
            .into_iter()
            .map(|day| Section {
                key: SectionKey::Weekday(day),
                entries: sorted_by_pair_order(
                    entries.iter().filter(|entry| entry.day_of_week == Some(day)),
                ),
            })
            .filter(|section| !section.entries.is_empty())
            .collect(),
    }
}

fn sorted_by_pair_order<'a>(
    entries: impl Iterator<Item = &'a ScheduleEntry>,
) -> Vec<ScheduleEntry> {
    let mut entries = entries.cloned().collect::<Vec<_>>();
    entries.sort_by(|a, b| a.pair_order_name.cmp(&b.pair_order_name));
    entries
}

/// Store key of the cached schedule of a selection.
pub fn schedule_key(selection: &SelectionContext) -> String {
    format!("schedule.{}.{}", selection.kind.slug(), selection.id)
}

/// Writes `sections` under `key`, replacing what was there.
pub fn cache_sections<S: KeyValueStore>(store: &mut S, sections: &[Section], key: &str) {
    let bytes = match serde_json::to_vec(sections) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("Could not serialize sections for {}: {}", key, err);
            return;
        }
    };
    match store.set(key, bytes) {
        Ok(()) => debug!("Cached {} section(s) under {}", sections.len(), key),
        Err(err) => warn!("Could not cache sections under {}: {}", key, err),
    }
}

/// Reads sections cached under `key`, an empty list when absent or unreadable.
pub fn load_cached_sections<S: KeyValueStore>(store: &S, key: &str) -> Vec<Section> {
    let Some(bytes) = store.get(key) else {
        debug!("No cached sections under {}", key);
        return Vec::new();
    };
    match serde_json::from_slice(&bytes) {
        Ok(sections) => sections,
        Err(err) => {
            warn!("Cached sections under {} are corrupt: {}", key, err);
            Vec::new()
        }
    }
}

/// Unified diff between two schedules, `None` when they are the same.
pub fn describe_changes(old_sections: &[Section], new_sections: &[Section]) -> Option<String> {
    let old_json = serde_json::to_string_pretty(old_sections).ok()?;
    let new_json = serde_json::to_string_pretty(new_sections).ok()?;
    let diff = TextDiff::from_lines(&old_json, &new_json);
    if diff.ratio() != 1.0 {
        let pretty_diff = diff.unified_diff().header("cached", "fetched").to_string();
        Some(pretty_diff)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;

//! Module with schedule models compatible with schedule.sumdu.edu.ua's REST API
use std::fmt;

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

/// One element of a schedule response as it comes from the timetable.
/// Every field is optional here, `pipeline::parse_entries` decides what is usable.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    #[serde(
        rename = "NAME_PAIR",
        default,
        deserialize_with = "string_or_number"
    )]
    pub pair_order_name: Option<String>,
    #[serde(rename = "TIME_PAIR", default)]
    pub pair_time: Option<String>,
    #[serde(rename = "DATE_REG", default)]
    pub pair_date: Option<String>,
    #[serde(rename = "NAME_WDAY", default)]
    pub day_of_week: Option<String>,
    #[serde(rename = "ABBR_DISC", default)]
    pub pair_name: Option<String>,
    #[serde(rename = "NAME_STUD", default)]
    pub pair_type: Option<String>,
    #[serde(rename = "NAME_FIO", default)]
    pub teacher_name: Option<String>,
    #[serde(rename = "NAME_AUD", default)]
    pub auditorium_name: Option<String>,
    #[serde(rename = "NAME_GROUP", default)]
    pub group_name: Option<String>,
}

/* the pair order comes as "1" from some endpoints and as 1 from others */
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Study days, Monday to Saturday. Sunday never carries classes.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    /// Recognises English short and long names as well as the Ukrainian (and Russian)
    /// names the timetable uses. Case-insensitive.
    pub fn from_label(label: &str) -> Option<Weekday> {
        let label = label.trim().to_lowercase();
        let weekday = match label.as_str() {
            "mon" | "monday" => Weekday::Monday,
            "tue" | "tuesday" => Weekday::Tuesday,
            "wed" | "wednesday" => Weekday::Wednesday,
            "thu" | "thursday" => Weekday::Thursday,
            "fri" | "friday" => Weekday::Friday,
            "sat" | "saturday" => Weekday::Saturday,
            "пн" | "понеділок" | "понедельник" => Weekday::Monday,
            "вт" | "вівторок" | "вторник" => Weekday::Tuesday,
            "ср" | "середа" | "среда" => Weekday::Wednesday,
            "чт" | "четвер" | "четверг" => Weekday::Thursday,
            "пт" | "п'ятниця" | "п’ятниця" | "пятница" => Weekday::Friday,
            "сб" | "субота" | "суббота" => Weekday::Saturday,
            _ => return None,
        };
        Some(weekday)
    }

    pub fn from_date(date: NaiveDate) -> Option<Weekday> {
        match date.weekday() {
            chrono::Weekday::Mon => Some(Weekday::Monday),
            chrono::Weekday::Tue => Some(Weekday::Tuesday),
            chrono::Weekday::Wed => Some(Weekday::Wednesday),
            chrono::Weekday::Thu => Some(Weekday::Thursday),
            chrono::Weekday::Fri => Some(Weekday::Friday),
            chrono::Weekday::Sat => Some(Weekday::Saturday),
            chrono::Weekday::Sun => None,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One timetabled class occurrence. Never mutated after parsing.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScheduleEntry {
    pub pair_order_name: String,
    pub pair_time: String,
    pub pair_date: Option<NaiveDate>,
    pub day_of_week: Option<Weekday>,
    pub pair_name: String,
    pub pair_type: String,
    pub teacher_name: String,
    pub auditorium_name: String,
    pub group_name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(tag = "type", content = "value")]
pub enum SectionKey {
    Date(NaiveDate),
    Weekday(Weekday),
}

/// A bucket of entries under one date or weekday, entries in display order.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub key: SectionKey,
    pub entries: Vec<ScheduleEntry>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SectionMode {
    ByDate,
    ByWeekday,
}

impl SectionMode {
    /// `ByDate` when every entry carries a date, `ByWeekday` otherwise.
    pub fn for_entries(entries: &[ScheduleEntry]) -> SectionMode {
        if !entries.is_empty() && entries.iter().all(|entry| entry.pair_date.is_some()) {
            SectionMode::ByDate
        } else {
            SectionMode::ByWeekday
        }
    }
}

/// Strings of a single class as they are shown to the user.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub pair_name: String,
    pub teacher_auditorium: String,
    pub pair_time: String,
    pub group_suffix: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DisplaySection {
    pub header: String,
    pub rows: Vec<DisplayRow>,
}

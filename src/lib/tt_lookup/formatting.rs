use super::models::{
    schedule_model::{DisplayRow, DisplaySection, ScheduleEntry, Section, SectionKey},
    Labels,
};

/* e.g. "05 October, Monday" */
const DATE_HEADER_FORMAT: &str = "%d %B, %A";

pub fn section_header(key: &SectionKey) -> String {
    match key {
        SectionKey::Date(date) => date.format(DATE_HEADER_FORMAT).to_string(),
        SectionKey::Weekday(day) => day.name().to_owned(),
    }
}

/// Course name with its type in brackets, the type alone, or the placeholder.
pub fn pair_name_label(entry: &ScheduleEntry, labels: &Labels) -> String {
    match (entry.pair_name.is_empty(), entry.pair_type.is_empty()) {
        (false, false) => format!("{} ({})", entry.pair_name, entry.pair_type),
        (false, true) => entry.pair_name.clone(),
        (true, false) => entry.pair_type.clone(),
        (true, true) => labels.placeholder.clone(),
    }
}

/// "teacher, auditorium", or whichever of the two is present.
pub fn teacher_auditorium_label(entry: &ScheduleEntry) -> String {
    if entry.teacher_name.is_empty() {
        entry.auditorium_name.clone()
    } else if entry.auditorium_name.is_empty() {
        entry.teacher_name.clone()
    } else {
        format!("{}, {}", entry.teacher_name, entry.auditorium_name)
    }
}

pub fn group_suffix_label(entry: &ScheduleEntry, labels: &Labels) -> String {
    if entry.group_name.is_empty() {
        String::new()
    } else {
        format!("{}{}", labels.group_connector, entry.group_name)
    }
}

pub fn display_row(entry: &ScheduleEntry, labels: &Labels) -> DisplayRow {
    DisplayRow {
        pair_name: pair_name_label(entry, labels),
        teacher_auditorium: teacher_auditorium_label(entry),
        pair_time: entry.pair_time.clone(),
        group_suffix: group_suffix_label(entry, labels),
    }
}

pub fn display_sections(sections: &[Section], labels: &Labels) -> Vec<DisplaySection> {
    sections
        .iter()
        .map(|section| DisplaySection {
            header: section_header(&section.key),
            rows: section
                .entries
                .iter()
                .map(|entry| display_row(entry, labels))
                .collect(),
        })
        .collect()
}

/// Plain-text layout of a schedule for the terminal.
pub fn render_sections(sections: &[DisplaySection]) -> String {
    sections
        .iter()
        .map(|section| {
            let rows = section
                .rows
                .iter()
                .map(|row| {
                    let mut line = format!(
                        "  {}  {}{}",
                        row.pair_time, row.pair_name, row.group_suffix
                    );
                    if !row.teacher_auditorium.is_empty() {
                        line.push_str(&format!("\n      {}", row.teacher_auditorium));
                    }
                    line
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!("{}:\n{}", section.header, rows)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::tt_lookup::models::schedule_model::Weekday;

    fn entry(
        pair_name: &str,
        pair_type: &str,
        teacher: &str,
        auditorium: &str,
        group: &str,
    ) -> ScheduleEntry {
        ScheduleEntry {
            pair_order_name: "1".to_string(),
            pair_time: "08:00-09:20".to_string(),
            pair_date: None,
            day_of_week: Some(Weekday::Monday),
            pair_name: pair_name.to_string(),
            pair_type: pair_type.to_string(),
            teacher_name: teacher.to_string(),
            auditorium_name: auditorium.to_string(),
            group_name: group.to_string(),
        }
    }

    #[test]
    fn pair_name_variants() {
        let labels = Labels::default();
        assert_eq!(
            pair_name_label(&entry("Algebra", "Lecture", "", "", ""), &labels),
            "Algebra (Lecture)"
        );
        assert_eq!(pair_name_label(&entry("Algebra", "", "", "", ""), &labels), "Algebra");
        assert_eq!(pair_name_label(&entry("", "Lab", "", "", ""), &labels), "Lab");
        assert_eq!(pair_name_label(&entry("", "", "", "", ""), &labels), "-/-");
    }

    #[test]
    fn teacher_line_variants() {
        assert_eq!(
            teacher_auditorium_label(&entry("", "", "Shevchenko", "Г-208", "")),
            "Shevchenko, Г-208"
        );
        assert_eq!(teacher_auditorium_label(&entry("", "", "", "Г-208", "")), "Г-208");
        assert_eq!(teacher_auditorium_label(&entry("", "", "Shevchenko", "", "")), "Shevchenko");
        assert_eq!(teacher_auditorium_label(&entry("", "", "", "", "")), "");
    }

    #[test]
    fn group_suffix_uses_connector() {
        let labels = Labels {
            placeholder: "-/-".to_string(),
            group_connector: " для ".to_string(),
        };
        assert_eq!(
            group_suffix_label(&entry("", "", "", "", "ІН-21"), &labels),
            " для ІН-21"
        );
        assert_eq!(group_suffix_label(&entry("", "", "", "", ""), &labels), "");
    }

    #[test]
    fn headers() {
        let date = NaiveDate::from_ymd_opt(2015, 10, 5).unwrap();
        assert_eq!(section_header(&SectionKey::Date(date)), "05 October, Monday");
        assert_eq!(section_header(&SectionKey::Weekday(Weekday::Tuesday)), "Tuesday");
    }

    #[test]
    fn render_two_rows() {
        let sections = vec![DisplaySection {
            header: "Tuesday".to_string(),
            rows: vec![
                DisplayRow {
                    pair_name: "Physics".to_string(),
                    teacher_auditorium: "Shevchenko, Г-208".to_string(),
                    pair_time: "10:00".to_string(),
                    group_suffix: " for ІН-21".to_string(),
                },
                DisplayRow {
                    pair_name: "Algebra".to_string(),
                    teacher_auditorium: String::new(),
                    pair_time: "12:00".to_string(),
                    group_suffix: String::new(),
                },
            ],
        }];
        assert_eq!(
            render_sections(&sections),
            "Tuesday:\n  10:00  Physics for ІН-21\n      Shevchenko, Г-208\n  12:00  Algebra"
        );
    }
}

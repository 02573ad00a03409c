//! Module with catalog models compatible with schedule.sumdu.edu.ua's list responses
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(
    Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum,
)]
pub enum CatalogKind {
    Auditorium,
    Group,
    Teacher,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 3] = [
        CatalogKind::Auditorium,
        CatalogKind::Group,
        CatalogKind::Teacher,
    ];

    /// Key under which the list of this kind is persisted.
    pub fn storage_key(self) -> &'static str {
        match self {
            CatalogKind::Auditorium => "Auditoriums",
            CatalogKind::Group => "Groups",
            CatalogKind::Teacher => "Teachers",
        }
    }

    /// Name of the timetable method returning the list of this kind.
    pub fn list_method(self) -> &'static str {
        match self {
            CatalogKind::Auditorium => "getAuditoriums",
            CatalogKind::Group => "getGroups",
            CatalogKind::Teacher => "getTeachers",
        }
    }

    /// Schedule request parameter carrying the id of this kind.
    pub fn request_param(self) -> &'static str {
        match self {
            CatalogKind::Auditorium => "data[ID_AUD]",
            CatalogKind::Group => "data[KOD_GROUP]",
            CatalogKind::Teacher => "data[ID_FIO]",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            CatalogKind::Auditorium => "auditorium",
            CatalogKind::Group => "group",
            CatalogKind::Teacher => "teacher",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// A single selectable auditorium, group or teacher.
/// Identity is the pair of `id` and `kind`, the name is not part of it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: i64,
    pub name: String,
    pub kind: CatalogKind,
}

impl CatalogEntry {
    pub fn new(id: i64, name: impl Into<String>, kind: CatalogKind) -> Self {
        CatalogEntry {
            id,
            name: name.into(),
            kind,
        }
    }

    pub fn same_identity(&self, other: &CatalogEntry) -> bool {
        self.id == other.id && self.kind == other.kind
    }

    pub fn selection(&self) -> SelectionContext {
        SelectionContext {
            kind: self.kind,
            id: self.id,
        }
    }
}

/// Raw element of a list response: `{"label": "...", "value": 123}`.
#[derive(Deserialize, Debug)]
pub struct RawCatalogRecord {
    pub label: Option<String>,
    pub value: Option<i64>,
}

impl RawCatalogRecord {
    pub fn into_entry(self, kind: CatalogKind) -> Option<CatalogEntry> {
        Some(CatalogEntry {
            id: self.value?,
            name: self.label?,
            kind,
        })
    }
}

/// What a schedule is requested for.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionContext {
    pub kind: CatalogKind,
    pub id: i64,
}

impl SelectionContext {
    pub fn new(kind: CatalogKind, id: i64) -> Self {
        SelectionContext { kind, id }
    }
}

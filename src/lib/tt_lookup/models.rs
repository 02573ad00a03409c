use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use catalog_model::CatalogKind;
use schedule_model::SectionMode;

pub mod catalog_model;
pub mod schedule_model;

/// A model for describing ARGS of the tool.
/// Consists of:
/// 1. Path to config.json, that contains the timetable address and display settings.
/// 2. Path to the directory where catalogs, history and cached schedules are kept between launches.
/// 3. The action to perform.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, value_name = "FILE", default_value = "config.json")]
    pub config_json_path: PathBuf,
    #[arg(long, value_name = "DIR", default_value = "tt_store")]
    pub store_dir_path: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch auditorium, group and teacher lists from the timetable
    RefreshCatalogs {
        /// Refetch even if the stored lists are still fresh
        #[arg(long)]
        force: bool,
    },
    /// Search one of the catalogs by name
    Search {
        #[arg(long, value_enum)]
        kind: CatalogKind,
        query: Option<String>,
    },
    /// Show previously viewed selections
    History { query: Option<String> },
    /// Show the schedule of an auditorium, group or teacher
    Schedule {
        #[arg(long, value_enum)]
        kind: CatalogKind,
        #[arg(long)]
        id: i64,
        /// Sectioning mode; picked from the data when omitted
        #[arg(long, value_enum)]
        mode: Option<SectionMode>,
        /// Do not contact the timetable, show the cached schedule only
        #[arg(long)]
        offline: bool,
    },
    /// Print the calendar export link for a selection
    CalendarUrl {
        #[arg(long, value_enum)]
        kind: CatalogKind,
        #[arg(long)]
        id: i64,
    },
}

/// A model for describing configuration of the tool.
/// Consists of:
/// 1. Timetable address
/// 2. Number of days ahead requested for a schedule
/// 3. Age in days after which catalogs are refetched
/// 4. Whether responses to superseded requests are thrown away
/// 5. Display strings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_schedule_days_ahead")]
    pub schedule_days_ahead: i64,
    #[serde(default = "default_catalog_max_age_days")]
    pub catalog_max_age_days: i64,
    #[serde(default)]
    pub ignore_superseded_responses: bool,
    #[serde(default)]
    pub labels: Labels,
}

/// Strings used when building display rows.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Labels {
    /// Shown when a class has neither a name nor a type
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    /// Put in front of the group name
    #[serde(default = "default_group_connector")]
    pub group_connector: String,
}

fn default_api_base_url() -> String {
    "https://schedule.sumdu.edu.ua".to_owned()
}

fn default_schedule_days_ahead() -> i64 {
    30
}

fn default_catalog_max_age_days() -> i64 {
    3
}

fn default_placeholder() -> String {
    "-/-".to_owned()
}

fn default_group_connector() -> String {
    " for ".to_owned()
}

impl Default for Labels {
    fn default() -> Self {
        Labels {
            placeholder: default_placeholder(),
            group_connector: default_group_connector(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: default_api_base_url(),
            schedule_days_ahead: default_schedule_days_ahead(),
            catalog_max_age_days: default_catalog_max_age_days(),
            ignore_superseded_responses: false,
            labels: Labels::default(),
        }
    }
}

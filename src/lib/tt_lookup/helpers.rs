use std::path::Path;

use chrono::{Duration, NaiveDate};
use figment::{
    providers::{Env, Format, Json},
    Figment,
};
use log::{debug, info};
use reqwest::Url;

use super::{
    error::LookupError,
    models::{
        catalog_model::{CatalogEntry, CatalogKind, RawCatalogRecord, SelectionContext},
        Config,
    },
};

/* dates in requests go as dd.mm.yyyy */
const REQUEST_DATE_FORMAT: &str = "%d.%m.%Y";

pub fn get_config(config_json_path: &Path) -> Result<Config, LookupError> {
    let config: Config = Figment::new()
        .merge(Json::file(config_json_path))
        .merge(Env::prefixed("TT_").split("__"))
        .extract()?;
    info!(
        "Read config.json from {}",
        std::path::absolute(config_json_path)?.display()
    );
    Ok(config)
}

pub fn log_catalog(kind: CatalogKind, entries: &[CatalogEntry]) -> () {
    for entry in entries.iter() {
        debug!("Got {} {} named {}", kind, entry.id, entry.name);
    }
}

/// Turns a list response into entries of `kind`, dropping records without a usable
/// label or value.
pub fn catalog_entries_from_json(body: serde_json::Value, kind: CatalogKind) -> Vec<CatalogEntry> {
    let serde_json::Value::Array(items) = body else {
        info!("{} list response is not an array, treating it as empty", kind);
        return Vec::new();
    };
    let total = items.len();
    let entries = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<RawCatalogRecord>(item).ok())
        .filter_map(|record| record.into_entry(kind))
        .collect::<Vec<_>>();
    if entries.len() != total {
        debug!(
            "Dropped {} malformed {} record(s)",
            total - entries.len(),
            kind
        );
    }
    log_catalog(kind, &entries);
    entries
}

/// First and last day of the period a schedule is requested for. A negative `days_ahead`
/// gives a one-day window, one past the calendar range is clamped to its last day.
pub fn request_window(today: NaiveDate, days_ahead: i64) -> (NaiveDate, NaiveDate) {
    let last_day = Duration::try_days(days_ahead.max(0))
        .and_then(|ahead| today.checked_add_signed(ahead))
        .unwrap_or(NaiveDate::MAX);
    (today, last_day)
}

fn selection_params(
    selection: &SelectionContext,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("data[DATE_BEG]", from.format(REQUEST_DATE_FORMAT).to_string()),
        ("data[DATE_END]", to.format(REQUEST_DATE_FORMAT).to_string()),
    ];
    /* only the field of the selected kind carries the id, the others go empty */
    for kind in CatalogKind::ALL {
        let value = if kind == selection.kind {
            selection.id.to_string()
        } else {
            String::new()
        };
        params.push((kind.request_param(), value));
    }
    params
}

fn build_url(
    base_url: &str,
    path: &str,
    params: Vec<(&'static str, String)>,
) -> Result<Url, LookupError> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), path);
    Url::parse_with_params(&url, params).map_err(|err| LookupError::Url(err.to_string()))
}

pub fn catalog_url(base_url: &str, kind: CatalogKind) -> Result<Url, LookupError> {
    build_url(
        base_url,
        "index/json",
        vec![("method", kind.list_method().to_owned())],
    )
}

pub fn schedule_url(
    base_url: &str,
    selection: &SelectionContext,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Url, LookupError> {
    let mut params = vec![("method", "getSchedules".to_owned())];
    params.extend(selection_params(selection, from, to));
    build_url(base_url, "index/json", params)
}

/// Link to the iCal export of a selection's schedule.
pub fn calendar_url(
    base_url: &str,
    selection: &SelectionContext,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Url, LookupError> {
    build_url(base_url, "index/ical", selection_params(selection, from, to))
}

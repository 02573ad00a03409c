use chrono::NaiveDate;
use log::info;
use reqwest::Client;

use super::{
    error::LookupError,
    helpers::{catalog_entries_from_json, catalog_url, request_window, schedule_url},
    models::{
        catalog_model::{CatalogEntry, CatalogKind, SelectionContext},
        schedule_model::RawRecord,
        Config,
    },
    pipeline::raw_records_from_json,
};

/// A trait, necessary for every entity that will be used for getting catalogs and schedules.
#[allow(async_fn_in_trait)]
pub trait ScheduleGetter {
    async fn get_catalog(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, LookupError>;

    async fn get_schedule(
        &self,
        selection: &SelectionContext,
        today: NaiveDate,
    ) -> Result<Vec<RawRecord>, LookupError>;
}

/// Gets catalogs and schedules via requests to the SumDU timetable.
pub struct TimetableApi {
    http_client: Client,
    base_url: String,
    days_ahead: i64,
}

impl TimetableApi {
    pub fn new(http_client: Client, config: &Config) -> Self {
        TimetableApi {
            http_client,
            base_url: config.api_base_url.clone(),
            days_ahead: config.schedule_days_ahead,
        }
    }
}

impl ScheduleGetter for TimetableApi {
    async fn get_catalog(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, LookupError> {
        let request_url = catalog_url(&self.base_url, kind)?;
        info!("Getting {} list from {}", kind, request_url);
        let response = self.http_client.get(request_url).send().await?;
        let body: serde_json::Value = response.error_for_status()?.json().await?;
        Ok(catalog_entries_from_json(body, kind))
    }

    async fn get_schedule(
        &self,
        selection: &SelectionContext,
        today: NaiveDate,
    ) -> Result<Vec<RawRecord>, LookupError> {
        let (from, to) = request_window(today, self.days_ahead);
        let request_url = schedule_url(&self.base_url, selection, from, to)?;
        info!(
            "Getting schedule for {} {} from {} to {}",
            selection.kind, selection.id, from, to
        );
        let response = self.http_client.get(request_url).send().await?;
        let body: serde_json::Value = response.error_for_status()?.json().await?;
        Ok(raw_records_from_json(body))
    }
}

use chrono::{DateTime, Utc};
use futures::future;
use log::{info, warn};

use super::{
    catalog_store::CatalogStore,
    error::LookupError,
    formatting::{display_sections, render_sections},
    helpers::{calendar_url, request_window},
    kv_store::KeyValueStore,
    models::{
        catalog_model::{CatalogEntry, CatalogKind, SelectionContext},
        schedule_model::SectionMode,
        Command, Config,
    },
    schedule_getter::ScheduleGetter,
    session::{LateResponsePolicy, ResponseOutcome, ScheduleSession},
};

/// Fetches all three catalogs at once and stores the ones that arrived.
/// Returns how many catalogs were replaced.
pub async fn refresh_catalogs<SG: ScheduleGetter, S: KeyValueStore>(
    schedule_getter: &SG,
    catalog: &mut CatalogStore<S>,
    now: DateTime<Utc>,
) -> usize {
    let fetched = future::join_all(
        CatalogKind::ALL
            .into_iter()
            .map(|kind| async move { (kind, schedule_getter.get_catalog(kind).await) }),
    )
    .await;

    /* writes go one by one after every fetch is done */
    let mut updated = 0;
    for (kind, result) in fetched {
        match result {
            Ok(entries) => {
                catalog.replace(kind, entries);
                updated += 1;
            }
            Err(err) => warn!("Could not refresh {} list: {}", kind, err),
        }
    }
    if updated == CatalogKind::ALL.len() {
        catalog.mark_updated(now);
    }
    info!("Refreshed {} of {} catalogs", updated, CatalogKind::ALL.len());
    updated
}

async fn refresh_catalogs_if_stale<SG: ScheduleGetter, S: KeyValueStore>(
    schedule_getter: &SG,
    catalog: &mut CatalogStore<S>,
    config: &Config,
    now: DateTime<Utc>,
) {
    if catalog.needs_refresh(now, config.catalog_max_age_days) {
        info!(
            "Catalogs are older than {} days, refreshing",
            config.catalog_max_age_days
        );
        refresh_catalogs(schedule_getter, catalog, now).await;
    }
}

fn format_entries(entries: &[CatalogEntry], with_kind: bool) -> String {
    if entries.is_empty() {
        return "Nothing found".to_owned();
    }
    entries
        .iter()
        .map(|entry| {
            if with_kind {
                format!("{}\t{}\t{}", entry.kind, entry.id, entry.name)
            } else {
                format!("{}\t{}", entry.id, entry.name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Performs `command` against an already loaded catalog and returns the text to show.
pub async fn run<SG: ScheduleGetter, S: KeyValueStore>(
    schedule_getter: &SG,
    catalog: &mut CatalogStore<S>,
    command: &Command,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<String, LookupError> {
    match command {
        Command::RefreshCatalogs { force } => {
            if *force || catalog.needs_refresh(now, config.catalog_max_age_days) {
                let updated = refresh_catalogs(schedule_getter, catalog, now).await;
                Ok(format!(
                    "Updated {} catalog(s): {} auditoriums, {} groups, {} teachers",
                    updated,
                    catalog.list(CatalogKind::Auditorium).len(),
                    catalog.list(CatalogKind::Group).len(),
                    catalog.list(CatalogKind::Teacher).len()
                ))
            } else {
                Ok("Catalogs are up to date".to_owned())
            }
        }
        Command::Search { kind, query } => {
            refresh_catalogs_if_stale(schedule_getter, catalog, config, now).await;
            let found = catalog.search(*kind, query.as_deref());
            info!("Found {} {} entries", found.len(), kind);
            Ok(format_entries(&found, false))
        }
        Command::History { query } => Ok(format_entries(
            &catalog.search_history(query.as_deref()),
            true,
        )),
        Command::Schedule {
            kind,
            id,
            mode,
            offline,
        } => {
            let selection = SelectionContext::new(*kind, *id);
            show_schedule(schedule_getter, catalog, &selection, *mode, *offline, config, now).await
        }
        Command::CalendarUrl { kind, id } => {
            let selection = SelectionContext::new(*kind, *id);
            let (from, to) = request_window(now.date_naive(), config.schedule_days_ahead);
            Ok(calendar_url(&config.api_base_url, &selection, from, to)?.to_string())
        }
    }
}

async fn show_schedule<SG: ScheduleGetter, S: KeyValueStore>(
    schedule_getter: &SG,
    catalog: &mut CatalogStore<S>,
    selection: &SelectionContext,
    mode: Option<SectionMode>,
    offline: bool,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<String, LookupError> {
    let policy = LateResponsePolicy::from_flag(config.ignore_superseded_responses);
    let mut session = ScheduleSession::open(*selection, policy, catalog.store());

    if !offline {
        let token = session.begin_request();
        match schedule_getter
            .get_schedule(selection, now.date_naive())
            .await
        {
            Ok(raw_records) => {
                match session.accept(token, raw_records, mode, catalog.store_mut()) {
                    ResponseOutcome::Updated { changes: Some(_) } => {
                        info!(
                            "Schedule of {} {} changed since last time",
                            selection.kind, selection.id
                        )
                    }
                    ResponseOutcome::Updated { changes: None } => {
                        info!("Schedule of {} {} is unchanged", selection.kind, selection.id)
                    }
                    ResponseOutcome::Empty | ResponseOutcome::Superseded => {}
                }
            }
            Err(err) => warn!("Could not get schedule, showing cached one: {}", err),
        }
    }

    match catalog.find(selection.kind, selection.id).cloned() {
        Some(entry) => catalog.add_to_history(entry),
        None => warn!(
            "{} {} is not in the catalog, not adding it to history",
            selection.kind, selection.id
        ),
    }

    let sections = display_sections(session.sections(), &config.labels);
    if sections.is_empty() {
        Ok("No classes found".to_owned())
    } else {
        Ok(render_sections(&sections))
    }
}

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};

use super::{
    kv_store::KeyValueStore,
    models::catalog_model::{CatalogEntry, CatalogKind},
};

/// The most recent selections kept in history.
pub const HISTORY_LIMIT: usize = 50;

pub const HISTORY_KEY: &str = "History";
pub const LAST_UPDATED_KEY: &str = "LastUpdatedAtDate";

/// Owns the three catalog lists and the history, mirrors every change into the store.
/// Reads and writes are best-effort: a failing store leaves the in-memory lists usable.
pub struct CatalogStore<S: KeyValueStore> {
    store: S,
    auditoriums: Vec<CatalogEntry>,
    groups: Vec<CatalogEntry>,
    teachers: Vec<CatalogEntry>,
    history: Vec<CatalogEntry>,
}

impl<S: KeyValueStore> CatalogStore<S> {
    /// Creates a store with empty lists. Call `load` to pull persisted ones.
    pub fn new(store: S) -> Self {
        CatalogStore {
            store,
            auditoriums: Vec::new(),
            groups: Vec::new(),
            teachers: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Reads the four lists by their fixed keys. Missing or corrupt data gives an empty list
    /// for that key only.
    pub fn load(&mut self) {
        for kind in CatalogKind::ALL {
            let entries = read_list(&self.store, kind.storage_key());
            *self.list_mut(kind) = entries;
        }
        self.history = read_list(&self.store, HISTORY_KEY);
        info!(
            "Loaded {} auditoriums, {} groups, {} teachers and {} history entries",
            self.auditoriums.len(),
            self.groups.len(),
            self.teachers.len(),
            self.history.len()
        );
    }

    /// Swaps the list of `kind` for `entries` and persists it.
    pub fn replace(&mut self, kind: CatalogKind, entries: Vec<CatalogEntry>) {
        info!("Replacing {} list with {} entries", kind, entries.len());
        write_list(&mut self.store, kind.storage_key(), &entries);
        *self.list_mut(kind) = entries;
    }

    /// Appends `entry` to history unless an entry with the same identity is already there.
    /// The oldest entry is evicted first when history is full. The list is persisted even
    /// when nothing changed.
    pub fn add_to_history(&mut self, entry: CatalogEntry) {
        if self.history.iter().any(|e| e.same_identity(&entry)) {
            debug!("{} {} is already in history", entry.kind, entry.id);
        } else {
            while self.history.len() >= HISTORY_LIMIT {
                let evicted = self.history.remove(0);
                debug!("Evicting {} {} from history", evicted.kind, evicted.id);
            }
            self.history.push(entry);
        }
        write_list(&mut self.store, HISTORY_KEY, &self.history);
    }

    /// Case-insensitive substring filter over names, stored order kept.
    pub fn search(&self, kind: CatalogKind, query: Option<&str>) -> Vec<CatalogEntry> {
        filter_by_name(self.list(kind), query)
    }

    pub fn search_history(&self, query: Option<&str>) -> Vec<CatalogEntry> {
        filter_by_name(&self.history, query)
    }

    pub fn find(&self, kind: CatalogKind, id: i64) -> Option<&CatalogEntry> {
        self.list(kind).iter().find(|entry| entry.id == id)
    }

    pub fn list(&self, kind: CatalogKind) -> &[CatalogEntry] {
        match kind {
            CatalogKind::Auditorium => &self.auditoriums,
            CatalogKind::Group => &self.groups,
            CatalogKind::Teacher => &self.teachers,
        }
    }

    pub fn history(&self) -> &[CatalogEntry] {
        &self.history
    }

    /// True when the catalogs were never fetched or were fetched more than `max_age_days` ago.
    /// An age the calendar cannot represent counts as stale.
    pub fn needs_refresh(&self, now: DateTime<Utc>, max_age_days: i64) -> bool {
        let last_updated = self
            .store
            .get(LAST_UPDATED_KEY)
            .and_then(|bytes| serde_json::from_slice::<DateTime<Utc>>(&bytes).ok());
        let oldest_fresh =
            Duration::try_days(max_age_days).and_then(|max_age| now.checked_sub_signed(max_age));
        match (last_updated, oldest_fresh) {
            (Some(last_updated), Some(oldest_fresh)) => last_updated < oldest_fresh,
            _ => true,
        }
    }

    pub fn mark_updated(&mut self, now: DateTime<Utc>) {
        match serde_json::to_vec(&now) {
            Ok(bytes) => {
                if let Err(err) = self.store.set(LAST_UPDATED_KEY, bytes) {
                    warn!("Could not persist catalog update time: {}", err);
                }
            }
            Err(err) => warn!("Could not serialize catalog update time: {}", err),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn list_mut(&mut self, kind: CatalogKind) -> &mut Vec<CatalogEntry> {
        match kind {
            CatalogKind::Auditorium => &mut self.auditoriums,
            CatalogKind::Group => &mut self.groups,
            CatalogKind::Teacher => &mut self.teachers,
        }
    }
}

fn filter_by_name(entries: &[CatalogEntry], query: Option<&str>) -> Vec<CatalogEntry> {
    match query {
        Some(query) if !query.is_empty() => {
            let query = query.to_lowercase();
            entries
                .iter()
                .filter(|entry| entry.name.to_lowercase().contains(&query))
                .cloned()
                .collect()
        }
        _ => entries.to_vec(),
    }
}

fn read_list<S: KeyValueStore>(store: &S, key: &str) -> Vec<CatalogEntry> {
    let Some(bytes) = store.get(key) else {
        debug!("No list stored under {}", key);
        return Vec::new();
    };
    match serde_json::from_slice(&bytes) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Stored list under {} is corrupt, using empty: {}", key, err);
            Vec::new()
        }
    }
}

fn write_list<S: KeyValueStore>(store: &mut S, key: &str, entries: &[CatalogEntry]) {
    let bytes = match serde_json::to_vec(entries) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("Could not serialize list {}: {}", key, err);
            return;
        }
    };
    if let Err(err) = store.set(key, bytes) {
        warn!("Could not persist list {}: {}", key, err);
    }
}

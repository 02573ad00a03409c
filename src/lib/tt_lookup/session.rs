//! The schedule currently shown for one selection, and what happens when a response
//! for it arrives.
use log::{debug, info, warn};

use super::{
    kv_store::KeyValueStore,
    models::{
        catalog_model::SelectionContext,
        schedule_model::{RawRecord, Section, SectionMode},
    },
    pipeline::{
        build_sections, cache_sections, describe_changes, load_cached_sections, parse_entries,
        schedule_key,
    },
};

/// Identifies one schedule request. Later requests get greater tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

#[derive(Debug, Default)]
pub struct RequestFence {
    latest: u64,
}

impl RequestFence {
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

/// What to do with a response that arrives after a newer request was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LateResponsePolicy {
    /// Whatever arrives last is shown
    #[default]
    Overwrite,
    /// Only the response to the latest request is shown
    IgnoreSuperseded,
}

impl LateResponsePolicy {
    pub fn from_flag(ignore_superseded: bool) -> Self {
        if ignore_superseded {
            LateResponsePolicy::IgnoreSuperseded
        } else {
            LateResponsePolicy::Overwrite
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Sections were rebuilt and cached. Holds a diff against the previous ones if they differ.
    Updated { changes: Option<String> },
    /// The response had no records, previous sections stay
    Empty,
    /// The response belongs to a request that is no longer the latest
    Superseded,
}

pub struct ScheduleSession {
    selection: SelectionContext,
    policy: LateResponsePolicy,
    fence: RequestFence,
    sections: Vec<Section>,
}

impl ScheduleSession {
    /// Starts with whatever was cached for `selection`.
    pub fn open<S: KeyValueStore>(
        selection: SelectionContext,
        policy: LateResponsePolicy,
        store: &S,
    ) -> Self {
        let sections = load_cached_sections(store, &schedule_key(&selection));
        debug!(
            "Opened {} {} with {} cached section(s)",
            selection.kind,
            selection.id,
            sections.len()
        );
        ScheduleSession {
            selection,
            policy,
            fence: RequestFence::default(),
            sections,
        }
    }

    pub fn begin_request(&mut self) -> RequestToken {
        self.fence.issue()
    }

    pub fn accept<S: KeyValueStore>(
        &mut self,
        token: RequestToken,
        raw_records: Vec<RawRecord>,
        mode: Option<SectionMode>,
        store: &mut S,
    ) -> ResponseOutcome {
        if self.policy == LateResponsePolicy::IgnoreSuperseded && !self.fence.is_current(token) {
            warn!(
                "Ignoring response {:?} for {} {}, a newer request is pending",
                token, self.selection.kind, self.selection.id
            );
            return ResponseOutcome::Superseded;
        }
        if raw_records.is_empty() {
            info!(
                "Empty schedule for {} {}, keeping {} section(s)",
                self.selection.kind,
                self.selection.id,
                self.sections.len()
            );
            return ResponseOutcome::Empty;
        }

        let entries = parse_entries(raw_records);
        let mode = mode.unwrap_or_else(|| SectionMode::for_entries(&entries));
        let sections = build_sections(&entries, mode);
        let changes = describe_changes(&self.sections, &sections);
        if let Some(changes) = &changes {
            debug!(
                "Schedule of {} {} changed:\n{}",
                self.selection.kind, self.selection.id, changes
            );
        }
        cache_sections(store, &sections, &schedule_key(&self.selection));
        self.sections = sections;
        ResponseOutcome::Updated { changes }
    }

    pub fn selection(&self) -> &SelectionContext {
        &self.selection
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tt_lookup::{
        kv_store::{FailingStore, MemoryStore},
        models::catalog_model::CatalogKind,
    };

    fn record(order: &str, day: &str, name: &str) -> RawRecord {
        RawRecord {
            pair_order_name: Some(order.to_string()),
            day_of_week: Some(day.to_string()),
            pair_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn fence_tracks_latest_token() {
        let mut fence = RequestFence::default();
        let first = fence.issue();
        let second = fence.issue();
        assert!(first < second);
        assert!(!fence.is_current(first));
        assert!(fence.is_current(second));
    }

    #[test]
    fn late_response_overwrites_by_default() {
        let mut store = MemoryStore::new();
        let selection = SelectionContext::new(CatalogKind::Group, 1);
        let mut session = ScheduleSession::open(selection, LateResponsePolicy::Overwrite, &store);
        let stale = session.begin_request();
        let _fresh = session.begin_request();

        let outcome = session.accept(stale, vec![record("1", "Mon", "Algebra")], None, &mut store);
        assert!(matches!(outcome, ResponseOutcome::Updated { .. }));
        assert_eq!(session.sections().len(), 1);
    }

    #[test]
    fn late_response_ignored_when_fenced() {
        let mut store = MemoryStore::new();
        let selection = SelectionContext::new(CatalogKind::Group, 1);
        let mut session =
            ScheduleSession::open(selection, LateResponsePolicy::IgnoreSuperseded, &store);
        let stale = session.begin_request();
        let fresh = session.begin_request();

        let outcome = session.accept(stale, vec![record("1", "Mon", "Algebra")], None, &mut store);
        assert_eq!(outcome, ResponseOutcome::Superseded);
        assert!(session.sections().is_empty());
        assert!(store.is_empty());

        let outcome = session.accept(fresh, vec![record("1", "Fri", "Physics")], None, &mut store);
        assert!(matches!(outcome, ResponseOutcome::Updated { .. }));
        assert_eq!(session.sections().len(), 1);
    }

    #[test]
    fn empty_payload_keeps_previous_sections() {
        let mut store = MemoryStore::new();
        let selection = SelectionContext::new(CatalogKind::Teacher, 9);
        let mut session = ScheduleSession::open(selection, LateResponsePolicy::Overwrite, &store);
        let token = session.begin_request();
        session.accept(token, vec![record("2", "Tue", "Algebra")], None, &mut store);

        let token = session.begin_request();
        assert_eq!(session.accept(token, Vec::new(), None, &mut store), ResponseOutcome::Empty);
        assert_eq!(session.sections().len(), 1);

        let reopened = ScheduleSession::open(selection, LateResponsePolicy::Overwrite, &store);
        assert_eq!(reopened.sections(), session.sections());
    }

    #[test]
    fn unchanged_schedule_reports_no_changes() {
        let mut store = MemoryStore::new();
        let selection = SelectionContext::new(CatalogKind::Auditorium, 3);
        let mut session = ScheduleSession::open(selection, LateResponsePolicy::Overwrite, &store);

        let token = session.begin_request();
        let first = session.accept(token, vec![record("1", "Wed", "Optics")], None, &mut store);
        assert!(matches!(first, ResponseOutcome::Updated { changes: Some(_) }));

        let token = session.begin_request();
        let second = session.accept(token, vec![record("1", "Wed", "Optics")], None, &mut store);
        assert_eq!(second, ResponseOutcome::Updated { changes: None });
    }

    #[test]
    fn failed_cache_write_still_updates_sections() {
        let mut store = FailingStore;
        let selection = SelectionContext::new(CatalogKind::Group, 4);
        let mut session = ScheduleSession::open(selection, LateResponsePolicy::Overwrite, &store);

        let token = session.begin_request();
        let outcome = session.accept(token, vec![record("1", "Thu", "Logic")], None, &mut store);
        assert!(matches!(outcome, ResponseOutcome::Updated { changes: Some(_) }));
        assert_eq!(session.sections().len(), 1);
        assert_eq!(session.sections()[0].entries[0].pair_name, "Logic");
    }
}

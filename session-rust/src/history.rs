use crate::{busy::BusyGuard, SessionError, SessionResult};
use notes_sdk::{PersistenceService, SummaryRecord};
use parking_lot::Mutex;
use std::{collections::HashSet, sync::Arc};
use tracing::{debug, info, info_span, warn};
use tracing_futures::Instrument;

/// A history row ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub record: SummaryRecord,
    pub expanded: bool,
    /// A delete for this record is waiting on the store.
    pub deleting: bool,
}

#[derive(Default)]
struct HistoryState {
    records: Vec<SummaryRecord>,
    expanded: Option<String>,
    deleting: HashSet<String>,
    pending_refreshes: usize,
}

/// Lists, expands and deletes persisted summaries.
///
/// Deletes are applied only after the store confirms them. Each record has
/// its own deleting mark, so deletes of different records can run at the
/// same time.
pub struct HistoryBrowser {
    persistence: Arc<dyn PersistenceService>,
    state: Mutex<HistoryState>,
}

impl HistoryBrowser {
    pub fn new(persistence: Arc<dyn PersistenceService>) -> Self {
        Self {
            persistence,
            state: Mutex::new(HistoryState::default()),
        }
    }

    #[must_use]
    pub fn records(&self) -> Vec<SummaryRecord> {
        self.state.lock().records.clone()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<HistoryEntry> {
        let state = self.state.lock();
        state
            .records
            .iter()
            .map(|record| HistoryEntry {
                record: record.clone(),
                expanded: state.expanded.as_deref() == Some(record.id.as_str()),
                deleting: state.deleting.contains(&record.id),
            })
            .collect()
    }

    #[must_use]
    pub fn expanded_id(&self) -> Option<String> {
        self.state.lock().expanded.clone()
    }

    #[must_use]
    pub fn is_deleting(&self, id: &str) -> bool {
        self.state.lock().deleting.contains(id)
    }

    /// True while any refresh is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.lock().pending_refreshes > 0
    }

    /// Expand `id`, collapsing whatever was expanded. Toggling the expanded
    /// record collapses it.
    pub fn toggle_expand(&self, id: &str) {
        let mut state = self.state.lock();
        if state.expanded.as_deref() == Some(id) {
            state.expanded = None;
        } else {
            state.expanded = Some(id.to_string());
        }
    }

    /// Replace the list with the store's. On failure the previous list stays.
    pub async fn refresh(&self) -> SessionResult<Vec<SummaryRecord>> {
        self.state.lock().pending_refreshes += 1;
        let busy = BusyGuard::new(&self.state, |state: &mut HistoryState| {
            state.pending_refreshes -= 1;
        });

        let result = self
            .persistence
            .list_history()
            .instrument(info_span!("notes_session.refresh_history"))
            .await;

        let mut state = busy.release();
        match result {
            Ok(records) => {
                let expanded_gone = state
                    .expanded
                    .as_ref()
                    .is_some_and(|id| !records.iter().any(|record| &record.id == id));
                if expanded_gone {
                    state.expanded = None;
                }
                state.records.clone_from(&records);
                debug!(count = records.len(), "history refreshed");
                Ok(records)
            }
            Err(error) => {
                warn!(%error, "history refresh failed, keeping previous list");
                Err(error.into())
            }
        }
    }

    /// Delete a record from the store, then from the list.
    pub async fn delete(&self, id: &str) -> SessionResult<()> {
        {
            let mut state = self.state.lock();
            if state.deleting.contains(id) {
                return Err(SessionError::disabled("delete", "delete already in flight"));
            }
            if !state.records.iter().any(|record| record.id == id) {
                return Err(SessionError::disabled("delete", format!("no record {id}")));
            }
            state.deleting.insert(id.to_string());
        }
        let busy = BusyGuard::new(&self.state, |state: &mut HistoryState| {
            state.deleting.remove(id);
        });

        let result = self
            .persistence
            .delete_summary(id.to_string())
            .instrument(info_span!("notes_session.delete_summary", id))
            .await;

        let mut state = busy.release();
        match result {
            Ok(()) => {
                state.records.retain(|record| record.id != id);
                if state.expanded.as_deref() == Some(id) {
                    state.expanded = None;
                }
                info!(id, "summary deleted");
                Ok(())
            }
            Err(error) => {
                warn!(id, %error, "delete failed, record kept");
                Err(error.into())
            }
        }
    }
}

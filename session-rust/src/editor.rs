use crate::{busy::BusyGuard, SessionError, SessionResult};
use notes_sdk::{PersistenceService, SummarizationService};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};
use tracing_futures::Instrument;

/// Whether the current summary is being read or rewritten.
/// The edit buffer only exists while editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Viewing,
    Editing { draft: String },
}

/// The one summary currently materialized in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub title: String,
    /// Markdown text. This is both what is shown and what was last persisted.
    pub body_text: String,
    pub mode: EditorMode,
}

#[derive(Default)]
struct EditorState {
    summary: Option<SessionSummary>,
    saving: bool,
    distributing: bool,
}

impl EditorState {
    fn summary_mut(&mut self, action: &'static str) -> SessionResult<&mut SessionSummary> {
        self.summary
            .as_mut()
            .ok_or_else(|| SessionError::disabled(action, "no summary is open"))
    }

    fn ensure_idle(&self, action: &'static str) -> SessionResult<()> {
        if self.saving {
            return Err(SessionError::disabled(action, "a save is in flight"));
        }
        if self.distributing {
            return Err(SessionError::disabled(action, "the summary is being emailed"));
        }
        Ok(())
    }
}

/// View/edit/save lifecycle of the current summary.
pub struct SummaryEditor {
    persistence: Arc<dyn PersistenceService>,
    summarizer: Arc<dyn SummarizationService>,
    state: Mutex<EditorState>,
}

impl SummaryEditor {
    pub fn new(
        persistence: Arc<dyn PersistenceService>,
        summarizer: Arc<dyn SummarizationService>,
    ) -> Self {
        Self {
            persistence,
            summarizer,
            state: Mutex::new(EditorState::default()),
        }
    }

    /// Install a freshly generated summary, replacing any previous one.
    /// Refused while a save or send for the current one is outstanding.
    pub fn materialize(
        &self,
        title: impl Into<String>,
        body_text: impl Into<String>,
    ) -> SessionResult<()> {
        let mut state = self.state.lock();
        state.ensure_idle("open summary")?;
        state.summary = Some(SessionSummary {
            title: title.into(),
            body_text: body_text.into(),
            mode: EditorMode::Viewing,
        });
        Ok(())
    }

    #[must_use]
    pub fn summary(&self) -> Option<SessionSummary> {
        self.state.lock().summary.clone()
    }

    #[must_use]
    pub fn body_text(&self) -> Option<String> {
        self.state
            .lock()
            .summary
            .as_ref()
            .map(|summary| summary.body_text.clone())
    }

    #[must_use]
    pub fn mode(&self) -> Option<EditorMode> {
        self.state
            .lock()
            .summary
            .as_ref()
            .map(|summary| summary.mode.clone())
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.state.lock().saving
    }

    pub fn enter_edit(&self) -> SessionResult<()> {
        let mut state = self.state.lock();
        state.ensure_idle("edit")?;
        let summary = state.summary_mut("edit")?;
        if summary.mode != EditorMode::Viewing {
            return Err(SessionError::disabled("edit", "already editing"));
        }
        summary.mode = EditorMode::Editing {
            draft: summary.body_text.clone(),
        };
        debug!("entered edit mode");
        Ok(())
    }

    /// Replace the edit buffer.
    pub fn set_draft(&self, text: impl Into<String>) -> SessionResult<()> {
        let mut state = self.state.lock();
        state.ensure_idle("update draft")?;
        match &mut state.summary_mut("update draft")?.mode {
            EditorMode::Editing { draft } => {
                *draft = text.into();
                Ok(())
            }
            EditorMode::Viewing => Err(SessionError::disabled("update draft", "not editing")),
        }
    }

    /// Drop the edit buffer and go back to viewing the unchanged body.
    pub fn cancel_edit(&self) -> SessionResult<()> {
        let mut state = self.state.lock();
        state.ensure_idle("cancel edit")?;
        let summary = state.summary_mut("cancel edit")?;
        if summary.mode == EditorMode::Viewing {
            return Err(SessionError::disabled("cancel edit", "not editing"));
        }
        summary.mode = EditorMode::Viewing;
        debug!("edit cancelled");
        Ok(())
    }

    /// Persist the edit buffer and return the new body text.
    ///
    /// After the update is confirmed the canonical text is fetched back and
    /// adopted, so any normalization done by the store shows up. If that
    /// fetch fails the saved text is kept. A failed update leaves the editor
    /// in edit mode with the buffer untouched.
    pub async fn save(&self) -> SessionResult<String> {
        let draft = {
            let mut state = self.state.lock();
            state.ensure_idle("save")?;
            let draft = match &state.summary_mut("save")?.mode {
                EditorMode::Editing { draft } => draft.clone(),
                EditorMode::Viewing => {
                    return Err(SessionError::disabled("save", "not editing"));
                }
            };
            state.saving = true;
            draft
        };
        let busy = BusyGuard::new(&self.state, |state: &mut EditorState| {
            state.saving = false;
        });

        let span = info_span!("notes_session.save");
        let result = self.persist(draft.clone()).instrument(span).await;

        let mut state = busy.release();
        let canonical = match result {
            Ok(canonical) => canonical,
            Err(error) => {
                warn!(%error, "save failed, edits kept");
                return Err(error);
            }
        };
        let body_text = canonical.unwrap_or(draft);
        if let Some(summary) = state.summary.as_mut() {
            summary.body_text.clone_from(&body_text);
            summary.mode = EditorMode::Viewing;
        }
        info!("summary saved");
        Ok(body_text)
    }

    async fn persist(&self, draft: String) -> SessionResult<Option<String>> {
        self.persistence.update_summary(draft).await?;
        match self.summarizer.fetch_summary().await {
            Ok(generated) if !generated.summary.trim().is_empty() => Ok(Some(generated.summary)),
            Ok(_) => {
                warn!("canonical summary came back blank, keeping saved text");
                Ok(None)
            }
            Err(error) => {
                warn!(%error, "could not re-fetch saved summary, keeping saved text");
                Ok(None)
            }
        }
    }

    /// Tear down the current summary. Only allowed while viewing.
    pub fn close(&self) -> SessionResult<SessionSummary> {
        let mut state = self.state.lock();
        state.ensure_idle("close")?;
        if state.summary_mut("close")?.mode != EditorMode::Viewing {
            return Err(SessionError::disabled("close", "finish or cancel the edit first"));
        }
        state
            .summary
            .take()
            .ok_or_else(|| SessionError::disabled("close", "no summary is open"))
    }

    /// Hand out the body text for emailing and block edits until the
    /// returned lock is dropped.
    pub(crate) fn begin_distribution(&self) -> SessionResult<(String, DistributionLock<'_>)> {
        let mut state = self.state.lock();
        state.ensure_idle("send email")?;
        let summary = state.summary_mut("send email")?;
        if summary.mode != EditorMode::Viewing {
            return Err(SessionError::disabled(
                "send email",
                "save or cancel the edit first",
            ));
        }
        let body_text = summary.body_text.clone();
        state.distributing = true;
        Ok((body_text, DistributionLock { state: &self.state }))
    }

    /// Forget the current summary. A save or send still in flight keeps its
    /// mark until it finishes.
    pub(crate) fn clear(&self) {
        self.state.lock().summary = None;
    }
}

/// Held by the session for the duration of an email send.
pub(crate) struct DistributionLock<'a> {
    state: &'a Mutex<EditorState>,
}

impl Drop for DistributionLock<'_> {
    fn drop(&mut self) {
        self.state.lock().distributing = false;
    }
}

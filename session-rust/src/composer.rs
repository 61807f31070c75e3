use crate::{busy::BusyGuard, QuickPrompt, SessionError, SessionResult};
use notes_sdk::{GeneratedSummary, ServiceResult, SummarizationService, SummaryRequest};
use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info, info_span, warn};
use tracing_futures::Instrument;

/// What the user has typed so far for the next summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftInput {
    pub title: String,
    pub notes: String,
    /// Optional. Sent as an empty string when left blank.
    pub instructions: String,
}

impl DraftInput {
    /// Submission needs both a title and notes; instructions are optional.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.title.is_empty() && !self.notes.is_empty()
    }

    fn to_request(&self) -> SummaryRequest {
        SummaryRequest {
            meeting_title: self.title.clone(),
            meeting_notes: self.notes.clone(),
            custom_instructions: self.instructions.clone(),
        }
    }
}

/// A generated summary handed from the composer to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub title: String,
    pub summary: String,
}

/// How long to wait for a generated summary to become available.
///
/// A fetch that comes back with a blank summary counts as "not ready" and is
/// re-issued after `interval`, up to `max_attempts` fetches in total. The
/// last response is used as-is. Failed fetches are never retried.
/// # Default Values
/// - `max_attempts`: 1 (the summary is expected to be ready right away)
/// - `interval`: 2 seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryReadiness {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for SummaryReadiness {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            interval: Duration::from_secs(2),
        }
    }
}

impl SummaryReadiness {
    #[must_use]
    pub fn polling(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }
}

#[derive(Default)]
struct ComposerState {
    draft: DraftInput,
    submitting: bool,
}

/// Owns the draft input and drives submission to the summarization service.
pub struct Composer {
    summarizer: Arc<dyn SummarizationService>,
    readiness: SummaryReadiness,
    state: Mutex<ComposerState>,
}

impl Composer {
    pub fn new(summarizer: Arc<dyn SummarizationService>, readiness: SummaryReadiness) -> Self {
        Self {
            summarizer,
            readiness,
            state: Mutex::new(ComposerState::default()),
        }
    }

    #[must_use]
    pub fn draft(&self) -> DraftInput {
        self.state.lock().draft.clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.state.lock().draft.title = title.into();
    }

    pub fn set_notes(&self, notes: impl Into<String>) {
        self.state.lock().draft.notes = notes.into();
    }

    pub fn set_instructions(&self, instructions: impl Into<String>) {
        self.state.lock().draft.instructions = instructions.into();
    }

    /// Replace the instructions with a preset. Unknown ids leave the draft
    /// alone.
    pub fn apply_quick_prompt(&self, preset_id: &str) {
        match QuickPrompt::from_id(preset_id) {
            Some(prompt) => {
                self.state.lock().draft.instructions = prompt.instructions().to_string();
            }
            None => debug!(preset_id, "ignoring unknown quick prompt"),
        }
    }

    /// Whether the submit action is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        let state = self.state.lock();
        !state.submitting && state.draft.can_submit()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.state.lock().submitting
    }

    /// Clear every draft field.
    pub fn reset(&self) {
        self.state.lock().draft = DraftInput::default();
    }

    /// Send the current draft for summarization and wait for the result.
    ///
    /// The summary is fetched only once the create call has been confirmed.
    /// On success the notes and instructions that were sent are cleared and
    /// the title is kept; anything typed while the call was in flight stays.
    /// On failure the draft is left exactly as it was.
    pub async fn submit(&self) -> SessionResult<Submission> {
        let request = {
            let mut state = self.state.lock();
            if state.submitting {
                return Err(SessionError::disabled(
                    "submit",
                    "a submission is already in flight",
                ));
            }
            if !state.draft.can_submit() {
                return Err(SessionError::disabled(
                    "submit",
                    "meeting title and notes are required",
                ));
            }
            state.submitting = true;
            state.draft.to_request()
        };
        let busy = BusyGuard::new(&self.state, |state: &mut ComposerState| {
            state.submitting = false;
        });
        let title = request.meeting_title.clone();
        let sent_notes = request.meeting_notes.clone();
        let sent_instructions = request.custom_instructions.clone();

        let span = info_span!("notes_session.submit", title = %title);
        let result = self.generate(request).instrument(span).await;

        let mut state = busy.release();
        match result {
            Ok(summary) => {
                if state.draft.notes == sent_notes {
                    state.draft.notes.clear();
                }
                if state.draft.instructions == sent_instructions {
                    state.draft.instructions.clear();
                }
                info!(title = %title, "summary generated");
                Ok(Submission { title, summary })
            }
            Err(error) => {
                warn!(%error, "submission failed, draft kept");
                Err(error.into())
            }
        }
    }

    async fn generate(&self, request: SummaryRequest) -> ServiceResult<String> {
        self.summarizer.create_summary(request).await?;
        debug!("summary job accepted");
        self.fetch_when_ready().await
    }

    async fn fetch_when_ready(&self) -> ServiceResult<String> {
        let max_attempts = self.readiness.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let GeneratedSummary { summary } = self.summarizer.fetch_summary().await?;
            if !summary.trim().is_empty() || attempt >= max_attempts {
                return Ok(summary);
            }
            debug!(attempt, max_attempts, "summary not ready yet");
            tokio::time::sleep(self.readiness.interval).await;
            attempt += 1;
        }
    }
}

use crate::{
    Composer, Distributor, EditorMode, EmailRequest, HistoryBrowser, SessionError,
    SessionResult, SessionSummary, SummaryEditor, SummaryReadiness,
};
use notes_sdk::{MailService, PersistenceService, SummarizationService};
use std::sync::Arc;
use tracing::{debug, info};

/// Options for a [`Session`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    pub readiness: SummaryReadiness,
}

/// Where the user is in the compose/review flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStage {
    /// No summary is open; the composer is in charge.
    Composing,
    Viewing,
    Editing,
}

/// Owns the session state and performs the hand-offs between the composer,
/// the editor and the distributor. The history browser is independent and
/// only shares the persistence service.
pub struct Session {
    composer: Composer,
    editor: SummaryEditor,
    distributor: Distributor,
    history: HistoryBrowser,
}

impl Session {
    /// Create a session backed by one service implementing all three
    /// collaborators, e.g. a [`notes_sdk::NotesClient`].
    pub fn new<S>(service: Arc<S>, options: SessionOptions) -> Self
    where
        S: SummarizationService + PersistenceService + MailService + 'static,
    {
        Self::from_services(service.clone(), service.clone(), service, options)
    }

    pub fn from_services(
        summarizer: Arc<dyn SummarizationService>,
        persistence: Arc<dyn PersistenceService>,
        mail: Arc<dyn MailService>,
        options: SessionOptions,
    ) -> Self {
        Self {
            composer: Composer::new(summarizer.clone(), options.readiness),
            editor: SummaryEditor::new(persistence.clone(), summarizer),
            distributor: Distributor::new(mail),
            history: HistoryBrowser::new(persistence),
        }
    }

    #[must_use]
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    #[must_use]
    pub fn editor(&self) -> &SummaryEditor {
        &self.editor
    }

    #[must_use]
    pub fn distributor(&self) -> &Distributor {
        &self.distributor
    }

    #[must_use]
    pub fn history(&self) -> &HistoryBrowser {
        &self.history
    }

    #[must_use]
    pub fn stage(&self) -> SessionStage {
        match self.editor.mode() {
            None => SessionStage::Composing,
            Some(EditorMode::Viewing) => SessionStage::Viewing,
            Some(EditorMode::Editing { .. }) => SessionStage::Editing,
        }
    }

    /// Submit the composer's draft and open the generated summary for
    /// review. Only possible while no summary is open.
    pub async fn submit(&self) -> SessionResult<SessionSummary> {
        if self.stage() != SessionStage::Composing {
            return Err(SessionError::disabled("submit", "close the current summary first"));
        }
        let submission = self.composer.submit().await?;
        self.editor.materialize(submission.title.clone(), submission.summary.clone())?;
        self.distributor.prepare(submission.title.clone());
        debug!(title = %submission.title, "summary materialized");
        Ok(SessionSummary {
            title: submission.title,
            body_text: submission.summary,
            mode: EditorMode::Viewing,
        })
    }

    /// Email the current summary. Only possible while viewing it.
    /// A confirmed send resets the whole session back to composing.
    pub async fn send_email(&self) -> SessionResult<EmailRequest> {
        let (body_text, lock) = self.editor.begin_distribution()?;
        let result = self.distributor.send(body_text).await;
        drop(lock);

        let request = result?;
        self.reset();
        info!("session reset after email");
        Ok(request)
    }

    /// Close the current summary and go back to an empty composer.
    pub fn close_summary(&self) -> SessionResult<()> {
        self.editor.close()?;
        self.composer.reset();
        self.distributor.reset();
        Ok(())
    }

    /// Drop the current summary, draft and send form.
    /// History is left as it is.
    pub fn reset(&self) {
        self.editor.clear();
        self.composer.reset();
        self.distributor.reset();
    }
}

use crate::{GeneratedSummary, MailRequest, ServiceResult, SummaryRecord, SummaryRequest};

/// Generates summaries from raw notes.
///
/// Generation is a two-phase hand-off: `create_summary` starts the job and
/// `fetch_summary` retrieves the result of the most recent job.
#[async_trait::async_trait]
pub trait SummarizationService: Send + Sync {
    async fn create_summary(&self, request: SummaryRequest) -> ServiceResult<()>;
    async fn fetch_summary(&self) -> ServiceResult<GeneratedSummary>;
}

/// Stores the current summary and the history of past summaries.
#[async_trait::async_trait]
pub trait PersistenceService: Send + Sync {
    /// Replace the stored text of the current summary.
    async fn update_summary(&self, updated_summary: String) -> ServiceResult<()>;
    /// List persisted summaries in the order the store returns them.
    async fn list_history(&self) -> ServiceResult<Vec<SummaryRecord>>;
    async fn delete_summary(&self, meeting_id: String) -> ServiceResult<()>;
}

/// Sends email out-of-band.
#[async_trait::async_trait]
pub trait MailService: Send + Sync {
    async fn send_mail(&self, request: MailRequest) -> ServiceResult<()>;
}

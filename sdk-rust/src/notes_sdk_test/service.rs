use std::{collections::VecDeque, sync::Mutex};

use futures::channel::oneshot;

use crate::{
    service::{MailService, PersistenceService, SummarizationService},
    GeneratedSummary, MailRequest, ServiceError, ServiceResult, SummaryRecord, SummaryRequest,
};

/// Result for a mocked service call.
pub enum MockResult<T> {
    /// Resolve immediately with this value.
    Ok(T),
    /// Fail immediately with this error.
    Error(ServiceError),
    /// Stay pending until the paired sender resolves it.
    /// A dropped sender fails the call.
    Deferred(oneshot::Receiver<ServiceResult<T>>),
}

impl<T> MockResult<T> {
    /// Construct a result that yields the provided value.
    pub fn ok(value: T) -> Self {
        Self::Ok(value)
    }

    /// Construct a result that yields the provided error.
    pub fn error(error: ServiceError) -> Self {
        Self::Error(error)
    }

    /// Construct a result that stays pending until the returned sender is
    /// used.
    pub fn deferred() -> (oneshot::Sender<ServiceResult<T>>, Self) {
        let (sender, receiver) = oneshot::channel();
        (sender, Self::Deferred(receiver))
    }

    async fn resolve(self, operation: &'static str) -> ServiceResult<T> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Error(error) => Err(error),
            Self::Deferred(receiver) => receiver.await.unwrap_or_else(|_| {
                Err(ServiceError::Invariant(format!(
                    "deferred {operation} result was dropped"
                )))
            }),
        }
    }
}

impl<T> From<ServiceResult<T>> for MockResult<T> {
    fn from(result: ServiceResult<T>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(error) => Self::Error(error),
        }
    }
}

/// A call received by [`MockNotesService`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    CreateSummary(SummaryRequest),
    FetchSummary,
    UpdateSummary(String),
    ListHistory,
    DeleteSummary(String),
    SendMail(MailRequest),
}

#[derive(Default)]
struct MockNotesServiceState {
    create_results: VecDeque<MockResult<()>>,
    fetch_results: VecDeque<MockResult<GeneratedSummary>>,
    update_results: VecDeque<MockResult<()>>,
    history_results: VecDeque<MockResult<Vec<SummaryRecord>>>,
    delete_results: VecDeque<MockResult<()>>,
    mail_results: VecDeque<MockResult<()>>,
    tracked_calls: Vec<MockCall>,
}

/// A mock of all three notes services that records calls and yields
/// predefined results. A call with nothing enqueued fails.
#[derive(Default)]
pub struct MockNotesService {
    state: Mutex<MockNotesServiceState>,
}

macro_rules! enqueue_fn {
    ($name:ident, $queue:ident, $ty:ty) => {
        /// Enqueue a mocked result for the matching operation.
        pub fn $name(&self, result: MockResult<$ty>) -> &Self {
            let mut state = self.state.lock().expect("mock state poisoned");
            state.$queue.push_back(result);
            drop(state);
            self
        }
    };
}

impl MockNotesService {
    /// Construct a new mock service instance.
    pub fn new() -> Self {
        Self::default()
    }

    enqueue_fn!(enqueue_create, create_results, ());
    enqueue_fn!(enqueue_fetch, fetch_results, GeneratedSummary);
    enqueue_fn!(enqueue_update, update_results, ());
    enqueue_fn!(enqueue_history, history_results, Vec<SummaryRecord>);
    enqueue_fn!(enqueue_delete, delete_results, ());
    enqueue_fn!(enqueue_mail, mail_results, ());

    /// Retrieve every call received so far.
    pub fn tracked_calls(&self) -> Vec<MockCall> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_calls.clone()
    }

    /// Reset tracked calls without touching enqueued results.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.tracked_calls.clear();
    }

    fn take<T>(
        &self,
        call: MockCall,
        operation: &'static str,
        queue: impl FnOnce(&mut MockNotesServiceState) -> &mut VecDeque<MockResult<T>>,
    ) -> ServiceResult<MockResult<T>> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.tracked_calls.push(call);
        queue(&mut *state).pop_front().ok_or_else(|| {
            ServiceError::Invariant(format!("no mocked {operation} results available"))
        })
    }
}

impl From<GeneratedSummary> for MockResult<GeneratedSummary> {
    fn from(summary: GeneratedSummary) -> Self {
        Self::ok(summary)
    }
}

impl From<Vec<SummaryRecord>> for MockResult<Vec<SummaryRecord>> {
    fn from(records: Vec<SummaryRecord>) -> Self {
        Self::ok(records)
    }
}

#[async_trait::async_trait]
impl SummarizationService for MockNotesService {
    async fn create_summary(&self, request: SummaryRequest) -> ServiceResult<()> {
        let result = self.take(MockCall::CreateSummary(request), "create_summary", |s| {
            &mut s.create_results
        })?;
        result.resolve("create_summary").await
    }

    async fn fetch_summary(&self) -> ServiceResult<GeneratedSummary> {
        let result = self.take(MockCall::FetchSummary, "fetch_summary", |s| {
            &mut s.fetch_results
        })?;
        result.resolve("fetch_summary").await
    }
}

#[async_trait::async_trait]
impl PersistenceService for MockNotesService {
    async fn update_summary(&self, updated_summary: String) -> ServiceResult<()> {
        let result = self.take(
            MockCall::UpdateSummary(updated_summary),
            "update_summary",
            |s| &mut s.update_results,
        )?;
        result.resolve("update_summary").await
    }

    async fn list_history(&self) -> ServiceResult<Vec<SummaryRecord>> {
        let result = self.take(MockCall::ListHistory, "list_history", |s| {
            &mut s.history_results
        })?;
        result.resolve("list_history").await
    }

    async fn delete_summary(&self, meeting_id: String) -> ServiceResult<()> {
        let result = self.take(MockCall::DeleteSummary(meeting_id), "delete_summary", |s| {
            &mut s.delete_results
        })?;
        result.resolve("delete_summary").await
    }
}

#[async_trait::async_trait]
impl MailService for MockNotesService {
    async fn send_mail(&self, request: MailRequest) -> ServiceResult<()> {
        let result = self.take(MockCall::SendMail(request), "send_mail", |s| {
            &mut s.mail_results
        })?;
        result.resolve("send_mail").await
    }
}

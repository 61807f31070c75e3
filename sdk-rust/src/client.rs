use crate::{
    client_utils::{get_json, post_json},
    opentelemetry::trace_request,
    service::{MailService, PersistenceService, SummarizationService},
    DeleteRequest, GeneratedSummary, HistoryResponse, MailRequest, ServiceResult, SummaryRecord,
    SummaryRequest, SummaryUpdate,
};
use reqwest::{
    header::{self, HeaderValue},
    Client,
};
use std::time::Duration;

const SUMMARIZE_PATH: &str = "/api/v1/summarizedata";
const GET_SUMMARY_PATH: &str = "/api/v1/getsummary";
const UPDATE_SUMMARY_PATH: &str = "/api/v1/updatesummary";
const HISTORY_PATH: &str = "/api/v1/gethistory";
const DELETE_SUMMARY_PATH: &str = "/api/v1/deletesummary";
const SEND_MAIL_PATH: &str = "/api/v1/sendmail";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const BASE_URL_ENV: &str = "NOTES_API_BASE_URL";
const TIMEOUT_ENV: &str = "NOTES_API_TIMEOUT_SECS";

/// Options for [`NotesClient`].
/// # Default Values
/// - `base_url`: `http://localhost:3000`
/// - `timeout`: 120 seconds
/// - `user_agent`: `notes-sdk/<version>`
#[derive(Debug, Clone)]
pub struct NotesClientOptions {
    pub base_url: String,
    /// Applied to every request. Summary generation can take a while, so keep
    /// this generous.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for NotesClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("notes-sdk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl NotesClientOptions {
    /// Read `NOTES_API_BASE_URL` and `NOTES_API_TIMEOUT_SECS`, keeping the
    /// defaults for unset or unparsable values.
    #[must_use]
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                options.base_url = base_url.trim().to_string();
            }
        }
        if let Ok(timeout) = std::env::var(TIMEOUT_ENV) {
            match timeout.trim().parse::<u64>() {
                Ok(secs) => options.timeout = Duration::from_secs(secs),
                Err(_) => tracing::warn!(value = %timeout, "ignoring invalid {TIMEOUT_ENV}"),
            }
        }
        options
    }
}

/// HTTP client for the notes backend. One client serves all three services.
#[derive(Debug, Clone)]
pub struct NotesClient {
    base_url: String,
    client: Client,
}

impl NotesClient {
    pub fn new(options: NotesClientOptions) -> ServiceResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(options.user_agent)
            .timeout(options.timeout)
            .build()?;

        Ok(Self {
            base_url: options.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait::async_trait]
impl SummarizationService for NotesClient {
    async fn create_summary(&self, request: SummaryRequest) -> ServiceResult<()> {
        let url = self.url(SUMMARIZE_PATH);
        trace_request(
            "create_summary",
            "POST",
            SUMMARIZE_PATH,
            post_json(&self.client, &url, &request),
        )
        .await
    }

    async fn fetch_summary(&self) -> ServiceResult<GeneratedSummary> {
        let url = self.url(GET_SUMMARY_PATH);
        trace_request(
            "fetch_summary",
            "GET",
            GET_SUMMARY_PATH,
            get_json::<GeneratedSummary>(&self.client, &url),
        )
        .await
    }
}

#[async_trait::async_trait]
impl PersistenceService for NotesClient {
    async fn update_summary(&self, updated_summary: String) -> ServiceResult<()> {
        let url = self.url(UPDATE_SUMMARY_PATH);
        let body = SummaryUpdate { updated_summary };
        trace_request(
            "update_summary",
            "POST",
            UPDATE_SUMMARY_PATH,
            post_json(&self.client, &url, &body),
        )
        .await
    }

    async fn list_history(&self) -> ServiceResult<Vec<SummaryRecord>> {
        let url = self.url(HISTORY_PATH);
        let response = trace_request(
            "list_history",
            "GET",
            HISTORY_PATH,
            get_json::<HistoryResponse>(&self.client, &url),
        )
        .await?;
        Ok(response.history_data)
    }

    async fn delete_summary(&self, meeting_id: String) -> ServiceResult<()> {
        let url = self.url(DELETE_SUMMARY_PATH);
        let body = DeleteRequest { meeting_id };
        trace_request(
            "delete_summary",
            "POST",
            DELETE_SUMMARY_PATH,
            post_json(&self.client, &url, &body),
        )
        .await
    }
}

#[async_trait::async_trait]
impl MailService for NotesClient {
    async fn send_mail(&self, request: MailRequest) -> ServiceResult<()> {
        let url = self.url(SEND_MAIL_PATH);
        trace_request(
            "send_mail",
            "POST",
            SEND_MAIL_PATH,
            post_json(&self.client, &url, &request),
        )
        .await
    }
}

use crate::{ServiceError, ServiceResult};
use opentelemetry::trace::Status;
use std::time::Instant;
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Span around a single call to a notes service.
/// Attributes follow the OpenTelemetry HTTP client conventions.
pub struct ServiceSpan {
    span: Span,
    start_time: Instant,
    status_code: Option<u16>,
}

impl ServiceSpan {
    pub fn new(operation: &'static str, method: &'static str, path: &'static str) -> Self {
        let span = info_span!("notes_sdk.request", operation);
        span.set_attribute("notes_sdk.operation", operation);
        span.set_attribute("http.request.method", method);
        span.set_attribute("url.path", path);

        Self {
            span,
            start_time: Instant::now(),
            status_code: None,
        }
    }

    pub async fn instrument_future<F>(&self, future: F) -> F::Output
    where
        F: std::future::Future,
    {
        future.instrument(self.span.clone()).await
    }

    pub fn on_success(&mut self) {
        self.status_code = Some(200);
    }

    pub fn on_error(&mut self, error: &ServiceError) {
        if let ServiceError::StatusCode(status, _) = error {
            self.status_code = Some(status.as_u16());
        }
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    fn on_end(&mut self) {
        if let Some(status_code) = self.status_code {
            self.span
                .set_attribute("http.response.status_code", i64::from(status_code));
        }
        self.span.set_attribute(
            "notes_sdk.duration",
            self.start_time.elapsed().as_secs_f64(),
        );
    }
}

impl Drop for ServiceSpan {
    fn drop(&mut self) {
        self.on_end();
    }
}

/// Run a service call inside a [`ServiceSpan`], recording its outcome.
pub async fn trace_request<T, Fut>(
    operation: &'static str,
    method: &'static str,
    path: &'static str,
    future: Fut,
) -> ServiceResult<T>
where
    Fut: std::future::Future<Output = ServiceResult<T>>,
{
    let mut span = ServiceSpan::new(operation, method, path);
    let result = span.instrument_future(future).await;

    match &result {
        Ok(_) => span.on_success(),
        Err(error) => {
            tracing::warn!(parent: &span.span, %error, "{operation} failed");
            span.on_error(error);
        }
    }

    result
}

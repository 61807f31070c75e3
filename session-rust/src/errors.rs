use notes_sdk::ServiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// A notes service call failed. Client state was left as it was before
    /// the call.
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
    /// The action is not available in the current state, the equivalent of
    /// a disabled control. Nothing was sent.
    #[error("{0} is disabled: {1}")]
    Disabled(&'static str, String),
}

impl SessionError {
    pub(crate) fn disabled(action: &'static str, reason: impl Into<String>) -> Self {
        Self::Disabled(action, reason.into())
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

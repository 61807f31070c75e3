use thiserror::Error;

/// A failed call to one of the notes services.
///
/// Callers treat every variant the same way (the call did not succeed and
/// nothing changed on the client); the variants only exist so logs say why.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request could not be sent or the response body could not be read.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered with anything other than 200 OK.
    #[error("Status error: {1} (Status {0})")]
    StatusCode(reqwest::StatusCode, String),
    /// The response body did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Invariant: {0}")]
    Invariant(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

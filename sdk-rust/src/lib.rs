mod client;
mod client_utils;
mod errors;
pub mod notes_sdk_test;
mod opentelemetry;
mod service;
mod types;

pub use client::{NotesClient, NotesClientOptions, DEFAULT_BASE_URL};
pub use errors::*;
pub use service::{MailService, PersistenceService, SummarizationService};
pub use types::*;

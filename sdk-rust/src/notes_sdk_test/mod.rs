//! Test doubles for the notes services.

mod service;

pub use service::{MockCall, MockNotesService, MockResult};

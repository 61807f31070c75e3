//! Client-side session for the meeting notes summarizer.
//!
//! A [`Session`] wires together the [`Composer`], [`SummaryEditor`],
//! [`Distributor`] and [`HistoryBrowser`]. Every operation takes `&self`:
//! component state sits behind a lock that is never held across a service
//! call, so the history browser can run several deletes at once while the
//! rest of the session stays usable.

mod busy;
mod composer;
mod distributor;
mod editor;
mod errors;
mod history;
mod quick_prompt;
mod session;

pub use composer::{Composer, DraftInput, Submission, SummaryReadiness};
pub use distributor::{parse_recipients, Distributor, EmailRequest, SendForm};
pub use editor::{EditorMode, SessionSummary, SummaryEditor};
pub use errors::{SessionError, SessionResult};
pub use history::{HistoryBrowser, HistoryEntry};
pub use quick_prompt::QuickPrompt;
pub use session::{Session, SessionOptions, SessionStage};

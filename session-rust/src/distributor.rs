use crate::{busy::BusyGuard, SessionError, SessionResult};
use notes_sdk::{MailRequest, MailService};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, info_span, warn};
use tracing_futures::Instrument;

/// Split a comma separated recipients field, trimming whitespace and dropping
/// empty entries.
#[must_use]
pub fn parse_recipients(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|recipient| !recipient.is_empty())
        .map(str::to_string)
        .collect()
}

/// One email send attempt. Built fresh for every send and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRequest {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub additional_message: Option<String>,
}

impl From<EmailRequest> for MailRequest {
    fn from(request: EmailRequest) -> Self {
        Self {
            recipients: request.recipients.join(", "),
            subject: request.subject,
            edited_summary: request.body,
            additional_message: request.additional_message.unwrap_or_default(),
        }
    }
}

/// The fields of the send form as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendForm {
    /// Raw comma separated text.
    pub recipients: String,
    pub subject: String,
    pub additional_message: String,
}

impl SendForm {
    #[must_use]
    pub fn can_send(&self) -> bool {
        !self.subject.is_empty() && !parse_recipients(&self.recipients).is_empty()
    }

    #[must_use]
    pub fn to_request(&self, body: impl Into<String>) -> EmailRequest {
        EmailRequest {
            recipients: parse_recipients(&self.recipients),
            subject: self.subject.clone(),
            body: body.into(),
            additional_message: Some(self.additional_message.clone())
                .filter(|message| !message.is_empty()),
        }
    }

    fn for_meeting(meeting_title: &str) -> Self {
        Self {
            subject: meeting_title.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Default)]
struct DistributorState {
    form: SendForm,
    meeting_title: String,
    sending: bool,
}

/// The email sub-flow for the current summary.
pub struct Distributor {
    mail: Arc<dyn MailService>,
    state: Mutex<DistributorState>,
}

impl Distributor {
    pub fn new(mail: Arc<dyn MailService>) -> Self {
        Self {
            mail,
            state: Mutex::new(DistributorState::default()),
        }
    }

    /// Start a fresh form for a newly materialized summary. The subject
    /// defaults to the meeting title.
    pub fn prepare(&self, meeting_title: impl Into<String>) {
        let mut state = self.state.lock();
        state.meeting_title = meeting_title.into();
        state.form = SendForm::for_meeting(&state.meeting_title);
    }

    #[must_use]
    pub fn form(&self) -> SendForm {
        self.state.lock().form.clone()
    }

    pub fn set_recipients(&self, recipients: impl Into<String>) {
        self.state.lock().form.recipients = recipients.into();
    }

    pub fn set_subject(&self, subject: impl Into<String>) {
        self.state.lock().form.subject = subject.into();
    }

    pub fn set_additional_message(&self, message: impl Into<String>) {
        self.state.lock().form.additional_message = message.into();
    }

    #[must_use]
    pub fn can_send(&self) -> bool {
        let state = self.state.lock();
        !state.sending && state.form.can_send()
    }

    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.state.lock().sending
    }

    /// Email `body` using the current form.
    ///
    /// On success the form is cleared (subject goes back to the meeting
    /// title). On failure the form is left as typed so the user can retry.
    pub async fn send(&self, body: impl Into<String>) -> SessionResult<EmailRequest> {
        let request = {
            let mut state = self.state.lock();
            if state.sending {
                return Err(SessionError::disabled("send email", "a send is in flight"));
            }
            if !state.form.can_send() {
                return Err(SessionError::disabled(
                    "send email",
                    "recipients and subject are required",
                ));
            }
            state.sending = true;
            state.form.to_request(body)
        };
        let busy = BusyGuard::new(&self.state, |state: &mut DistributorState| {
            state.sending = false;
        });

        let span = info_span!("notes_session.send_email", recipients = request.recipients.len());
        let result = self
            .mail
            .send_mail(request.clone().into())
            .instrument(span)
            .await;

        let mut state = busy.release();
        match result {
            Ok(()) => {
                state.form = SendForm::for_meeting(&state.meeting_title);
                info!(recipients = request.recipients.len(), "summary emailed");
                Ok(request)
            }
            Err(error) => {
                warn!(%error, "email failed, form kept");
                Err(error.into())
            }
        }
    }

    /// Forget the form and the meeting it was for.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.form = SendForm::default();
        state.meeting_title.clear();
    }
}

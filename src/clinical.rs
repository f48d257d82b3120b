//! Clinical assistant chat: one conversation per selected patient.
//!
//! State machine:
//! - `NoPatientSelected` → (select) → `Idle`
//! - `Idle` → (non-empty submit) → `AwaitingResponse`
//! - `AwaitingResponse` → (reply for the current ticket) → `Idle`
//!
//! Selecting a patient from any state starts a fresh conversation. A reply
//! whose ticket no longer matches (patient switched mid-call) is dropped.
//!
//! The backend call is split out (`begin_turn` / `complete_turn`) so a shell
//! can run it without holding the session lock. `send_message` chains both
//! for synchronous callers.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::context::patient_context;
use crate::models::{ChatMessage, Patient, ReplyKind};
use crate::summarizer::{Reply, Summarizer};

/// Shown under the chat input.
pub const CLINICAL_DISCLAIMER: &str = "AI-generated summaries. Not a substitute for professional medical diagnosis. Verify all information.";

const CAPABILITIES: &[&str] = &[
    "Summarize recent visits",
    "Draft SOAP notes",
    "Analyze symptom history",
    "Check medication interactions",
];

/// Why a submission was ignored. The session is unchanged in every case.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    #[error("No patient selected")]
    NoPatientSelected,

    #[error("Message is empty")]
    EmptyInput,

    #[error("A response is already pending")]
    AwaitingResponse,
}

/// Messages exchanged about one patient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversation {
    pub id: Uuid,
    pub patient: Patient,
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    fn start(patient: Patient) -> Self {
        let welcome = ChatMessage::assistant(welcome_message(&patient), ReplyKind::Answer);
        Self {
            id: Uuid::new_v4(),
            patient,
            messages: vec![welcome],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
enum ChatState {
    #[default]
    NoPatientSelected,
    Idle(Conversation),
    AwaitingResponse {
        conversation: Conversation,
        ticket: Uuid,
    },
}

/// Work handed to whoever performs the backend call.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTurn {
    pub ticket: Uuid,
    pub context: String,
    pub query: String,
}

/// Read-only snapshot for the view layer.
#[derive(Debug, Clone, Serialize)]
pub struct ClinicalView {
    pub current_patient: Option<Patient>,
    pub header: Option<String>,
    pub conversation_id: Option<Uuid>,
    pub messages: Vec<ChatMessage>,
    pub awaiting: bool,
    pub disclaimer: &'static str,
}

#[derive(Debug, Default)]
pub struct ClinicalSession {
    state: ChatState,
}

impl ClinicalSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh conversation for `patient`, discarding the previous one
    /// (including any pending response).
    pub fn select_patient(&mut self, patient: Patient) {
        if let ChatState::AwaitingResponse { ticket, .. } = &self.state {
            tracing::debug!(%ticket, "Pending response abandoned by patient switch");
        }
        tracing::info!(patient_id = %patient.id, "Patient selected");
        self.state = ChatState::Idle(Conversation::start(patient));
    }

    /// Append the user message and move to `AwaitingResponse`.
    pub fn begin_turn(&mut self, text: &str) -> Result<PendingTurn, SubmitRejection> {
        let conversation = match &mut self.state {
            ChatState::NoPatientSelected => return Err(SubmitRejection::NoPatientSelected),
            ChatState::AwaitingResponse { .. } => return Err(SubmitRejection::AwaitingResponse),
            ChatState::Idle(conversation) => conversation,
        };
        if text.trim().is_empty() {
            return Err(SubmitRejection::EmptyInput);
        }

        conversation.messages.push(ChatMessage::user(text));
        let pending = PendingTurn {
            ticket: Uuid::new_v4(),
            context: patient_context(&conversation.patient),
            query: text.to_string(),
        };

        let state = std::mem::take(&mut self.state);
        if let ChatState::Idle(conversation) = state {
            self.state = ChatState::AwaitingResponse {
                conversation,
                ticket: pending.ticket,
            };
        }
        Ok(pending)
    }

    /// Append the assistant reply for `ticket` and return to `Idle`.
    ///
    /// Returns `false` (and changes nothing) when `ticket` is not the
    /// currently pending turn.
    pub fn complete_turn(&mut self, ticket: Uuid, reply: Reply) -> bool {
        self.push_reply(ticket, assistant_message(reply))
    }

    fn push_reply(&mut self, ticket: Uuid, message: ChatMessage) -> bool {
        let current = match &self.state {
            ChatState::AwaitingResponse { ticket: current, .. } => *current,
            _ => {
                tracing::debug!(%ticket, "Discarding reply: no response pending");
                return false;
            }
        };
        if current != ticket {
            tracing::debug!(%ticket, "Discarding reply for stale turn");
            return false;
        }

        if let ChatState::AwaitingResponse { mut conversation, .. } =
            std::mem::take(&mut self.state)
        {
            conversation.messages.push(message);
            self.state = ChatState::Idle(conversation);
        }
        true
    }

    /// Submit `text`, block on the backend and return the appended reply.
    pub fn send_message(
        &mut self,
        summarizer: &Summarizer,
        text: &str,
    ) -> Result<ChatMessage, SubmitRejection> {
        let pending = self.begin_turn(text)?;
        let message = assistant_message(summarizer.reply(&pending.context, &pending.query));
        self.push_reply(pending.ticket, message.clone());
        Ok(message)
    }

    fn conversation(&self) -> Option<&Conversation> {
        match &self.state {
            ChatState::NoPatientSelected => None,
            ChatState::Idle(conversation) => Some(conversation),
            ChatState::AwaitingResponse { conversation, .. } => Some(conversation),
        }
    }

    pub fn current_patient(&self) -> Option<&Patient> {
        self.conversation().map(|c| &c.patient)
    }

    pub fn conversation_id(&self) -> Option<Uuid> {
        self.conversation().map(|c| c.id)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.conversation()
            .map(|c| c.messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.state, ChatState::AwaitingResponse { .. })
    }

    pub fn view(&self) -> ClinicalView {
        let patient = self.current_patient();
        ClinicalView {
            current_patient: patient.cloned(),
            header: patient.map(Patient::header_line),
            conversation_id: self.conversation_id(),
            messages: self.messages().to_vec(),
            awaiting: self.is_awaiting(),
            disclaimer: CLINICAL_DISCLAIMER,
        }
    }
}

/// Opening assistant message for a newly selected patient.
pub fn welcome_message(patient: &Patient) -> String {
    let capabilities = CAPABILITIES
        .iter()
        .map(|c| format!("- {c}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Accessing secure FHIR record for **{}** ({}).\n\nI can help you:\n{capabilities}",
        patient.name, patient.mrn
    )
}

fn assistant_message(reply: Reply) -> ChatMessage {
    let reply = reply.non_blank();
    ChatMessage::assistant(reply.text, reply.kind)
}

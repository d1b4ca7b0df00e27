//! Question/answer loop against the backend.

use crate::gate::BusyGate;
use crate::state::SessionState;
use lexrag_core::Result;
use lexrag_core::gateway::{AskResponse, BackendGateway};
use lexrag_core::message::Message;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const NO_ANSWER: &str = "No answer received.";

/// Observable phase of the engine. `Answered` and `Failed` are transient and
/// reported through `SubmitOutcome` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationPhase {
    Idle,
    Sending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyInput,
    Busy,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "The question is empty"),
            Self::Busy => write!(f, "Another request is still in progress"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing was appended and no request was made
    Ignored(IgnoreReason),
    Answered(Message),
    Failed(Message),
}

impl SubmitOutcome {
    /// The assistant message appended by this submission, if any.
    pub fn reply(&self) -> Option<&Message> {
        match self {
            Self::Ignored(_) => None,
            Self::Answered(message) | Self::Failed(message) => Some(message),
        }
    }
}

/// Builds the assistant reply from a successful response.
pub fn answer_message(response: AskResponse) -> Message {
    let content = response.answer.unwrap_or_else(|| NO_ANSWER.to_string());
    Message::assistant(content).with_citations(response.citations.unwrap_or_default())
}

pub fn failure_message(backend_url: &str) -> Message {
    Message::assistant(format!(
        "Error: Could not connect to the RAG backend. Is it running on {backend_url}?"
    ))
}

pub fn reply_message(result: Result<AskResponse>, backend_url: &str) -> SubmitOutcome {
    match result {
        Ok(response) => SubmitOutcome::Answered(answer_message(response)),
        Err(e) => {
            tracing::warn!("[ConversationEngine] Ask failed: {}", e);
            SubmitOutcome::Failed(failure_message(backend_url))
        }
    }
}

pub struct ConversationEngine {
    gateway: Arc<dyn BackendGateway>,
    gate: BusyGate,
    backend_url: String,
}

impl ConversationEngine {
    pub fn new(gateway: Arc<dyn BackendGateway>, backend_url: impl Into<String>) -> Self {
        Self {
            gateway,
            gate: BusyGate::new(),
            backend_url: backend_url.into(),
        }
    }

    pub fn phase(&self) -> ConversationPhase {
        if self.gate.is_busy() {
            ConversationPhase::Sending
        } else {
            ConversationPhase::Idle
        }
    }

    /// Runs one round-trip: the question is appended before the request and
    /// exactly one reply after it.
    pub async fn submit(&self, state: &RwLock<SessionState>, question: &str) -> SubmitOutcome {
        if question.trim().is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::EmptyInput);
        }
        let Some(_guard) = self.gate.try_acquire() else {
            tracing::debug!("[ConversationEngine] Question already in flight, ignoring");
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        };

        state.write().await.transcript.append_user_question(question);
        tracing::debug!("[ConversationEngine] Asking ({} chars)", question.len());

        let outcome = reply_message(self.gateway.ask(question).await, &self.backend_url);
        if let Some(reply) = outcome.reply() {
            state.write().await.transcript.append_assistant(reply.clone());
        }
        outcome
    }
}

//! Question submission lifecycle.

use std::sync::Arc;

use shared::{
    domain::{FailureKind, Message},
    error::ValidationError,
    protocol::ChatRequest,
};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    error::{ClientError, Operation},
    input::{InputBuffer, KeyAction, KeyPress},
    session::SessionStore,
    transport::RagService,
};

pub const SERVER_ERROR_TEXT: &str = "Error from server.";
pub const NETWORK_ERROR_TEXT: &str = "Network error.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Answered { message_index: usize },
    Failed { kind: FailureKind, message_index: usize },
}

#[derive(Clone)]
pub struct ChatController {
    service: Arc<dyn RagService>,
    session: Arc<SessionStore>,
    draft: Arc<Mutex<InputBuffer>>,
}

impl ChatController {
    pub fn new(service: Arc<dyn RagService>, session: Arc<SessionStore>) -> Self {
        Self {
            service,
            session,
            draft: Arc::new(Mutex::new(InputBuffer::default())),
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub async fn draft(&self) -> String {
        self.draft.lock().await.text().to_string()
    }

    pub async fn set_draft(&self, text: impl Into<String>) {
        self.draft.lock().await.set_text(text);
    }

    /// Whether the send affordance is enabled.
    pub async fn can_submit(&self) -> bool {
        let has_text = !self.draft.lock().await.trimmed().is_empty();
        has_text && !self.session.is_pending().await
    }

    /// Edits the draft. An allowed plain Enter empties the draft and hands
    /// its text back in [`KeyAction::Submit`]; pass that to
    /// [`ChatController::submit_question`]. Enter on a blank draft or while an
    /// answer is pending is [`KeyAction::Ignored`] and leaves the draft as is.
    pub async fn handle_key(&self, press: KeyPress) -> KeyAction {
        let mut draft = self.draft.lock().await;
        match draft.apply(press) {
            KeyAction::Submit(text) if text.is_empty() => KeyAction::Ignored,
            KeyAction::Submit(_) if self.session.is_pending().await => KeyAction::Ignored,
            KeyAction::Submit(text) => {
                draft.clear();
                KeyAction::Submit(text)
            }
            other => other,
        }
    }

    pub async fn submit_draft(&self) -> Result<TurnOutcome, ClientError> {
        let text = self.draft().await;
        self.submit_question(&text).await
    }

    /// Runs one question/answer turn. The user message is appended before the
    /// request goes out; exactly one bot message follows when it resolves.
    pub async fn submit_question(&self, text: &str) -> Result<TurnOutcome, ClientError> {
        Ok(self.begin_question(text).await?.resolve().await)
    }

    /// Claims the pending slot and appends the user message without waiting
    /// for the answer. Callers that claim in input order keep turns in order.
    pub async fn begin_question(&self, text: &str) -> Result<PendingQuestion, ClientError> {
        let question = text.trim();
        if question.is_empty() {
            return Err(ValidationError::EmptyQuestion.into());
        }
        if self.session.set_pending(true).await {
            return Err(ClientError::Busy(Operation::Question));
        }

        self.session.append_message(Message::user(question)).await;
        self.draft.lock().await.clear();
        info!(chars = question.len(), "submitting question");
        Ok(PendingQuestion {
            service: Arc::clone(&self.service),
            session: Arc::clone(&self.session),
            question: question.to_string(),
        })
    }
}

/// A question whose user message is already in the log. Resolving it appends
/// the bot message and releases the pending slot.
#[must_use = "the pending flag stays set until the question is resolved"]
pub struct PendingQuestion {
    service: Arc<dyn RagService>,
    session: Arc<SessionStore>,
    question: String,
}

impl PendingQuestion {
    pub fn question(&self) -> &str {
        &self.question
    }

    pub async fn resolve(self) -> TurnOutcome {
        let result = self.service.ask(ChatRequest::new(self.question)).await;
        let outcome = match result {
            Ok(response) => {
                let (answer, sources) = response.into_sources();
                info!(sources = sources.len(), "answer received");
                let message_index = self
                    .session
                    .append_message(Message::bot(answer, sources))
                    .await;
                TurnOutcome::Answered { message_index }
            }
            Err(err) => {
                warn!(error = %err, "question failed");
                let kind = err.kind();
                let text = match kind {
                    FailureKind::Service => SERVER_ERROR_TEXT,
                    FailureKind::Transport => NETWORK_ERROR_TEXT,
                };
                let message_index = self
                    .session
                    .append_message(Message::bot(text, Vec::new()))
                    .await;
                TurnOutcome::Failed {
                    kind,
                    message_index,
                }
            }
        };

        self.session.set_pending(false).await;
        outcome
    }
}

#[cfg(test)]
#[path = "tests/chat_tests.rs"]
mod tests;

//! Ordered conversation log and the pending-answer flag.

use std::sync::Arc;

use shared::domain::{Message, Origin};
use tokio::sync::{broadcast, Mutex};

const SESSION_EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    MessageAppended { index: usize, origin: Origin },
    PendingChanged(bool),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Session {
    messages: Vec<Message>,
    pending_answer: bool,
}

impl Session {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn pending_answer(&self) -> bool {
        self.pending_answer
    }
}

pub struct SessionStore {
    inner: Mutex<Session>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    pub fn new() -> Arc<Self> {
        Self::with_event_capacity(SESSION_EVENT_CAPACITY)
    }

    /// Subscribers that fall more than `capacity` events behind see a lag.
    pub fn with_event_capacity(capacity: usize) -> Arc<Self> {
        let (events, _) = broadcast::channel(capacity);
        Arc::new(Self {
            inner: Mutex::new(Session::default()),
            events,
        })
    }

    /// Appends to the end of the log and returns the new message's index.
    pub async fn append_message(&self, message: Message) -> usize {
        let mut guard = self.inner.lock().await;
        let origin = message.origin;
        guard.messages.push(message);
        let index = guard.messages.len() - 1;
        let _ = self
            .events
            .send(SessionEvent::MessageAppended { index, origin });
        index
    }

    /// Stores the flag and returns its previous value.
    pub async fn set_pending(&self, pending: bool) -> bool {
        let mut guard = self.inner.lock().await;
        let previous = std::mem::replace(&mut guard.pending_answer, pending);
        if previous != pending {
            let _ = self.events.send(SessionEvent::PendingChanged(pending));
        }
        previous
    }

    pub async fn is_pending(&self) -> bool {
        self.inner.lock().await.pending_answer
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.inner.lock().await.messages.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.messages.len()
    }

    pub async fn snapshot(&self) -> Session {
        self.inner.lock().await.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;

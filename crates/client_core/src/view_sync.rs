//! Keeps the rendered conversation scrolled to the newest message.

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};
use tracing::debug;

use crate::session::{SessionEvent, SessionStore};

#[async_trait]
pub trait Viewport: Send + Sync {
    async fn scroll_to_latest(&self, message_count: usize);
}

pub struct ViewSync;

impl ViewSync {
    /// Runs until the session store is dropped.
    pub fn spawn(session: &Arc<SessionStore>, viewport: Arc<dyn Viewport>) -> JoinHandle<()> {
        let mut events = session.subscribe();
        let session: Weak<SessionStore> = Arc::downgrade(session);
        tokio::spawn(async move {
            // Retained events older than a lag catch-up must not scroll back.
            let mut shown = 0;
            loop {
                let count = match events.recv().await {
                    Ok(SessionEvent::MessageAppended { index, .. }) => index + 1,
                    Ok(SessionEvent::PendingChanged(_)) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "view sync lagged behind session events");
                        let Some(session) = session.upgrade() else {
                            break;
                        };
                        session.len().await
                    }
                    Err(RecvError::Closed) => break,
                };
                if count > shown {
                    viewport.scroll_to_latest(count).await;
                    shown = count;
                }
            }
        })
    }
}

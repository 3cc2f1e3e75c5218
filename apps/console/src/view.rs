//! Plain-text rendering of the conversation and upload surface.

use std::sync::Arc;

use async_trait::async_trait;
use client_core::{SessionStore, UploadEvent, Viewport};
use shared::domain::{Message, Origin, UploadPhase};
use tokio::sync::Mutex;

pub fn render_message(message: &Message) -> String {
    let speaker = match message.origin {
        Origin::User => "You",
        Origin::Bot => "Bot",
    };
    let mut out = format!("{speaker}: {}", message.text);
    if !message.sources.is_empty() {
        out.push_str("\n  Sources:");
        for source in &message.sources {
            out.push_str(&format!(
                "\n  📄 {} (Page {})",
                source.document_name, source.page
            ));
            if let Some(excerpt) = &source.excerpt {
                out.push_str(&format!("\n     {excerpt}"));
            }
        }
    }
    out
}

pub fn render_upload_event(event: &UploadEvent) -> Option<String> {
    match event {
        UploadEvent::ModalOpened => Some("[upload] select a PDF with /select <path>".into()),
        UploadEvent::PhaseChanged(UploadPhase::Selected) => {
            Some("[upload] document selected, /upload to index it".into())
        }
        UploadEvent::PhaseChanged(phase) => phase.status_line().map(|s| format!("[upload] {s}")),
        UploadEvent::Rejected(err) => Some(format!("[upload] {err}")),
        UploadEvent::ModalClosed { .. } => Some("[upload] closed".into()),
    }
}

/// Prints every message it has not printed yet; scrolling a terminal is
/// just writing the tail of the log.
pub struct TerminalView {
    session: Arc<SessionStore>,
    rendered: Mutex<usize>,
}

impl TerminalView {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            rendered: Mutex::new(0),
        }
    }
}

#[async_trait]
impl Viewport for TerminalView {
    async fn scroll_to_latest(&self, message_count: usize) {
        let mut rendered = self.rendered.lock().await;
        if *rendered >= message_count {
            return;
        }
        let messages = self.session.messages().await;
        for message in messages.iter().take(message_count).skip(*rendered) {
            println!("{}\n", render_message(message));
        }
        *rendered = message_count.min(messages.len()).max(*rendered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::{FailureKind, Source};

    #[test]
    fn bot_message_lists_sources_with_excerpts() {
        let message = Message::bot(
            "X is Y",
            vec![
                Source {
                    document_name: "a.pdf".into(),
                    page: 3,
                    excerpt: None,
                },
                Source {
                    document_name: "b.pdf".into(),
                    page: 1,
                    excerpt: Some("preview".into()),
                },
            ],
        );
        assert_eq!(
            render_message(&message),
            "Bot: X is Y\n  Sources:\n  📄 a.pdf (Page 3)\n  📄 b.pdf (Page 1)\n     preview"
        );
    }

    #[test]
    fn user_message_is_a_single_line() {
        assert_eq!(render_message(&Message::user("hi")), "You: hi");
    }

    #[test]
    fn upload_events_render_status_lines() {
        assert_eq!(
            render_upload_event(&UploadEvent::PhaseChanged(UploadPhase::Succeeded(12))).as_deref(),
            Some("[upload] ✓ Indexed 12 chunks")
        );
        assert_eq!(
            render_upload_event(&UploadEvent::PhaseChanged(UploadPhase::Failed(
                FailureKind::Transport
            )))
            .as_deref(),
            Some("[upload] Error uploading.")
        );
        assert_eq!(
            render_upload_event(&UploadEvent::PhaseChanged(UploadPhase::Idle)),
            None
        );
    }

    #[tokio::test]
    async fn terminal_view_tracks_rendered_tail() {
        let session = SessionStore::new();
        let view = TerminalView::new(session.clone());
        session.append_message(Message::user("q")).await;
        view.scroll_to_latest(1).await;
        view.scroll_to_latest(1).await;
        assert_eq!(*view.rendered.lock().await, 1);

        session.append_message(Message::bot("a", Vec::new())).await;
        view.scroll_to_latest(2).await;
        assert_eq!(*view.rendered.lock().await, 2);
    }
}

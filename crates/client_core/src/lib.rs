use std::{path::Path, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use shared::domain::DocumentUpload;

pub mod chat;
pub mod error;
pub mod input;
pub mod session;
pub mod transport;
pub mod upload;
pub mod view_sync;

pub use chat::{
    ChatController, PendingQuestion, TurnOutcome, NETWORK_ERROR_TEXT, SERVER_ERROR_TEXT,
};
pub use error::{ClientError, Operation};
pub use input::{Key, KeyAction, KeyPress, Modifiers};
pub use session::{Session, SessionEvent, SessionStore};
pub use transport::{HttpRagService, RagService, DEFAULT_API_BASE};
pub use upload::{
    UploadController, UploadEvent, UploadOutcome, UploadState, DEFAULT_AUTO_CLOSE_DELAY,
};
pub use view_sync::{ViewSync, Viewport};

/// One conversation plus the upload surface, sharing a single service.
#[derive(Clone)]
pub struct ResearchClient {
    pub session: Arc<SessionStore>,
    pub chat: ChatController,
    pub upload: UploadController,
}

impl ResearchClient {
    pub fn with_service(service: Arc<dyn RagService>, auto_close_delay: Duration) -> Self {
        let session = SessionStore::new();
        Self {
            chat: ChatController::new(Arc::clone(&service), Arc::clone(&session)),
            upload: UploadController::with_auto_close_delay(service, auto_close_delay),
            session,
        }
    }
}

/// Reads a document from disk; the MIME type is guessed from the extension.
pub async fn load_document(path: &Path) -> Result<DocumentUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read document '{}'", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("'{}' has no file name", path.display()))?;
    let document = DocumentUpload::new(filename, bytes);
    Ok(match mime_guess::from_path(path).first() {
        Some(mime) => document.with_mime_type(mime.essence_str()),
        None => document,
    })
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

//! Document upload lifecycle: select, upload, then auto-close or retry.

use std::{sync::Arc, time::Duration};

use shared::{
    domain::{DocumentUpload, FailureKind, UploadPhase},
    error::ValidationError,
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{info, warn};

use crate::{
    error::{ClientError, Operation},
    transport::RagService,
};

pub const DEFAULT_AUTO_CLOSE_DELAY: Duration = Duration::from_secs(2);
const UPLOAD_EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadState {
    pub selected_file: Option<DocumentUpload>,
    pub phase: UploadPhase,
    pub modal_open: bool,
    /// Bumped whenever the surface is opened or closed; completions carrying
    /// an older value are discarded.
    pub generation: u64,
}

impl Default for UploadState {
    fn default() -> Self {
        Self {
            selected_file: None,
            phase: UploadPhase::Idle,
            modal_open: false,
            generation: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    ModalOpened,
    PhaseChanged(UploadPhase),
    Rejected(ValidationError),
    ModalClosed { automatic: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Indexed(u64),
    Failed(FailureKind),
    /// The surface was closed while the request was in flight.
    Discarded,
}

struct UploadInner {
    state: UploadState,
    auto_close: Option<JoinHandle<()>>,
}

#[derive(Clone)]
pub struct UploadController {
    service: Arc<dyn RagService>,
    inner: Arc<Mutex<UploadInner>>,
    events: broadcast::Sender<UploadEvent>,
    auto_close_delay: Duration,
}

impl UploadController {
    pub fn new(service: Arc<dyn RagService>) -> Self {
        Self::with_auto_close_delay(service, DEFAULT_AUTO_CLOSE_DELAY)
    }

    pub fn with_auto_close_delay(service: Arc<dyn RagService>, auto_close_delay: Duration) -> Self {
        let (events, _) = broadcast::channel(UPLOAD_EVENT_CAPACITY);
        Self {
            service,
            inner: Arc::new(Mutex::new(UploadInner {
                state: UploadState::default(),
                auto_close: None,
            })),
            events,
            auto_close_delay,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UploadEvent> {
        self.events.subscribe()
    }

    pub async fn state(&self) -> UploadState {
        self.inner.lock().await.state.clone()
    }

    pub async fn phase(&self) -> UploadPhase {
        self.inner.lock().await.state.phase
    }

    pub async fn status_line(&self) -> Option<String> {
        self.phase().await.status_line()
    }

    /// Whether the submit affordance is enabled.
    pub async fn can_submit(&self) -> bool {
        let guard = self.inner.lock().await;
        guard.state.selected_file.is_some() && !guard.state.phase.is_uploading()
    }

    pub async fn open_modal(&self) {
        let mut guard = self.inner.lock().await;
        if guard.state.modal_open {
            return;
        }
        if let Some(task) = guard.auto_close.take() {
            task.abort();
        }
        let generation = guard.state.generation + 1;
        guard.state = UploadState {
            modal_open: true,
            generation,
            ..UploadState::default()
        };
        let _ = self.events.send(UploadEvent::ModalOpened);
    }

    /// Selecting while an upload is in flight keeps the `Uploading` phase so
    /// a second upload cannot start.
    pub async fn select_file(&self, file: Option<DocumentUpload>) {
        let mut guard = self.inner.lock().await;
        let has_file = file.is_some();
        guard.state.selected_file = file;
        if guard.state.phase.is_uploading() {
            return;
        }
        let phase = if has_file {
            UploadPhase::Selected
        } else {
            UploadPhase::Idle
        };
        guard.state.phase = phase;
        let _ = self.events.send(UploadEvent::PhaseChanged(phase));
    }

    pub async fn submit_upload(&self) -> Result<UploadOutcome, ClientError> {
        let (document, generation) = {
            let mut guard = self.inner.lock().await;
            if guard.state.phase.is_uploading() {
                return Err(ClientError::Busy(Operation::Upload));
            }
            let Some(document) = guard.state.selected_file.clone() else {
                let _ = self
                    .events
                    .send(UploadEvent::Rejected(ValidationError::NoFileSelected));
                return Err(ValidationError::NoFileSelected.into());
            };
            // A re-upload inside the close window must not be cut short.
            if let Some(task) = guard.auto_close.take() {
                task.abort();
            }
            guard.state.phase = UploadPhase::Uploading;
            let _ = self
                .events
                .send(UploadEvent::PhaseChanged(UploadPhase::Uploading));
            (document, guard.state.generation)
        };

        info!(filename = %document.filename, generation, "uploading document");
        let result = self.service.ingest(document).await;

        let mut guard = self.inner.lock().await;
        if guard.state.generation != generation {
            warn!(
                generation,
                current = guard.state.generation,
                "discarding upload completion for a closed surface"
            );
            return Ok(UploadOutcome::Discarded);
        }

        let outcome = match result {
            Ok(response) => {
                info!(chunks = response.chunks_indexed, "document indexed");
                guard.state.phase = UploadPhase::Succeeded(response.chunks_indexed);
                if let Some(task) = guard.auto_close.take() {
                    task.abort();
                }
                guard.auto_close = Some(self.schedule_auto_close(generation));
                UploadOutcome::Indexed(response.chunks_indexed)
            }
            Err(err) => {
                warn!(error = %err, "upload failed");
                guard.state.phase = UploadPhase::Failed(err.kind());
                UploadOutcome::Failed(err.kind())
            }
        };
        let _ = self
            .events
            .send(UploadEvent::PhaseChanged(guard.state.phase));
        Ok(outcome)
    }

    pub async fn close_modal(&self) {
        let mut guard = self.inner.lock().await;
        if let Some(task) = guard.auto_close.take() {
            task.abort();
        }
        let was_open = guard.state.modal_open;
        let generation = guard.state.generation + 1;
        guard.state = UploadState {
            generation,
            ..UploadState::default()
        };
        if was_open {
            let _ = self
                .events
                .send(UploadEvent::ModalClosed { automatic: false });
        }
    }

    fn schedule_auto_close(&self, generation: u64) -> JoinHandle<()> {
        let controller = self.clone();
        let delay = self.auto_close_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            controller.auto_close(generation).await;
        })
    }

    async fn auto_close(&self, generation: u64) {
        let mut guard = self.inner.lock().await;
        if guard.state.generation != generation {
            return;
        }
        guard.auto_close = None;
        guard.state = UploadState {
            generation: generation + 1,
            ..UploadState::default()
        };
        let _ = self
            .events
            .send(UploadEvent::ModalClosed { automatic: true });
    }
}

#[cfg(test)]
#[path = "tests/upload_tests.rs"]
mod tests;

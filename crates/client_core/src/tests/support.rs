use std::collections::VecDeque;

use async_trait::async_trait;
use shared::{
    domain::DocumentUpload,
    error::ServiceError,
    protocol::{ChatRequest, ChatResponse, SourcePayload, UploadResponse},
};
use tokio::sync::{oneshot, Mutex};

use crate::transport::RagService;

pub enum Scripted<T> {
    Ready(Result<T, ServiceError>),
    Gated(oneshot::Receiver<Result<T, ServiceError>>),
}

/// In-memory service that replays queued replies in order.
#[derive(Default)]
pub struct ScriptedService {
    answers: Mutex<VecDeque<Scripted<ChatResponse>>>,
    uploads: Mutex<VecDeque<Scripted<UploadResponse>>>,
    pub questions: Mutex<Vec<String>>,
    pub documents: Mutex<Vec<String>>,
}

impl ScriptedService {
    pub async fn push_answer(&self, reply: Result<ChatResponse, ServiceError>) {
        self.answers.lock().await.push_back(Scripted::Ready(reply));
    }

    pub async fn gate_answer(&self) -> oneshot::Sender<Result<ChatResponse, ServiceError>> {
        let (tx, rx) = oneshot::channel();
        self.answers.lock().await.push_back(Scripted::Gated(rx));
        tx
    }

    pub async fn push_upload(&self, reply: Result<UploadResponse, ServiceError>) {
        self.uploads.lock().await.push_back(Scripted::Ready(reply));
    }

    pub async fn gate_upload(&self) -> oneshot::Sender<Result<UploadResponse, ServiceError>> {
        let (tx, rx) = oneshot::channel();
        self.uploads.lock().await.push_back(Scripted::Gated(rx));
        tx
    }

    pub async fn question_count(&self) -> usize {
        self.questions.lock().await.len()
    }

    pub async fn upload_count(&self) -> usize {
        self.documents.lock().await.len()
    }
}

async fn resolve<T>(next: Option<Scripted<T>>) -> Result<T, ServiceError> {
    match next {
        Some(Scripted::Ready(reply)) => reply,
        Some(Scripted::Gated(rx)) => rx
            .await
            .unwrap_or_else(|_| Err(ServiceError::transport("gate dropped"))),
        None => Err(ServiceError::transport("no scripted reply")),
    }
}

#[async_trait]
impl RagService for ScriptedService {
    async fn ingest(&self, document: DocumentUpload) -> Result<UploadResponse, ServiceError> {
        self.documents.lock().await.push(document.filename);
        let next = self.uploads.lock().await.pop_front();
        resolve(next).await
    }

    async fn ask(&self, request: ChatRequest) -> Result<ChatResponse, ServiceError> {
        self.questions.lock().await.push(request.question);
        let next = self.answers.lock().await.pop_front();
        resolve(next).await
    }
}

pub fn answer(text: &str, sources: &[(&str, u32)]) -> ChatResponse {
    ChatResponse {
        answer: text.to_string(),
        sources: sources
            .iter()
            .map(|(source, page)| SourcePayload {
                source: Some(source.to_string()),
                page: Some(*page),
                content: None,
            })
            .collect(),
    }
}

pub fn indexed(chunks: u64) -> UploadResponse {
    UploadResponse {
        status: Some("ok".to_string()),
        chunks_indexed: chunks,
    }
}

pub fn pdf(name: &str) -> DocumentUpload {
    DocumentUpload::new(name, b"%PDF-1.4 test".to_vec())
}

//! HTTP access to the ingestion and question-answering services.

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::DocumentUpload,
    error::ServiceError,
    protocol::{ChatRequest, ChatResponse, UploadResponse},
};
use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

#[async_trait]
pub trait RagService: Send + Sync {
    async fn ingest(&self, document: DocumentUpload) -> Result<UploadResponse, ServiceError>;
    async fn ask(&self, request: ChatRequest) -> Result<ChatResponse, ServiceError>;
}

pub struct HttpRagService {
    http: Client,
    base_url: String,
}

impl HttpRagService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

#[async_trait]
impl RagService for HttpRagService {
    async fn ingest(&self, document: DocumentUpload) -> Result<UploadResponse, ServiceError> {
        let mime_type = document.mime_type_or_default().to_string();
        let filename = document.filename;
        debug!(filename = %filename, bytes = document.bytes.len(), "posting document");

        let part = Part::bytes(document.bytes)
            .file_name(filename)
            .mime_str(&mime_type)
            .map_err(|e| ServiceError::transport(format!("invalid mime type {mime_type}: {e}")))?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(self.endpoint("uploads"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ServiceError::transport(e.to_string()))?;
        decode_json(response).await
    }

    async fn ask(&self, request: ChatRequest) -> Result<ChatResponse, ServiceError> {
        let response = self
            .http
            .post(self.endpoint("chat"))
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::transport(e.to_string()))?;
        decode_json(response).await
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %body, "service rejected request");
        return Err(ServiceError::status(status.as_u16(), body));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ServiceError::transport(format!("failed to decode response body: {e}")))
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;

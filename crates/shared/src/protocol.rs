use serde::{Deserialize, Serialize};

use crate::domain::Source;

pub const DEFAULT_SESSION_ID: &str = "default";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    #[serde(default = "default_session_id")]
    pub session_id: String,
}

impl ChatRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            session_id: default_session_id(),
        }
    }
}

fn default_session_id() -> String {
    DEFAULT_SESSION_ID.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcePayload {
    #[serde(default)]
    pub source: Option<String>,
    /// Taken from loader metadata; may be absent, and page-based loaders
    /// sometimes count from zero.
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl SourcePayload {
    /// A source without a page number cannot be cited and is dropped. Page 0
    /// is shown as the first page.
    pub fn into_source(self) -> Option<Source> {
        Some(Source {
            document_name: self.source.unwrap_or_default(),
            page: self.page?.max(1),
            excerpt: self.content,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    /// Entries that do not decode are skipped rather than failing the answer.
    #[serde(default, deserialize_with = "lenient_sources")]
    pub sources: Vec<SourcePayload>,
}

impl ChatResponse {
    pub fn into_sources(self) -> (String, Vec<Source>) {
        let sources = self
            .sources
            .into_iter()
            .filter_map(SourcePayload::into_source)
            .collect();
        (self.answer, sources)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub chunks_indexed: u64,
}

fn lenient_sources<'de, D>(deserializer: D) -> Result<Vec<SourcePayload>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect())
}

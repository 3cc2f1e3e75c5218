use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    User,
    Bot,
}

/// Citation returned alongside an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub document_name: String,
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

/// One entry of the conversation log. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub origin: Origin,
    pub text: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::User,
            text: text.into(),
            sources: Vec::new(),
        }
    }

    pub fn bot(text: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            origin: Origin::Bot,
            text: text.into(),
            sources,
        }
    }

    pub fn is_user(&self) -> bool {
        self.origin == Origin::User
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The service answered with a non-2xx status.
    Service,
    /// The request never completed or the body did not decode.
    Transport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Selected,
    Uploading,
    Succeeded(u64),
    Failed(FailureKind),
}

impl UploadPhase {
    pub fn is_uploading(self) -> bool {
        matches!(self, UploadPhase::Uploading)
    }

    pub fn status_line(self) -> Option<String> {
        match self {
            UploadPhase::Idle | UploadPhase::Selected => None,
            UploadPhase::Uploading => Some("Uploading...".to_string()),
            UploadPhase::Succeeded(chunks) => Some(format!("✓ Indexed {chunks} chunks")),
            UploadPhase::Failed(FailureKind::Service) => Some("Upload failed.".to_string()),
            UploadPhase::Failed(FailureKind::Transport) => Some("Error uploading.".to_string()),
        }
    }
}

/// Document picked for ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    pub const DEFAULT_MIME_TYPE: &'static str = "application/pdf";

    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: None,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn mime_type_or_default(&self) -> &str {
        self.mime_type
            .as_deref()
            .unwrap_or(Self::DEFAULT_MIME_TYPE)
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::FailureKind;

/// Local, pre-network rejections. Never reach the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a PDF file first.")]
    NoFileSelected,
    #[error("question must not be empty")]
    EmptyQuestion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

/// Failure reported by one of the remote services.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("service responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ServiceError {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ServiceError::Status { .. } => FailureKind::Service,
            ServiceError::Transport(_) => FailureKind::Transport,
        }
    }

    /// Best-effort `detail` field from a FastAPI-style error body.
    pub fn detail(&self) -> Option<String> {
        let ServiceError::Status { body, .. } = self else {
            return None;
        };
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        match parsed.detail? {
            serde_json::Value::String(text) => Some(text),
            other => Some(other.to_string()),
        }
    }
}

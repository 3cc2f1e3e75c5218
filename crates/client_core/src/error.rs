use std::fmt;

use shared::error::ValidationError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    Question,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Upload => f.write_str("upload"),
            Operation::Question => f.write_str("question"),
        }
    }
}

/// Commands the controllers refuse before any state changes.
///
/// Remote failures are not errors at this level: they resolve into a terminal
/// state transition and are reported through the controllers' outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("another {0} is already in flight")]
    Busy(Operation),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_error_names_the_operation() {
        assert_eq!(
            ClientError::Busy(Operation::Upload).to_string(),
            "another upload is already in flight"
        );
        assert_eq!(
            ClientError::Busy(Operation::Question).to_string(),
            "another question is already in flight"
        );
        assert_eq!(
            ClientError::from(ValidationError::NoFileSelected).to_string(),
            "Please select a PDF file first."
        );
    }
}

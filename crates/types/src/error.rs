use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad category of a failed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A validator rejected the arguments before any action ran.
    Validation,
    /// A name lookup matched nothing.
    NotFound,
    /// A name lookup matched more than one entity.
    Ambiguous,
    /// The request never produced an HTTP response.
    Transport,
    /// The server answered with a non-success status.
    Http,
    /// The server answered successfully with an unexpected body.
    MalformedResponse,
    /// Pagination exceeded the configured page ceiling.
    PageLimit,
    /// The invocation was cancelled or ran past its deadline.
    Cancelled,
}

/// Terminal error of a failed command invocation.
///
/// Carries exactly one display message. Values are constructed whole and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CommandError {
    kind: ErrorKind,
    message: String,
}

impl CommandError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, reason)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        let error = CommandError::new(ErrorKind::Transport, "An error has occurred.");
        assert_eq!(error.to_string(), "An error has occurred.");
        assert_eq!(error.kind(), ErrorKind::Transport);
    }
}

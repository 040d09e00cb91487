//! Failure taxonomy of the resource access layer and its translation into
//! a [`CommandError`].

use graphctl_api::ApiError;
use graphctl_types::{CommandError, ErrorKind};
use graphctl_util::status_error_message;
use serde_json::Value;
use thiserror::Error;

/// Any failure raised while resolving identifiers or fetching collections.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] ApiError),

    /// The server answered with a non-success status. `body` holds the
    /// parsed payload when the response was JSON.
    #[error("Request failed with status code {status}{}", status_hint(*status))]
    Http { status: u16, body: Option<Value> },

    /// The server answered successfully with a body of the wrong shape.
    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Ambiguous { message: String },

    #[error("{value} is not a valid URL: {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("Stopped after {limit} pages while fetching {url}; raise max_pages to retrieve the full collection")]
    PageLimitExceeded { limit: usize, url: String },

    #[error("The operation was cancelled")]
    Cancelled,

    /// An error that was already normalized upstream.
    #[error(transparent)]
    Command(#[from] CommandError),
}

impl GraphError {
    pub fn malformed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound { message: message.into() }
    }

    pub fn ambiguous(message: impl Into<String>) -> Self {
        Self::Ambiguous { message: message.into() }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Http { .. } => ErrorKind::Http,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Ambiguous { .. } => ErrorKind::Ambiguous,
            Self::InvalidUrl { .. } => ErrorKind::Validation,
            Self::PageLimitExceeded { .. } => ErrorKind::PageLimit,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Command(error) => error.kind(),
        }
    }
}

fn status_hint(status: u16) -> String {
    status_error_message(status)
        .map(|hint| format!(": {}", hint))
        .unwrap_or_default()
}

/// Normalize any failure into exactly one [`CommandError`].
///
/// A platform error object carried in an HTTP error body wins: its message
/// is used verbatim. Every other failure uses its display string. Errors
/// that are already a [`CommandError`] pass through untouched.
pub fn translate(error: GraphError) -> CommandError {
    if let GraphError::Command(error) = error {
        return error;
    }
    let kind = error.kind();
    if let GraphError::Http { body: Some(body), .. } = &error
        && let Some(message) = platform_error_message(body)
    {
        return CommandError::new(kind, message);
    }
    CommandError::new(kind, error.to_string())
}

/// Extract the message of a structured platform error body.
///
/// Recognized shapes:
/// - `{"error": {"message": "..."}}` (Graph)
/// - `{"odata.error": {"message": {"value": "..."}}}` (legacy OData v3)
/// - `{"error_description": "..."}` (token endpoint)
pub fn platform_error_message(body: &Value) -> Option<String> {
    let non_empty = |value: &Value| value.as_str().filter(|text| !text.is_empty()).map(str::to_string);

    body.pointer("/error/message")
        .and_then(non_empty)
        .or_else(|| body.get("odata.error").and_then(|odata| odata.pointer("/message/value")).and_then(non_empty))
        .or_else(|| body.get("error_description").and_then(non_empty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transport_failures_keep_their_raw_message() {
        let error = translate(GraphError::Transport(ApiError::network("An error has occurred.")));
        assert_eq!(error.message(), "An error has occurred.");
        assert_eq!(error.kind(), ErrorKind::Transport);
    }

    #[test]
    fn structured_graph_errors_are_used_verbatim() {
        let body = json!({"error": {"code": "Request_ResourceNotFound", "message": "Resource 'x' does not exist."}});
        let error = translate(GraphError::Http {
            status: 404,
            body: Some(body),
        });
        assert_eq!(error.message(), "Resource 'x' does not exist.");
        assert_eq!(error.kind(), ErrorKind::Http);
    }

    #[test]
    fn legacy_odata_errors_are_used_verbatim() {
        let body = json!({"odata.error": {"code": "-1", "message": {"lang": "en-US", "value": "List does not exist."}}});
        let error = translate(GraphError::Http {
            status: 404,
            body: Some(body),
        });
        assert_eq!(error.message(), "List does not exist.");
    }

    #[test]
    fn unstructured_http_errors_fall_back_to_status_text() {
        let error = translate(GraphError::Http {
            status: 500,
            body: Some(json!({"unexpected": true})),
        });
        assert_eq!(error.message(), "Request failed with status code 500");

        let unauthorized = translate(GraphError::Http { status: 401, body: None });
        assert!(unauthorized.message().starts_with("Request failed with status code 401: Unauthorized"));
    }

    #[test]
    fn already_normalized_errors_pass_through() {
        let original = CommandError::new(ErrorKind::NotFound, "The specified group 'x' does not exist.");
        assert_eq!(translate(GraphError::Command(original.clone())), original);
    }

    #[test]
    fn resolution_and_paging_errors_carry_their_kind() {
        assert_eq!(translate(GraphError::not_found("gone")).kind(), ErrorKind::NotFound);
        assert_eq!(translate(GraphError::ambiguous("many")).kind(), ErrorKind::Ambiguous);
        assert_eq!(translate(GraphError::Cancelled).kind(), ErrorKind::Cancelled);
        let limited = translate(GraphError::PageLimitExceeded {
            limit: 3,
            url: "https://graph.microsoft.com/v1.0/groups".into(),
        });
        assert_eq!(limited.kind(), ErrorKind::PageLimit);
        assert!(limited.message().contains("max_pages"));
    }
}

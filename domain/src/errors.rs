//! Error taxonomy shared by every layer.
//!
//! Provider errors carry enough shape to tell a retry-later condition
//! (rate limit, timeout, upstream outage) from a fatal one (bad
//! credentials, rejected request, unreadable response).

use thiserror::Error;

/// Domain-level validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Unknown persona: {0}")]
    UnknownPersona(String),
}

/// A document could not be turned into text.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Could not read document '{file_name}': {reason}")]
pub struct DocumentParseError {
    pub file_name: String,
    pub reason: String,
}

impl DocumentParseError {
    pub fn new(file_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizationError {
    #[error("Stemmer produced an empty stem for '{0}'")]
    EmptyStem(String),
}

/// Failures talking to the chat-completion provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionEndpointError {
    #[error("Authentication rejected by completion provider: {0}")]
    Authentication(String),

    #[error("Rate limited by completion provider: {0}")]
    RateLimited(String),

    #[error("Completion provider unavailable ({status}): {body}")]
    Server { status: u16, body: String },

    #[error("Completion request rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Completion request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
}

impl CompletionEndpointError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited(_) | Self::Server { .. } | Self::Timeout | Self::Network(_)
        )
    }
}

/// Failures talking to the speech synthesis or transcription provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpeechEndpointError {
    #[error("Speech service is not configured")]
    Disabled,

    #[error("Authentication rejected by speech provider: {0}")]
    Authentication(String),

    #[error("Rate limited by speech provider: {0}")]
    RateLimited(String),

    #[error("Speech request rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Speech request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed speech response: {0}")]
    MalformedResponse(String),
}

impl SpeechEndpointError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::Timeout | Self::Network(_))
    }
}

/// Missing or unusable service credentials, detected at startup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CredentialConfigError {
    #[error("Missing required setting {0}")]
    Missing(String),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_retryable_split() {
        assert!(CompletionEndpointError::RateLimited("slow down".into()).is_retryable());
        assert!(CompletionEndpointError::Timeout.is_retryable());
        assert!(CompletionEndpointError::Server {
            status: 503,
            body: String::new()
        }
        .is_retryable());
        assert!(!CompletionEndpointError::Authentication("bad key".into()).is_retryable());
        assert!(!CompletionEndpointError::MalformedResponse("no choices".into()).is_retryable());
    }

    #[test]
    fn test_speech_retryable_split() {
        assert!(SpeechEndpointError::Network("reset".into()).is_retryable());
        assert!(!SpeechEndpointError::Disabled.is_retryable());
    }

    #[test]
    fn test_document_error_display() {
        let err = DocumentParseError::new("carta.pdf", "bad xref");
        assert_eq!(err.to_string(), "Could not read document 'carta.pdf': bad xref");
    }
}

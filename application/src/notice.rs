use domain::{CompletionEndpointError, DocumentParseError, NormalizationError, SpeechEndpointError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Worth retrying later.
    Warning,
    /// Will not fix itself without intervention.
    Error,
}

/// A user-visible message about something that degraded the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn from_completion(err: &CompletionEndpointError) -> Self {
        if err.is_retryable() {
            Self::warning(format!(
                "Error al comunicarse con el modelo de lenguaje: {}. Inténtalo de nuevo más tarde.",
                err
            ))
        } else {
            Self::error(format!("Error al comunicarse con el modelo de lenguaje: {}", err))
        }
    }

    pub fn from_speech(err: &SpeechEndpointError) -> Self {
        if err.is_retryable() {
            Self::warning(format!(
                "No se pudo generar el audio: {}. Inténtalo de nuevo más tarde.",
                err
            ))
        } else {
            Self::error(format!("No se pudo generar el audio: {}", err))
        }
    }

    pub fn from_document(err: &DocumentParseError) -> Self {
        Self::error(format!("{}. Se responderá sin contexto del documento.", err))
    }

    pub fn from_normalization(err: &NormalizationError) -> Self {
        Self::error(format!(
            "No se pudo procesar el texto del documento: {}. Se responderá sin contexto.",
            err
        ))
    }
}

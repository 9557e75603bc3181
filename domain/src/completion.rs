use crate::chat_model::ChatModel;
use crate::document::NormalizedContext;
use crate::errors::{CompletionEndpointError, DomainError};
use crate::session::Role;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Placed between the question and a non-empty context in the user message.
pub const CONTEXT_SEPARATOR: &str = "\n\nContexto: ";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.9;

/// Sampling parameters, always inside `[0.0, 1.0]`.
///
/// Deserialized values go through [`Sampling::new`] as well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSampling")]
pub struct Sampling {
    temperature: f32,
    top_p: f32,
}

impl Sampling {
    pub fn new(temperature: f32, top_p: f32) -> Self {
        Self {
            temperature: clamp_unit(temperature, DEFAULT_TEMPERATURE),
            top_p: clamp_unit(top_p, DEFAULT_TOP_P),
        }
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn top_p(&self) -> f32 {
        self.top_p
    }
}

#[derive(Deserialize)]
struct RawSampling {
    temperature: f32,
    top_p: f32,
}

impl From<RawSampling> for Sampling {
    fn from(raw: RawSampling) -> Self {
        Self::new(raw.temperature, raw.top_p)
    }
}

impl Default for Sampling {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPERATURE, DEFAULT_TOP_P)
    }
}

fn clamp_unit(value: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// One completion call: persona instruction, question and context.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_instruction: String,
    pub model: ChatModel,
    pub question: String,
    pub context: NormalizedContext,
    pub sampling: Sampling,
}

impl CompletionRequest {
    pub fn new(
        system_instruction: impl Into<String>,
        model: ChatModel,
        question: &str,
        context: NormalizedContext,
        sampling: Sampling,
    ) -> Result<Self, DomainError> {
        if question.trim().is_empty() {
            return Err(DomainError::InvalidQuestion(
                "question must not be empty".to_string(),
            ));
        }
        Ok(Self {
            system_instruction: system_instruction.into(),
            model,
            question: question.to_string(),
            context,
            sampling,
        })
    }

    pub fn user_content(&self) -> String {
        if self.context.is_empty() {
            self.question.clone()
        } else {
            format!("{}{}{}", self.question, CONTEXT_SEPARATOR, self.context.as_str())
        }
    }

    /// Always exactly two messages: system first, then user.
    pub fn messages(&self) -> [ChatMessage; 2] {
        [
            ChatMessage {
                role: Role::System,
                content: self.system_instruction.clone(),
            },
            ChatMessage {
                role: Role::User,
                content: self.user_content(),
            },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReply {
    pub text: String,
}

impl CompletionReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A hosted chat-completion endpoint.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionReply, CompletionEndpointError>;
}

//! Core types of the restaurant chat pipeline.
//!
//! Adapters for the hosted completion, speech and document services live in
//! the `infrastructure` crate and implement the traits defined here.

pub mod chat_model;
pub mod completion;
pub mod document;
pub mod errors;
pub mod persona;
pub mod session;
pub mod speech;

pub use chat_model::ChatModel;
pub use completion::{
    ChatMessage, CompletionProvider, CompletionReply, CompletionRequest, Sampling,
};
pub use document::{Document, DocumentKind, NormalizedContext, TextExtractor};
pub use errors::{
    CompletionEndpointError, CredentialConfigError, DocumentParseError, DomainError,
    NormalizationError, SpeechEndpointError,
};
pub use persona::{BotProfile, Persona};
pub use session::{ConversationTurn, Role, Session};
pub use speech::{
    AudioEncoding, SpeechSynthesizer, SynthesizedAudio, Transcriber, Transcript, VoiceGender,
    VoiceSettings,
};

pub mod chat_service;
pub mod notice;

pub use chat_service::{ChatInput, ChatOutcome, ChatService, FALLBACK_REPLY};
pub use notice::{Notice, NoticeLevel};

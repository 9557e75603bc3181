pub mod config;
pub mod document_extractor;
pub mod google_tts;
pub mod http;
pub mod openai_client;
pub mod stopwords_es;
pub mod text_normalizer;
pub mod transcription;

//! Scripted stand-ins for the external services, shared by the
//! integration tests under `tests/`.

use async_trait::async_trait;
use domain::{
    AudioEncoding, CompletionEndpointError, CompletionProvider, CompletionReply,
    CompletionRequest, Document, DocumentParseError, SpeechEndpointError, SpeechSynthesizer,
    SynthesizedAudio, TextExtractor, Transcriber, Transcript,
};
use std::sync::Mutex;

/// Returns the same answer (or error) for every request and keeps a copy
/// of each request it saw.
pub struct FakeCompletion {
    outcome: Result<String, CompletionEndpointError>,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl FakeCompletion {
    pub fn answering(text: &str) -> Self {
        Self {
            outcome: Ok(text.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: CompletionEndpointError) -> Self {
        Self {
            outcome: Err(error),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.seen.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for FakeCompletion {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionReply, CompletionEndpointError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request.clone());
        }
        self.outcome.clone().map(CompletionReply::new)
    }
}

/// Serves fixed page texts regardless of the document bytes.
pub struct FakePages(pub Vec<String>);

impl FakePages {
    pub fn of(pages: &[&str]) -> Self {
        Self(pages.iter().map(|p| p.to_string()).collect())
    }
}

impl TextExtractor for FakePages {
    fn pages(&self, _document: &Document) -> Result<Vec<String>, DocumentParseError> {
        Ok(self.0.clone())
    }
}

/// Rejects every document.
pub struct UnreadableDocuments;

impl TextExtractor for UnreadableDocuments {
    fn pages(&self, document: &Document) -> Result<Vec<String>, DocumentParseError> {
        Err(DocumentParseError::new(&document.file_name, "corrupt file"))
    }
}

pub struct FakeSynthesizer {
    pub fail_with: Option<SpeechEndpointError>,
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SpeechEndpointError> {
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(SynthesizedAudio {
                bytes: text.as_bytes().to_vec(),
                encoding: AudioEncoding::Mp3,
            }),
        }
    }
}

pub struct FakeTranscriber(pub &'static str);

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(
        &self,
        _audio: Vec<u8>,
        _file_name: &str,
    ) -> Result<Transcript, SpeechEndpointError> {
        Ok(Transcript {
            text: self.0.to_string(),
        })
    }
}

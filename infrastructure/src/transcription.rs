use crate::http::{speech_status_error, speech_transport_error};
use crate::openai_client::OpenAiClient;
use async_trait::async_trait;
use domain::{SpeechEndpointError, Transcriber, Transcript};
use reqwest::{multipart, Client};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Speech-to-text through the OpenAI-compatible `/audio/transcriptions` endpoint.
pub struct WhisperTranscriber {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    model: String,
    language: String,
}

impl WhisperTranscriber {
    pub fn new(openai: &OpenAiClient, model: &str) -> Self {
        Self {
            client: openai.http(),
            base_url: openai.base_url().to_string(),
            api_key: openai.api_key().to_string(),
            model: model.to_string(),
            language: "es".to_string(),
        }
    }
}

fn parse_transcript(body: &str) -> Result<Transcript, SpeechEndpointError> {
    let response: TranscriptionResponse = serde_json::from_str(body)
        .map_err(|e| SpeechEndpointError::MalformedResponse(e.to_string()))?;
    Ok(Transcript {
        text: response.text.trim().to_string(),
    })
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
    ) -> Result<Transcript, SpeechEndpointError> {
        let url = format!("{}/audio/transcriptions", self.base_url);
        debug!(bytes = audio.len(), file_name, "uploading audio for transcription");

        let part = multipart::Part::bytes(audio).file_name(file_name.to_string());
        let form = multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("language", self.language.clone());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(speech_transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(speech_transport_error)?;
        if !status.is_success() {
            return Err(speech_status_error(status.as_u16(), body));
        }
        let transcript = parse_transcript(&body)?;
        info!("User question (transcribed): {}", transcript.text);
        Ok(transcript)
    }
}

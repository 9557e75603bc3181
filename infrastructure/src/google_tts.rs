use crate::config::SpeechConfig;
use crate::http::{http_client, speech_status_error, speech_transport_error};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use domain::{
    AudioEncoding, SpeechEndpointError, SpeechSynthesizer, SynthesizedAudio, VoiceGender,
    VoiceSettings,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::types::Result;
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    ssml_gender: VoiceGender,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: AudioEncoding,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

/// Google Cloud Text-to-Speech over its REST API.
pub struct GoogleTts {
    client: Client,
    base_url: String,
    api_key: String,
    voice: VoiceSettings,
}

impl GoogleTts {
    pub fn new(config: &SpeechConfig, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            voice: VoiceSettings {
                language_code: config.language_code.clone(),
                ..VoiceSettings::default()
            },
        })
    }
}

fn build_body<'a>(text: &'a str, voice: &'a VoiceSettings) -> SynthesizeRequest<'a> {
    SynthesizeRequest {
        input: SynthesisInput { text },
        voice: VoiceSelection {
            language_code: &voice.language_code,
            ssml_gender: voice.gender,
        },
        audio_config: AudioConfig {
            audio_encoding: voice.encoding,
        },
    }
}

fn decode_audio(
    body: &str,
    encoding: AudioEncoding,
) -> std::result::Result<SynthesizedAudio, SpeechEndpointError> {
    let response: SynthesizeResponse = serde_json::from_str(body)
        .map_err(|e| SpeechEndpointError::MalformedResponse(e.to_string()))?;
    let bytes = BASE64
        .decode(response.audio_content.as_bytes())
        .map_err(|e| SpeechEndpointError::MalformedResponse(format!("audioContent: {}", e)))?;
    Ok(SynthesizedAudio { bytes, encoding })
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(
        &self,
        text: &str,
    ) -> std::result::Result<SynthesizedAudio, SpeechEndpointError> {
        let url = format!("{}/v1/text:synthesize", self.base_url);
        debug!(chars = text.chars().count(), "requesting speech synthesis");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&build_body(text, &self.voice))
            .send()
            .await
            .map_err(speech_transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(speech_transport_error)?;
        if !status.is_success() {
            return Err(speech_status_error(status.as_u16(), body));
        }
        decode_audio(&body, self.voice.encoding)
    }
}

use crate::errors::SpeechEndpointError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AudioEncoding {
    Mp3,
}

impl AudioEncoding {
    pub fn file_extension(&self) -> &'static str {
        match self {
            AudioEncoding::Mp3 => "mp3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoiceGender {
    Female,
    Male,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSettings {
    pub language_code: String,
    pub gender: VoiceGender,
    pub encoding: AudioEncoding,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            language_code: "es-ES".to_string(),
            gender: VoiceGender::Female,
            encoding: AudioEncoding::Mp3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub bytes: Vec<u8>,
    pub encoding: AudioEncoding,
}

impl SynthesizedAudio {
    pub fn file_extension(&self) -> &'static str {
        self.encoding.file_extension()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SpeechEndpointError>;
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
    ) -> Result<Transcript, SpeechEndpointError>;
}

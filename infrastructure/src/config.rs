use domain::completion::{DEFAULT_TEMPERATURE, DEFAULT_TOP_P};
use domain::{BotProfile, ChatModel, CredentialConfigError, Sampling};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TTS_BASE_URL: &str = "https://texttospeech.googleapis.com";

#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub api_key: String,
    pub base_url: String,
    pub language_code: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub chat_model: ChatModel,
    pub sampling: Sampling,
    pub http_timeout: Duration,
    /// `None` when no TTS credentials are configured.
    pub speech: Option<SpeechConfig>,
    pub transcription_model: String,
    pub voice_input: bool,
    pub audio_output_dir: PathBuf,
    pub assistant_name: String,
    pub business_name: String,
}

impl Config {
    pub fn load() -> Result<Self, CredentialConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, CredentialConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let openai_api_key = get("OPENAI_API_KEY")
            .ok_or_else(|| CredentialConfigError::Missing("OPENAI_API_KEY".into()))?;

        let chat_model = match get("CHAT_MODEL") {
            Some(raw) => raw.parse().map_err(|_| CredentialConfigError::Invalid {
                var: "CHAT_MODEL".into(),
                reason: format!("unknown model '{}'", raw),
            })?,
            None => ChatModel::default(),
        };

        let temperature = parse_or(
            "CHAT_TEMPERATURE",
            get("CHAT_TEMPERATURE"),
            DEFAULT_TEMPERATURE,
        )?;
        let top_p = parse_or("CHAT_TOP_P", get("CHAT_TOP_P"), DEFAULT_TOP_P)?;
        let timeout_secs = parse_or("HTTP_TIMEOUT_SECS", get("HTTP_TIMEOUT_SECS"), 30_u64)?;
        let voice_input = parse_or("VOICE_INPUT", get("VOICE_INPUT"), true)?;

        let speech = get("GOOGLE_TTS_API_KEY").map(|api_key| SpeechConfig {
            api_key,
            base_url: get("GOOGLE_TTS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_TTS_BASE_URL.to_string()),
            language_code: get("TTS_LANGUAGE_CODE").unwrap_or_else(|| "es-ES".to_string()),
        });

        Ok(Self {
            openai_api_key,
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            chat_model,
            sampling: Sampling::new(temperature, top_p),
            http_timeout: Duration::from_secs(timeout_secs),
            speech,
            transcription_model: get("TRANSCRIPTION_MODEL")
                .unwrap_or_else(|| "whisper-1".to_string()),
            voice_input,
            audio_output_dir: get("AUDIO_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("audio_output")),
            assistant_name: get("BOT_ASSISTANT_NAME").unwrap_or_else(|| "Ana".to_string()),
            business_name: get("BOT_BUSINESS_NAME")
                .unwrap_or_else(|| "Sazon Burguer".to_string()),
        })
    }

    pub fn profile(&self) -> BotProfile {
        BotProfile {
            assistant_name: self.assistant_name.clone(),
            business_name: self.business_name.clone(),
            default_model: self.chat_model,
            voice_input: self.voice_input,
            ..BotProfile::sazon_burguer()
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    var: &str,
    raw: Option<String>,
    default: T,
) -> Result<T, CredentialConfigError> {
    match raw {
        Some(value) => value.parse().map_err(|_| CredentialConfigError::Invalid {
            var: var.to_string(),
            reason: format!("cannot parse '{}'", value),
        }),
        None => Ok(default),
    }
}

use application::ChatService;
use clap::Parser;
use infrastructure::config::Config;
use infrastructure::document_extractor::DocumentTextExtractor;
use infrastructure::google_tts::GoogleTts;
use infrastructure::openai_client::OpenAiClient;
use infrastructure::transcription::WhisperTranscriber;
use presentation::cli::{Cli, CliApp};
use shared::telemetry::init_logging;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;
    let profile = config.profile();
    info!("Starting chat assistant for {}", profile.business_name);

    let openai = OpenAiClient::new(
        &config.openai_base_url,
        &config.openai_api_key,
        config.http_timeout,
    )?;
    let mut service = ChatService::new(
        profile,
        Arc::new(DocumentTextExtractor::new()),
        Arc::new(openai.clone()),
    );

    match &config.speech {
        Some(speech) => match GoogleTts::new(speech, config.http_timeout) {
            Ok(tts) => service = service.with_synthesizer(Arc::new(tts)),
            Err(e) => warn!("Speech output disabled: {}", e),
        },
        None => warn!("GOOGLE_TTS_API_KEY not set; speech output disabled"),
    }
    if config.voice_input {
        service = service.with_transcriber(Arc::new(WhisperTranscriber::new(
            &openai,
            &config.transcription_model,
        )));
    }

    let mut app = CliApp::new(service, config.sampling, config.audio_output_dir.clone())?;
    app.run(cli).await
}

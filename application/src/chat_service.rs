use crate::notice::Notice;
use domain::{
    BotProfile, ChatModel, CompletionProvider, CompletionReply, CompletionRequest, Document,
    DomainError, NormalizedContext, Persona, Sampling, Session, SpeechEndpointError,
    SpeechSynthesizer, SynthesizedAudio, TextExtractor, Transcriber, Transcript,
};
use infrastructure::text_normalizer::TextNormalizer;
use shared::telemetry::Telemetry;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Returned in place of a reply whenever the completion provider fails.
pub const FALLBACK_REPLY: &str = "Lo siento, no puedo procesar tu solicitud en este momento.";

/// One visitor submission.
#[derive(Debug, Clone)]
pub struct ChatInput {
    pub question: String,
    pub persona: Persona,
    pub model: ChatModel,
    pub sampling: Sampling,
    pub document: Option<Document>,
    pub speak: bool,
}

#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub reply: CompletionReply,
    pub context: NormalizedContext,
    pub audio: Option<SynthesizedAudio>,
    pub notices: Vec<Notice>,
    /// `false` when `reply` is the fallback apology.
    pub answered: bool,
}

/// Runs extract → normalize → complete → synthesize for one request.
pub struct ChatService {
    profile: BotProfile,
    extractor: Arc<dyn TextExtractor>,
    normalizer: TextNormalizer,
    completion: Arc<dyn CompletionProvider>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    transcriber: Option<Arc<dyn Transcriber>>,
}

impl ChatService {
    pub fn new(
        profile: BotProfile,
        extractor: Arc<dyn TextExtractor>,
        completion: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            profile,
            extractor,
            normalizer: TextNormalizer::spanish(),
            completion,
            synthesizer: None,
            transcriber: None,
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    pub fn profile(&self) -> &BotProfile {
        &self.profile
    }

    pub fn can_speak(&self) -> bool {
        self.synthesizer.is_some()
    }

    pub fn can_listen(&self) -> bool {
        self.profile.voice_input && self.transcriber.is_some()
    }

    /// Answers one question. Only invalid input is an error; provider
    /// failures come back as notices on the outcome.
    pub async fn ask(
        &self,
        session: &mut Session,
        input: ChatInput,
    ) -> Result<ChatOutcome, DomainError> {
        if !self.profile.offers_model(input.model) {
            return Err(DomainError::InvalidModel(input.model.to_string()));
        }
        let mut notices = Vec::new();

        let timer = Telemetry::new();
        let context = self.build_context(input.document.as_ref(), &mut notices);
        info!(
            tokens = context.token_count(),
            elapsed_ms = timer.elapsed_ms() as u64,
            "context ready"
        );

        let request = CompletionRequest::new(
            self.profile.system_instruction(&input.persona),
            input.model,
            input.question.trim(),
            context.clone(),
            input.sampling,
        )?;

        let timer = Telemetry::new();
        let (reply, answered) = match self.completion.complete(&request).await {
            Ok(reply) => (CompletionReply::new(reply.text.trim()), true),
            Err(e) => {
                error!("Completion provider failed: {}", e);
                notices.push(Notice::from_completion(&e));
                (CompletionReply::new(FALLBACK_REPLY), false)
            }
        };
        info!(
            model = %input.model,
            answered,
            elapsed_ms = timer.elapsed_ms() as u64,
            "completion finished"
        );

        session.push_user(&request.question);
        session.push_assistant(&reply.text);

        let audio = if input.speak {
            self.speak(&reply.text, &mut notices).await
        } else {
            None
        };

        Ok(ChatOutcome {
            reply,
            context,
            audio,
            notices,
            answered,
        })
    }

    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
    ) -> Result<Transcript, SpeechEndpointError> {
        if !self.profile.voice_input {
            return Err(SpeechEndpointError::Disabled);
        }
        let transcriber = self.transcriber.as_ref().ok_or(SpeechEndpointError::Disabled)?;
        transcriber.transcribe(audio, file_name).await
    }

    fn build_context(
        &self,
        document: Option<&Document>,
        notices: &mut Vec<Notice>,
    ) -> NormalizedContext {
        let raw = match self.extractor.extract(document) {
            Ok(text) => text,
            Err(e) => {
                warn!("Document extraction failed: {}", e);
                notices.push(Notice::from_document(&e));
                return NormalizedContext::default();
            }
        };
        match self.normalizer.normalize(&raw) {
            Ok(context) => context,
            Err(e) => {
                warn!("Normalization failed: {}", e);
                notices.push(Notice::from_normalization(&e));
                NormalizedContext::default()
            }
        }
    }

    async fn speak(&self, text: &str, notices: &mut Vec<Notice>) -> Option<SynthesizedAudio> {
        let Some(synthesizer) = self.synthesizer.as_ref() else {
            notices.push(Notice::from_speech(&SpeechEndpointError::Disabled));
            return None;
        };
        let timer = Telemetry::new();
        match synthesizer.synthesize(text).await {
            Ok(audio) => {
                info!(
                    bytes = audio.bytes.len(),
                    elapsed_ms = timer.elapsed_ms() as u64,
                    "speech synthesized"
                );
                Some(audio)
            }
            Err(e) => {
                warn!("Speech synthesis failed: {}", e);
                notices.push(Notice::from_speech(&e));
                None
            }
        }
    }
}

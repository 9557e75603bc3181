use application::{ChatInput, ChatService, NoticeLevel, FALLBACK_REPLY};
use domain::completion::CONTEXT_SEPARATOR;
use domain::{
    BotProfile, ChatModel, CompletionEndpointError, Document, Role, Sampling, Session,
    SpeechEndpointError,
};
use infrastructure::document_extractor::DocumentTextExtractor;
use std::sync::Arc;
use tests::{FakeCompletion, FakePages, FakeSynthesizer, FakeTranscriber, UnreadableDocuments};

fn input(question: &str, document: Option<Document>) -> ChatInput {
    let profile = BotProfile::sazon_burguer();
    ChatInput {
        question: question.to_string(),
        persona: profile.personas[0].clone(),
        model: ChatModel::Gpt4,
        sampling: Sampling::default(),
        document,
        speak: false,
    }
}

fn menu() -> Document {
    Document::new("menu.pdf", b"%PDF-1.4".to_vec())
}

#[tokio::test]
async fn question_without_document_is_sent_alone() {
    let provider = Arc::new(FakeCompletion::answering("  Sí, tenemos...  "));
    let service = ChatService::new(
        BotProfile::sazon_burguer(),
        Arc::new(DocumentTextExtractor::new()),
        provider.clone(),
    );
    let mut session = Session::new("visitor");

    let outcome = service
        .ask(&mut session, input("¿Tienen hamburguesas vegetarianas?", None))
        .await
        .unwrap();

    assert!(outcome.answered);
    assert_eq!(outcome.reply.text, "Sí, tenemos...");
    assert!(outcome.context.is_empty());
    assert!(outcome.notices.is_empty());

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].user_content(),
        "¿Tienen hamburguesas vegetarianas?"
    );
}

#[tokio::test]
async fn document_context_is_stemmed_and_appended() {
    let provider = Arc::new(FakeCompletion::answering("Claro"));
    let service = ChatService::new(
        BotProfile::sazon_burguer(),
        Arc::new(FakePages::of(&["Hamburguesa doble"])),
        provider.clone(),
    );
    let mut session = Session::new("visitor");

    let outcome = service
        .ask(&mut session, input("¿Qué hay en el menú?", Some(menu())))
        .await
        .unwrap();

    assert_eq!(outcome.context.as_str(), "hamburgues dobl");
    let requests = provider.requests();
    assert_eq!(
        requests[0].user_content(),
        format!("¿Qué hay en el menú?{}hamburgues dobl", CONTEXT_SEPARATOR)
    );
}

#[tokio::test]
async fn pages_are_joined_before_normalizing() {
    let provider = Arc::new(FakeCompletion::answering("ok"));
    let service = ChatService::new(
        BotProfile::sazon_burguer(),
        Arc::new(FakePages::of(&["\n\nHamburguesa", "\n\ndoble"])),
        provider.clone(),
    );
    let mut session = Session::new("visitor");

    let outcome = service
        .ask(&mut session, input("menú", Some(menu())))
        .await
        .unwrap();

    assert_eq!(outcome.context.as_str(), "hamburgues dobl");
}

#[tokio::test]
async fn every_request_has_exactly_system_then_user() {
    let provider = Arc::new(FakeCompletion::answering("Hola"));
    let profile = BotProfile::sazon_burguer();
    let persona = profile.personas[1].clone();
    let service = ChatService::new(
        profile.clone(),
        Arc::new(FakePages::of(&[])),
        provider.clone(),
    );
    let mut session = Session::new("visitor");

    for question in ["Hola", "¿A qué hora abren?", "Gracias"] {
        let mut chat = input(question, None);
        chat.persona = persona.clone();
        service.ask(&mut session, chat).await.unwrap();
    }

    for request in provider.requests() {
        let messages = request.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, profile.system_instruction(&persona));
        assert!(messages[0].content.contains("Agente Administrativo"));
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, request.question);
    }
    assert_eq!(session.len(), 6);
}

#[tokio::test]
async fn failing_provider_always_yields_fallback() {
    let cases = [
        (CompletionEndpointError::Authentication("bad key".into()), NoticeLevel::Error),
        (CompletionEndpointError::RateLimited("slow down".into()), NoticeLevel::Warning),
        (CompletionEndpointError::Timeout, NoticeLevel::Warning),
        (
            CompletionEndpointError::MalformedResponse("no choices".into()),
            NoticeLevel::Error,
        ),
    ];

    for (error, level) in cases {
        let service = ChatService::new(
            BotProfile::sazon_burguer(),
            Arc::new(FakePages::of(&[])),
            Arc::new(FakeCompletion::failing(error)),
        );
        let mut session = Session::new("visitor");

        let outcome = service.ask(&mut session, input("Hola", None)).await.unwrap();

        assert!(!outcome.answered);
        assert_eq!(outcome.reply.text, FALLBACK_REPLY);
        assert_eq!(outcome.notices.len(), 1);
        assert_eq!(outcome.notices[0].level, level);
    }
}

#[tokio::test]
async fn sampling_reaches_provider_clamped() {
    let provider = Arc::new(FakeCompletion::answering("ok"));
    let service = ChatService::new(
        BotProfile::sazon_burguer(),
        Arc::new(FakePages::of(&[])),
        provider.clone(),
    );
    let mut session = Session::new("visitor");

    let mut chat = input("Hola", None);
    chat.sampling = Sampling::new(0.2, 0.5);
    service.ask(&mut session, chat).await.unwrap();

    let mut chat = input("Hola", None);
    chat.sampling = Sampling::new(3.0, -1.0);
    service.ask(&mut session, chat).await.unwrap();

    let requests = provider.requests();
    assert_eq!(requests[0].sampling.temperature(), 0.2);
    assert_eq!(requests[0].sampling.top_p(), 0.5);
    assert_eq!(requests[1].sampling.temperature(), 1.0);
    assert_eq!(requests[1].sampling.top_p(), 0.0);
}

#[tokio::test]
async fn unreadable_document_degrades_to_empty_context() {
    let provider = Arc::new(FakeCompletion::answering("Respuesta"));
    let service = ChatService::new(
        BotProfile::sazon_burguer(),
        Arc::new(UnreadableDocuments),
        provider.clone(),
    );
    let mut session = Session::new("visitor");

    let outcome = service
        .ask(&mut session, input("Hola", Some(menu())))
        .await
        .unwrap();

    assert!(outcome.answered);
    assert!(outcome.context.is_empty());
    assert_eq!(outcome.notices.len(), 1);
    assert!(outcome.notices[0].message.contains("menu.pdf"));
    assert_eq!(provider.requests()[0].user_content(), "Hola");
}

#[tokio::test]
async fn blank_question_is_rejected_before_calling_provider() {
    let provider = Arc::new(FakeCompletion::answering("nunca"));
    let service = ChatService::new(
        BotProfile::sazon_burguer(),
        Arc::new(FakePages::of(&[])),
        provider.clone(),
    );
    let mut session = Session::new("visitor");

    assert!(service.ask(&mut session, input("   ", None)).await.is_err());
    assert!(provider.requests().is_empty());
    assert!(session.is_empty());
}

#[tokio::test]
async fn spoken_reply_and_speech_failures() {
    let profile = BotProfile::sazon_burguer();
    let speaking = ChatService::new(
        profile.clone(),
        Arc::new(FakePages::of(&[])),
        Arc::new(FakeCompletion::answering("Bienvenido")),
    )
    .with_synthesizer(Arc::new(FakeSynthesizer { fail_with: None }));
    let mut session = Session::new("visitor");

    let mut chat = input("Hola", None);
    chat.speak = true;
    let outcome = speaking.ask(&mut session, chat.clone()).await.unwrap();
    let audio = outcome.audio.unwrap();
    assert_eq!(audio.bytes, b"Bienvenido".to_vec());
    assert_eq!(audio.file_extension(), "mp3");

    let broken = ChatService::new(
        profile,
        Arc::new(FakePages::of(&[])),
        Arc::new(FakeCompletion::answering("Bienvenido")),
    )
    .with_synthesizer(Arc::new(FakeSynthesizer {
        fail_with: Some(SpeechEndpointError::Authentication("bad key".into())),
    }));
    let outcome = broken.ask(&mut session, chat).await.unwrap();
    assert!(outcome.answered);
    assert!(outcome.audio.is_none());
    assert_eq!(outcome.notices[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn session_clear_starts_over() {
    let service = ChatService::new(
        BotProfile::sazon_burguer(),
        Arc::new(FakePages::of(&[])),
        Arc::new(FakeCompletion::answering("Hola")),
    );
    let mut session = Session::new("visitor");

    service.ask(&mut session, input("Hola", None)).await.unwrap();
    assert_eq!(session.exchanges(), vec![("Hola", Some("Hola"))]);

    session.clear();
    assert!(session.is_empty());
}

#[tokio::test]
async fn transcription_respects_voice_input_flag() {
    let listening = ChatService::new(
        BotProfile::sazon_burguer(),
        Arc::new(FakePages::of(&[])),
        Arc::new(FakeCompletion::answering("ok")),
    )
    .with_transcriber(Arc::new(FakeTranscriber("¿Tienen postres?")));
    assert!(listening.can_listen());
    let transcript = listening
        .transcribe(vec![0u8; 16], "pregunta.wav")
        .await
        .unwrap();
    assert_eq!(transcript.text, "¿Tienen postres?");

    let profile = BotProfile {
        voice_input: false,
        ..BotProfile::sazon_burguer()
    };
    let muted = ChatService::new(
        profile,
        Arc::new(FakePages::of(&[])),
        Arc::new(FakeCompletion::answering("ok")),
    )
    .with_transcriber(Arc::new(FakeTranscriber("ignorado")));
    assert!(!muted.can_listen());
    assert_eq!(
        muted.transcribe(vec![0u8; 16], "pregunta.wav").await.unwrap_err(),
        SpeechEndpointError::Disabled
    );
}

#[tokio::test]
async fn plain_text_menu_drops_hyphenated_compounds() {
    let provider = Arc::new(FakeCompletion::answering("ok"));
    let service = ChatService::new(
        BotProfile::sazon_burguer(),
        Arc::new(DocumentTextExtractor::new()),
        provider.clone(),
    );
    let mut session = Session::new("visitor");
    let menu = Document::new(
        "carta.txt",
        "\n  Hamburguesa auto-servicio doble \n".as_bytes().to_vec(),
    );

    let outcome = service
        .ask(&mut session, input("¿Qué ofrecen?", Some(menu)))
        .await
        .unwrap();

    assert_eq!(outcome.context.as_str(), "hamburgues dobl");
}

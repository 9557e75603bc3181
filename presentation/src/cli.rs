use application::{ChatInput, ChatOutcome, ChatService, Notice, NoticeLevel};
use chrono::Utc;
use clap::{ArgAction, Parser};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input};
use domain::{ChatModel, Document, DocumentKind, Persona, Sampling, Session, SynthesizedAudio};
use infrastructure::document_extractor::load_document;
use shared::confirmation::ask_confirmation;
use shared::types::Result;
use shared::utils::is_supported_audio;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "sazon_chat")]
#[command(about = "Customer-service chat assistant for a restaurant, backed by a hosted LLM")]
pub struct Cli {
    /// Enter interactive chat mode
    #[arg(long)]
    pub chat: bool,

    /// Persona to answer as (1-based index or label)
    #[arg(long)]
    pub persona: Option<String>,

    /// Completion model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature, clamped to 0.0..=1.0
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Nucleus sampling, clamped to 0.0..=1.0
    #[arg(long = "top-p")]
    pub top_p: Option<f32>,

    /// Document (PDF, DOCX or text) used as context
    #[arg(long)]
    pub document: Option<PathBuf>,

    /// Read the answer aloud (writes an MP3 file)
    #[arg(long)]
    pub speak: bool,

    /// Recorded audio file to transcribe as the question
    #[arg(long = "audio-in")]
    pub audio_in: Option<PathBuf>,

    /// Directory for synthesized audio
    #[arg(long = "out-dir")]
    pub out_dir: Option<PathBuf>,

    /// Print the available models and personas, then exit
    #[arg(long)]
    pub list_models: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// The question to ask
    #[arg(trailing_var_arg = true)]
    pub args: Vec<String>,
}

/// A line typed at the chat prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Empty,
    Exit,
    Help,
    Clear,
    History,
    Persona(String),
    Model(String),
    Document(Option<String>),
    Speak(bool),
    Audio(String),
    Unknown(String),
    Ask(String),
}

pub fn parse_command(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        return ReplCommand::Exit;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return ReplCommand::Ask(line.to_string());
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    let name = name.to_lowercase();
    match (name.as_str(), arg) {
        ("exit" | "quit", _) => ReplCommand::Exit,
        ("help", _) => ReplCommand::Help,
        ("clear", _) => ReplCommand::Clear,
        ("history", _) => ReplCommand::History,
        ("persona", a) if !a.is_empty() => ReplCommand::Persona(a.to_string()),
        ("model", a) if !a.is_empty() => ReplCommand::Model(a.to_string()),
        ("doc", "") => ReplCommand::Document(None),
        ("doc", a) => ReplCommand::Document(Some(a.to_string())),
        ("speak", a) if a.eq_ignore_ascii_case("on") => ReplCommand::Speak(true),
        ("speak", a) if a.eq_ignore_ascii_case("off") => ReplCommand::Speak(false),
        ("audio", a) if !a.is_empty() => ReplCommand::Audio(a.to_string()),
        _ => ReplCommand::Unknown(line.to_string()),
    }
}

pub fn audio_file_name(audio: &SynthesizedAudio, stamp: &str) -> String {
    format!("respuesta-{}.{}", stamp, audio.file_extension())
}

const HELP: &str = "\
Comandos:
  /persona <n|nombre>   cambia el agente
  /model <id>           cambia el modelo
  /doc <ruta>           usa un documento como contexto (/doc sin ruta lo quita)
  /speak on|off         activa o desactiva la respuesta en audio
  /audio <ruta>         transcribe un audio y lo envía como pregunta
  /history              muestra el historial
  /clear                borra el historial
  exit | quit           salir";

pub struct CliApp {
    service: ChatService,
    session: Session,
    persona: Persona,
    model: ChatModel,
    sampling: Sampling,
    speak: bool,
    document_path: Option<PathBuf>,
    out_dir: PathBuf,
}

impl CliApp {
    pub fn new(service: ChatService, sampling: Sampling, out_dir: PathBuf) -> Result<Self> {
        let profile = service.profile();
        let persona = profile
            .default_persona()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("profile has no personas configured"))?;
        let model = profile.default_model;
        let session_id = format!("cli-{}", Utc::now().format("%Y%m%d%H%M%S"));
        Ok(Self {
            service,
            session: Session::new(session_id),
            persona,
            model,
            sampling,
            speak: false,
            document_path: None,
            out_dir,
        })
    }

    pub async fn run(&mut self, cli: Cli) -> Result<()> {
        if cli.list_models {
            self.print_catalog();
            return Ok(());
        }
        self.apply_flags(&cli)?;

        if cli.chat {
            return self.handle_chat().await;
        }

        let question = match &cli.audio_in {
            Some(path) => match self.transcribe_file(path).await {
                Some(text) => text,
                None => return Ok(()),
            },
            None => cli.args.join(" "),
        };
        if question.trim().is_empty() {
            anyhow::bail!("A question is required. Use --chat for interactive mode.");
        }
        self.handle_query(&question).await;
        Ok(())
    }

    fn apply_flags(&mut self, cli: &Cli) -> Result<()> {
        if let Some(selector) = &cli.persona {
            self.persona = self.service.profile().persona(selector)?.clone();
        }
        if let Some(id) = &cli.model {
            self.set_model(id)?;
        }
        if cli.temperature.is_some() || cli.top_p.is_some() {
            self.sampling = Sampling::new(
                cli.temperature.unwrap_or(self.sampling.temperature()),
                cli.top_p.unwrap_or(self.sampling.top_p()),
            );
        }
        if let Some(dir) = &cli.out_dir {
            self.out_dir = dir.clone();
        }
        self.document_path = cli.document.clone();
        self.speak = cli.speak;
        Ok(())
    }

    fn set_model(&mut self, id: &str) -> Result<()> {
        let model: ChatModel = id.parse()?;
        if !self.service.profile().offers_model(model) {
            anyhow::bail!("Model {} is not offered by this assistant", model);
        }
        self.model = model;
        Ok(())
    }

    fn print_catalog(&self) {
        let profile = self.service.profile();
        println!("{}", "Modelos:".green().bold());
        for model in &profile.models {
            let marker = if *model == profile.default_model { "*" } else { " " };
            println!("  {} {}", marker, model);
        }
        println!("{}", "Agentes:".green().bold());
        for (i, persona) in profile.personas.iter().enumerate() {
            println!("  {} {}", format!("[{}]", i + 1).blue(), persona.label);
        }
    }

    fn print_banner(&self) {
        let profile = self.service.profile();
        println!(
            "{}",
            format!("🤖 RESTAURANTE {}", profile.business_name.to_uppercase()).bold()
        );
        println!("{}", profile.tagline.green());
        println!(
            "Agente: {} | Modelo: {} | Temperatura: {:.1} | Top P: {:.1}",
            self.persona.label,
            self.model,
            self.sampling.temperature(),
            self.sampling.top_p()
        );
        if !self.service.can_speak() {
            println!("{}", "Respuesta en audio no disponible.".yellow());
        }
        println!("Escribe /help para ver los comandos. 'exit' para salir.");
    }

    async fn handle_chat(&mut self) -> Result<()> {
        self.print_banner();
        loop {
            let line: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Tú")
                .allow_empty(true)
                .interact_text()?;
            match parse_command(&line) {
                ReplCommand::Empty => continue,
                ReplCommand::Exit => break,
                ReplCommand::Help => println!("{}", HELP),
                ReplCommand::Clear => {
                    if ask_confirmation("¿Borrar el historial de conversaciones?", false)? {
                        self.session.clear();
                        println!("{}", "Historial borrado.".green());
                    }
                }
                ReplCommand::History => self.print_history(),
                ReplCommand::Persona(selector) => match self.service.profile().persona(&selector) {
                    Ok(persona) => {
                        self.persona = persona.clone();
                        println!("Agente: {}", self.persona.label.green());
                    }
                    Err(e) => println!("{}", e.to_string().red()),
                },
                ReplCommand::Model(id) => match self.set_model(&id) {
                    Ok(()) => println!("Modelo: {}", self.model.to_string().green()),
                    Err(e) => println!("{}", e.to_string().red()),
                },
                ReplCommand::Document(path) => self.set_document(path.map(PathBuf::from)),
                ReplCommand::Speak(on) => {
                    self.speak = on;
                    if on && !self.service.can_speak() {
                        println!("{}", "Respuesta en audio no disponible.".yellow());
                    }
                }
                ReplCommand::Audio(path) => {
                    if let Some(question) = self.transcribe_file(Path::new(&path)).await {
                        println!("{} {}", "Pregunta:".blue(), question);
                        self.handle_query(&question).await;
                    }
                }
                ReplCommand::Unknown(cmd) => {
                    println!("{}", format!("Comando desconocido: {}", cmd).yellow())
                }
                ReplCommand::Ask(question) => self.handle_query(&question).await,
            }
        }
        Ok(())
    }

    /// Same rules as `--document`: PDF and DOCX by extension, anything else
    /// is read as plain text when the question is asked.
    fn set_document(&mut self, path: Option<PathBuf>) {
        match path {
            Some(p) => {
                let kind = DocumentKind::from_file_name(&p.to_string_lossy());
                println!("Documento: {} ({:?})", p.display().to_string().green(), kind);
                self.document_path = Some(p);
            }
            None => {
                self.document_path = None;
                println!("Documento quitado.");
            }
        }
    }

    fn print_history(&self) {
        let exchanges = self.session.exchanges();
        if exchanges.is_empty() {
            println!("{}", "Sin conversaciones todavía.".yellow());
            return;
        }
        for (i, (question, answer)) in exchanges.iter().enumerate() {
            println!("{} {}", format!("Conversación {}:", i + 1).blue().bold(), question);
            if let Some(answer) = answer {
                println!("  {}", answer);
            }
        }
    }

    /// Loads the current document fresh for each request; it is dropped after use.
    fn load_current_document(&self) -> Option<Document> {
        let path = self.document_path.as_ref()?;
        match load_document(path) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                print_notice(&Notice::error(format!(
                    "No se pudo abrir el documento {}: {}. Se responderá sin contexto.",
                    path.display(),
                    e
                )));
                None
            }
        }
    }

    async fn transcribe_file(&self, path: &Path) -> Option<String> {
        if !is_supported_audio(path) {
            print_notice(&Notice::error(format!(
                "Formato de audio no soportado: {}",
                path.display()
            )));
            return None;
        }
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                print_notice(&Notice::error(format!(
                    "No se pudo leer el audio {}: {}",
                    path.display(),
                    e
                )));
                return None;
            }
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_string());
        match self.service.transcribe(bytes, &name).await {
            Ok(t) if t.text.is_empty() => {
                print_notice(&Notice::warning("No se detectó voz en el audio."));
                None
            }
            Ok(t) => Some(t.text),
            Err(e) => {
                print_notice(&Notice::from_speech(&e));
                None
            }
        }
    }

    async fn handle_query(&mut self, question: &str) {
        let input = ChatInput {
            question: question.to_string(),
            persona: self.persona.clone(),
            model: self.model,
            sampling: self.sampling,
            document: self.load_current_document(),
            speak: self.speak,
        };
        eprintln!("Pensando...");
        match self.service.ask(&mut self.session, input).await {
            Ok(outcome) => self.present(&outcome),
            Err(e) => println!("{}", e.to_string().red()),
        }
    }

    fn present(&self, outcome: &ChatOutcome) {
        for notice in &outcome.notices {
            print_notice(notice);
        }
        let name = &self.service.profile().assistant_name;
        println!("{} {}", format!("{}:", name).green().bold(), outcome.reply.text);

        if let Some(audio) = &outcome.audio {
            match self.save_audio(audio) {
                Ok(path) => println!("{} {}", "Audio:".blue(), path.display()),
                Err(e) => print_notice(&Notice::error(format!(
                    "No se pudo guardar el audio: {}",
                    e
                ))),
            }
        }
    }

    fn save_audio(&self, audio: &SynthesizedAudio) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.out_dir)?;
        let stamp = Utc::now().format("%Y%m%d-%H%M%S%3f").to_string();
        let path = self.out_dir.join(audio_file_name(audio, &stamp));
        std::fs::write(&path, &audio.bytes)?;
        info!("Saved {} bytes of audio to {}", audio.bytes.len(), path.display());
        Ok(path)
    }
}

fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Warning => eprintln!("{}", notice.message.yellow()),
        NoticeLevel::Error => eprintln!("{}", notice.message.red()),
    }
}

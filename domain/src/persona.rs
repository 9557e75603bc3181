use crate::chat_model::ChatModel;
use crate::errors::DomainError;
use serde::{Deserialize, Serialize};

/// A role the assistant plays, rendered into the system message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub label: String,
}

impl Persona {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn instruction(&self, assistant_name: &str, business_name: &str) -> String {
        format!(
            "Eres {} y trabajas en el restaurante {}, actúa como {} y resuelve las inquietudes de los clientes, tienes un tono muy amable y cordial, puedes utilizar emojis",
            assistant_name, business_name, self.label
        )
    }
}

/// Everything that differs between deployments of the chat front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotProfile {
    pub assistant_name: String,
    pub business_name: String,
    pub tagline: String,
    pub personas: Vec<Persona>,
    pub models: Vec<ChatModel>,
    pub default_model: ChatModel,
    pub voice_input: bool,
}

impl BotProfile {
    pub fn sazon_burguer() -> Self {
        Self {
            assistant_name: "Ana".to_string(),
            business_name: "Sazon Burguer".to_string(),
            tagline: "Brindamos la mejor atención".to_string(),
            personas: vec![
                Persona::new("Asistente de atención al cliente"),
                Persona::new("Agente Administrativo"),
            ],
            models: ChatModel::ALL.to_vec(),
            default_model: ChatModel::Gpt4,
            voice_input: true,
        }
    }

    pub fn default_persona(&self) -> Option<&Persona> {
        self.personas.first()
    }

    /// Looks a persona up by 1-based position or by case-insensitive label.
    pub fn persona(&self, selector: &str) -> Result<&Persona, DomainError> {
        let selector = selector.trim();
        if let Ok(index) = selector.parse::<usize>() {
            return index
                .checked_sub(1)
                .and_then(|i| self.personas.get(i))
                .ok_or_else(|| DomainError::UnknownPersona(selector.to_string()));
        }
        self.personas
            .iter()
            .find(|p| p.label.eq_ignore_ascii_case(selector))
            .ok_or_else(|| DomainError::UnknownPersona(selector.to_string()))
    }

    pub fn offers_model(&self, model: ChatModel) -> bool {
        self.models.contains(&model)
    }

    pub fn system_instruction(&self, persona: &Persona) -> String {
        persona.instruction(&self.assistant_name, &self.business_name)
    }
}

impl Default for BotProfile {
    fn default() -> Self {
        Self::sazon_burguer()
    }
}

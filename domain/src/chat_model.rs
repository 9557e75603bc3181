//! Chat-completion models the front-end lets the visitor pick from.

use crate::errors::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChatModel {
    Gpt35Turbo,
    #[default]
    Gpt4,
    Gpt4_32k,
    Gpt4o,
}

impl ChatModel {
    pub const ALL: [ChatModel; 4] = [
        ChatModel::Gpt35Turbo,
        ChatModel::Gpt4,
        ChatModel::Gpt4_32k,
        ChatModel::Gpt4o,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatModel::Gpt35Turbo => "gpt-3.5-turbo",
            ChatModel::Gpt4 => "gpt-4",
            ChatModel::Gpt4_32k => "gpt-4-32k",
            ChatModel::Gpt4o => "gpt-4o",
        }
    }
}

impl std::fmt::Display for ChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ChatModel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ChatModel::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::InvalidModel(wanted.to_string()))
    }
}

impl Serialize for ChatModel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChatModel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

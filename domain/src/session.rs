use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Some(Utc::now()),
        }
    }
}

/// Conversation history for one visitor. Append-only until cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    history: Vec<ConversationTurn>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            history: Vec::new(),
        }
    }

    pub fn append(&mut self, turn: ConversationTurn) {
        self.history.push(turn);
    }

    pub fn push_user(&mut self, content: &str) {
        self.append(ConversationTurn::new(Role::User, content));
    }

    pub fn push_assistant(&mut self, content: &str) {
        self.append(ConversationTurn::new(Role::Assistant, content));
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Question/answer pairs in the order they were asked.
    pub fn exchanges(&self) -> Vec<(&str, Option<&str>)> {
        let mut pairs = Vec::new();
        let mut turns = self.history.iter().peekable();
        while let Some(turn) = turns.next() {
            if turn.role != Role::User {
                continue;
            }
            let answer = match turns.peek() {
                Some(next) if next.role == Role::Assistant => {
                    turns.next().map(|t| t.content.as_str())
                }
                _ => None,
            };
            pairs.push((turn.content.as_str(), answer));
        }
        pairs
    }
}

//! Request body for the assistant endpoint.

use super::entities::Message;
use serde::{Deserialize, Serialize};

/// Speaker of a prior turn, as the assistant endpoint names it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPart {
    pub text: String,
}

/// One prior exchange entry sent as context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantTurn {
    pub role: TurnRole,
    pub parts: Vec<TurnPart>,
}

impl AssistantTurn {
    pub fn new(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![TurnPart { text: text.into() }],
        }
    }
}

/// `POST /api/ai-chat` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantRequest {
    pub history: Vec<AssistantTurn>,
    pub question: String,
}

impl AssistantRequest {
    /// Build a request from the assistant transcript preceding `question`.
    ///
    /// Client notices are not part of the conversation and are left out.
    pub fn from_transcript(transcript: &[Message], question: impl Into<String>) -> Self {
        let history = transcript
            .iter()
            .filter(|m| !m.is_notice())
            .map(|m| {
                let role = if m.is_from_assistant() {
                    TurnRole::Model
                } else {
                    TurnRole::User
                };
                AssistantTurn::new(role, m.text())
            })
            .collect();

        Self {
            history,
            question: question.into(),
        }
    }
}

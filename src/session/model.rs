//! Transcript and business data models.

use serde::{Deserialize, Serialize};

/// Speaker of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the onboarding chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, append-only sequence of turns.
///
/// Chronological order is the only context the completion service consumes;
/// turns are never reordered or deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// A fresh transcript holding only the seed assistant greeting.
    pub fn seeded(greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::assistant(greeting)],
        }
    }

    pub fn from_turns(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}

/// Structured business description extracted by the completion service.
///
/// Treated as an opaque payload until the save action: the controller only
/// checks `is_complete()` before letting the user persist it. All fields are
/// defaulted so a malformed payload still deserializes (and simply fails the
/// completeness gate).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessProfile {
    pub business_name: String,
    pub business_type: String,
    pub location: String,
    pub description: String,
    pub languages: Vec<String>,
    pub has_whatsapp_business: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_number: Option<String>,
}

impl BusinessProfile {
    /// Whether every required field is present. Gates the save action.
    pub fn is_complete(&self) -> bool {
        !self.business_name.trim().is_empty()
            && !self.business_type.trim().is_empty()
            && !self.location.trim().is_empty()
            && !self.description.trim().is_empty()
            && !self.languages.is_empty()
    }
}

/// A persisted business, as returned by the create call.
///
/// Owned by the backend; the controller holds a read-only copy and only ever
/// flips `whatsapp_connected` after a successful connect handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub business_type: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default, alias = "whatsapp_configured")]
    pub whatsapp_connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_number: Option<String>,
}

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
}

impl Role {
    /// Parse an export author role. Anything outside the four known roles is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            "system" => Some(Self::System),
            "tool" => Some(Self::Tool),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
            Self::Tool => "tool",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub parts: Vec<String>,
    pub create_time: Option<DateTime<Utc>>,
    pub model_slug: Option<String>,
}

impl Message {
    pub fn text(&self) -> String {
        self.parts.join("\n")
    }
}

/// A conversation reduced to its active branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
    pub default_model_slug: Option<String>,
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Timestamp used for date filtering and recency ordering.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.update_time.or(self.create_time)
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Title followed by every message's text, one per line.
    pub fn searchable_text(&self) -> String {
        let capacity = self.title.len()
            + self.messages.iter().flat_map(|m| &m.parts).map(|p| p.len() + 1).sum::<usize>();
        let mut text = String::with_capacity(capacity);
        text.push_str(&self.title);
        for part in self.messages.iter().flat_map(|m| &m.parts) {
            text.push('\n');
            text.push_str(part);
        }
        text
    }
}

//! Raw record shapes of a ChatGPT `conversations.json` export.
//!
//! Every field is optional, and a field holding a value of the wrong type is
//! read as missing: exports from different eras omit, null out or reshape
//! different parts, and a stray value on a branch nobody walks must not cost
//! the whole record. A record only becomes unusable when reconstruction cannot
//! find an id or a message on its active branch.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::parsers::deserializers::{
    deserialize_epoch_seconds, deserialize_lenient, deserialize_lenient_default,
    deserialize_lenient_items,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConversation {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub conversation_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_epoch_seconds")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_epoch_seconds")]
    pub update_time: Option<DateTime<Utc>>,
    /// Node id to node. Ordered so that every walk over it is deterministic.
    #[serde(default)]
    pub mapping: Option<BTreeMap<String, RawNode>>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub current_node: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub default_model_slug: Option<String>,
    /// Older exports carry a flat message list instead of a mapping.
    #[serde(default, deserialize_with = "deserialize_lenient_items")]
    pub messages: Vec<Option<RawMessage>>,
}

impl RawConversation {
    /// The conversation id, preferring `id` over `conversation_id`.
    pub fn resolved_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| self.conversation_id.as_deref().filter(|id| !id.is_empty()))
    }
}

/// A mapping entry. Its id is the mapping key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNode {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub parent: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_default")]
    pub children: Vec<String>,
    /// A message that does not decode leaves the node without one.
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub message: Option<RawMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMessage {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub author: Option<RawAuthor>,
    /// Flat-list exports put the role on the message itself.
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "deserialize_epoch_seconds")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub content: Option<RawContent>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub metadata: Option<RawMessageMetadata>,
}

impl RawMessage {
    pub fn role(&self) -> Option<&str> {
        self.author.as_ref().and_then(|a| a.role.as_deref()).or(self.role.as_deref())
    }

    pub fn model_slug(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.model_slug.as_deref()).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAuthor {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMessageMetadata {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub model_slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawContent {
    Text(String),
    Structured(RawContentBody),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContentBody {
    #[serde(default, deserialize_with = "deserialize_lenient_default")]
    pub parts: Vec<Value>,
    #[serde(default)]
    pub text: Option<Value>,
}

impl RawContent {
    /// Readable text parts, in order. Blank parts are dropped.
    ///
    /// String parts are taken verbatim, object parts contribute their `text`
    /// field, and a body-level `text` (code, execution output) comes last.
    pub fn text_parts(&self) -> Vec<String> {
        let mut parts = Vec::new();
        match self {
            Self::Text(text) => parts.push(text.clone()),
            Self::Structured(body) => {
                for part in &body.parts {
                    match part {
                        Value::String(text) => parts.push(text.clone()),
                        Value::Object(object) => {
                            if let Some(text) = object.get("text").and_then(Value::as_str) {
                                parts.push(text.to_string());
                            }
                        }
                        _ => {}
                    }
                }
                if let Some(text) = body.text.as_ref().and_then(Value::as_str) {
                    parts.push(text.to_string());
                }
            }
        }
        parts.retain(|p| !p.trim().is_empty());
        parts
    }
}

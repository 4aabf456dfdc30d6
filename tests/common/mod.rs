//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use tempfile::TempDir;
use zip::write::FileOptions;

/// Builder for ChatGPT export files in a temp directory
pub struct ExportBuilder {
    temp_dir: TempDir,
    records: Vec<Value>,
}

impl ExportBuilder {
    /// Create a new builder with no conversations
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir, records: Vec::new() }
    }

    /// Add a conversation built with [`ConversationBuilder`]
    pub fn with_conversation(mut self, conversation: ConversationBuilder) -> Self {
        self.records.push(conversation.to_json());
        self
    }

    /// Add an arbitrary record as-is
    pub fn with_raw(mut self, record: Value) -> Self {
        self.records.push(record);
        self
    }

    /// Write `conversations.json` and return its path with the owning temp dir
    pub fn write_json(self) -> (TempDir, PathBuf) {
        let path = self.temp_dir.path().join("conversations.json");
        let content = serde_json::to_string(&self.records).expect("Failed to encode records");
        fs::write(&path, content).expect("Failed to write conversations.json");
        (self.temp_dir, path)
    }

    /// Write a data-export ZIP holding `conversations.json`
    pub fn write_zip(self) -> (TempDir, PathBuf) {
        let path = self.temp_dir.path().join("chatgpt-export.zip");
        let content = serde_json::to_string(&self.records).expect("Failed to encode records");
        write_zip_entries(&path, &[("conversations.json", content.as_bytes())]);
        (self.temp_dir, path)
    }

    /// The records without touching the filesystem
    pub fn records(&self) -> Vec<Value> {
        self.records.clone()
    }
}

impl Default for ExportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a ZIP archive with the given entries
pub fn write_zip_entries(path: &Path, entries: &[(&str, &[u8])]) {
    let file = fs::File::create(path).expect("Failed to create zip");
    let mut writer = zip::ZipWriter::new(file);
    for (name, bytes) in entries {
        writer.start_file(*name, FileOptions::default()).expect("Failed to start entry");
        writer.write_all(bytes).expect("Failed to write entry");
    }
    writer.finish().expect("Failed to finish zip");
}

/// Builder for a conversation record with a linear message chain
///
/// Node ids are `{id}-root` for the empty root and `{id}-n{i}` for the messages.
pub struct ConversationBuilder {
    id: String,
    title: Option<String>,
    create_time: Option<f64>,
    update_time: Option<f64>,
    model: Option<String>,
    messages: Vec<(String, String, Option<f64>)>,
    current_node: Option<String>,
}

impl ConversationBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: Some(format!("Conversation {}", id)),
            create_time: Some(1_700_000_000.0),
            update_time: None,
            model: None,
            messages: Vec::new(),
            current_node: None,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn no_title(mut self) -> Self {
        self.title = None;
        self
    }

    pub fn create_time(mut self, seconds: f64) -> Self {
        self.create_time = Some(seconds);
        self
    }

    pub fn no_create_time(mut self) -> Self {
        self.create_time = None;
        self
    }

    pub fn update_time(mut self, seconds: f64) -> Self {
        self.update_time = Some(seconds);
        self
    }

    pub fn model(mut self, slug: &str) -> Self {
        self.model = Some(slug.to_string());
        self
    }

    /// Append a message without a timestamp
    pub fn message(mut self, role: &str, text: &str) -> Self {
        self.messages.push((role.to_string(), text.to_string(), None));
        self
    }

    /// Append a message with an epoch-seconds timestamp
    pub fn message_at(mut self, role: &str, text: &str, seconds: f64) -> Self {
        self.messages.push((role.to_string(), text.to_string(), Some(seconds)));
        self
    }

    /// Override the leaf of the active branch
    pub fn current_node(mut self, node: &str) -> Self {
        self.current_node = Some(node.to_string());
        self
    }

    pub fn node_id(&self, index: usize) -> String {
        format!("{}-n{}", self.id, index)
    }

    pub fn to_json(&self) -> Value {
        let root = format!("{}-root", self.id);
        let mut mapping = Map::new();

        let first_child: Vec<String> = if self.messages.is_empty() { vec![] } else { vec![self.node_id(0)] };
        mapping.insert(
            root.clone(),
            json!({ "id": root, "parent": null, "children": first_child, "message": null }),
        );

        for (i, (role, text, time)) in self.messages.iter().enumerate() {
            let node = self.node_id(i);
            let parent = if i == 0 { root.clone() } else { self.node_id(i - 1) };
            let children: Vec<String> =
                if i + 1 < self.messages.len() { vec![self.node_id(i + 1)] } else { vec![] };
            let mut metadata = Map::new();
            if role == "assistant"
                && let Some(model) = &self.model
            {
                metadata.insert("model_slug".to_string(), json!(model));
            }
            mapping.insert(
                node.clone(),
                json!({
                    "id": node,
                    "parent": parent,
                    "children": children,
                    "message": {
                        "id": format!("{}-m{}", self.id, i),
                        "author": { "role": role },
                        "create_time": time,
                        "content": { "content_type": "text", "parts": [text] },
                        "metadata": metadata,
                    }
                }),
            );
        }

        let leaf = if self.messages.is_empty() { root } else { self.node_id(self.messages.len() - 1) };
        json!({
            "id": self.id,
            "title": self.title,
            "create_time": self.create_time,
            "update_time": self.update_time,
            "default_model_slug": self.model,
            "mapping": mapping,
            "current_node": self.current_node.clone().unwrap_or(leaf),
        })
    }
}

/// A record whose parent links form a cycle
pub fn cyclic_record(id: &str) -> Value {
    json!({
        "id": id,
        "title": "Broken",
        "create_time": 1_700_000_000.0,
        "mapping": {
            "a": { "id": "a", "parent": "b", "children": ["b"],
                   "message": { "id": "ma", "author": { "role": "user" },
                                "content": { "content_type": "text", "parts": ["loop python"] } } },
            "b": { "id": "b", "parent": "a", "children": ["a"],
                   "message": { "id": "mb", "author": { "role": "assistant" },
                                "content": { "content_type": "text", "parts": ["loop python again"] } } }
        },
        "current_node": "b"
    })
}

/// Three conversations on distinct topics spread over three months
pub fn sample_export() -> ExportBuilder {
    ExportBuilder::new()
        .with_conversation(
            ConversationBuilder::new("c1")
                .title("Debugging help")
                .create_time(1_704_067_200.0) // 2024-01-01
                .model("gpt-4")
                .message_at("user", "I am stuck in a python debugging session", 1_704_067_200.0)
                .message_at("assistant", "Let's look at the traceback together", 1_704_067_260.0),
        )
        .with_conversation(
            ConversationBuilder::new("c2")
                .title("Launch plan")
                .create_time(1_706_745_600.0) // 2024-02-01
                .model("gpt-4o")
                .message_at("user", "Here are my marketing strategy notes", 1_706_745_600.0)
                .message_at("assistant", "Segment the audience before picking channels", 1_706_745_660.0),
        )
        .with_conversation(
            ConversationBuilder::new("c3")
                .title("Trip ideas")
                .create_time(1_709_251_200.0) // 2024-03-01
                .message_at("user", "Suggest a weekend itinerary for Lisbon", 1_709_251_200.0)
                .message_at("assistant", "Start in Alfama and walk to the river", 1_709_251_260.0)
                .message_at("user", "What about food markets?", 1_709_251_320.0),
        )
}

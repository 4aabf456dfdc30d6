//! Fixed registry of the four query tools.
//!
//! Each tool maps a name to a typed handler: JSON arguments are decoded into the
//! tool's params struct (unknown fields rejected), run against the corpus, and
//! the typed response is encoded back to JSON. There is no dynamic registration.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::corpus::Corpus;
use crate::error::{Error, Result};
use crate::search::{GetConversationParams, ListParams, SearchParams};

type Handler = fn(&Corpus, Value) -> Result<Value>;

pub struct ToolSpec {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    handler: Handler,
}

impl ToolSpec {
    pub fn call(&self, corpus: &Corpus, arguments: Value) -> Result<Value> {
        (self.handler)(corpus, arguments)
    }
}

pub const SEARCH: &str = "chatgpt_search";
pub const GET_CONVERSATION: &str = "chatgpt_get_conversation";
pub const LIST_CONVERSATIONS: &str = "chatgpt_list_conversations";
pub const STATS: &str = "chatgpt_stats";

pub static TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: SEARCH,
        title: "Search ChatGPT History",
        description: "Search past ChatGPT conversations by topic, keyword, or phrase. \
                      Arguments: query (required), date_from, date_to (YYYY-MM-DD), \
                      limit (default 20, max 100), offset. Returns ranked results with \
                      conversation ids, titles, dates and a matching snippet.",
        handler: handle_search,
    },
    ToolSpec {
        name: GET_CONVERSATION,
        title: "Get Full ChatGPT Conversation",
        description: "Retrieve every message of one conversation by the id returned from \
                      search or list. Arguments: conversation_id (required), max_messages.",
        handler: handle_get_conversation,
    },
    ToolSpec {
        name: LIST_CONVERSATIONS,
        title: "List ChatGPT Conversations",
        description: "List conversations, most recently active first. Arguments: \
                      date_from, date_to (YYYY-MM-DD), limit (default 20, max 100), offset.",
        handler: handle_list_conversations,
    },
    ToolSpec {
        name: STATS,
        title: "ChatGPT Usage Statistics",
        description: "Totals of conversations and messages, model usage, and monthly \
                      activity across the whole export. Takes no arguments.",
        handler: handle_stats,
    },
];

pub fn find(name: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().find(|tool| tool.name == name)
}

/// Invoke the tool called `name` with JSON `arguments`.
///
/// # Errors
///
/// Returns [`Error::Validation`] for an unknown tool or arguments that do not fit the
/// tool's params, plus whatever the operation itself returns.
pub fn dispatch(corpus: &Corpus, name: &str, arguments: Value) -> Result<Value> {
    let tool = find(name).ok_or_else(|| Error::validation(format!("unknown tool '{}'", name)))?;
    tool.call(corpus, arguments)
}

/// Tool listing with read-only annotations, as handed to the host.
pub fn definitions() -> Value {
    Value::Array(
        TOOLS
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name,
                    "title": tool.title,
                    "description": tool.description,
                    "annotations": {
                        "readOnlyHint": true,
                        "destructiveHint": false,
                        "idempotentHint": true,
                        "openWorldHint": false,
                    },
                })
            })
            .collect(),
    )
}

/// Structured error body returned in place of a tool response.
pub fn error_body(err: &Error) -> Value {
    json!({ "error": { "kind": err.kind(), "message": err.to_string() } })
}

fn decode<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments).map_err(|e| Error::validation(e.to_string()))
}

fn handle_search(corpus: &Corpus, arguments: Value) -> Result<Value> {
    let params: SearchParams = decode(arguments)?;
    Ok(serde_json::to_value(corpus.search(&params)?)?)
}

fn handle_get_conversation(corpus: &Corpus, arguments: Value) -> Result<Value> {
    let params: GetConversationParams = decode(arguments)?;
    Ok(serde_json::to_value(corpus.get_conversation(&params)?)?)
}

fn handle_list_conversations(corpus: &Corpus, arguments: Value) -> Result<Value> {
    let params: ListParams = decode(arguments)?;
    Ok(serde_json::to_value(corpus.list_conversations(&params)?)?)
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StatsParams {}

fn handle_stats(corpus: &Corpus, arguments: Value) -> Result<Value> {
    let StatsParams {} = decode(arguments)?;
    Ok(serde_json::to_value(corpus.stats())?)
}

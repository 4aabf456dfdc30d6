use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Role;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub conversation_id: String,
    pub title: String,
    pub score: f64,
    pub snippet: String,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
    pub message_count: usize,
}

/// One page of ranked results. `total` counts every match before pagination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    pub query: String,
    pub results: Vec<QueryResult>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
    pub message_count: usize,
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationPage {
    pub conversations: Vec<ConversationSummary>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub create_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationView {
    pub id: String,
    pub title: String,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
    pub model: Option<String>,
    pub message_count: usize,
    /// Messages left out because of `max_messages`.
    pub omitted: usize,
    pub messages: Vec<MessageView>,
}

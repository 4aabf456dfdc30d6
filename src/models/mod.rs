//! Data models for ChatGPT export archives.
//!
//! - [`RawConversation`] and friends - records exactly as they appear in `conversations.json`
//! - [`Conversation`] / [`Message`] - a record reduced to its active branch
//! - [`QueryResult`], [`SearchPage`], [`ConversationPage`], [`ConversationView`] - query responses
//!
//! Raw records use serde with the custom deserializers in `parsers::deserializers`
//! for epoch-second timestamps and nullable collections.

pub mod conversation;
pub mod export;
pub mod search;

pub use conversation::{Conversation, Message, Role};
pub use export::{RawAuthor, RawContent, RawContentBody, RawConversation, RawMessage, RawNode};
pub use search::{
    ConversationPage, ConversationSummary, ConversationView, MessageView, QueryResult, SearchPage,
};

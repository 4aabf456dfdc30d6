//! ChatGPT History Search - local full-text search over a ChatGPT data export
//!
//! This library loads an exported ChatGPT archive once and answers read-only queries
//! against it, with no network access. It supports:
//!
//! - Loading `conversations.json` from a data-export ZIP or directly
//! - Reducing each branched conversation tree to its active branch
//! - Building an in-memory TF-IDF inverted index over the conversations
//! - Ranked search, conversation lookup, recency listing, and usage statistics
//! - A fixed tool registry mapping operation names to typed handlers
//!
//! # Example
//!
//! ```no_run
//! use chatgpt_history_search::{SearchParams, initialize};
//! use std::path::PathBuf;
//!
//! let export = PathBuf::from("/Users/alice/Downloads/chatgpt-export.zip");
//! let corpus = initialize(&export)?;
//! let page = corpus.search(&SearchParams::new("marketing strategy"))?;
//! for result in page.results {
//!     println!("{} {:.3} {}", result.conversation_id, result.score, result.title);
//! }
//! # Ok::<(), chatgpt_history_search::Error>(())
//! ```

use std::path::Path;

pub mod cli;
pub mod corpus;
pub mod error;
pub mod filters;
pub mod indexer;
pub mod models;
pub mod parsers;
pub mod search;
pub mod stats;
pub mod tools;
pub mod utils;

// Re-export commonly used types
pub use corpus::Corpus;
pub use error::{CorruptReason, Error, Result};
pub use models::{Conversation, Message, QueryResult, Role, SearchPage};
pub use parsers::load_export;
pub use search::{GetConversationParams, ListParams, SearchParams};
pub use stats::UsageStats;
pub use utils::format_path_with_tilde;

/// Load the export at `path` into a queryable [`Corpus`].
pub fn initialize(path: &Path) -> Result<Corpus> {
    Corpus::initialize(path)
}

//! Startup indexing for ChatGPT exports
//!
//! Three stages run once, before any query is served:
//!
//! - **Tree reconstruction** ([`tree`]): each record's node graph is reduced to the
//!   messages on its active branch. Corrupt records are isolated, not fatal.
//! - **Tokenization** ([`tokenizer`]): the same rules apply to documents and queries.
//! - **Index building** ([`index`]): an inverted TF-IDF index with per-document norms.
//!
//! The resulting structures are immutable and shared read-only by all queries.

pub mod builder;
pub mod index;
pub mod progress;
pub mod tokenizer;
pub mod tree;

pub use builder::{CorruptRecord, Reconstructed, reconstruct_all};
pub use index::{DocId, Document, Posting, SearchIndex};
pub use progress::{PROGRESS_INTERVAL, Progress};
pub use tokenizer::{Token, Tokens, tokenize};
pub use tree::{TreeOutcome, reconstruct_conversation};

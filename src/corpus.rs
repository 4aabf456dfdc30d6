//! The loaded, immutable corpus.
//!
//! [`Corpus::initialize`] reads the export once, reconstructs every
//! conversation, builds the search index and computes usage statistics. The
//! result is never mutated afterwards, so a `&Corpus` (or an `Arc<Corpus>`) can
//! serve any number of concurrent queries without locking.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde_json::Value;
use tracing::info;

use crate::error::{Error, Result};
use crate::indexer::{CorruptRecord, Reconstructed, SearchIndex, reconstruct_all};
use crate::models::{Conversation, ConversationPage, ConversationView, SearchPage};
use crate::parsers::load_export;
use crate::search::{self, GetConversationParams, ListParams, SearchParams};
use crate::stats::UsageStats;

#[derive(Debug)]
pub struct Corpus {
    source: Option<PathBuf>,
    conversations: Vec<Conversation>,
    positions: HashMap<String, usize>,
    /// Conversation positions, most recent activity first.
    recency: Vec<usize>,
    index: SearchIndex,
    stats: UsageStats,
    corrupt: Vec<CorruptRecord>,
}

impl Corpus {
    /// Load the export at `path` and build everything needed to serve queries.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] if the export cannot be read
    /// - [`Error::Format`] if a ZIP lacks `conversations.json` or no conversation is usable
    /// - [`Error::Parse`] if the content is not a JSON array
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use chatgpt_history_search::{Corpus, SearchParams};
    ///
    /// let corpus = Corpus::initialize(Path::new("/Users/alice/Downloads/chatgpt-export.zip"))?;
    /// let page = corpus.search(&SearchParams::new("python debugging"))?;
    /// println!("{} matching conversations", page.total);
    /// # Ok::<(), chatgpt_history_search::Error>(())
    /// ```
    pub fn initialize(path: &Path) -> Result<Self> {
        info!("Loading ChatGPT export from {}", path.display());
        let records = load_export(path)?;
        let mut corpus = Self::from_records(records)?;
        corpus.source = Some(path.to_path_buf());
        Ok(corpus)
    }

    /// Build a corpus from already-parsed export records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if no record yields a usable conversation.
    pub fn from_records(records: Vec<Value>) -> Result<Self> {
        let started = Instant::now();
        let Reconstructed { conversations, corrupt } = reconstruct_all(records);
        if conversations.is_empty() {
            return Err(Error::Format(format!(
                "export contains no usable conversations ({} corrupt)",
                corrupt.len()
            )));
        }

        let index = SearchIndex::build(&conversations);
        let stats = UsageStats::compute(&conversations, corrupt.len());

        let positions = conversations
            .iter()
            .enumerate()
            .map(|(position, conversation)| (conversation.id.clone(), position))
            .collect();
        let mut recency: Vec<usize> = (0..conversations.len()).collect();
        recency.sort_by(|&a, &b| search::by_recency(&conversations[a], &conversations[b]));

        info!(
            "Indexed {} conversations ({} messages, {} corrupt) in {:?}",
            conversations.len(),
            stats.message_count,
            corrupt.len(),
            started.elapsed()
        );

        Ok(Self { source: None, conversations, positions, recency, index, stats, corrupt })
    }

    /// Ranked full-text search.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty query, bad dates or bad pagination.
    pub fn search(&self, params: &SearchParams) -> Result<SearchPage> {
        let request = params.validate()?;
        Ok(search::search(&self.conversations, &self.index, &request))
    }

    /// Full message sequence of one conversation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id and [`Error::Validation`] for bad params.
    pub fn get_conversation(&self, params: &GetConversationParams) -> Result<ConversationView> {
        let (id, max_messages) = params.validate()?;
        let conversation = self.conversation(id).ok_or_else(|| Error::NotFound(id.to_string()))?;
        Ok(search::view(conversation, max_messages))
    }

    /// Conversations by most recent activity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for bad dates or bad pagination.
    pub fn list_conversations(&self, params: &ListParams) -> Result<ConversationPage> {
        let request = params.validate()?;
        Ok(search::list(&self.conversations, &self.recency, &request))
    }

    pub fn stats(&self) -> &UsageStats {
        &self.stats
    }

    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.positions.get(id).map(|&position| &self.conversations[position])
    }

    /// Conversations in export order.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn corrupt_records(&self) -> &[CorruptRecord] {
        &self.corrupt
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::CorruptReason;

    fn record(id: &str, text: &str, update_time: f64) -> Value {
        json!({
            "id": id,
            "title": format!("Conversation {}", id),
            "create_time": update_time - 60.0,
            "update_time": update_time,
            "current_node": "answer",
            "mapping": {
                "root": {"parent": null, "children": ["question"]},
                "question": {
                    "parent": "root",
                    "children": ["answer"],
                    "message": {"author": {"role": "user"}, "content": {"parts": [text]}, "create_time": update_time - 30.0}
                },
                "answer": {
                    "parent": "question",
                    "children": [],
                    "message": {"author": {"role": "assistant"}, "content": {"parts": ["noted"]}, "create_time": update_time}
                }
            }
        })
    }

    #[test]
    fn test_empty_export_is_format_error() {
        let err = Corpus::from_records(vec![]).unwrap_err();
        assert_eq!(err.kind(), "FormatError");
    }

    #[test]
    fn test_all_corrupt_is_format_error() {
        let err = Corpus::from_records(vec![json!({"id": "x", "mapping": {}})]).unwrap_err();
        assert_eq!(err.kind(), "FormatError");
        assert!(err.to_string().contains("1 corrupt"));
    }

    #[test]
    fn test_lookup_and_not_found() {
        let corpus = Corpus::from_records(vec![record("c1", "hello", 1_700_000_000.0)]).unwrap();
        let view = corpus.get_conversation(&GetConversationParams::new("c1")).unwrap();
        assert_eq!(view.messages.len(), 2);
        assert_eq!(view.messages[0].text, "hello");

        let err = corpus.get_conversation(&GetConversationParams::new("does-not-exist")).unwrap_err();
        assert!(matches!(err, Error::NotFound(ref id) if id == "does-not-exist"));
    }

    #[test]
    fn test_corrupt_records_reported() {
        let mut cyclic = record("bad", "python", 1_700_000_000.0);
        cyclic["mapping"]["root"]["parent"] = json!("answer");
        let corpus =
            Corpus::from_records(vec![cyclic, record("good", "python", 1_700_000_100.0)]).unwrap();

        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.stats().corrupt_count, 1);
        assert_eq!(corpus.corrupt_records()[0].reason, CorruptReason::Cycle);
        let page = corpus.search(&SearchParams::new("python")).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.results[0].conversation_id, "good");
    }

    #[test]
    fn test_list_recency_order() {
        let corpus = Corpus::from_records(vec![
            record("old", "a1", 1_600_000_000.0),
            record("new", "b1", 1_700_000_000.0),
        ])
        .unwrap();
        let page = corpus.list_conversations(&ListParams::default()).unwrap();
        let ids: Vec<&str> = page.conversations.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn test_corpus_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Corpus>();
    }
}

//! Startup pipeline from raw export records to conversations.
//!
//! # Error Handling Strategy
//!
//! Reconstruction follows a **graceful degradation** approach:
//!
//! - **Record-level failures**: a record that fails to decode, has a parent-link cycle, or
//!   holds no messages is logged, counted as corrupt, and excluded. It never aborts the load.
//! - **Duplicate ids**: the first record with a given id wins; later ones are corrupt.
//! - **Summary reporting**: a summary line reports kept and corrupt counts so the user can
//!   see how complete the corpus is.
//!
//! The caller decides what an empty result means (see [`crate::Corpus::from_records`]).

use std::collections::HashSet;
use std::time::Instant;

use rayon::prelude::*;
use serde_json::Value;
use tracing::{info, warn};

use super::progress::Progress;
use super::tree::reconstruct_conversation;
use crate::error::{CorruptReason, Error};
use crate::models::{Conversation, RawConversation};

/// A record excluded from the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptRecord {
    /// Position of the record in the export array.
    pub position: usize,
    /// Conversation id, or empty when the record has none.
    pub id: String,
    pub reason: CorruptReason,
}

/// Conversations in export order plus the records that were excluded.
#[derive(Debug, Clone, Default)]
pub struct Reconstructed {
    pub conversations: Vec<Conversation>,
    pub corrupt: Vec<CorruptRecord>,
}

/// Decode and reconstruct every record.
///
/// Records are processed in parallel; output order matches input order.
pub fn reconstruct_all(records: Vec<Value>) -> Reconstructed {
    let started = Instant::now();
    let total = records.len();

    let progress = Progress::new("Reconstructed conversations", total);
    let outcomes: Vec<Result<Conversation, CorruptRecord>> = records
        .into_par_iter()
        .enumerate()
        .map(|(position, record)| {
            let outcome = reconstruct_record(position, record);
            progress.tick();
            outcome
        })
        .collect();

    let mut reconstructed = Reconstructed::default();
    let mut seen = HashSet::new();
    for outcome in outcomes {
        let conversation = match outcome {
            Ok(conversation) => conversation,
            Err(record) => {
                reconstructed.corrupt.push(record);
                continue;
            }
        };
        if !seen.insert(conversation.id.clone()) {
            warn!("Skipping duplicate conversation id {}", conversation.id);
            reconstructed.corrupt.push(CorruptRecord {
                position: reconstructed.conversations.len() + reconstructed.corrupt.len(),
                id: conversation.id,
                reason: CorruptReason::DuplicateId,
            });
            continue;
        }
        reconstructed.conversations.push(conversation);
    }

    info!(
        "Reconstructed {} of {} conversations ({} corrupt) in {:?}",
        reconstructed.conversations.len(),
        total,
        reconstructed.corrupt.len(),
        started.elapsed()
    );

    reconstructed
}

fn reconstruct_record(position: usize, record: Value) -> Result<Conversation, CorruptRecord> {
    let fallback_id = record_id(&record);
    let raw: RawConversation = match serde_json::from_value(record) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Skipping malformed conversation at position {}: {}", position, e);
            return Err(CorruptRecord {
                position,
                id: fallback_id,
                reason: CorruptReason::Malformed,
            });
        }
    };

    reconstruct_conversation(raw).map_err(|err| {
        warn!("Skipping conversation at position {}: {}", position, err);
        let (id, reason) = match err {
            Error::CorruptConversation { id, reason } => (id, reason),
            _ => (fallback_id, CorruptReason::Malformed),
        };
        CorruptRecord { position, id, reason }
    })
}

/// Best-effort id of a record that may not decode.
fn record_id(record: &Value) -> String {
    ["id", "conversation_id"]
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_str).filter(|id| !id.is_empty()))
        .unwrap_or_default()
        .to_string()
}

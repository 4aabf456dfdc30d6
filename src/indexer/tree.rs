//! Active-branch reconstruction.
//!
//! A ChatGPT conversation is stored as a node graph: every node names its
//! parent and children, and edits/regenerations leave sibling branches behind.
//! Only the branch ending at `current_node` is what the user last saw, so that
//! is the one kept. Nodes are looked up by id in the mapping; no node holds a
//! reference to another.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};

use crate::error::{CorruptReason, Error, Result};
use crate::models::{Conversation, Message, RawConversation, RawMessage, RawNode, Role};

const DEFAULT_TITLE: &str = "Untitled";

/// Result of walking one conversation's node graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeOutcome {
    /// Messages of the active branch, root first.
    Valid(Vec<Message>),
    Corrupt(CorruptReason),
}

/// Reduce a raw record to its active branch.
///
/// # Errors
///
/// Returns [`Error::CorruptConversation`] when the record has no id, its parent
/// links form a cycle, no leaf can be chosen, or the branch holds no message.
pub fn reconstruct_conversation(raw: RawConversation) -> Result<Conversation> {
    let Some(id) = raw.resolved_id().map(str::to_string) else {
        return Err(Error::CorruptConversation {
            id: String::new(),
            reason: CorruptReason::Malformed,
        });
    };

    let outcome = match raw.mapping.as_ref().filter(|m| !m.is_empty()) {
        Some(mapping) => active_branch(mapping, raw.current_node.as_deref()),
        None => flat_messages(&raw.messages),
    };

    let messages = match outcome {
        TreeOutcome::Valid(messages) if !messages.is_empty() => messages,
        TreeOutcome::Valid(_) => {
            return Err(Error::CorruptConversation { id, reason: CorruptReason::NoMessages });
        }
        TreeOutcome::Corrupt(reason) => return Err(Error::CorruptConversation { id, reason }),
    };

    let title = raw.title.filter(|t| !t.trim().is_empty()).unwrap_or_else(|| DEFAULT_TITLE.to_string());

    Ok(Conversation {
        id,
        title,
        create_time: raw.create_time,
        update_time: raw.update_time,
        default_model_slug: raw.default_model_slug.filter(|s| !s.is_empty()),
        messages,
    })
}

/// Walk from the current node (or the best leaf) up to the root and return the
/// messages on that path in root-to-leaf order.
///
/// Nodes without a usable message are traversed but contribute nothing.
pub fn active_branch(mapping: &BTreeMap<String, RawNode>, current_node: Option<&str>) -> TreeOutcome {
    let leaf = match current_node.filter(|id| mapping.contains_key(*id)) {
        Some(id) => id,
        None => match deepest_leaf(mapping) {
            Ok(Some(id)) => id,
            Ok(None) => return TreeOutcome::Corrupt(CorruptReason::NoLeaf),
            Err(reason) => return TreeOutcome::Corrupt(reason),
        },
    };

    let path = match path_to_root(mapping, leaf) {
        Ok(path) => path,
        Err(reason) => return TreeOutcome::Corrupt(reason),
    };

    let messages = path
        .into_iter()
        .rev()
        .filter_map(|node_id| {
            let message = mapping.get(node_id)?.message.as_ref()?;
            convert_message(node_id, message)
        })
        .collect();
    TreeOutcome::Valid(messages)
}

/// Node ids from `start` up to the root, `start` first.
///
/// The root is the first node whose parent is absent or not in the mapping.
/// Revisiting a node means the parent links form a cycle.
pub fn path_to_root<'a>(
    mapping: &'a BTreeMap<String, RawNode>,
    start: &'a str,
) -> std::result::Result<Vec<&'a str>, CorruptReason> {
    let mut visited = HashSet::new();
    let mut path = Vec::new();
    let mut cursor = Some(start);

    while let Some(node_id) = cursor {
        if !visited.insert(node_id) {
            return Err(CorruptReason::Cycle);
        }
        path.push(node_id);
        cursor = mapping
            .get(node_id)
            .and_then(|node| node.parent.as_deref())
            .filter(|parent| mapping.contains_key(*parent));
    }

    Ok(path)
}

/// Pick the leaf with the greatest depth; ties go to the latest message
/// create_time, then to the smallest node id.
fn deepest_leaf(
    mapping: &BTreeMap<String, RawNode>,
) -> std::result::Result<Option<&str>, CorruptReason> {
    let mut best: Option<(&str, usize, Option<DateTime<Utc>>)> = None;

    // BTreeMap iterates in id order, so keeping the first of equal candidates
    // resolves the final tie by smallest id.
    for (node_id, node) in mapping {
        let is_leaf = !node.children.iter().any(|child| mapping.contains_key(child));
        if !is_leaf {
            continue;
        }
        let depth = path_to_root(mapping, node_id)?.len();
        let time = node.message.as_ref().and_then(|m| m.create_time);
        let better = match best {
            None => true,
            Some((_, best_depth, best_time)) => (depth, time) > (best_depth, best_time),
        };
        if better {
            best = Some((node_id, depth, time));
        }
    }

    Ok(best.map(|(node_id, _, _)| node_id))
}

fn flat_messages(messages: &[Option<RawMessage>]) -> TreeOutcome {
    let messages = messages
        .iter()
        .enumerate()
        .filter_map(|(position, message)| {
            let message = message.as_ref()?;
            convert_message(&format!("message-{}", position), message)
        })
        .collect();
    TreeOutcome::Valid(messages)
}

/// Convert a raw message, dropping unknown roles and blank content.
fn convert_message(node_id: &str, raw: &RawMessage) -> Option<Message> {
    let role = raw.role().and_then(Role::parse)?;
    let parts = raw.content.as_ref().map(|c| c.text_parts()).unwrap_or_default();
    if parts.is_empty() {
        return None;
    }

    Some(Message {
        id: raw.id.clone().filter(|id| !id.is_empty()).unwrap_or_else(|| node_id.to_string()),
        role,
        parts,
        create_time: raw.create_time,
        model_slug: raw.model_slug().map(str::to_string),
    })
}

//! Ranking, listing and lookup over the immutable corpus.
//!
//! Search is sparse: only documents in the postings of a query term are ever
//! scored. A document's score is the cosine similarity between its TF-IDF
//! vector and the query's, where a term's weight is `tf × idf`. A conversation
//! whose title contains the whole query (case-insensitively) has its score
//! multiplied by [`TITLE_MATCH_BOOST`].

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::params::{ListRequest, SearchRequest};
use super::snippet::extract_snippet;
use crate::indexer::{DocId, Posting, SearchIndex};
use crate::models::{
    Conversation, ConversationPage, ConversationSummary, ConversationView, MessageView,
    QueryResult, SearchPage,
};

pub const TITLE_MATCH_BOOST: f64 = 2.0;

/// Rank the conversations matching `request`.
///
/// `conversations` must be the slice the index was built from. Results are
/// ordered by score, then most recent activity, then id.
pub fn search(
    conversations: &[Conversation],
    index: &SearchIndex,
    request: &SearchRequest,
) -> SearchPage {
    // (idf, query weight, postings) for each query term the index knows
    let weighted: Vec<(f64, f64, &[Posting])> = request
        .terms
        .iter()
        .filter_map(|(term, &query_tf)| {
            let idf = index.idf(term)?;
            Some((idf, query_tf as f64 * idf, index.postings(term)))
        })
        .collect();
    let query_norm = weighted.iter().map(|(_, weight, _)| weight * weight).sum::<f64>().sqrt();

    let mut dot_products: BTreeMap<DocId, f64> = BTreeMap::new();
    for (idf, query_weight, postings) in &weighted {
        for posting in postings.iter() {
            let Some(conversation) = conversations.get(posting.doc as usize) else {
                continue;
            };
            if !request.dates.contains(conversation.last_activity()) {
                continue;
            }
            *dot_products.entry(posting.doc).or_insert(0.0) +=
                query_weight * (posting.tf as f64 * idf);
        }
    }

    let query_lower = request.query.to_lowercase();
    let mut ranked: Vec<(DocId, f64)> = dot_products
        .into_iter()
        .filter_map(|(doc, dot)| {
            let norm = index.document(doc)?.norm;
            if norm <= 0.0 || query_norm <= 0.0 {
                return None;
            }
            let mut score = dot / (norm * query_norm);
            if conversations[doc as usize].title.to_lowercase().contains(&query_lower) {
                score *= TITLE_MATCH_BOOST;
            }
            Some((doc, score))
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.1.total_cmp(&a.1).then_with(|| {
            by_recency(&conversations[a.0 as usize], &conversations[b.0 as usize])
        })
    });

    let results = request
        .page
        .window(&ranked)
        .iter()
        .filter_map(|&(doc, score)| {
            let conversation = conversations.get(doc as usize)?;
            let document = index.document(doc)?;
            Some(QueryResult {
                conversation_id: conversation.id.clone(),
                title: conversation.title.clone(),
                score,
                snippet: extract_snippet(&document.text, &request.terms),
                create_time: conversation.create_time,
                update_time: conversation.update_time,
                message_count: conversation.message_count(),
            })
        })
        .collect();

    SearchPage {
        query: request.query.clone(),
        results,
        total: ranked.len(),
        limit: request.page.limit,
        offset: request.page.offset,
    }
}

/// Page through conversations in `recency` order, keeping those inside the date range.
pub fn list(
    conversations: &[Conversation],
    recency: &[usize],
    request: &ListRequest,
) -> ConversationPage {
    let matching: Vec<&Conversation> = recency
        .iter()
        .filter_map(|&position| conversations.get(position))
        .filter(|conversation| request.dates.contains(conversation.last_activity()))
        .collect();

    ConversationPage {
        conversations: request.page.window(&matching).iter().map(|c| summarize(c)).collect(),
        total: matching.len(),
        limit: request.page.limit,
        offset: request.page.offset,
    }
}

/// Most recent activity first; ids ascending on ties.
pub fn by_recency(a: &Conversation, b: &Conversation) -> Ordering {
    b.last_activity().cmp(&a.last_activity()).then_with(|| a.id.cmp(&b.id))
}

pub fn summarize(conversation: &Conversation) -> ConversationSummary {
    ConversationSummary {
        id: conversation.id.clone(),
        title: conversation.title.clone(),
        create_time: conversation.create_time,
        update_time: conversation.update_time,
        message_count: conversation.message_count(),
        model: model_of(conversation),
    }
}

/// Full message sequence, optionally cut to the first `max_messages`.
pub fn view(conversation: &Conversation, max_messages: Option<usize>) -> ConversationView {
    let shown = max_messages.unwrap_or(usize::MAX).min(conversation.message_count());
    ConversationView {
        id: conversation.id.clone(),
        title: conversation.title.clone(),
        create_time: conversation.create_time,
        update_time: conversation.update_time,
        model: model_of(conversation),
        message_count: conversation.message_count(),
        omitted: conversation.message_count() - shown,
        messages: conversation.messages[..shown]
            .iter()
            .map(|message| MessageView {
                id: message.id.clone(),
                role: message.role,
                text: message.text(),
                create_time: message.create_time,
            })
            .collect(),
    }
}

fn model_of(conversation: &Conversation) -> Option<String> {
    conversation
        .default_model_slug
        .clone()
        .or_else(|| conversation.messages.iter().rev().find_map(|m| m.model_slug.clone()))
}

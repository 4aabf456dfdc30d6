//! Inverted TF-IDF index.
//!
//! Built once from the reconstructed conversations and never mutated. Term maps
//! and postings are ordered maps and every floating-point sum runs in term
//! order, so the same export always yields bit-identical IDF values and norms.

use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use super::progress::Progress;
use super::tokenizer::tokenize;
use crate::models::Conversation;

/// Position of a document in the corpus, matching its conversation's position.
pub type DocId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc: DocId,
    pub tf: u32,
}

/// Searchable view of one conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub text: String,
    pub term_freqs: BTreeMap<String, u32>,
    /// L2 norm of the document's TF-IDF vector.
    pub norm: f64,
}

impl Document {
    pub fn from_text(text: String) -> Self {
        let mut term_freqs = BTreeMap::new();
        for term in tokenize(&text) {
            *term_freqs.entry(term).or_insert(0) += 1;
        }
        Self { text, term_freqs, norm: 0.0 }
    }
}

/// Smoothed inverse document frequency. Always positive.
pub fn smoothed_idf(total_docs: usize, doc_freq: usize) -> f64 {
    ((total_docs as f64 + 1.0) / (doc_freq as f64 + 1.0)).ln() + 1.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchIndex {
    documents: Vec<Document>,
    postings: BTreeMap<String, Vec<Posting>>,
    idf: BTreeMap<String, f64>,
}

impl SearchIndex {
    /// Build the index over `conversations`; document ids follow slice order.
    pub fn build(conversations: &[Conversation]) -> Self {
        let started = Instant::now();

        let progress = Progress::new("Tokenized documents", conversations.len());
        let mut documents: Vec<Document> = conversations
            .par_iter()
            .map(|conversation| {
                let document = Document::from_text(conversation.searchable_text());
                progress.tick();
                document
            })
            .collect();
        debug!("Tokenized {} documents in {:?}", documents.len(), started.elapsed());

        // Documents are visited in id order, so each postings list comes out sorted.
        let mut postings: BTreeMap<String, Vec<Posting>> = BTreeMap::new();
        for (position, document) in documents.iter().enumerate() {
            let doc = position as DocId;
            for (term, &tf) in &document.term_freqs {
                postings.entry(term.clone()).or_default().push(Posting { doc, tf });
            }
        }

        let total_docs = documents.len();
        let idf: BTreeMap<String, f64> = postings
            .iter()
            .map(|(term, list)| (term.clone(), smoothed_idf(total_docs, list.len())))
            .collect();

        documents.par_iter_mut().for_each(|document| {
            document.norm = document
                .term_freqs
                .iter()
                .map(|(term, &tf)| {
                    let weight = tf as f64 * idf[term];
                    weight * weight
                })
                .sum::<f64>()
                .sqrt();
        });

        info!(
            "Built search index: {} documents, {} terms in {:?}",
            total_docs,
            postings.len(),
            started.elapsed()
        );

        Self { documents, postings, idf }
    }

    /// Postings for `term`, sorted by document id. Empty if the term is unknown.
    pub fn postings(&self, term: &str) -> &[Posting] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    pub fn document(&self, doc: DocId) -> Option<&Document> {
        self.documents.get(doc as usize)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(id: &str, text: &str) -> Conversation {
        use crate::models::{Message, Role};
        Conversation {
            id: id.to_string(),
            title: String::new(),
            create_time: None,
            update_time: None,
            default_model_slug: None,
            messages: vec![Message {
                id: format!("{}-m", id),
                role: Role::User,
                parts: vec![text.to_string()],
                create_time: None,
                model_slug: None,
            }],
        }
    }

    #[test]
    fn test_postings_sorted_and_counted() {
        let index = SearchIndex::build(&[
            conversation("a", "rust rust python"),
            conversation("b", "python"),
            conversation("c", "rust"),
        ]);

        assert_eq!(index.len(), 3);
        assert_eq!(index.postings("rust"), &[Posting { doc: 0, tf: 2 }, Posting { doc: 2, tf: 1 }]);
        assert_eq!(index.postings("python"), &[Posting { doc: 0, tf: 1 }, Posting { doc: 1, tf: 1 }]);
        assert!(index.postings("golang").is_empty());
        assert_eq!(index.term_count(), 2);
    }

    #[test]
    fn test_idf_prefers_rare_terms() {
        let index = SearchIndex::build(&[
            conversation("a", "common rare"),
            conversation("b", "common"),
            conversation("c", "common"),
        ]);
        let common = index.idf("common").unwrap();
        let rare = index.idf("rare").unwrap();
        assert!(rare > common);
        assert!(common > 0.0);
        assert!(index.idf("missing").is_none());
    }

    #[test]
    fn test_norm_matches_weights() {
        let index = SearchIndex::build(&[conversation("a", "alpha alpha beta")]);
        let idf = smoothed_idf(1, 1);
        let expected = ((2.0 * idf).powi(2) + idf.powi(2)).sqrt();
        let norm = index.document(0).unwrap().norm;
        assert!((norm - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rebuild_is_bit_identical() {
        let corpus: Vec<Conversation> = (0..50)
            .map(|i| conversation(&format!("c{}", i), &format!("topic{} shared words {}", i % 7, i)))
            .collect();
        assert_eq!(SearchIndex::build(&corpus), SearchIndex::build(&corpus));
    }

    #[test]
    fn test_empty_corpus() {
        let index = SearchIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.document(0).is_none());
    }
}

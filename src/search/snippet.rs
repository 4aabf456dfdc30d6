use std::collections::BTreeMap;

use crate::indexer::Tokens;

/// Characters kept on each side of the first matching term.
pub const SNIPPET_RADIUS: usize = 80;

const ELLIPSIS: char = '…';

/// Extract the text around the first occurrence of any query term.
///
/// Falls back to the start of the text when no term occurs. Whitespace is
/// collapsed and an ellipsis marks each truncated side.
pub fn extract_snippet(text: &str, terms: &BTreeMap<String, u32>) -> String {
    let (hit_start, hit_end) = Tokens::new(text)
        .find(|token| terms.contains_key(&token.term))
        .map(|token| (token.start, token.end))
        .unwrap_or((0, 0));

    let start = text[..hit_start]
        .char_indices()
        .rev()
        .take(SNIPPET_RADIUS)
        .last()
        .map(|(offset, _)| offset)
        .unwrap_or(hit_start);
    let end = text[hit_end..]
        .char_indices()
        .nth(SNIPPET_RADIUS)
        .map(|(offset, _)| hit_end + offset)
        .unwrap_or(text.len());

    let body = text[start..end].split_whitespace().collect::<Vec<_>>().join(" ");
    let mut snippet = String::with_capacity(body.len() + 8);
    if start > 0 {
        snippet.push(ELLIPSIS);
    }
    snippet.push_str(&body);
    if end < text.len() {
        snippet.push(ELLIPSIS);
    }
    snippet
}

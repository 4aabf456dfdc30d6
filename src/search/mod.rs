//! Query operations: ranked search, listing, and conversation lookup.

pub mod engine;
pub mod params;
pub mod snippet;

pub use engine::{TITLE_MATCH_BOOST, by_recency, list, search, summarize, view};
pub use params::{
    GetConversationParams, ListParams, ListRequest, SearchParams, SearchRequest,
};
pub use snippet::{SNIPPET_RADIUS, extract_snippet};

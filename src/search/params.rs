//! Request shapes for the query operations and their validation.
//!
//! Params deserialize from the JSON arguments a caller sends; unknown fields are
//! rejected. `limit`/`offset` are signed so that negative values reach validation
//! instead of failing as type errors.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::filters::{DateRange, Pagination};
use crate::indexer::tokenize;

pub const MAX_QUERY_CHARS: usize = 500;
pub const MAX_MESSAGES_LIMIT: usize = 500;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchParams {
    pub query: String,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), ..Self::default() }
    }

    pub fn validate(&self) -> Result<SearchRequest> {
        let query = self.query.trim();
        if query.chars().count() > MAX_QUERY_CHARS {
            return Err(Error::validation(format!(
                "query is longer than {} characters",
                MAX_QUERY_CHARS
            )));
        }

        let mut terms = BTreeMap::new();
        for term in tokenize(query) {
            *terms.entry(term).or_insert(0u32) += 1;
        }
        if terms.is_empty() {
            return Err(Error::validation(if query.is_empty() {
                "query must not be empty".to_string()
            } else {
                format!("query '{}' has no searchable terms", query)
            }));
        }

        Ok(SearchRequest {
            query: query.to_string(),
            terms,
            dates: DateRange::parse(self.date_from.as_deref(), self.date_to.as_deref())?,
            page: Pagination::new(self.limit, self.offset)?,
        })
    }
}

/// A validated search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    /// Distinct query terms and how often each occurs in the query.
    pub terms: BTreeMap<String, u32>,
    pub dates: DateRange,
    pub page: Pagination,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListParams {
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

impl ListParams {
    pub fn validate(&self) -> Result<ListRequest> {
        Ok(ListRequest {
            dates: DateRange::parse(self.date_from.as_deref(), self.date_to.as_deref())?,
            page: Pagination::new(self.limit, self.offset)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRequest {
    pub dates: DateRange,
    pub page: Pagination,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetConversationParams {
    #[serde(alias = "id")]
    pub conversation_id: String,
    #[serde(default)]
    pub max_messages: Option<i64>,
}

impl GetConversationParams {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self { conversation_id: conversation_id.into(), max_messages: None }
    }

    /// Returns the trimmed id and the message cap, if any.
    pub fn validate(&self) -> Result<(&str, Option<usize>)> {
        let id = self.conversation_id.trim();
        if id.is_empty() {
            return Err(Error::validation("conversation_id must not be empty"));
        }
        let max_messages = match self.max_messages {
            None => None,
            Some(n) if n >= 1 && n as u64 <= MAX_MESSAGES_LIMIT as u64 => Some(n as usize),
            Some(n) => {
                return Err(Error::validation(format!(
                    "max_messages must be between 1 and {}, got {}",
                    MAX_MESSAGES_LIMIT, n
                )));
            }
        };
        Ok((id, max_messages))
    }
}

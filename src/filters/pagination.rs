use crate::error::{Error, Result};

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

/// Validated limit/offset window over a sorted result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: usize,
    pub offset: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { limit: DEFAULT_LIMIT, offset: 0 }
    }
}

impl Pagination {
    /// Validate raw `limit`/`offset` parameters.
    ///
    /// `limit` defaults to 20 and is clamped to 100; `offset` defaults to 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `limit` is not positive or `offset` is negative.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Result<Self> {
        let limit = match limit {
            None => DEFAULT_LIMIT,
            Some(limit) if limit <= 0 => {
                return Err(Error::validation(format!("limit must be positive, got {}", limit)));
            }
            Some(limit) => usize::try_from(limit).unwrap_or(MAX_LIMIT).min(MAX_LIMIT),
        };
        let offset = match offset {
            None => 0,
            Some(offset) if offset < 0 => {
                return Err(Error::validation(format!(
                    "offset must not be negative, got {}",
                    offset
                )));
            }
            Some(offset) => usize::try_from(offset).unwrap_or(usize::MAX),
        };
        Ok(Self { limit, offset })
    }

    /// The slice of `items` this page covers. Empty when `offset` is past the end.
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset.min(items.len());
        let end = start.saturating_add(self.limit).min(items.len());
        &items[start..end]
    }
}

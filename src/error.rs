//! Error types for export loading and querying.
//!
//! Load-phase failures (`Io`, `Format`, `Parse`) are fatal to startup. A
//! `CorruptConversation` only ever describes a single excluded record and is
//! collected into the load report instead of being returned. `NotFound` and
//! `Validation` are per-query and leave the corpus untouched.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a conversation record was excluded from the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorruptReason {
    /// The record did not match the expected conversation shape.
    Malformed,
    /// A parent link revisits a node before reaching the root.
    Cycle,
    /// No current node was usable and the mapping has no leaf.
    NoLeaf,
    /// The active branch holds no usable message.
    NoMessages,
    /// Another record earlier in the export has the same id.
    DuplicateId,
}

impl fmt::Display for CorruptReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Malformed => "malformed record",
            Self::Cycle => "parent-link cycle",
            Self::NoLeaf => "no leaf node",
            Self::NoMessages => "no messages on the active branch",
            Self::DuplicateId => "duplicate conversation id",
        };
        f.write_str(text)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// The export path could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The export is not in an accepted layout.
    #[error("invalid export: {0}")]
    Format(String),

    /// The export content is not a JSON array.
    #[error("failed to parse export: {0}")]
    Parse(String),

    /// A single conversation could not be reconstructed.
    #[error("conversation '{id}' is corrupt: {reason}")]
    CorruptConversation { id: String, reason: CorruptReason },

    /// No usable conversation has the requested id.
    #[error("conversation '{0}' not found")]
    NotFound(String),

    /// Request parameters were rejected.
    #[error("invalid request: {0}")]
    Validation(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Stable taxonomy name used in structured responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io { .. } => "IOError",
            Self::Format(_) => "FormatError",
            Self::Parse(_) => "ParseError",
            Self::CorruptConversation { .. } => "CorruptConversationError",
            Self::NotFound(_) => "NotFoundError",
            Self::Validation(_) => "ValidationError",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

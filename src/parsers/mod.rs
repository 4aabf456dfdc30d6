//! Export parsing for ChatGPT data archives
//!
//! # Error Handling Strategy
//!
//! Parsing is split into two levels with different failure policies:
//!
//! - **Archive level**: an unreadable path, a ZIP without `conversations.json`, or content
//!   that is not a JSON array is fatal. [`load_export`] returns the error and nothing is
//!   served until the export is fixed.
//!
//! - **Record level**: each array element is decoded independently during reconstruction.
//!   A record that does not match the expected shape is excluded and counted as corrupt,
//!   so one malformed conversation never hides the rest of the archive.

pub mod deserializers;
pub mod export;

pub use export::{CONVERSATIONS_ENTRY, load_export, parse_records, read_export_bytes};

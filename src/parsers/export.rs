//! Export archive loading.
//!
//! Accepts either a ChatGPT data-export ZIP (detected by its signature, not the
//! file extension) holding a `conversations.json` entry, or that JSON file on
//! its own. The file is opened read-only and read exactly once.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{Error, Result};
use crate::utils::paths::{MAX_EXPORT_SIZE_BYTES, validate_file_size};

/// Name of the archive entry holding the conversations. Matched exactly.
pub const CONVERSATIONS_ENTRY: &str = "conversations.json";

const ZIP_SIGNATURE: [u8; 4] = *b"PK\x03\x04";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Load an export and return its raw conversation records.
///
/// # Errors
///
/// - [`Error::Io`] if the path cannot be opened or read
/// - [`Error::Format`] if a ZIP lacks `conversations.json` or the content is too large
/// - [`Error::Parse`] if the content is not a JSON array
pub fn load_export(path: &Path) -> Result<Vec<Value>> {
    let bytes = read_export_bytes(path)?;
    info!("Read {} bytes of conversation data from {}", bytes.len(), path.display());
    parse_records(&bytes)
}

/// Read the raw `conversations.json` bytes, unpacking a ZIP archive when needed.
pub fn read_export_bytes(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    validate_file_size(&file, path)?;

    let mut signature = [0u8; 4];
    let is_zip = match file.read_exact(&mut signature) {
        Ok(()) => signature == ZIP_SIGNATURE,
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => false,
        Err(e) => return Err(Error::io(path, e)),
    };
    file.rewind().map_err(|e| Error::io(path, e))?;

    if is_zip {
        debug!("{} is a ZIP archive", path.display());
        read_zip_entry(file, path)
    } else {
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| Error::io(path, e))?;
        Ok(bytes)
    }
}

fn read_zip_entry(file: File, path: &Path) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| zip_error(e, path))?;
    let entry = match archive.by_name(CONVERSATIONS_ENTRY) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(Error::Format(format!(
                "{} does not contain a {} entry",
                path.display(),
                CONVERSATIONS_ENTRY
            )));
        }
        Err(e) => return Err(zip_error(e, path)),
    };

    let declared = entry.size();
    if declared > MAX_EXPORT_SIZE_BYTES {
        return Err(Error::Format(format!(
            "{} in {} is too large ({} bytes, max {} bytes)",
            CONVERSATIONS_ENTRY,
            path.display(),
            declared,
            MAX_EXPORT_SIZE_BYTES
        )));
    }

    // The declared size is not trusted; cap what is actually inflated.
    let mut bytes = Vec::with_capacity(declared as usize);
    entry.take(MAX_EXPORT_SIZE_BYTES + 1).read_to_end(&mut bytes).map_err(|e| Error::io(path, e))?;
    if bytes.len() as u64 > MAX_EXPORT_SIZE_BYTES {
        return Err(Error::Format(format!(
            "{} in {} inflates past {} bytes",
            CONVERSATIONS_ENTRY,
            path.display(),
            MAX_EXPORT_SIZE_BYTES
        )));
    }
    Ok(bytes)
}

fn zip_error(err: ZipError, path: &Path) -> Error {
    match err {
        ZipError::Io(e) => Error::io(path, e),
        other => Error::Format(format!("{} is not a readable ZIP archive: {}", path.display(), other)),
    }
}

/// Parse export bytes into the top-level array of conversation records.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<Value>> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Array(records) => Ok(records),
        other => Err(Error::Parse(format!(
            "expected a JSON array of conversations, found {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Maximum export size, compressed or inflated: 2 GiB
pub const MAX_EXPORT_SIZE_BYTES: u64 = 2 * 1024 * 1024 * 1024;

/// Validates that an export file's size is within acceptable limits (2 GiB)
///
/// Takes an open file handle so the check applies to the file that is actually
/// read, not whatever the path points to a moment later.
///
/// # Errors
///
/// Returns an error if:
/// - The file metadata cannot be read ([`Error::Io`])
/// - The file is larger than 2 GiB ([`Error::Format`])
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file.metadata().map_err(|e| Error::io(path, e))?;

    let file_size = metadata.len();
    if file_size > MAX_EXPORT_SIZE_BYTES {
        return Err(Error::Format(format!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_EXPORT_SIZE_BYTES
        )));
    }

    Ok(())
}

/// Expands a leading `~` to the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use chatgpt_history_search::utils::expand_tilde;
///
/// // "/Users/alice/Downloads/export.zip" for a home of /Users/alice
/// let expanded = expand_tilde(&PathBuf::from("~/Downloads/export.zip"));
/// ```
pub fn expand_tilde(path: &Path) -> PathBuf {
    expand_tilde_internal(path, dirs::home_dir().as_deref())
}

pub(crate) fn expand_tilde_internal(path: &Path, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };
    match path.strip_prefix("~") {
        Ok(rest) if rest.as_os_str().is_empty() => home.to_path_buf(),
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Shorten a path under the home directory to `~/...` for display
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use chatgpt_history_search::format_path_with_tilde;
///
/// // "~/Downloads/export.zip" for a home of /Users/alice
/// let shown = format_path_with_tilde(&PathBuf::from("/Users/alice/Downloads/export.zip"));
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, dirs::home_dir().as_deref())
}

/// Compares whole components, so `/home/al` is not a prefix of `/home/alice`.
pub(crate) fn format_path_with_tilde_internal(path: &Path, home: Option<&Path>) -> String {
    match home.filter(|h| !h.as_os_str().is_empty()).and_then(|h| path.strip_prefix(h).ok()) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => path.display().to_string(),
    }
}

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use super::paths::expand_tilde;

/// Environment variable consulted when `--export-path` is not given.
pub const EXPORT_PATH_ENV: &str = "CHATGPT_EXPORT_PATH";

/// Resolve the export path from the command line, falling back to `CHATGPT_EXPORT_PATH`.
///
/// A leading `~` is expanded to the home directory.
pub fn resolve_export_path(cli_path: Option<&Path>) -> Result<PathBuf> {
    let raw = match cli_path {
        Some(path) => path.to_path_buf(),
        None => match env::var_os(EXPORT_PATH_ENV).filter(|v| !v.is_empty()) {
            Some(value) => PathBuf::from(value),
            None => bail!(
                "No export path provided. Use --export-path or set {}.\n\n\
                 To export your data from ChatGPT:\n  \
                 1. Go to https://chatgpt.com\n  \
                 2. Settings > Data Controls > Export Data\n  \
                 3. Wait for the email and download the ZIP",
                EXPORT_PATH_ENV
            ),
        },
    };
    Ok(expand_tilde(&raw))
}

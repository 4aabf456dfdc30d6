pub mod environment;
pub mod paths;

pub use environment::{EXPORT_PATH_ENV, resolve_export_path};
pub use paths::{MAX_EXPORT_SIZE_BYTES, expand_tilde, format_path_with_tilde, validate_file_size};

//! Centralized constants for paths, format strings and defaults.

/// Directory (relative to the working directory) holding config and captures.
pub const BASE_DIR: &str = "folder_screencapture";

/// Name of the configuration file inside [`BASE_DIR`].
pub const CONFIG_FILE_NAME: &str = "config.file";

/// Segment under [`BASE_DIR`] where capture folders live.
pub const STORAGE_DIR: &str = "storage";

/// Date format for the per-day directory (YYYY-MM-DD).
pub const DATE_FORMAT_DASHED: &str = "%Y-%m-%d";

/// Timestamp format for capture filenames (YYYY-MM-DD_HH-mm-ss).
pub const CAPTURE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Extension of every written capture.
pub const IMAGE_EXTENSION: &str = "png";

pub const MILLIS_PER_MINUTE: u64 = 60_000;

/// Label lines of the config layout. Documentation only; never matched.
pub const SHOTS_LABEL: &str = "Screenshot per minute:";
pub const FOLDER_LABEL: &str = "Folder name:";

pub const DEFAULT_SHOTS_PER_MINUTE: u32 = 3;
pub const DEFAULT_FOLDER_NAME: &str = "folder1";

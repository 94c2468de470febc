use crate::constants::{
    DEFAULT_FOLDER_NAME, DEFAULT_SHOTS_PER_MINUTE, FOLDER_LABEL, MILLIS_PER_MINUTE, SHOTS_LABEL,
};
use crate::storage::atomic_write;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings read once at startup from the line-oriented config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    pub shots_per_minute: u32,
    pub folder_name: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig {
            shots_per_minute: DEFAULT_SHOTS_PER_MINUTE,
            folder_name: DEFAULT_FOLDER_NAME.to_string(),
        }
    }
}

impl CaptureConfig {
    /// Pause between captures: 60000 ms divided by shots per minute, truncated.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(MILLIS_PER_MINUTE / u64::from(self.shots_per_minute))
    }

    /// True when the interval truncation drops a remainder and cadence drifts.
    pub fn has_drift(&self) -> bool {
        MILLIS_PER_MINUTE % u64::from(self.shots_per_minute) != 0
    }

    /// Render in the five-line layout understood by [`parse`].
    pub fn render(&self) -> String {
        format!(
            "{SHOTS_LABEL}\n{}\n\n{FOLDER_LABEL}\n{}\n",
            self.shots_per_minute, self.folder_name
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to create default config at {path}: {source}")]
    Bootstrap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config is missing line {line} ({label})")]
    MissingLine { line: usize, label: &'static str },
    #[error("Shots per minute must be an integer, got '{value}'")]
    NotAnInteger { value: String },
    #[error("Shots per minute must be positive, got {value}")]
    NonPositive { value: i64 },
    #[error("Folder name must not be empty")]
    EmptyFolderName,
}

/// Make sure a config file exists at `path`, then load it.
///
/// A missing file (and any missing parent directories) is created with the
/// default settings. An existing file is never rewritten.
pub fn ensure_config(path: &Path) -> Result<CaptureConfig, ConfigError> {
    if !path.exists() {
        write_default(path).map_err(|source| ConfigError::Bootstrap {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Created default config at {}", path.display());
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents)
}

fn write_default(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    atomic_write(path, CaptureConfig::default().render().as_bytes())
}

/// Parse the positional layout. Label lines are skipped, not validated.
pub fn parse(contents: &str) -> Result<CaptureConfig, ConfigError> {
    let mut lines = contents.lines();
    let mut next_line = |line: usize, label: &'static str| {
        lines
            .next()
            .ok_or(ConfigError::MissingLine { line, label })
    };

    next_line(1, "shots per minute label")?;
    let shots_line = next_line(2, "shots per minute")?;
    next_line(3, "separator")?;
    next_line(4, "folder name label")?;
    let folder_line = next_line(5, "folder name")?;

    let shots_per_minute = parse_shots(shots_line)?;
    if folder_line.is_empty() {
        return Err(ConfigError::EmptyFolderName);
    }

    Ok(CaptureConfig {
        shots_per_minute,
        folder_name: folder_line.to_string(),
    })
}

fn parse_shots(value: &str) -> Result<u32, ConfigError> {
    let not_an_integer = || ConfigError::NotAnInteger {
        value: value.to_string(),
    };
    let parsed: i64 = value.parse().map_err(|_| not_an_integer())?;
    if parsed <= 0 {
        return Err(ConfigError::NonPositive { value: parsed });
    }
    u32::try_from(parsed).map_err(|_| not_an_integer())
}

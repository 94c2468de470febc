pub mod capture;
pub mod cli;
pub mod config;
pub mod constants;
pub mod logging;
pub mod scheduler;
pub mod storage;

use capture::{FrameCapturer, PrimaryScreen};
use chrono::{Local, NaiveDate};
use clap::Parser;
use cli::Cli;
use config::{CaptureConfig, ConfigError};
use constants::{BASE_DIR, CONFIG_FILE_NAME};
use scheduler::{CancellationToken, CaptureScheduler, ThreadSleeper};
use std::path::Path;
use storage::{OutputDirectory, StorageError};

/// Startup failures. Anything after the capture loop starts is only logged.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Storage(StorageError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "{err}"),
            AppError::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Storage(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

/// Load the config under `base_dir` and create the output directory for `today`.
///
/// Nothing is created under `storage/` unless the config is valid.
pub fn prepare(
    base_dir: &Path,
    today: NaiveDate,
) -> Result<(CaptureConfig, OutputDirectory), AppError> {
    let config_path = base_dir.join(CONFIG_FILE_NAME);
    let config = config::ensure_config(&config_path)?;
    log::info!(
        "Loaded {}: {} shots per minute into '{}'",
        config_path.display(),
        config.shots_per_minute,
        config.folder_name
    );

    let directory = storage::resolve(base_dir, &config.folder_name, today);
    storage::ensure_exists(&directory)?;
    log::info!(
        "Writing captures for {} to {}",
        directory.date(),
        directory.path().display()
    );

    Ok((config, directory))
}

pub fn run() -> Result<(), AppError> {
    let _ = Cli::parse();
    logging::init();

    let (config, directory) = prepare(Path::new(BASE_DIR), Local::now().date_naive())?;

    let interval = config.interval();
    if interval.is_zero() {
        log::warn!(
            "{} shots per minute leaves no pause between captures",
            config.shots_per_minute
        );
    } else if config.has_drift() {
        log::warn!(
            "{} does not divide a minute evenly; interval truncated to {} ms",
            config.shots_per_minute,
            interval.as_millis()
        );
    }
    log::info!("Capturing every {} ms", interval.as_millis());

    // The directory stays fixed even if the run crosses midnight.
    let scheduler =
        CaptureScheduler::new(FrameCapturer::new(PrimaryScreen), ThreadSleeper, interval);
    scheduler.run(&directory, &CancellationToken::new());
    Ok(())
}

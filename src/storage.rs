use crate::constants::{DATE_FORMAT_DASHED, STORAGE_DIR};
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

/// The per-day directory every capture of this run is written into.
///
/// Resolved once at startup; later date changes do not move it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirectory {
    path: PathBuf,
    date: NaiveDate,
}

impl OutputDirectory {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to create output directory {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Output path {path} exists but is not a directory")]
    NotADirectory { path: PathBuf },
}

/// Build `<base>/storage/<folder>/<YYYY-MM-DD>` without touching the disk.
///
/// A leading root or drive prefix on `folder_name` is dropped so the result
/// always stays under `<base>/storage`.
pub fn resolve(base_dir: &Path, folder_name: &str, date: NaiveDate) -> OutputDirectory {
    let folder: PathBuf = Path::new(folder_name)
        .components()
        .filter(|component| !matches!(component, Component::RootDir | Component::Prefix(_)))
        .collect();
    let path = base_dir
        .join(STORAGE_DIR)
        .join(folder)
        .join(date.format(DATE_FORMAT_DASHED).to_string());
    OutputDirectory { path, date }
}

/// Create every missing segment of the directory. Existing directories are fine.
pub fn ensure_exists(directory: &OutputDirectory) -> Result<(), StorageError> {
    let path = directory.path();
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return Err(StorageError::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    fs::create_dir_all(path).map_err(|source| StorageError::Create {
        path: path.to_path_buf(),
        source,
    })
}

/// Write content atomically by writing to a temp file and renaming.
/// An existing file at `path` is replaced.
pub(crate) fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.flush()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

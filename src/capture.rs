use crate::constants::{CAPTURE_TIMESTAMP_FORMAT, IMAGE_EXTENSION};
use crate::storage::{atomic_write, OutputDirectory};
use chrono::{Local, NaiveDateTime};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::PathBuf;

/// Anything able to produce a full-screen raster on demand.
pub trait ScreenSource {
    fn grab(&self) -> Result<RgbaImage, CaptureError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Screen capture unavailable: {0}")]
    Unavailable(String),
    #[error("Screen capture failed: {0}")]
    Grab(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Failed to write capture {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The platform's primary display.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrimaryScreen;

#[cfg(feature = "native-capture")]
impl ScreenSource for PrimaryScreen {
    fn grab(&self) -> Result<RgbaImage, CaptureError> {
        let monitors =
            xcap::Monitor::all().map_err(|err| CaptureError::Unavailable(err.to_string()))?;
        let monitor = monitors
            .iter()
            .find(|monitor| monitor.is_primary())
            .or_else(|| monitors.first())
            .ok_or_else(|| CaptureError::Unavailable("no monitors reported".to_string()))?;

        let frame = monitor
            .capture_image()
            .map_err(|err| CaptureError::Grab(err.to_string()))?;
        let (width, height) = frame.dimensions();
        RgbaImage::from_raw(width, height, frame.into_raw()).ok_or_else(|| {
            CaptureError::Grab("frame buffer does not match its dimensions".to_string())
        })
    }
}

#[cfg(not(feature = "native-capture"))]
impl ScreenSource for PrimaryScreen {
    fn grab(&self) -> Result<RgbaImage, CaptureError> {
        Err(CaptureError::Unavailable(
            "built without the native-capture feature".to_string(),
        ))
    }
}

/// Takes one snapshot and stores it as `<timestamp>.png` in the output directory.
pub struct FrameCapturer<S> {
    source: S,
}

impl<S: ScreenSource> FrameCapturer<S> {
    pub fn new(source: S) -> Self {
        FrameCapturer { source }
    }

    #[cfg(test)]
    pub(crate) fn source(&self) -> &S {
        &self.source
    }

    pub fn capture(&self, directory: &OutputDirectory) -> Result<PathBuf, CaptureError> {
        self.capture_at(directory, Local::now().naive_local())
    }

    /// Capture using an explicit wall-clock time for the filename.
    pub fn capture_at(
        &self,
        directory: &OutputDirectory,
        taken_at: NaiveDateTime,
    ) -> Result<PathBuf, CaptureError> {
        let frame = self.source.grab()?;
        let bytes = encode_png(&frame)?;
        let path = directory.path().join(capture_file_name(taken_at));
        atomic_write(&path, &bytes).map_err(|source| CaptureError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// `YYYY-MM-DD_HH-mm-ss.png`; second resolution, so same-second captures collide.
pub fn capture_file_name(taken_at: NaiveDateTime) -> String {
    format!(
        "{}.{IMAGE_EXTENSION}",
        taken_at.format(CAPTURE_TIMESTAMP_FORMAT)
    )
}

fn encode_png(frame: &RgbaImage) -> Result<Vec<u8>, CaptureError> {
    let mut buffer = Cursor::new(Vec::new());
    frame.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ensure_exists, resolve};
    use assert_fs::prelude::*;
    use chrono::NaiveDate;
    use image::Rgba;
    use predicates::prelude::*;
    use std::fs;

    struct SolidSource;

    impl ScreenSource for SolidSource {
        fn grab(&self) -> Result<RgbaImage, CaptureError> {
            Ok(RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255])))
        }
    }

    struct BrokenSource;

    impl ScreenSource for BrokenSource {
        fn grab(&self) -> Result<RgbaImage, CaptureError> {
            Err(CaptureError::Unavailable("no display".to_string()))
        }
    }

    fn sample_instant() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 12, 25)
            .unwrap()
            .and_hms_opt(18, 1, 9)
            .unwrap()
    }

    #[test]
    fn formats_filename_with_second_resolution() {
        assert_eq!(capture_file_name(sample_instant()), "2024-12-25_18-01-09.png");
    }

    #[test]
    fn writes_png_named_after_capture_time() {
        let temp = assert_fs::TempDir::new().unwrap();
        let directory = resolve(temp.path(), "folder1", sample_instant().date());
        ensure_exists(&directory).unwrap();

        let path = FrameCapturer::new(SolidSource)
            .capture_at(&directory, sample_instant())
            .unwrap();

        let expected = temp.child("storage/folder1/2024-12-25/2024-12-25_18-01-09.png");
        assert_eq!(path, expected.path());
        expected.assert(predicate::path::is_file());

        let decoded = image::load_from_memory(&fs::read(&path).unwrap()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
        assert_eq!(decoded.to_rgba8().get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn capture_after_midnight_stays_in_start_day_directory() {
        let temp = assert_fs::TempDir::new().unwrap();
        let start_day = sample_instant().date();
        let directory = resolve(temp.path(), "folder1", start_day);
        ensure_exists(&directory).unwrap();
        let next_day = start_day
            .succ_opt()
            .unwrap()
            .and_hms_opt(0, 0, 5)
            .unwrap();

        let path = FrameCapturer::new(SolidSource)
            .capture_at(&directory, next_day)
            .unwrap();

        let expected = temp.child("storage/folder1/2024-12-25/2024-12-26_00-00-05.png");
        assert_eq!(path, expected.path());
        expected.assert(predicate::path::is_file());
        temp.child("storage/folder1/2024-12-26")
            .assert(predicate::path::missing());
    }

    #[test]
    fn same_second_capture_overwrites() {
        let temp = assert_fs::TempDir::new().unwrap();
        let directory = resolve(temp.path(), "folder1", sample_instant().date());
        ensure_exists(&directory).unwrap();
        let capturer = FrameCapturer::new(SolidSource);

        capturer.capture_at(&directory, sample_instant()).unwrap();
        capturer.capture_at(&directory, sample_instant()).unwrap();

        assert_eq!(fs::read_dir(directory.path()).unwrap().count(), 1);
    }

    #[test]
    fn source_failure_writes_nothing() {
        let temp = assert_fs::TempDir::new().unwrap();
        let directory = resolve(temp.path(), "folder1", sample_instant().date());
        ensure_exists(&directory).unwrap();

        let err = FrameCapturer::new(BrokenSource)
            .capture_at(&directory, sample_instant())
            .unwrap_err();

        assert!(matches!(err, CaptureError::Unavailable(_)));
        assert_eq!(fs::read_dir(directory.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_directory_is_a_write_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let directory = resolve(temp.path(), "folder1", sample_instant().date());

        let err = FrameCapturer::new(SolidSource)
            .capture_at(&directory, sample_instant())
            .unwrap_err();

        assert!(matches!(err, CaptureError::Write { .. }));
    }
}

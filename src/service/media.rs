use crate::error::TrackError;
use crate::service::ids;
use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Limits, RgbImage};
use std::fs;
use std::io::{BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const TARGET_WIDTH: u32 = 800;
pub const FIRST_PASS_QUALITY: u8 = 70;
pub const SECOND_PASS_QUALITY: u8 = 50;
pub const MAX_FIRST_PASS_BYTES: u64 = 100 * 1024;
/// Largest accepted source width or height.
pub const MAX_SOURCE_DIMENSION: u32 = 12_000;
/// Largest height after scaling to `TARGET_WIDTH`.
pub const MAX_TARGET_HEIGHT: u32 = 8 * TARGET_WIDTH;
const MAX_DECODE_ALLOC: u64 = 256 * 1024 * 1024;

const TEMP_DIR: &str = "temp";

/// Destination folder (and public sub-path) of an ingested image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    StudentPhoto,
    DriverLicence,
}

impl UploadKind {
    fn dir(&self) -> &'static str {
        match self {
            Self::StudentPhoto => "students",
            Self::DriverLicence => "drivers",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            Self::StudentPhoto => "student",
            Self::DriverLicence => "dl",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedImage {
    /// Path served under `/uploads`, e.g. `/uploads/students/student_..jpg`.
    pub public_path: String,
    pub first_pass_bytes: u64,
    pub final_bytes: u64,
    pub recompressed: bool,
}

/// Resizes and compresses uploaded images into the upload root.
#[derive(Debug, Clone)]
pub struct MediaIngest {
    root: PathBuf,
}

impl MediaIngest {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the upload folders up front.
    pub fn ensure_dirs(&self) -> Result<(), TrackError> {
        for sub in [
            TEMP_DIR,
            UploadKind::StudentPhoto.dir(),
            UploadKind::DriverLicence.dir(),
        ] {
            fs::create_dir_all(self.root.join(sub))?;
        }
        Ok(())
    }

    /// Resize to `TARGET_WIDTH`, encode at `FIRST_PASS_QUALITY`, and re-encode
    /// at `SECOND_PASS_QUALITY` when the first pass exceeds 100 KiB. The temp
    /// artifact never survives, whether ingest succeeds or fails.
    pub async fn ingest(&self, bytes: Vec<u8>, kind: UploadKind) -> Result<IngestedImage, TrackError> {
        let root = self.root.clone();
        let file_name = ids::upload_file_name(kind.prefix(), Utc::now());
        tokio::task::spawn_blocking(move || ingest_blocking(&root, &bytes, kind, &file_name))
            .await
            .map_err(|e| TrackError::ImageProcessingFailed(format!("ingest task panicked: {e}")))?
    }

    /// Remove a previously ingested image whose owning row was never written.
    pub async fn discard(&self, image: &IngestedImage) {
        let relative = image.public_path.trim_start_matches("/uploads/");
        let path = self.root.join(relative);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(path = %path.display(), error = %e, "failed to discard orphaned upload");
        }
    }
}

fn ingest_blocking(
    root: &Path,
    bytes: &[u8],
    kind: UploadKind,
    file_name: &str,
) -> Result<IngestedImage, TrackError> {
    let temp_dir = root.join(TEMP_DIR);
    let final_dir = root.join(kind.dir());
    fs::create_dir_all(&temp_dir).map_err(image_err)?;
    fs::create_dir_all(&final_dir).map_err(image_err)?;

    let temp_path = temp_dir.join(file_name);
    let final_path = final_dir.join(file_name);

    let result = compress_into(bytes, &temp_path, &final_path);
    if temp_path.exists() {
        if let Err(e) = fs::remove_file(&temp_path) {
            warn!(path = %temp_path.display(), error = %e, "failed to remove temp image");
        }
    }
    if result.is_err() && final_path.exists() {
        let _ = fs::remove_file(&final_path);
    }
    let (first_pass_bytes, final_bytes, recompressed) = result?;

    let public_path = format!("/uploads/{}/{}", kind.dir(), file_name);
    info!(
        path = %public_path,
        first_pass_bytes,
        final_bytes,
        recompressed,
        "image ingested"
    );
    Ok(IngestedImage {
        public_path,
        first_pass_bytes,
        final_bytes,
        recompressed,
    })
}

/// Returns (first pass size, final size, recompressed).
fn compress_into(
    bytes: &[u8],
    temp_path: &Path,
    final_path: &Path,
) -> Result<(u64, u64, bool), TrackError> {
    let decoded = decode_bounded(bytes)?;
    let resized = resize_to_width(&decoded, TARGET_WIDTH)?;
    write_jpeg(&resized, temp_path, FIRST_PASS_QUALITY)?;

    let first_pass_bytes = fs::metadata(temp_path).map_err(image_err)?.len();
    debug!(first_pass_bytes, "first compression pass done");

    if first_pass_bytes > MAX_FIRST_PASS_BYTES {
        let first_pass = image::open(temp_path).map_err(image_err)?.to_rgb8();
        write_jpeg(&first_pass, final_path, SECOND_PASS_QUALITY)?;
        fs::remove_file(temp_path).map_err(image_err)?;
        let final_bytes = fs::metadata(final_path).map_err(image_err)?.len();
        Ok((first_pass_bytes, final_bytes, true))
    } else {
        fs::rename(temp_path, final_path).map_err(image_err)?;
        Ok((first_pass_bytes, first_pass_bytes, false))
    }
}

fn decode_bounded(bytes: &[u8]) -> Result<DynamicImage, TrackError> {
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_SOURCE_DIMENSION);
    limits.max_image_height = Some(MAX_SOURCE_DIMENSION);
    limits.max_alloc = Some(MAX_DECODE_ALLOC);

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image_err)?;
    reader.limits(limits);
    reader.decode().map_err(image_err)
}

fn resize_to_width(img: &DynamicImage, width: u32) -> Result<RgbImage, TrackError> {
    let height = ((img.height() as u64 * width as u64) / img.width().max(1) as u64).max(1);
    if height > MAX_TARGET_HEIGHT as u64 {
        return Err(TrackError::ImageProcessingFailed(format!(
            "{}x{} image is too tall to scale to width {width}",
            img.width(),
            img.height()
        )));
    }
    Ok(img
        .resize_exact(width, height as u32, FilterType::Lanczos3)
        .to_rgb8())
}

fn write_jpeg(img: &RgbImage, path: &Path, quality: u8) -> Result<(), TrackError> {
    let file = fs::File::create(path).map_err(image_err)?;
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, quality)
        .encode_image(img)
        .map_err(image_err)?;
    writer.flush().map_err(image_err)?;
    Ok(())
}

fn image_err(e: impl std::fmt::Display) -> TrackError {
    TrackError::ImageProcessingFailed(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::io::Cursor;

    fn png_bytes(img: RgbImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn noise(width: u32, height: u32) -> Vec<u8> {
        let mut rng = SmallRng::seed_from_u64(7);
        png_bytes(RgbImage::from_fn(width, height, |_, _| {
            Rgb([rng.random(), rng.random(), rng.random()])
        }))
    }

    fn temp_is_empty(root: &Path) -> bool {
        fs::read_dir(root.join(TEMP_DIR)).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn small_image_is_moved_without_recompression() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaIngest::new(dir.path());
        let flat = png_bytes(RgbImage::from_pixel(200, 100, Rgb([30, 120, 200])));

        let out = media.ingest(flat, UploadKind::StudentPhoto).await.unwrap();
        assert!(!out.recompressed);
        assert!(out.public_path.starts_with("/uploads/students/student_"));
        assert!(out.first_pass_bytes <= MAX_FIRST_PASS_BYTES);

        let stored = dir
            .path()
            .join(out.public_path.trim_start_matches("/uploads/"));
        let saved = image::open(&stored).unwrap();
        assert_eq!((saved.width(), saved.height()), (TARGET_WIDTH, 400));
        assert!(temp_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn large_image_is_recompressed_and_shrinks() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaIngest::new(dir.path());

        let out = media
            .ingest(noise(1000, 1000), UploadKind::DriverLicence)
            .await
            .unwrap();
        assert!(out.recompressed);
        assert!(out.first_pass_bytes > MAX_FIRST_PASS_BYTES);
        assert!(out.final_bytes <= out.first_pass_bytes);
        assert!(out.public_path.starts_with("/uploads/drivers/dl_"));
        assert!(temp_is_empty(dir.path()));

        media.discard(&out).await;
        assert!(fs::read_dir(dir.path().join("drivers")).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn extreme_aspect_ratio_is_rejected_before_resizing() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaIngest::new(dir.path());
        let sliver = png_bytes(RgbImage::from_pixel(1, 4000, Rgb([0, 0, 0])));

        let err = media
            .ingest(sliver, UploadKind::StudentPhoto)
            .await
            .unwrap_err();
        assert!(matches!(err, TrackError::ImageProcessingFailed(_)));
        assert!(temp_is_empty(dir.path()));
        assert!(fs::read_dir(dir.path().join("students")).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn oversized_source_dimensions_are_rejected_at_decode() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaIngest::new(dir.path());
        let strip = png_bytes(RgbImage::from_pixel(MAX_SOURCE_DIMENSION + 1, 1, Rgb([9, 9, 9])));

        let err = media
            .ingest(strip, UploadKind::DriverLicence)
            .await
            .unwrap_err();
        assert!(matches!(err, TrackError::ImageProcessingFailed(_)));
        assert!(temp_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn undecodable_upload_fails_and_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaIngest::new(dir.path());

        let err = media
            .ingest(b"definitely not an image".to_vec(), UploadKind::StudentPhoto)
            .await
            .unwrap_err();
        assert!(matches!(err, TrackError::ImageProcessingFailed(_)));
        assert!(temp_is_empty(dir.path()));
        assert!(fs::read_dir(dir.path().join("students")).unwrap().next().is_none());
    }
}

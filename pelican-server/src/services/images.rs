//! Image Store
//!
//! Uploaded cover and dish images live as flat files under
//! `{work_dir}/uploads/images`, named with a collision-resistant uuid suffix.
//! Uploads are validated and re-encoded to JPEG; files disappear either when
//! replaced or when the orphan sweep finds them unreferenced past their TTL.

use chrono::{DateTime, Duration, Utc};
use image::DynamicImage;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::utils::{AppError, AppResult};

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for stored images
const JPEG_QUALITY: u8 = 85;

/// A freshly persisted image
#[derive(Debug, Clone)]
pub struct StoredImage {
    /// On-disk name, `{uuid}.jpg`
    pub filename: String,
    /// Compressed size in bytes
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    images_dir: PathBuf,
}

impl ImageStore {
    pub fn new(images_dir: PathBuf) -> Self {
        Self { images_dir }
    }

    /// Validate, re-encode and persist an uploaded image
    pub fn store(&self, data: &[u8], original_name: &str) -> AppResult<StoredImage> {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str().map(str::to_lowercase))
            .ok_or_else(|| {
                AppError::validation(format!("Invalid file extension for: {}", original_name))
            })?;

        validate_image(data, &ext)?;
        let compressed = compress_to_jpeg(data)?;

        let filename = format!("{}.jpg", Uuid::new_v4());
        let file_path = self.images_dir.join(&filename);
        std::fs::write(&file_path, &compressed)
            .map_err(|e| AppError::internal(format!("Failed to save image: {}", e)))?;

        tracing::info!(
            original_name = %original_name,
            size = %compressed.len(),
            file = %filename,
            "Image stored"
        );
        Ok(StoredImage {
            filename,
            size: compressed.len(),
        })
    }

    /// Resolve a stored filename to its on-disk path
    ///
    /// Rejects anything that is not a bare filename (no path traversal).
    pub fn resolve(&self, filename: &str) -> AppResult<PathBuf> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return Err(AppError::validation("Invalid image filename"));
        }
        let path = self.images_dir.join(filename);
        if !path.exists() {
            return Err(AppError::not_found(format!("Image {}", filename)));
        }
        Ok(path)
    }

    /// Delete a stored image, best-effort
    ///
    /// Used when a replaced cover leaves its old file orphaned. Failures are
    /// logged, never surfaced to the request that triggered the replacement.
    pub fn delete(&self, filename: &str) {
        let path = self.images_dir.join(filename);
        match std::fs::remove_file(&path) {
            Ok(()) => tracing::debug!(file = %filename, "Image deleted"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(file = %filename, error = %e, "Failed to delete image"),
        }
    }

    /// Delete unreferenced images older than the TTL
    ///
    /// `in_use` carries every filename still referenced by a restaurant cover
    /// or a live menu item. Returns the number of files deleted; per-file
    /// failures are logged and do not stop the scan.
    pub async fn cleanup_orphans(
        &self,
        in_use: &HashSet<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> usize {
        let mut dir = match tokio::fs::read_dir(&self.images_dir).await {
            Ok(dir) => dir,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to scan images directory");
                return 0;
            }
        };

        let mut deleted_count = 0;
        while let Ok(Some(entry)) = dir.next_entry().await {
            let Some(filename) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if in_use.contains(&filename) {
                continue;
            }

            let modified: DateTime<Utc> = match entry.metadata().await.and_then(|m| m.modified()) {
                Ok(mtime) => mtime.into(),
                Err(e) => {
                    tracing::warn!(file = %filename, error = %e, "Failed to read image mtime");
                    continue;
                }
            };
            if now - modified <= ttl {
                continue;
            }

            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => deleted_count += 1,
                Err(e) => {
                    tracing::warn!(file = %filename, error = %e, "Failed to delete orphan image");
                }
            }
        }

        if deleted_count > 0 {
            tracing::info!(count = deleted_count, "Orphan images cleaned up");
        }
        deleted_count
    }
}

/// Size cap, extension allowlist, and a decode check
fn validate_image(data: &[u8], ext: &str) -> AppResult<()> {
    if data.is_empty() {
        return Err(AppError::validation("Empty file provided"));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }
    if !SUPPORTED_FORMATS.contains(&ext) {
        return Err(AppError::validation(format!(
            "Unsupported file format '{}'. Supported: {}",
            ext,
            SUPPORTED_FORMATS.join(", ")
        )));
    }
    if let Err(e) = image::load_from_memory(data) {
        return Err(AppError::validation(format!(
            "Invalid image file ({}): {}",
            ext, e
        )));
    }
    Ok(())
}

fn compress_to_jpeg(data: &[u8]) -> AppResult<Vec<u8>> {
    let img: DynamicImage = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {}", e)))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| AppError::internal(format!("Failed to compress image: {}", e)))?;
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_fixture() -> Vec<u8> {
        // 1x1 white pixel, encoded through the image crate itself
        let img = image::RgbImage::from_pixel(1, 1, image::Rgb([255, 255, 255]));
        let mut buffer = Vec::new();
        img.write_to(
            &mut Cursor::new(&mut buffer),
            image::ImageFormat::Png,
        )
        .unwrap();
        buffer
    }

    #[test]
    fn store_rejects_non_images_and_bad_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().to_path_buf());

        assert!(store.store(b"not an image", "cover.png").is_err());
        assert!(store.store(&png_fixture(), "cover.gif").is_err());
        assert!(store.store(&[], "cover.png").is_err());
    }

    #[test]
    fn store_and_resolve_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().to_path_buf());

        let stored = store.store(&png_fixture(), "cover.png").unwrap();
        assert!(stored.filename.ends_with(".jpg"));
        assert!(stored.size > 0);
        assert!(store.resolve(&stored.filename).is_ok());

        store.delete(&stored.filename);
        assert!(matches!(
            store.resolve(&stored.filename),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn resolve_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().to_path_buf());

        assert!(store.resolve("../secret.txt").is_err());
        assert!(store.resolve("a/b.jpg").is_err());
    }

    #[tokio::test]
    async fn orphan_sweep_spares_referenced_and_fresh_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().to_path_buf());

        let referenced = store.store(&png_fixture(), "cover.png").unwrap().filename;
        let orphan = store.store(&png_fixture(), "stale.png").unwrap().filename;

        let in_use: HashSet<String> = [referenced.clone()].into();

        // Fresh files survive even when unreferenced
        let deleted = store
            .cleanup_orphans(&in_use, Utc::now(), Duration::hours(3))
            .await;
        assert_eq!(deleted, 0);

        // Past the TTL only the orphan goes
        let deleted = store
            .cleanup_orphans(&in_use, Utc::now() + Duration::hours(4), Duration::hours(3))
            .await;
        assert_eq!(deleted, 1);
        assert!(store.resolve(&referenced).is_ok());
        assert!(store.resolve(&orphan).is_err());
    }
}

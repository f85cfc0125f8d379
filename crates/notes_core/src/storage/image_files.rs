//! Image file manager for note attachments.
//!
//! # Responsibility
//! - Decide whether an image URL already lives in app-private storage.
//! - Copy external images into app-private storage under fresh names.
//! - Delete private images that no note references anymore.
//!
//! # Invariants
//! - Copies are named `IMG_<uuid>.jpg` and never overwrite existing files.
//! - `delete_image` is a no-op for URLs outside the private directory.
//! - Deleting an already missing file succeeds.

use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

const FILE_URL_PREFIX: &str = "file://";
const IMAGE_FILE_PREFIX: &str = "IMG_";
const IMAGE_FILE_EXTENSION: &str = "jpg";

pub type ImageResult<T> = Result<T, ImageError>;

/// Failure while touching image files.
#[derive(Debug)]
pub enum ImageError {
    /// File system operation failed on `path`.
    Io { path: PathBuf, source: io::Error },
    /// URL cannot be resolved to a readable local file.
    InvalidSource(String),
}

impl Display for ImageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "image file `{}`: {source}", path.display()),
            Self::InvalidSource(url) => write!(f, "unsupported image source `{url}`"),
        }
    }
}

impl Error for ImageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidSource(_) => None,
        }
    }
}

/// Image lifecycle operations the notes repository depends on.
pub trait ImageFileManager {
    /// Returns whether `url` already points into app-private storage.
    fn is_internal(&self, url: &str) -> bool;
    /// Copies the image behind `url` into app-private storage and returns
    /// the private path.
    fn copy_image_to_internal_storage(&self, url: &str) -> ImageResult<String>;
    /// Deletes a private image. External URLs are left alone.
    fn delete_image(&self, url: &str) -> ImageResult<()>;
    /// Rewrites a private image URL to the one form the store keeps, so two
    /// spellings of the same file compare equal. Other URLs come back
    /// unchanged.
    fn canonical_url(&self, url: &str) -> String {
        url.to_string()
    }
}

/// File-system image manager rooted at one private directory.
#[derive(Debug, Clone)]
pub struct LocalImageFileManager {
    images_dir: PathBuf,
}

impl LocalImageFileManager {
    /// Creates a manager, creating `images_dir` when missing.
    pub fn try_new(images_dir: impl Into<PathBuf>) -> ImageResult<Self> {
        let images_dir = images_dir.into();
        std::fs::create_dir_all(&images_dir).map_err(|source| ImageError::Io {
            path: images_dir.clone(),
            source,
        })?;
        Ok(Self { images_dir })
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    fn new_image_path(&self) -> PathBuf {
        self.images_dir.join(format!(
            "{IMAGE_FILE_PREFIX}{}.{IMAGE_FILE_EXTENSION}",
            Uuid::new_v4().simple()
        ))
    }
}

impl ImageFileManager for LocalImageFileManager {
    fn is_internal(&self, url: &str) -> bool {
        let Some(path) = local_path(url) else {
            return false;
        };
        let escapes = path
            .components()
            .any(|component| matches!(component, Component::ParentDir));
        !escapes && path.starts_with(&self.images_dir)
    }

    fn copy_image_to_internal_storage(&self, url: &str) -> ImageResult<String> {
        let source = local_path(url).ok_or_else(|| ImageError::InvalidSource(url.to_string()))?;
        let target = self.new_image_path();
        let target_text = target
            .to_str()
            .ok_or_else(|| ImageError::InvalidSource(target.display().to_string()))?
            .to_string();

        let bytes = std::fs::copy(&source, &target).map_err(|source_err| ImageError::Io {
            path: source.clone(),
            source: source_err,
        })?;

        info!("event=image_copy module=storage status=ok bytes={bytes}");
        Ok(target_text)
    }

    fn delete_image(&self, url: &str) -> ImageResult<()> {
        if !self.is_internal(url) {
            warn!("event=image_delete module=storage status=skipped reason=external_url");
            return Ok(());
        }
        let Some(path) = local_path(url) else {
            return Ok(());
        };

        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!("event=image_delete module=storage status=ok");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("event=image_delete module=storage status=ok reason=already_missing");
                Ok(())
            }
            Err(source) => Err(ImageError::Io { path, source }),
        }
    }

    fn canonical_url(&self, url: &str) -> String {
        let Some(path) = local_path(url).filter(|_| self.is_internal(url)) else {
            return url.to_string();
        };
        // `components()` drops `.` segments and repeated separators.
        let canonical: PathBuf = path.components().collect();
        canonical
            .to_str()
            .map(str::to_string)
            .unwrap_or_else(|| url.to_string())
    }
}

/// Resolves a plain path or `file://` URL to a local path.
///
/// Other URL schemes have no local file and resolve to `None`.
fn local_path(url: &str) -> Option<PathBuf> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(rest) = trimmed.strip_prefix(FILE_URL_PREFIX) {
        return Some(PathBuf::from(rest));
    }
    if trimmed.contains("://") {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

//! Windows icon resolution and validation.
//!
//! Locates the application icon and checks the container before anything
//! downstream sees the path: an unvalidated icon path never reaches a
//! signing or builder step.

use crate::packager::error::{Error, Result};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Minimum dimension required for the largest image in the container.
const MIN_ICON_SIZE: u32 = 256;

/// Conventional icon file name in the build-resources directory.
const DEFAULT_ICON_NAME: &str = "icon.ico";

/// A validated icon file reference.
///
/// Invariant: `path` points at a structurally valid ICO container whose
/// largest embedded image is at least 256x256.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconAsset {
    path: PathBuf,
    width: u32,
    height: u32,
}

impl IconAsset {
    /// Returns the validated icon path, unchanged from resolution.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Dimensions of the largest embedded image.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Resolves and validates the application icon.
///
/// An explicit `icon` name from configuration (with or without the `.ico`
/// extension) is looked up in the project root and then the build-resources
/// directory. Without an explicit name, the conventional
/// `<build-resources>/icon.ico` is used if present.
///
/// Returns `Ok(None)` when no icon exists anywhere; formats that need no
/// icon build without one.
///
/// # Errors
///
/// - [`Error::InvalidConfig`] when an explicitly configured icon cannot be
///   found at any candidate path
/// - [`Error::IconNotValid`] when the file is not an ICO container
/// - [`Error::IconTooSmall`] when the largest image is under 256x256
pub async fn resolve_icon(
    project_dir: &Path,
    build_resources_dir: &Path,
    configured: Option<&str>,
) -> Result<Option<IconAsset>> {
    let path = match configured {
        Some(name) => {
            let Some(path) = locate_configured(project_dir, build_resources_dir, name) else {
                return Err(Error::InvalidConfig {
                    field: "icon".into(),
                    message: format!("icon '{name}' not found in project"),
                });
            };
            path
        }
        None => {
            let default = build_resources_dir.join(DEFAULT_ICON_NAME);
            if !default.is_file() {
                log::debug!("no {DEFAULT_ICON_NAME} in {}, skipping icon", build_resources_dir.display());
                return Ok(None);
            }
            default
        }
    };

    validate_icon(&path).await.map(Some)
}

/// Candidate paths for an explicitly configured icon name, in resolution
/// order. The first existing file wins.
fn locate_configured(project_dir: &Path, build_resources_dir: &Path, name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::with_capacity(4);
    for dir in [project_dir, build_resources_dir] {
        candidates.push(dir.join(name));
        if Path::new(name).extension().is_none() {
            candidates.push(dir.join(format!("{name}.ico")));
        }
    }
    candidates.into_iter().find(|candidate| candidate.is_file())
}

/// Parses the ICO container and enforces the minimum-size constraint.
pub async fn validate_icon(path: &Path) -> Result<IconAsset> {
    let bytes = tokio::fs::read(path).await?;

    let icon_dir = ico::IconDir::read(Cursor::new(bytes))
        .map_err(|_| Error::IconNotValid(path.to_path_buf()))?;

    let largest = icon_dir
        .entries()
        .iter()
        .max_by_key(|entry| u64::from(entry.width()) * u64::from(entry.height()))
        .ok_or_else(|| Error::IconNotValid(path.to_path_buf()))?;

    let (width, height) = (largest.width(), largest.height());
    if width < MIN_ICON_SIZE || height < MIN_ICON_SIZE {
        return Err(Error::IconTooSmall(path.to_path_buf()));
    }

    Ok(IconAsset {
        path: path.to_path_buf(),
        width,
        height,
    })
}

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::assets::decode::{NormalizedImage, decode_image_file};
use crate::foundation::error::{ReelError, ReelResult, ReelWarning};

/// Extensions accepted as strip sources (compared case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// A decoded strip image together with the file it came from.
#[derive(Clone, Debug)]
pub struct SourcedImage {
    /// Source file.
    pub path: PathBuf,
    /// Image scaled to the canvas height.
    pub image: NormalizedImage,
}

/// Result of decoding a folder: usable images in listing order plus skipped files.
#[derive(Clone, Debug, Default)]
pub struct LoadedImages {
    /// Successfully decoded images, in file-name order.
    pub images: Vec<SourcedImage>,
    /// One warning per file that failed to decode.
    pub skipped: Vec<ReelWarning>,
}

/// List image files in `dir`, sorted by file name.
///
/// The sort is byte-wise on the file name; callers control order with their naming
/// convention (`001.jpg`, `002.jpg`, ...).
pub fn list_images(dir: &Path) -> ReelResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ReelError::config(format!(
            "input folder '{}' does not exist or is not a directory",
            dir.display()
        )));
    }
    let rd = std::fs::read_dir(dir).map_err(|e| {
        ReelError::config(format!("failed to read input folder '{}': {e}", dir.display()))
    })?;

    let mut paths = Vec::new();
    for entry in rd {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "unreadable folder entry skipped");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// Decode and normalize `paths` in parallel, keeping their order.
///
/// Decode failures are absorbed into [`LoadedImages::skipped`].
pub fn load_images(paths: &[PathBuf], target_h: u32) -> LoadedImages {
    let decoded: Vec<(PathBuf, ReelResult<NormalizedImage>)> = paths
        .par_iter()
        .map(|path| (path.clone(), decode_image_file(path, target_h)))
        .collect();

    let mut out = LoadedImages::default();
    for (path, res) in decoded {
        match res {
            Ok(image) => out.images.push(SourcedImage { path, image }),
            Err(e) => {
                let reason = match e {
                    ReelError::Decode { message, .. } => message,
                    other => other.to_string(),
                };
                let warning = ReelWarning::SkippedImage { path, reason };
                tracing::warn!(%warning, "image skipped");
                out.skipped.push(warning);
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;

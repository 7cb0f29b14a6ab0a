use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// Check if a path looks like a photo or video by its MIME type
pub fn is_media_file(path: &Path) -> bool {
    mime_guess::from_path(path).iter().any(|mime| {
        let top = mime.type_();
        top == mime_guess::mime::IMAGE || top == mime_guess::mime::VIDEO
    })
}

/// List photos and videos directly inside `dir`, sorted by file name.
/// Subdirectories are not descended into.
pub fn scan_media(dir: &Path) -> Result<Vec<PathBuf>, CoreError> {
    if !dir.is_dir() {
        return Err(CoreError::NotADirectory(dir.to_path_buf()));
    }
    let io_err = |source| CoreError::Io { path: dir.to_path_buf(), source };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        // Follows symlinks, like the rename will.
        if !path.is_file() {
            continue;
        }
        if is_media_file(&path) {
            files.push(path);
        } else {
            log::trace!("skipping non-media file {}", path.display());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    log::info!("found {} media file(s) in {}", files.len(), dir.display());
    Ok(files)
}

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::error::RenameError;
use crate::media::MediaFile;
use crate::ProgressCallback;

/// A rename that did not happen.
#[derive(Debug, Clone, Serialize)]
pub struct RenameFailure {
    pub filename: String,
    pub error: String,
}

/// Result of the rename phase.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub total: u64,
    pub renamed: u64,
    pub failed: u64,
    pub errors: Vec<RenameFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Rename one file to its assigned name inside `dir`. Never overwrites.
pub fn rename_one(m: &MediaFile, dir: &Path) -> Result<(), RenameError> {
    let new_name = m.new_filename.as_deref().ok_or(RenameError::Unassigned)?;
    let dest = dir.join(new_name);
    // Not `exists()`: a dangling symlink still occupies the name.
    match fs::symlink_metadata(&dest) {
        Ok(_) => return Err(RenameError::TargetExists(dest)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }
    fs::rename(&m.original_path, &dest)?;
    Ok(())
}

/// Rename every file of the batch in order. A failure is recorded and the
/// remaining files are still processed.
pub fn rename_all(media: &[MediaFile], dir: &Path, progress: &ProgressCallback) -> BatchReport {
    let total = media.len() as u64;
    let mut report = BatchReport { total, ..BatchReport::default() };

    for (i, m) in media.iter().enumerate() {
        match rename_one(m, dir) {
            Ok(()) => {
                report.renamed += 1;
                log::debug!("renamed {:?} -> {:?}", m.filename, m.new_filename);
            }
            Err(err) => {
                log::warn!("could not rename {}: {}", m.filename, err);
                report.failed += 1;
                report.errors.push(RenameFailure {
                    filename: m.filename.clone(),
                    error: err.to_string(),
                });
            }
        }
        progress("rename", i as u64, total, &m.filename);
    }

    report
}

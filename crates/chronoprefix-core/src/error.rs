use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why an extractor found no capture date. Never leaves the resolver.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("EXIF: {0}")]
    Exif(#[from] exif::Error),
    #[error("MP4: {0}")]
    Mp4(#[from] mp4::Error),
    #[error("media container: {0}")]
    Container(#[from] nom_exif::Error),
    #[error("unrecognised container format")]
    UnknownFormat,
    #[error("malformed {0}")]
    Malformed(&'static str),
    #[error("no {0} field")]
    Missing(&'static str),
    #[error("unparseable date value {0:?}")]
    BadDate(String),
}

/// Per-file failure of the rename phase.
#[derive(Error, Debug)]
pub enum RenameError {
    #[error("target already exists: {}", .0.display())]
    TargetExists(PathBuf),
    #[error("no new name assigned")]
    Unassigned,
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("'{}' is not a valid directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

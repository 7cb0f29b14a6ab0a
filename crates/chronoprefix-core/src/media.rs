use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;

use crate::date::{DateResult, DateSource};

/// Filesystem timestamps of a file, as local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTimes {
    pub modified: Option<NaiveDateTime>,
    pub created: NaiveDateTime,
}

impl FileTimes {
    /// Read modify/create times from a stat result.
    /// Birth time is preferred for `created`; on Unix the inode change time
    /// stands in when the filesystem does not record one.
    pub fn from_metadata(meta: &Metadata) -> io::Result<Self> {
        let modified = meta.modified().ok().map(to_local_naive);
        let created = match meta.created() {
            Ok(t) => to_local_naive(t),
            Err(err) => change_time(meta).ok_or(err)?,
        };
        Ok(Self { modified, created })
    }

    pub fn read(path: &Path) -> io::Result<Self> {
        Self::from_metadata(&std::fs::metadata(path)?)
    }
}

fn to_local_naive(t: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(t).naive_local()
}

#[cfg(unix)]
fn change_time(meta: &Metadata) -> Option<NaiveDateTime> {
    use std::os::unix::fs::MetadataExt;

    let nanos = u32::try_from(meta.ctime_nsec()).ok()?;
    let utc = DateTime::from_timestamp(meta.ctime(), nanos)?;
    Some(utc.with_timezone(&Local).naive_local())
}

#[cfg(not(unix))]
fn change_time(_meta: &Metadata) -> Option<NaiveDateTime> {
    None
}

/// One file of a processing batch.
#[derive(Debug, Clone, Serialize)]
pub struct MediaFile {
    /// Absolute path of the file before renaming
    pub original_path: PathBuf,
    /// Just the filename
    pub filename: String,
    /// Filesystem modification time
    pub modified: Option<NaiveDateTime>,
    /// Filesystem creation (or change) time
    pub created: NaiveDateTime,
    /// Capture date from embedded metadata
    pub captured: Option<NaiveDateTime>,
    /// Date used for the prefix
    pub resolved: NaiveDateTime,
    /// Which timestamp `resolved` came from
    pub source: DateSource,
    /// Prefixed name, set by the naming phase
    pub new_filename: Option<String>,
}

impl MediaFile {
    pub fn new(
        original_path: PathBuf,
        filename: String,
        times: FileTimes,
        captured: Option<NaiveDateTime>,
    ) -> Self {
        let DateResult { date, source } =
            crate::date::select_date(captured, times.modified, times.created);
        Self {
            original_path,
            filename,
            modified: times.modified,
            created: times.created,
            captured,
            resolved: date,
            source,
            new_filename: None,
        }
    }

    /// True when the prefix comes from a filesystem timestamp.
    pub fn uses_fallback(&self) -> bool {
        self.source.is_fallback()
    }
}

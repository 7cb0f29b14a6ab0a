use std::path::Path;

use chrono::NaiveDateTime;
use nom_exif::{EntryValue, MediaParser, MediaSource, TrackInfo, TrackInfoTag};

use crate::error::MetadataError;

pub(crate) const EBML_MAGIC: [u8; 4] = [0x1A, 0x45, 0xDF, 0xA3];

/// Read `Segment/Info/DateUTC` from a Matroska or WebM file.
pub fn read_date_utc(path: &Path) -> Result<NaiveDateTime, MetadataError> {
    let source = MediaSource::file_path(path)?;
    if !source.has_track() {
        return Err(MetadataError::UnknownFormat);
    }

    let mut parser = MediaParser::new();
    let info: TrackInfo = parser.parse(source)?;
    match info.get(TrackInfoTag::CreateDate) {
        Some(EntryValue::Time(t)) => Ok(t.naive_utc()),
        Some(other) => Err(MetadataError::BadDate(other.to_string())),
        None => Err(MetadataError::Missing("DateUTC")),
    }
}

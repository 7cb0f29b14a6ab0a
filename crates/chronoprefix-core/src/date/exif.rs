use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;

use crate::date::DateExtractor;
use crate::error::MetadataError;

const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Reads `DateTimeOriginal` from still images (JPEG, TIFF, HEIF, PNG, WebP).
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageTagExtractor;

impl DateExtractor for ImageTagExtractor {
    fn name(&self) -> &'static str {
        "exif"
    }

    fn extract(&self, path: &Path) -> Result<NaiveDateTime, MetadataError> {
        let mut reader = BufReader::new(File::open(path)?);
        extract_original_date(&mut reader)
    }
}

/// Extract the original capture date from an image container.
/// EXIF datetimes have no timezone info - they are local time as-is.
pub fn extract_original_date<R: BufRead + Seek>(reader: &mut R) -> Result<NaiveDateTime, MetadataError> {
    let exif = Reader::new().read_from_container(reader)?;

    // Only the original-capture tag counts; DateTimeDigitized and DateTime
    // describe scanning and editing.
    let field = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .ok_or(MetadataError::Missing("DateTimeOriginal"))?;

    let raw = match &field.value {
        Value::Ascii(parts) => parts.first().ok_or(MetadataError::Missing("DateTimeOriginal"))?,
        _ => return Err(MetadataError::Malformed("DateTimeOriginal value")),
    };
    let text = String::from_utf8_lossy(raw);
    parse_exif_datetime(&text)
}

fn parse_exif_datetime(s: &str) -> Result<NaiveDateTime, MetadataError> {
    let cleaned = s.trim_end_matches('\0');
    NaiveDateTime::parse_from_str(cleaned, EXIF_DATETIME_FORMAT)
        .map_err(|_| MetadataError::BadDate(cleaned.to_string()))
}

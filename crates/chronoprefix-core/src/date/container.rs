//! Creation dates from media containers.
//!
//! ISO base media files (MP4, MOV, M4V, 3GP) keep it in `moov/mvhd`, Matroska
//! and WebM in `Segment/Info/DateUTC`. Both are stored as UTC and returned as
//! the naive wall-clock value the container holds.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};

use crate::date::{matroska, DateExtractor};
use crate::error::MetadataError;

/// Seconds between 1904-01-01 (QuickTime epoch) and 1970-01-01.
const QT_TO_UNIX_OFFSET: i64 = 2_082_844_800;

/// Box types that may open an ISO base media file.
const LEADING_BOXES: &[[u8; 4]] = &[*b"ftyp", *b"moov", *b"mdat", *b"wide", *b"free", *b"skip", *b"pnot"];

/// Reads creation dates from video and audio containers.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerExtractor;

impl DateExtractor for ContainerExtractor {
    fn name(&self) -> &'static str {
        "container"
    }

    fn extract(&self, path: &Path) -> Result<NaiveDateTime, MetadataError> {
        extract_creation_date(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    IsoBmff,
    Matroska,
}

fn sniff(magic: &[u8; 8]) -> Option<Format> {
    if magic[..4] == matroska::EBML_MAGIC {
        return Some(Format::Matroska);
    }
    let kind = [magic[4], magic[5], magic[6], magic[7]];
    if LEADING_BOXES.contains(&kind) {
        return Some(Format::IsoBmff);
    }
    None
}

/// Detect the container format and read its creation date.
pub fn extract_creation_date(path: &Path) -> Result<NaiveDateTime, MetadataError> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 8];
    reader.read_exact(&mut magic).map_err(|_| MetadataError::UnknownFormat)?;
    reader.rewind()?;

    match sniff(&magic) {
        Some(Format::IsoBmff) => read_mvhd_creation_date(reader, size),
        Some(Format::Matroska) => matroska::read_date_utc(path),
        None => Err(MetadataError::UnknownFormat),
    }
}

/// Read `moov/mvhd` creation_time from an ISO base media stream of `size` bytes.
pub fn read_mvhd_creation_date<R: Read + Seek>(reader: R, size: u64) -> Result<NaiveDateTime, MetadataError> {
    let mp4_file = mp4::Mp4Reader::read_header(reader, size)?;

    // Zero is what muxers write when they have no clock.
    let creation_time = mp4_file.moov.mvhd.creation_time;
    if creation_time == 0 {
        return Err(MetadataError::Missing("mvhd creation_time"));
    }
    qt_seconds_to_naive(creation_time).ok_or(MetadataError::Malformed("mvhd creation_time"))
}

fn qt_seconds_to_naive(qt_seconds: u64) -> Option<NaiveDateTime> {
    let unix = i64::try_from(qt_seconds).ok()?.checked_sub(QT_TO_UNIX_OFFSET)?;
    Some(DateTime::from_timestamp(unix, 0)?.naive_utc())
}

pub mod container;
pub mod exif;
pub mod matroska;
pub mod resolver;

use chrono::NaiveDateTime;
use serde::Serialize;

pub use resolver::{DateExtractor, MetadataResolver, ResolverConfig};

/// Where a resolved date came from, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DateSource {
    /// Embedded capture metadata (EXIF or container)
    Captured,
    /// Filesystem modification time
    Modified,
    /// Filesystem creation time
    Created,
}

impl DateSource {
    pub fn is_fallback(self) -> bool {
        !matches!(self, DateSource::Captured)
    }

    pub fn describe(self) -> &'static str {
        match self {
            DateSource::Captured => "capture date",
            DateSource::Modified => "modified date",
            DateSource::Created => "created date",
        }
    }
}

/// Result of date selection: date + the tier it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateResult {
    pub date: NaiveDateTime,
    pub source: DateSource,
}

/// Pick the prefix date: capture date, then modified, then created.
pub fn select_date(
    captured: Option<NaiveDateTime>,
    modified: Option<NaiveDateTime>,
    created: NaiveDateTime,
) -> DateResult {
    if let Some(date) = captured {
        return DateResult { date, source: DateSource::Captured };
    }

    if let Some(date) = modified {
        return DateResult { date, source: DateSource::Modified };
    }

    DateResult { date: created, source: DateSource::Created }
}

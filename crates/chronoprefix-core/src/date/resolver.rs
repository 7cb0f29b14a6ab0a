use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::date::container::ContainerExtractor;
use crate::date::exif::ImageTagExtractor;
use crate::error::MetadataError;

/// A single way of finding a capture date inside a file.
pub trait DateExtractor {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    fn extract(&self, path: &Path) -> Result<NaiveDateTime, MetadataError>;
}

/// Which extractors the resolver may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    pub image_tags: bool,
    pub container: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { image_tags: true, container: true }
    }
}

/// Finds the embedded capture date of a file, trying each extractor in
/// order. Every failure is a miss; resolution itself cannot fail.
pub struct MetadataResolver {
    extractors: Vec<Box<dyn DateExtractor>>,
}

impl MetadataResolver {
    pub fn new(config: ResolverConfig) -> Self {
        let mut extractors: Vec<Box<dyn DateExtractor>> = Vec::new();
        if config.image_tags {
            extractors.push(Box::new(ImageTagExtractor));
        }
        if config.container {
            extractors.push(Box::new(ContainerExtractor));
        }
        Self { extractors }
    }

    pub fn with_extractors(extractors: Vec<Box<dyn DateExtractor>>) -> Self {
        Self { extractors }
    }

    pub fn resolve_capture_date(&self, path: &Path) -> Option<NaiveDateTime> {
        for extractor in &self.extractors {
            match extractor.extract(path) {
                Ok(date) => {
                    log::debug!("{}: {} date {}", path.display(), extractor.name(), date);
                    return Some(date);
                }
                Err(err) => {
                    log::debug!("{}: no {} date ({})", path.display(), extractor.name(), err);
                }
            }
        }
        None
    }
}

impl Default for MetadataResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

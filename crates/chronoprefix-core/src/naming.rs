use std::collections::HashSet;

use chrono::{NaiveDateTime, Timelike};

use crate::media::MediaFile;

/// Names handed out so far in one batch.
#[derive(Debug, Default, Clone)]
pub struct ReservedNames {
    names: HashSet<String>,
}

impl ReservedNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns false if the name was already taken.
    pub fn reserve(&mut self, name: String) -> bool {
        self.names.insert(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// `YYYY-MM-DD HH:MM:SS`, plus `.mmm` when the time has a fractional second.
/// Milliseconds are truncated, never rounded.
pub fn date_prefix(date: &NaiveDateTime) -> String {
    let base = date.format("%Y-%m-%d %H:%M:%S").to_string();
    // chrono encodes a leap second as nanos >= 1e9
    let nanos = date.nanosecond() % 1_000_000_000;
    if nanos == 0 {
        base
    } else {
        format!("{}.{:03}", base, nanos / 1_000_000)
    }
}

/// Split a filename at its last dot, ignoring leading dots:
/// `clip.final.mp4 -> ("clip.final", ".mp4")`, `.hidden -> (".hidden", "")`.
pub fn split_extension(filename: &str) -> (&str, &str) {
    let leading = filename.len() - filename.trim_start_matches('.').len();
    match filename.rfind('.') {
        Some(pos) if pos > leading => filename.split_at(pos),
        _ => (filename, ""),
    }
}

/// Build the prefixed name for `filename`, numbering it `base (n).ext` with
/// the lowest free `n` if the plain name is already reserved. The caller
/// reserves the result.
pub fn generate_name(date: &NaiveDateTime, filename: &str, reserved: &ReservedNames) -> String {
    let prefix = date_prefix(date);
    let plain = format!("{} {}", prefix, filename);
    if !reserved.contains(&plain) {
        return plain;
    }

    let (base, ext) = split_extension(filename);
    let mut counter = 1u64;
    loop {
        let candidate = format!("{} {} ({}){}", prefix, base, counter, ext);
        if !reserved.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Assign new names to a batch in order, threading one reservation set through it.
pub fn assign_names(media: &mut [MediaFile]) -> ReservedNames {
    let mut reserved = ReservedNames::new();
    for m in media.iter_mut() {
        let name = generate_name(&m.resolved, &m.filename, &reserved);
        reserved.reserve(name.clone());
        m.new_filename = Some(name);
    }
    reserved
}

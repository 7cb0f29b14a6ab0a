pub mod date;
pub mod error;
pub mod media;
pub mod naming;
pub mod prefixed;
pub mod rename;
pub mod scan;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use date::{DateSource, MetadataResolver, ResolverConfig};
pub use error::{CoreError, MetadataError, RenameError};
pub use media::{FileTimes, MediaFile};
pub use naming::{assign_names, date_prefix, generate_name, ReservedNames};
pub use prefixed::{is_already_prefixed, PrefixPolicy};
pub use rename::{rename_all, BatchReport, RenameFailure};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefixOptions {
    /// Directory whose media files get prefixed
    pub dir: PathBuf,
    /// Already-prefixed files: `None` asks the confirmer
    #[serde(default)]
    pub prefix_policy: Option<PrefixPolicy>,
    #[serde(default)]
    pub resolver: ResolverConfig,
    /// Stop after generating names
    #[serde(default)]
    pub dry_run: bool,
}

/// Type alias for progress callback: (stage, current, total, message)
pub type ProgressCallback = dyn Fn(&str, u64, u64, &str) + Send + Sync;

/// Answer to "some files are already prefixed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixedChoice {
    Apply(PrefixPolicy),
    Quit,
}

/// Milestones of a run, announced through [`Confirm::stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The run was confirmed and goes ahead
    Proceeding,
    CollectingMetadata,
    /// Records were built for this many files
    MetadataCollected(usize),
    GeneratingNames,
    Renaming,
}

/// Decision points of a run. Returning false stops the run before any file
/// is renamed.
pub trait Confirm {
    /// Told when the run enters a new stage. Does nothing by default.
    fn stage(&mut self, _stage: Stage) {}

    fn prefixed_files(&mut self, prefixed: &[PathBuf]) -> PrefixedChoice;

    fn start(&mut self, files: &[PathBuf]) -> bool;

    /// Only called when at least one file uses a filesystem date.
    fn missing_capture_dates(&mut self, media: &[MediaFile]) -> bool;

    fn preview(&mut self, media: &[MediaFile]) -> bool;
}

/// Answers yes to everything and skips already-prefixed files, silently.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn prefixed_files(&mut self, _prefixed: &[PathBuf]) -> PrefixedChoice {
        PrefixedChoice::Apply(PrefixPolicy::Skip)
    }

    fn start(&mut self, _files: &[PathBuf]) -> bool {
        true
    }

    fn missing_capture_dates(&mut self, _media: &[MediaFile]) -> bool {
        true
    }

    fn preview(&mut self, _media: &[MediaFile]) -> bool {
        true
    }
}

/// Where a run ended.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Outcome {
    NothingToDo,
    Cancelled { stage: String },
    DryRun,
    Completed { report: BatchReport },
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessResult {
    pub dir: PathBuf,
    pub skipped_prefixed: u64,
    pub media: Vec<MediaFile>,
    pub outcome: Outcome,
}

impl ProcessResult {
    fn ended(dir: &Path, skipped_prefixed: u64, media: Vec<MediaFile>, outcome: Outcome) -> Self {
        Self {
            dir: dir.to_path_buf(),
            skipped_prefixed,
            media,
            outcome,
        }
    }

    pub fn fallback_count(&self) -> usize {
        self.media.iter().filter(|m| m.uses_fallback()).count()
    }
}

/// Stat each file and resolve its date, in order. Files that cannot be
/// stat'ed or whose names are not UTF-8 are left out.
pub fn collect_records(
    paths: &[PathBuf],
    resolver: &MetadataResolver,
    progress: &ProgressCallback,
) -> Vec<MediaFile> {
    let total = paths.len() as u64;
    let mut media = Vec::with_capacity(paths.len());

    for (i, path) in paths.iter().enumerate() {
        if let Some(m) = read_record(path, resolver) {
            media.push(m);
        }
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        progress("metadata", i as u64, total, &name);
    }

    media
}

fn read_record(path: &Path, resolver: &MetadataResolver) -> Option<MediaFile> {
    let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
        log::warn!("skipping {}: file name is not valid UTF-8", path.display());
        return None;
    };
    let times = match FileTimes::read(path) {
        Ok(t) => t,
        Err(err) => {
            log::warn!("skipping {}: {}", path.display(), err);
            return None;
        }
    };
    let captured = resolver.resolve_capture_date(path);
    Some(MediaFile::new(path.to_path_buf(), filename.to_string(), times, captured))
}

/// Run the whole batch: scan, filter, resolve dates, name, rename.
pub fn process(
    options: &PrefixOptions,
    confirm: &mut dyn Confirm,
    progress_callback: &ProgressCallback,
) -> anyhow::Result<ProcessResult> {
    let dir = options.dir.as_path();
    let cancelled = |stage: &str, skipped: u64, media: Vec<MediaFile>| {
        log::info!("cancelled at {}", stage);
        ProcessResult::ended(dir, skipped, media, Outcome::Cancelled { stage: stage.to_string() })
    };

    // Stage 1: Scan
    let (fresh, prefixed) = prefixed::partition_prefixed(scan::scan_media(dir)?);

    let policy = if prefixed.is_empty() {
        PrefixPolicy::Skip
    } else {
        match options.prefix_policy {
            Some(p) => p,
            None => match confirm.prefixed_files(&prefixed) {
                PrefixedChoice::Apply(p) => p,
                PrefixedChoice::Quit => return Ok(cancelled("prefixed", 0, Vec::new())),
            },
        }
    };
    let skipped_prefixed = match policy {
        PrefixPolicy::Skip => prefixed.len() as u64,
        PrefixPolicy::Reprefix => 0,
    };
    let files = prefixed::apply_policy(fresh, prefixed, policy);

    if files.is_empty() {
        return Ok(ProcessResult::ended(dir, skipped_prefixed, Vec::new(), Outcome::NothingToDo));
    }
    if !confirm.start(&files) {
        return Ok(cancelled("start", skipped_prefixed, Vec::new()));
    }

    confirm.stage(Stage::Proceeding);

    // Stage 2: Dates
    confirm.stage(Stage::CollectingMetadata);
    let resolver = MetadataResolver::new(options.resolver);
    let mut media = collect_records(&files, &resolver, progress_callback);
    confirm.stage(Stage::MetadataCollected(media.len()));
    let fallbacks = media.iter().filter(|m| m.uses_fallback()).count();
    log::info!(
        "capture dates found for {}/{} file(s)",
        media.len() - fallbacks,
        media.len()
    );

    if fallbacks > 0 && !confirm.missing_capture_dates(&media) {
        return Ok(cancelled("missing_capture_dates", skipped_prefixed, media));
    }

    // Stage 3: Names
    confirm.stage(Stage::GeneratingNames);
    assign_names(&mut media);

    if options.dry_run {
        return Ok(ProcessResult::ended(dir, skipped_prefixed, media, Outcome::DryRun));
    }
    if !confirm.preview(&media) {
        return Ok(cancelled("preview", skipped_prefixed, media));
    }

    // Stage 4: Rename
    confirm.stage(Stage::Renaming);
    let report = rename_all(&media, dir, progress_callback);
    log::info!("renamed {}/{} file(s)", report.renamed, report.total);

    Ok(ProcessResult::ended(dir, skipped_prefixed, media, Outcome::Completed { report }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::container::tests::{mp4_with_creation_time, QT_2024_03_15};
    use crate::date::exif::tests::jpeg_with_ascii_tag;
    use chrono::{Local, NaiveDate};
    use filetime::FileTime;
    use std::fs;
    use tempfile::tempdir;

    fn quiet(_: &str, _: u64, _: u64, _: &str) {}

    fn set_mtime(path: &Path, y: i32, mo: u32, d: u32) {
        let local = NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
            .and_local_timezone(Local)
            .single()
            .unwrap();
        filetime::set_file_mtime(path, FileTime::from_unix_time(local.timestamp(), 0)).unwrap();
    }

    /// Scripted confirmer recording which questions were asked.
    #[derive(Default)]
    struct Script {
        prefixed: Option<PrefixedChoice>,
        refuse_preview: bool,
        asked: Vec<&'static str>,
        stages: Vec<Stage>,
    }

    impl Confirm for Script {
        fn stage(&mut self, stage: Stage) {
            self.stages.push(stage);
        }

        fn prefixed_files(&mut self, _prefixed: &[PathBuf]) -> PrefixedChoice {
            self.asked.push("prefixed");
            self.prefixed.unwrap_or(PrefixedChoice::Quit)
        }

        fn start(&mut self, _files: &[PathBuf]) -> bool {
            self.asked.push("start");
            true
        }

        fn missing_capture_dates(&mut self, _media: &[MediaFile]) -> bool {
            self.asked.push("missing");
            true
        }

        fn preview(&mut self, _media: &[MediaFile]) -> bool {
            self.asked.push("preview");
            !self.refuse_preview
        }
    }

    fn options(dir: &Path) -> PrefixOptions {
        PrefixOptions {
            dir: dir.to_path_buf(),
            prefix_policy: None,
            resolver: ResolverConfig::default(),
            dry_run: false,
        }
    }

    fn names_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_end_to_end_rename() {
        let dir = tempdir().unwrap();
        let d = dir.path();
        fs::write(d.join("photo.jpg"), jpeg_with_ascii_tag(0x9003, "2024:03:15 14:30:00")).unwrap();
        fs::write(d.join("clip.mp4"), mp4_with_creation_time(0, QT_2024_03_15 + 1)).unwrap();
        fs::write(d.join("plain.png"), b"not really a png").unwrap();
        set_mtime(&d.join("plain.png"), 2019, 8, 1);
        fs::write(d.join("notes.txt"), b"ignored").unwrap();

        let mut script = Script::default();
        let result = process(&options(d), &mut script, &quiet).unwrap();

        assert_eq!(script.asked, vec!["start", "missing", "preview"]);
        assert_eq!(
            script.stages,
            vec![
                Stage::Proceeding,
                Stage::CollectingMetadata,
                Stage::MetadataCollected(3),
                Stage::GeneratingNames,
                Stage::Renaming,
            ]
        );
        assert_eq!(result.fallback_count(), 1);
        let Outcome::Completed { report } = &result.outcome else {
            panic!("unexpected outcome {:?}", result.outcome);
        };
        assert_eq!(report.renamed, 3);
        assert_eq!(
            names_in(d),
            vec![
                "2019-08-01 08:00:00 plain.png",
                "2024-03-15 14:30:00 photo.jpg",
                "2024-03-15 14:30:01 clip.mp4",
                "notes.txt",
            ]
        );
    }

    #[test]
    fn test_prefixed_files_skipped_and_dry_run() {
        let dir = tempdir().unwrap();
        let d = dir.path();
        fs::write(d.join("2020-01-01 00:00:00 old.jpg"), b"").unwrap();
        fs::write(d.join("new.jpg"), jpeg_with_ascii_tag(0x9003, "2024:03:15 14:30:00")).unwrap();

        let mut script = Script {
            prefixed: Some(PrefixedChoice::Apply(PrefixPolicy::Skip)),
            ..Script::default()
        };
        let mut opts = options(d);
        opts.dry_run = true;
        let result = process(&opts, &mut script, &quiet).unwrap();

        assert!(matches!(result.outcome, Outcome::DryRun));
        assert_eq!(script.asked, vec!["prefixed", "start"]);
        assert_eq!(result.skipped_prefixed, 1);
        assert_eq!(result.media.len(), 1);
        assert_eq!(
            result.media[0].new_filename.as_deref(),
            Some("2024-03-15 14:30:00 new.jpg")
        );
        // Nothing renamed on a dry run.
        assert_eq!(names_in(d), vec!["2020-01-01 00:00:00 old.jpg", "new.jpg"]);
    }

    #[test]
    fn test_quit_and_nothing_to_do() {
        let dir = tempdir().unwrap();
        let d = dir.path();
        fs::write(d.join("2020-01-01 00:00:00 old.jpg"), b"").unwrap();

        let mut script = Script::default();
        let result = process(&options(d), &mut script, &quiet).unwrap();
        assert!(matches!(result.outcome, Outcome::Cancelled { ref stage } if stage == "prefixed"));

        let result = process(&options(d), &mut AssumeYes, &quiet).unwrap();
        assert!(matches!(result.outcome, Outcome::NothingToDo));
        assert_eq!(result.skipped_prefixed, 1);
    }

    #[test]
    fn test_refused_preview_renames_nothing() {
        let dir = tempdir().unwrap();
        let d = dir.path();
        fs::write(d.join("a.jpg"), jpeg_with_ascii_tag(0x9003, "2024:03:15 14:30:00")).unwrap();

        let mut script = Script { refuse_preview: true, ..Script::default() };
        let result = process(&options(d), &mut script, &quiet).unwrap();
        assert!(matches!(result.outcome, Outcome::Cancelled { ref stage } if stage == "preview"));
        assert_eq!(names_in(d), vec!["a.jpg"]);
        assert_eq!(script.stages.last(), Some(&Stage::GeneratingNames));
    }

    #[test]
    fn test_same_capture_time_gets_numbered() {
        let dir = tempdir().unwrap();
        let d = dir.path();
        let sub_a = d.join("a");
        let sub_b = d.join("b");
        fs::create_dir(&sub_a).unwrap();
        fs::create_dir(&sub_b).unwrap();
        let bytes = jpeg_with_ascii_tag(0x9003, "2024:01:01 00:00:00");
        fs::write(sub_a.join("pic.png"), &bytes).unwrap();
        fs::write(sub_b.join("pic.png"), &bytes).unwrap();

        let paths = vec![sub_a.join("pic.png"), sub_b.join("pic.png")];
        let mut media = collect_records(&paths, &MetadataResolver::default(), &quiet);
        assign_names(&mut media);

        assert_eq!(media[0].new_filename.as_deref(), Some("2024-01-01 00:00:00 pic.png"));
        assert_eq!(media[1].new_filename.as_deref(), Some("2024-01-01 00:00:00 pic (1).png"));
        assert!(media.iter().all(|m| m.source == DateSource::Captured));
    }

    #[test]
    fn test_options_round_trip_defaults() {
        let opts: PrefixOptions = serde_json::from_str(r#"{"dir": "/photos"}"#).unwrap();
        assert_eq!(opts.prefix_policy, None);
        assert_eq!(opts.resolver, ResolverConfig::default());
        assert!(!opts.dry_run);
    }
}

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use chronoprefix_core::{Confirm, MediaFile, PrefixPolicy, PrefixedChoice, Stage};

use crate::report::{heading, more_line, preview_lines};

/// Files listed by name before "... and N more".
const SAMPLE_START: usize = 3;
const SAMPLE_WARN: usize = 5;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Interactive confirmations on a terminal.
///
/// With `assume_yes` every question is still printed, then answered with the
/// default (`y`, or `1` for the already-prefixed menu) without reading input.
pub struct Prompter<R, W> {
    input: R,
    out: W,
    assume_yes: bool,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out, assume_yes: false }
    }

    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    fn say(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
    }

    /// Read one trimmed, lower-cased answer. `None` on end of input.
    /// Under `assume_yes` the `default` is echoed and returned instead.
    fn read_answer(&mut self, question: &str, default: &str) -> Option<String> {
        let _ = write!(self.out, "\n{} ", question);
        if self.assume_yes {
            let _ = writeln!(self.out, "{}", default);
            return Some(default.to_string());
        }
        let _ = self.out.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_lowercase()),
        }
    }

    /// Ask until the answer is yes or no. End of input counts as no.
    pub fn ask_yes_no(&mut self, question: &str) -> bool {
        let question = format!("{} (y/n):", question);
        loop {
            match self.read_answer(&question, "y").as_deref() {
                Some("y") | Some("yes") => return true,
                Some("n") | Some("no") | None => {
                    self.say("Operation cancelled.");
                    return false;
                }
                Some(_) => self.say("Please enter 'y' or 'n'."),
            }
        }
    }
}

impl<R: BufRead, W: Write> Confirm for Prompter<R, W> {
    fn stage(&mut self, stage: Stage) {
        match stage {
            Stage::Proceeding => self.say("\nOK, proceeding..."),
            Stage::CollectingMetadata => self.say("\nCollecting file metadata..."),
            Stage::MetadataCollected(n) => self.say(&format!("\nCollected metadata for {} file(s).", n)),
            Stage::GeneratingNames => self.say("\nGenerating prefixed filenames..."),
            Stage::Renaming => self.say("\nPrefixing files..."),
        }
    }

    fn prefixed_files(&mut self, prefixed: &[PathBuf]) -> PrefixedChoice {
        self.say(&heading("WARNING: Already-Prefixed Files Detected"));
        self.say(&format!("\n{} file(s) already have chronological prefixes.", prefixed.len()));
        self.say("These files appear to have been processed before.\n");
        self.say("Already-prefixed files:");
        for (i, path) in prefixed.iter().take(SAMPLE_WARN).enumerate() {
            self.say(&format!("  {}. {}", i + 1, file_name(path)));
        }
        if let Some(more) = more_line(prefixed.len(), SAMPLE_WARN, "") {
            self.say(&more);
        }

        self.say("\nWhat would you like to do?");
        self.say("  1. Ignore these files (only prefix files without a chronological prefix)");
        self.say("  2. Add prefix anyway (will add another date prefix)");
        self.say("  3. Stop and quit");

        loop {
            match self.read_answer("Enter your choice (1/2/3):", "1").as_deref() {
                Some("1") => return PrefixedChoice::Apply(PrefixPolicy::Skip),
                Some("2") => return PrefixedChoice::Apply(PrefixPolicy::Reprefix),
                Some("3") | None => {
                    self.say("Operation cancelled.");
                    return PrefixedChoice::Quit;
                }
                Some(_) => self.say("Please enter 1, 2, or 3."),
            }
        }
    }

    fn start(&mut self, files: &[PathBuf]) -> bool {
        self.say(&format!("\nFound {} media file(s) to process.", files.len()));
        self.say("\nSample files:");
        for (i, path) in files.iter().take(SAMPLE_START).enumerate() {
            self.say(&format!("  {}. {}", i + 1, file_name(path)));
        }
        if let Some(more) = more_line(files.len(), SAMPLE_START, "") {
            self.say(&more);
        }
        self.say(&format!(
            "\nThis will prefix {} file(s) with chronological dates.",
            files.len()
        ));
        self.ask_yes_no("Do you want to continue?")
    }

    fn missing_capture_dates(&mut self, media: &[MediaFile]) -> bool {
        let missing: Vec<&MediaFile> = media.iter().filter(|m| m.uses_fallback()).collect();

        self.say(&heading("WARNING: Files with Missing Capture Dates"));
        self.say(&format!("\n{} file(s) do not have capture date metadata.", missing.len()));
        self.say("These files will use their modified or created date instead.\n");
        self.say("Files without capture dates:");
        for (i, m) in missing.iter().take(SAMPLE_WARN).enumerate() {
            self.say(&format!("  {}. {} (will use {})", i + 1, m.filename, m.source.describe()));
        }
        if let Some(more) = more_line(missing.len(), SAMPLE_WARN, "") {
            self.say(&more);
        }

        self.say(&format!(
            "\nFiles with capture dates: {}/{}",
            media.len() - missing.len(),
            media.len()
        ));
        self.say(&format!("Files using fallback dates: {}/{}", missing.len(), media.len()));
        self.ask_yes_no("Do you want to continue with prefixing?")
    }

    fn preview(&mut self, media: &[MediaFile]) -> bool {
        for line in preview_lines(media) {
            self.say(&line);
        }
        self.ask_yes_no("Proceed with prefixing?")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chronoprefix_core::FileTimes;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(p: &Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8_lossy(&p.out).into_owned()
    }

    #[test]
    fn test_yes_no_retries_until_valid() {
        let mut p = prompter("maybe\n YES \n");
        assert!(p.ask_yes_no("Continue?"));
        assert!(output(&p).contains("Please enter 'y' or 'n'."));
    }

    #[test]
    fn test_end_of_input_is_no() {
        let mut p = prompter("");
        assert!(!p.ask_yes_no("Continue?"));
        assert!(output(&p).contains("Operation cancelled."));
    }

    #[test]
    fn test_assume_yes_still_prints_the_warning() {
        let d = NaiveDate::from_ymd_opt(2023, 2, 3).unwrap().and_hms_opt(4, 5, 6).unwrap();
        let media = vec![MediaFile::new(
            PathBuf::from("/d/a.jpg"),
            "a.jpg".into(),
            FileTimes { modified: Some(d), created: d },
            None,
        )];
        // No input at all: answers come from assume_yes.
        let mut p = prompter("").assume_yes(true);
        assert!(p.missing_capture_dates(&media));
        assert_eq!(
            p.prefixed_files(&[PathBuf::from("/d/2024-01-01 00:00:00 b.jpg")]),
            PrefixedChoice::Apply(PrefixPolicy::Skip)
        );

        let out = output(&p);
        assert!(out.contains("WARNING: Files with Missing Capture Dates"));
        assert!(out.contains("1. a.jpg (will use modified date)"));
        assert!(out.contains("Do you want to continue with prefixing? (y/n): y"));
        assert!(out.contains("Enter your choice (1/2/3): 1"));
        assert!(!out.contains("Operation cancelled."));
    }

    #[test]
    fn test_stage_messages() {
        let mut p = prompter("");
        p.stage(Stage::Proceeding);
        p.stage(Stage::MetadataCollected(4));
        let out = output(&p);
        assert!(out.contains("OK, proceeding..."));
        assert!(out.contains("Collected metadata for 4 file(s)."));
    }

    #[test]
    fn test_prefixed_menu() {
        let files = vec![PathBuf::from("/d/2024-01-01 00:00:00 a.jpg")];
        assert_eq!(
            prompter("x\n2\n").prefixed_files(&files),
            PrefixedChoice::Apply(PrefixPolicy::Reprefix)
        );
        assert_eq!(prompter("1\n").prefixed_files(&files), PrefixedChoice::Apply(PrefixPolicy::Skip));
        assert_eq!(prompter("3\n").prefixed_files(&files), PrefixedChoice::Quit);
    }

    #[test]
    fn test_start_lists_a_sample() {
        let files: Vec<PathBuf> = (0..5).map(|i| PathBuf::from(format!("/d/f{}.jpg", i))).collect();
        let mut p = prompter("n\n");
        assert!(!p.start(&files));
        let out = output(&p);
        assert!(out.contains("Found 5 media file(s) to process."));
        assert!(out.contains("  3. f2.jpg"));
        assert!(!out.contains("f3.jpg"));
        assert!(out.contains("  ... and 2 more"));
    }

    #[test]
    fn test_missing_dates_names_the_fallback() {
        let d = NaiveDate::from_ymd_opt(2023, 2, 3).unwrap().and_hms_opt(4, 5, 6).unwrap();
        let media = vec![
            MediaFile::new(
                PathBuf::from("/d/a.jpg"),
                "a.jpg".into(),
                FileTimes { modified: Some(d), created: d },
                None,
            ),
            MediaFile::new(
                PathBuf::from("/d/b.mov"),
                "b.mov".into(),
                FileTimes { modified: None, created: d },
                None,
            ),
            MediaFile::new(
                PathBuf::from("/d/c.jpg"),
                "c.jpg".into(),
                FileTimes { modified: Some(d), created: d },
                Some(d),
            ),
        ];
        let mut p = prompter("y\n");
        assert!(p.missing_capture_dates(&media));
        let out = output(&p);
        assert!(out.contains("1. a.jpg (will use modified date)"));
        assert!(out.contains("2. b.mov (will use created date)"));
        assert!(out.contains("Files with capture dates: 1/3"));
        assert!(out.contains("Files using fallback dates: 2/3"));
    }
}

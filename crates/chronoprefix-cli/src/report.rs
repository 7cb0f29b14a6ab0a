use chronoprefix_core::{BatchReport, MediaFile};

const RULE_WIDTH: usize = 60;
const PREVIEW_COUNT: usize = 5;
const ERROR_COUNT: usize = 5;

pub fn heading(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("\n{}\n{}\n{}", rule, title, rule)
}

/// `  ... and N more<suffix>` when more than `shown` items exist.
pub fn more_line(count: usize, shown: usize, suffix: &str) -> Option<String> {
    (count > shown).then(|| format!("  ... and {} more{}", count - shown, suffix))
}

/// Old and new names of the first few files.
pub fn preview_lines(media: &[MediaFile]) -> Vec<String> {
    let mut lines = vec![
        heading("Preview of Prefixed Filenames"),
        format!("\nShowing first up to {} files:\n", PREVIEW_COUNT),
    ];
    for (i, m) in media.iter().take(PREVIEW_COUNT).enumerate() {
        lines.push(format!("{}. {}", i + 1, m.filename));
        lines.push(format!("   → {}", m.new_filename.as_deref().unwrap_or("?")));
        lines.push(String::new());
    }
    if let Some(more) = more_line(media.len(), PREVIEW_COUNT, " files will be prefixed") {
        lines.push(more);
    }
    lines.push(format!("\nTotal files to prefix: {}", media.len()));
    lines
}

pub fn summary_lines(report: &BatchReport) -> Vec<String> {
    let mut lines = vec![
        heading("Prefixing Complete"),
        format!("\nSuccessfully prefixed: {}/{} files", report.renamed, report.total),
    ];
    if !report.errors.is_empty() {
        lines.push(format!("\nErrors ({}):", report.errors.len()));
        for failure in report.errors.iter().take(ERROR_COUNT) {
            lines.push(format!("  - {}: {}", failure.filename, failure.error));
        }
        if let Some(more) = more_line(report.errors.len(), ERROR_COUNT, " errors") {
            lines.push(more);
        }
    }
    lines
}

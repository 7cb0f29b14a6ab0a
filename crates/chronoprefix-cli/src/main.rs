mod progress;
mod prompt;
mod report;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use chronoprefix_core::{Outcome, PrefixOptions, PrefixPolicy, ResolverConfig};

use crate::progress::StageProgress;
use crate::prompt::Prompter;
use crate::report::{heading, preview_lines, summary_lines};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PrefixedArg {
    /// Ask what to do
    Ask,
    /// Leave already-prefixed files alone
    Skip,
    /// Add another prefix to them
    Reprefix,
}

#[derive(Parser)]
#[command(
    name = "chronoprefix",
    version,
    about = "Prefix photos and videos with their capture date, falling back to modified, then created dates"
)]
struct Cli {
    /// Directory to process (defaults to the current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// What to do with files that already carry a date prefix
    #[arg(long, value_enum, default_value_t = PrefixedArg::Ask)]
    prefixed: PrefixedArg,

    /// Answer yes to every question (already-prefixed files are skipped unless --prefixed says otherwise)
    #[arg(short, long)]
    yes: bool,

    /// Show the new names without renaming anything
    #[arg(long)]
    dry_run: bool,

    /// Print the plan or result as JSON on stdout; other output goes to stderr
    #[arg(long)]
    json: bool,

    /// Do not read EXIF capture dates from images
    #[arg(long)]
    no_exif: bool,

    /// Do not read creation dates from video containers
    #[arg(long)]
    no_container: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    // RUST_LOG, when set, wins over -v.
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Human-readable output: stdout, or stderr when stdout carries JSON.
fn human_out(json: bool) -> Box<dyn Write> {
    if json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut out = human_out(cli.json);
    writeln!(out, "{}", heading("Media Chronological Prefix"))?;

    writeln!(out, "Checking directory...")?;
    let dir = std::path::absolute(&cli.path)?;
    if !dir.is_dir() {
        anyhow::bail!("'{}' is not a valid directory.", cli.path.display());
    }
    if cli.path == Path::new(".") {
        writeln!(out, "No path provided. Using current directory: {}", dir.display())?;
    } else {
        writeln!(out, "Target directory: {}", dir.display())?;
    }

    let options = PrefixOptions {
        dir,
        prefix_policy: match cli.prefixed {
            PrefixedArg::Ask => None,
            PrefixedArg::Skip => Some(PrefixPolicy::Skip),
            PrefixedArg::Reprefix => Some(PrefixPolicy::Reprefix),
        },
        resolver: ResolverConfig {
            image_tags: !cli.no_exif,
            container: !cli.no_container,
        },
        dry_run: cli.dry_run,
    };
    log::debug!("options: {:?}", options);

    writeln!(out, "Looking for and inspecting media in the given directory...")?;
    out.flush()?;

    let progress = StageProgress::new().into_callback();
    let mut prompter = Prompter::new(io::stdin().lock(), human_out(cli.json)).assume_yes(cli.yes);
    let result = chronoprefix_core::process(&options, &mut prompter, &progress)?;

    if result.skipped_prefixed > 0 {
        writeln!(out, "\nSkipped {} already-prefixed file(s).", result.skipped_prefixed)?;
    }

    let mut failed = 0;
    match &result.outcome {
        Outcome::NothingToDo => writeln!(out, "\nNo media files to process.")?,
        Outcome::Cancelled { .. } => {}
        Outcome::DryRun => {
            for line in preview_lines(&result.media) {
                writeln!(out, "{}", line)?;
            }
            writeln!(out, "\nDry run: no files were renamed.")?;
        }
        Outcome::Completed { report } => {
            for line in summary_lines(report) {
                writeln!(out, "{}", line)?;
            }
            failed = report.failed;
        }
    }
    out.flush()?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    if failed > 0 {
        anyhow::bail!("{} file(s) could not be renamed", failed);
    }
    Ok(())
}

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

fn stage_label(stage: &str) -> &str {
    match stage {
        "metadata" => "reading metadata",
        "rename" => "renaming",
        other => other,
    }
}

/// One progress bar per pipeline stage, replaced when the stage changes.
#[derive(Default)]
pub struct StageProgress {
    current: Mutex<Option<(String, ProgressBar)>>,
}

impl StageProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the bars into a callback the core can drive.
    pub fn into_callback(self) -> impl Fn(&str, u64, u64, &str) + Send + Sync {
        move |stage: &str, current: u64, total: u64, message: &str| {
            self.report(stage, current, total, message);
        }
    }

    pub fn report(&self, stage: &str, current: u64, total: u64, message: &str) {
        let Ok(mut slot) = self.current.lock() else {
            return;
        };

        if slot.as_ref().map_or(true, |(s, _)| s != stage) {
            if let Some((_, pb)) = slot.take() {
                pb.finish_and_clear();
            }
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{bar:40}] {pos}/{len} {prefix} {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            pb.set_prefix(stage_label(stage).to_string());
            *slot = Some((stage.to_string(), pb));
        }

        if let Some((_, pb)) = slot.as_ref() {
            pb.set_position(current + 1);
            pb.set_message(message.to_string());
            if current + 1 >= total {
                pb.finish_and_clear();
            }
        }
    }
}

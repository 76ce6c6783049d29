// file: src/pipeline/progress.rs
// description: chapter progress bar and run statistics for the tutorial pipeline
// reference: uses indicatif for progress bars and tracks generation metrics

use crate::utils::Validator;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub files_fetched: usize,
    pub bytes_fetched: usize,
    pub abstractions: usize,
    pub chapters_written: usize,
    pub duration_secs: f64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chapters_per_minute(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        self.chapters_written as f64 / (self.duration_secs / 60.0)
    }

    pub fn is_complete(&self) -> bool {
        self.chapters_written == self.abstractions
    }
}

pub struct ChapterProgress {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    chapters_written: AtomicUsize,
    start_time: Instant,
}

impl ChapterProgress {
    pub fn new(total_chapters: usize) -> Self {
        Self::with_color(total_chapters, true)
    }

    pub fn with_color(total_chapters: usize, colored: bool) -> Self {
        Self::build(MultiProgress::new(), total_chapters, colored)
    }

    /// Tracks counts without drawing anything.
    pub fn hidden(total_chapters: usize) -> Self {
        Self::build(
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            total_chapters,
            false,
        )
    }

    fn build(multi_progress: MultiProgress, total_chapters: usize, colored: bool) -> Self {
        let main_bar = create_progress_bar(&multi_progress, total_chapters as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            chapters_written: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn start_chapter(&self, number: usize, name: &str) {
        self.detail_bar.set_message(format!(
            "Writing chapter {}: {}",
            number,
            Validator::truncate_text(name, 60)
        ));
    }

    pub fn chapter_written(&self) {
        self.chapters_written.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
    }

    pub fn chapters_written(&self) -> usize {
        self.chapters_written.load(Ordering::SeqCst)
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Tutorial complete");
        self.detail_bar.finish_and_clear();
    }
}

impl Drop for ChapterProgress {
    fn drop(&mut self) {
        self.main_bar.abandon();
        self.detail_bar.finish_and_clear();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    if colored {
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chapters {msg}",
                )
                .expect("Failed to create progress bar template")
                .progress_chars("█▓▒░"),
        );
    } else {
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} chapters {msg}")
                .expect("Failed to create progress bar template")
                .progress_chars("=>-"),
        );
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    let style = ProgressStyle::default_bar()
        .template("{msg}")
        .expect("Failed to create detail bar template");
    bar.set_style(style);
    bar
}

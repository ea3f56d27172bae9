// file: src/pipeline/progress.rs
// description: progress tracking and statistics for batch classification
// reference: uses indicatif for progress bars and tracks processing metrics

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct BatchStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub questions_classified: usize,
    pub duration_secs: f64,
}

impl BatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn questions_per_second(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        self.questions_classified as f64 / self.duration_secs
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.files_processed + self.files_failed;
        if total == 0 {
            return 0.0;
        }
        (self.files_processed as f64 / total as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    files_processed: AtomicUsize,
    files_failed: AtomicUsize,
    questions_classified: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn with_color(total_files: usize, colored: bool) -> Self {
        Self::build(MultiProgress::new(), total_files, colored)
    }

    /// A tracker that counts but never draws.
    pub fn hidden(total_files: usize) -> Self {
        Self::build(
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            total_files,
            false,
        )
    }

    fn build(multi_progress: MultiProgress, total_files: usize, colored: bool) -> Self {
        let main_bar = create_progress_bar(&multi_progress, total_files as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            files_processed: AtomicUsize::new(0),
            files_failed: AtomicUsize::new(0),
            questions_classified: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn inc_files_processed(&self, questions: usize) {
        self.files_processed.fetch_add(1, Ordering::SeqCst);
        self.questions_classified
            .fetch_add(questions, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn inc_files_failed(&self) {
        self.files_failed.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn set_message(&self, message: String) {
        self.main_bar.set_message(message);
    }

    pub fn finish(&self) {
        if !self.main_bar.is_finished() {
            self.main_bar.finish_with_message("Classification complete");
        }
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> BatchStats {
        BatchStats {
            files_processed: self.files_processed.load(Ordering::SeqCst),
            files_failed: self.files_failed.load(Ordering::SeqCst),
            questions_classified: self.questions_classified.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs_f64(),
        }
    }

    fn update_detail_bar(&self) {
        let questions = self.questions_classified.load(Ordering::SeqCst);
        let failed = self.files_failed.load(Ordering::SeqCst);

        self.detail_bar
            .set_message(format!("Questions: {} | Failed: {}", questions, failed));
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let (template, chars) = if colored {
        (
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            "█▓▒░",
        )
    } else {
        ("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}", "=>-")
    };

    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        bar.set_style(style.progress_chars(chars));
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}

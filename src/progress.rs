//! Progress reporting utilities using indicatif.
//!
//! The batch runner reports through the [`ProgressCallback`] trait; the
//! [`Progress`] implementation draws a single bar across input files.

use std::cell::RefCell;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress callback for batch processing.
pub trait ProgressCallback {
    /// Called once before the first file, with the number of files.
    fn on_start(&self, total: usize);

    /// Called when a file starts processing.
    ///
    /// # Arguments
    ///
    /// * `current` - Current file number (1-based)
    /// * `name` - File name being processed
    fn on_file(&self, current: usize, name: &str);

    /// Called when a file has finished, successfully or not.
    fn on_file_done(&self, _ok: bool) {}

    /// Called once after the last file.
    fn on_finish(&self);
}

/// Callback that reports nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_start(&self, _total: usize) {}
    fn on_file(&self, _current: usize, _name: &str) {}
    fn on_finish(&self) {}
}

/// Terminal progress bar over input files.
pub struct Progress {
    bar: RefCell<Option<ProgressBar>>,
    failures: RefCell<usize>,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Examples
    ///
    /// ```
    /// use sheetdupe::progress::Progress;
    ///
    /// let progress = Progress::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
            failures: RefCell::new(0),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }
}

impl ProgressCallback for Progress {
    fn on_start(&self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(Self::style());
        bar.enable_steady_tick(Duration::from_millis(100));
        *self.bar.borrow_mut() = Some(bar);
    }

    fn on_file(&self, _current: usize, name: &str) {
        if let Some(bar) = self.bar.borrow().as_ref() {
            bar.set_message(name.to_string());
        }
    }

    fn on_file_done(&self, ok: bool) {
        if !ok {
            *self.failures.borrow_mut() += 1;
        }
        if let Some(bar) = self.bar.borrow().as_ref() {
            bar.inc(1);
        }
    }

    fn on_finish(&self) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            let failures = *self.failures.borrow();
            if failures == 0 {
                bar.finish_with_message("done");
            } else {
                bar.finish_with_message(format!("done, {failures} failed"));
            }
        }
    }
}

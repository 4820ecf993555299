//! Progress accounting for directory copies.
//!
//! The walker discovers entries while workers complete them, so the total
//! is only partially known for most of a run. [`ProgressTracker`] keeps
//! both counters under one lock and suppresses reporting until the
//! traversal has finished; percentages computed against a partial total
//! are never emitted. Once reporting is enabled, each distinct integer
//! percent is delivered to the handler exactly once, ending with 100.

use crate::state::lock;
use std::sync::{Arc, Mutex};

/// Callback invoked with each newly reached overall percentage (0..=100).
pub type ProgressHandler = Arc<dyn Fn(u32) + Send + Sync>;

#[derive(Debug)]
struct ProgressInner {
    completed: u64,
    total: u64,
    last_percent: Option<u32>,
    reporting: bool,
}

pub(crate) struct ProgressTracker {
    inner: Mutex<ProgressInner>,
    handler: Option<ProgressHandler>,
}

impl ProgressTracker {
    pub fn new(handler: Option<ProgressHandler>) -> Self {
        Self {
            inner: Mutex::new(ProgressInner {
                completed: 0,
                total: 0,
                last_percent: None,
                reporting: false,
            }),
            handler,
        }
    }

    /// Count a newly discovered entry toward the total.
    pub fn note_discovered(&self) {
        lock(&self.inner).total += 1;
    }

    /// Count a completed entry and report the new percentage if reporting
    /// is enabled and the integer percent changed.
    pub fn note_completed(&self) {
        let mut inner = lock(&self.inner);
        inner.completed += 1;
        if inner.reporting {
            self.report(&mut inner);
        }
    }

    /// Mark the total as final and start reporting. The current percent is
    /// emitted immediately if it differs from the last one delivered, so a
    /// run whose workers finished before the traversal still reports 100.
    pub fn enable_reporting(&self) {
        let mut inner = lock(&self.inner);
        inner.reporting = true;
        self.report(&mut inner);
    }

    #[cfg(test)]
    pub fn counts(&self) -> (u64, u64) {
        let inner = lock(&self.inner);
        (inner.completed, inner.total)
    }

    fn report(&self, inner: &mut ProgressInner) {
        // An empty tree is vacuously complete.
        let percent = if inner.total == 0 {
            100
        } else {
            (100 * inner.completed / inner.total) as u32
        };
        if inner.last_percent != Some(percent) {
            inner.last_percent = Some(percent);
            if let Some(handler) = &self.handler {
                handler(percent);
            }
        }
    }
}

/// Create the percent-style progress bar used by the CLI.
#[cfg(feature = "progress")]
#[must_use]
pub fn create_progress_bar() -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {percent:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collecting_tracker() -> (ProgressTracker, Arc<Mutex<Vec<u32>>>) {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = reports.clone();
        let handler: ProgressHandler = Arc::new(move |pct| {
            if let Ok(mut v) = sink.lock() {
                v.push(pct);
            }
        });
        (ProgressTracker::new(Some(handler)), reports)
    }

    fn reported(reports: &Arc<Mutex<Vec<u32>>>) -> Vec<u32> {
        reports.lock().map(|v| v.clone()).unwrap_or_default()
    }

    #[test]
    fn test_silent_until_reporting_enabled() {
        let (tracker, reports) = collecting_tracker();
        for _ in 0..4 {
            tracker.note_discovered();
        }
        tracker.note_completed();
        tracker.note_completed();
        assert!(reported(&reports).is_empty());

        tracker.enable_reporting();
        assert_eq!(reported(&reports), vec![50]);
    }

    #[test]
    fn test_percent_deduplicated_and_ends_at_100() {
        let (tracker, reports) = collecting_tracker();
        for _ in 0..200 {
            tracker.note_discovered();
        }
        tracker.enable_reporting();
        for _ in 0..200 {
            tracker.note_completed();
        }

        let seen = reported(&reports);
        // 200 completions but only 101 distinct percents, each once.
        assert_eq!(seen.len(), 101);
        assert_eq!(seen.first(), Some(&0));
        assert_eq!(seen.last(), Some(&100));
        let mut dedup = seen.clone();
        dedup.dedup();
        assert_eq!(dedup, seen);
    }

    #[test]
    fn test_workers_finishing_first_still_report_100_once() {
        let (tracker, reports) = collecting_tracker();
        tracker.note_discovered();
        tracker.note_completed();
        // Traversal finishes after the last completion.
        tracker.enable_reporting();
        tracker.enable_reporting();
        assert_eq!(reported(&reports), vec![100]);
    }

    #[test]
    fn test_empty_tree_reports_100() {
        let (tracker, reports) = collecting_tracker();
        tracker.enable_reporting();
        assert_eq!(reported(&reports), vec![100]);
        assert_eq!(tracker.counts(), (0, 0));
    }
}

use dupe_sweep_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif progress bars.
///
/// - Scan phase: spinner (unknown total files upfront)
/// - Removal phase: progress bar over duplicate sets
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn with_bar(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        let mut guard = match self.bar.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
    }

    fn set_bar(&self, pb: ProgressBar) {
        self.with_bar(|slot| {
            if let Some(old) = slot.take() {
                old.finish_and_clear();
            }
            *slot = Some(pb);
        });
    }

    fn finish_bar(&self) {
        self.with_bar(|slot| {
            if let Some(pb) = slot.take() {
                pb.finish_and_clear();
            }
        });
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars(TICK_CHARS),
        );
        pb.set_message("Scanning files...");
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_scan_progress(&self, files_found: usize, _current_path: &str) {
        self.with_bar(|slot| {
            if let Some(pb) = slot.as_ref() {
                pb.set_message(format!("Processed {} files...", files_found));
            }
        });
    }

    fn on_scan_complete(&self, total_files: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Finished scanning {} files in {:.2}s",
            total_files, duration_secs
        );
    }

    fn on_reconcile_start(&self, total_groups: usize) {
        let pb = ProgressBar::new(total_groups as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "  {spinner:.cyan} Removing [{bar:30.cyan/dim}] {pos}/{len} sets ({eta} remaining)",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("━╸─")
            .tick_chars(TICK_CHARS),
        );
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_reconcile_progress(&self, groups_done: usize, _total_groups: usize) {
        self.with_bar(|slot| {
            if let Some(pb) = slot.as_ref() {
                pb.set_position(groups_done as u64);
            }
        });
    }

    fn on_reconcile_complete(&self, removed: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Removal complete: {} files in {:.2}s",
            removed, duration_secs
        );
    }
}

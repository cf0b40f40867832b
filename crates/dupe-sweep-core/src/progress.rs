/// Trait for reporting scan and removal progress.
///
/// The CLI implements it with indicatif bars; tests use `SilentReporter`.
/// All methods have default no-op implementations.
pub trait ProgressReporter {
    fn on_scan_start(&self) {}
    fn on_scan_progress(&self, _files_found: usize, _current_path: &str) {}
    fn on_scan_complete(&self, _total_files: usize, _duration_secs: f64) {}
    fn on_reconcile_start(&self, _total_groups: usize) {}
    fn on_reconcile_progress(&self, _groups_done: usize, _total_groups: usize) {}
    fn on_reconcile_complete(&self, _removed: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}

pub mod group;
pub mod walk;

use crate::config::{ExclusionRules, SweepConfig};
use crate::error::Error;
use crate::models::Report;
use crate::progress::ProgressReporter;
use group::GroupIndex;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Walks one root and groups regular files by (name, size).
pub struct Scanner {
    root: PathBuf,
    rules: ExclusionRules,
    exclude_empty: bool,
}

#[derive(Debug)]
pub struct ScanOutcome {
    pub report: Report,
    pub files_scanned: usize,
    pub warnings: usize,
    pub duration: Duration,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>, rules: ExclusionRules) -> Self {
        Self {
            root: root.into(),
            rules,
            exclude_empty: false,
        }
    }

    pub fn from_config(root: &Path, config: &SweepConfig) -> Self {
        Self::new(root, config.exclusion_rules()).exclude_empty(config.exclude_empty)
    }

    pub fn exclude_empty(mut self, exclude_empty: bool) -> Self {
        self.exclude_empty = exclude_empty;
        self
    }

    pub fn scan(&self, reporter: &dyn ProgressReporter) -> Result<ScanOutcome, Error> {
        info!("Scanning files under {}...", self.root.display());
        reporter.on_scan_start();
        let start = Instant::now();

        let walked =
            walk::collect_files(&self.root, &self.rules, self.exclude_empty, reporter)?;
        let files_scanned = walked.records.len();

        let index: GroupIndex = walked.records.into_iter().collect();
        let distinct_keys = index.distinct_keys();
        let report = index.into_report();

        let duration = start.elapsed();
        reporter.on_scan_complete(files_scanned, duration.as_secs_f64());
        debug!(
            "Scan completed in {:.2}s: {} files, {} distinct keys, {} duplicate groups, {} warnings",
            duration.as_secs_f64(),
            files_scanned,
            distinct_keys,
            report.groups.len(),
            walked.warnings,
        );

        Ok(ScanOutcome {
            report,
            files_scanned,
            warnings: walked.warnings,
            duration,
        })
    }
}

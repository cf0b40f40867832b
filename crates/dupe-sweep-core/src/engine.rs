use crate::config::SweepConfig;
use crate::confirm::Confirm;
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::reconcile::{self, ReconcileOutcome};
use crate::report::{codec, ReportStore};
use crate::scanner::Scanner;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Runs the two modes against one configuration. The modes share nothing
/// but the report files in `output_dir`.
pub struct SweepEngine {
    config: SweepConfig,
}

#[derive(Debug)]
pub struct ScanResult {
    pub report_path: PathBuf,
    pub scan_duration: Duration,
    pub total_files_scanned: usize,
    pub duplicate_groups: usize,
    pub duplicate_files: usize,
    pub reclaimable_bytes: u64,
    pub warnings: usize,
}

impl SweepEngine {
    pub fn new(config: SweepConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn store(&self) -> ReportStore {
        ReportStore::from_config(&self.config)
    }

    /// Walk the root, group by (name, size) and persist a new report.
    ///
    /// A report is written even when no duplicates are found, so a later
    /// removal never acts on an older listing.
    pub fn scan(&self, reporter: &dyn ProgressReporter) -> Result<ScanResult, Error> {
        let root = fs::canonicalize(&self.config.root)?;
        debug!("Scan root resolved to {}", root.display());

        let outcome = Scanner::from_config(&root, &self.config).scan(reporter)?;
        let report = codec::persistable(&outcome.report);

        info!("Saving duplicate list...");
        let report_path = self.store().write_report(&report)?;

        Ok(ScanResult {
            report_path,
            scan_duration: outcome.duration,
            total_files_scanned: outcome.files_scanned,
            duplicate_groups: report.groups.len(),
            duplicate_files: report.duplicate_files(),
            reclaimable_bytes: report.reclaimable_bytes(),
            warnings: outcome.warnings,
        })
    }

    /// Reconcile the newest report in `output_dir`.
    pub fn remove(
        &self,
        confirm: &mut dyn Confirm,
        reporter: &dyn ProgressReporter,
    ) -> Result<ReconcileOutcome, Error> {
        let store = self.store();
        let report_path = store.latest_report()?;
        info!("Using duplicate list from: {}", report_path.display());
        reconcile::reconcile(&store, &report_path, confirm, reporter)
    }
}

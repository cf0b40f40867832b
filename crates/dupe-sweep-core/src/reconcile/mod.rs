pub mod audit;

use crate::confirm::Confirm;
use crate::error::Error;
use crate::models::{LoadedReport, ReportEntry};
use crate::progress::ProgressReporter;
use crate::report::ReportStore;
use audit::AuditLog;
use std::fs;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

#[derive(Debug)]
pub enum ReconcileOutcome {
    /// The operator declined; nothing was touched and no log was written.
    Cancelled,
    Completed(ReconcileSummary),
}

#[derive(Debug, Clone)]
pub struct ReconcileSummary {
    pub report_path: PathBuf,
    pub audit_log_path: PathBuf,
    pub kept: usize,
    pub removed: usize,
    pub errors: usize,
    /// Sets left alone because their original was already gone.
    pub skipped_groups: usize,
    pub skipped_rows: usize,
    /// Sum of the reported sizes of removed paths, in MB.
    pub saved_mb: f64,
}

#[derive(Debug, Default)]
pub struct Applied {
    pub audit: AuditLog,
    pub skipped_groups: usize,
    pub saved_mb: f64,
}

/// Read `report_path` in full, ask for confirmation, remove every path but
/// the first of each set, and write an audit log.
///
/// A report that cannot be parsed aborts before the prompt. A declined
/// prompt returns `Cancelled` without touching the filesystem.
pub fn reconcile(
    store: &ReportStore,
    report_path: &Path,
    confirm: &mut dyn Confirm,
    reporter: &dyn ProgressReporter,
) -> Result<ReconcileOutcome, Error> {
    let loaded = store.read_report(report_path)?;

    let prompt = format!(
        "This will remove duplicate files from {} sets, keeping only the first copy of each. \
         Are you sure you want to proceed?",
        loaded.entries.len()
    );
    if !confirm.confirm(&prompt)? {
        info!("Operation cancelled.");
        return Ok(ReconcileOutcome::Cancelled);
    }

    let applied = apply(&loaded.entries, reporter);
    let audit_log_path = write_audit_log(store, &applied.audit)?;

    Ok(ReconcileOutcome::Completed(summarize(
        &loaded,
        &applied,
        audit_log_path,
    )))
}

/// Remove duplicates for each entry. Per-path failures are collected in the
/// audit log; nothing here aborts the run.
pub fn apply(entries: &[ReportEntry], reporter: &dyn ProgressReporter) -> Applied {
    let start = Instant::now();
    let total = entries.len();
    reporter.on_reconcile_start(total);

    let mut applied = Applied::default();

    for (i, entry) in entries.iter().enumerate() {
        apply_entry(entry, &mut applied);
        reporter.on_reconcile_progress(i + 1, total);
    }

    reporter.on_reconcile_complete(
        applied.audit.removed.len(),
        start.elapsed().as_secs_f64(),
    );
    applied
}

fn apply_entry(entry: &ReportEntry, applied: &mut Applied) {
    let Some((original, duplicates)) = entry.paths.split_first() else {
        return;
    };

    // Without the original there is no telling which copy was authoritative.
    if !original.exists() {
        warn!(
            "Original {} no longer exists, leaving its {} duplicates untouched",
            original.display(),
            duplicates.len()
        );
        applied.skipped_groups += 1;
        return;
    }

    debug!("Keeping: {}", original.display());
    applied.audit.kept.push(original.clone());

    for dup in duplicates {
        if dup == original || !dup.exists() {
            continue;
        }

        match fs::remove_file(dup) {
            Ok(()) => {
                debug!("Removed: {}", dup.display());
                applied.audit.removed.push(dup.clone());
                applied.saved_mb += entry.size_mb;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                error!("Failed to remove '{}': {}", dup.display(), e);
                applied
                    .audit
                    .errors
                    .push(format!("Error removing {}: {}", dup.display(), e));
            }
        }
    }
}

fn write_audit_log(store: &ReportStore, audit: &AuditLog) -> Result<PathBuf, Error> {
    let (path, file) = store.create_audit_log()?;
    audit.write_to(BufWriter::new(file))?;
    info!("Full log saved to: {}", path.display());
    Ok(path)
}

fn summarize(loaded: &LoadedReport, applied: &Applied, audit_log_path: PathBuf) -> ReconcileSummary {
    ReconcileSummary {
        report_path: loaded.path.clone(),
        audit_log_path,
        kept: applied.audit.kept.len(),
        removed: applied.audit.removed.len(),
        errors: applied.audit.errors.len(),
        skipped_groups: applied.skipped_groups,
        skipped_rows: loaded.skipped_rows,
        saved_mb: applied.saved_mb,
    }
}

use crate::config::ExclusionRules;
use crate::models::FileRecord;
use crate::progress::ProgressReporter;
use std::io;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

const PROGRESS_EVERY: usize = 100;

#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub records: Vec<FileRecord>,
    pub warnings: usize,
}

/// Sequential directory traversal, entries sorted by name within each
/// directory. Yields regular files only; symlinks are not followed.
///
/// Unreadable directories and entries are logged and counted, never fatal.
/// So are paths that are not valid UTF-8. Only a missing or non-directory
/// `root` is an error.
pub fn collect_files(
    root: &Path,
    rules: &ExclusionRules,
    exclude_empty: bool,
    reporter: &dyn ProgressReporter,
) -> io::Result<WalkOutcome> {
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Scan root {} is not a directory", root.display()),
        ));
    }

    let mut outcome = WalkOutcome::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !entry.file_type().is_dir() || !rules.is_ignored(entry.path())
        });

    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                let location = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                warn!("Error accessing {}: {}", location, err);
                outcome.warnings += 1;
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.to_str().is_none() {
            warn!(
                "Skipping {}: path is not valid UTF-8 and cannot be listed in a report",
                path.display()
            );
            outcome.warnings += 1;
            continue;
        }
        if rules.is_excluded(path) {
            debug!("Excluded {}", path.display());
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!("Error accessing {}: {}", path.display(), err);
                outcome.warnings += 1;
                continue;
            }
        };

        let size = metadata.len();
        if exclude_empty && size == 0 {
            continue;
        }

        outcome.records.push(FileRecord {
            path: path.to_path_buf(),
            size,
        });

        if outcome.records.len() % PROGRESS_EVERY == 0 {
            reporter.on_scan_progress(outcome.records.len(), &path.to_string_lossy());
        }
    }

    Ok(outcome)
}

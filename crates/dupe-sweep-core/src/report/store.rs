use super::codec;
use crate::config::SweepConfig;
use crate::error::Error;
use crate::models::{LoadedReport, Report};
use chrono::Local;
use glob::Pattern;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};

pub const REPORT_EXTENSION: &str = "csv";
pub const AUDIT_EXTENSION: &str = "txt";

/// Timestamped report and audit-log files in one directory.
///
/// Files are created with create-new semantics. When a name is already
/// taken (two runs in the same second) a `_1`, `_2`, ... suffix is added
/// instead of overwriting.
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
    report_prefix: String,
    audit_prefix: String,
}

impl ReportStore {
    pub fn new(dir: impl Into<PathBuf>, report_prefix: &str, audit_prefix: &str) -> Self {
        Self {
            dir: dir.into(),
            report_prefix: report_prefix.to_string(),
            audit_prefix: audit_prefix.to_string(),
        }
    }

    pub fn from_config(config: &SweepConfig) -> Self {
        Self::new(&config.output_dir, &config.report_prefix, &config.audit_prefix)
    }

    pub fn write_report(&self, report: &Report) -> Result<PathBuf, Error> {
        self.write_report_stamped(report, &timestamp())
    }

    fn write_report_stamped(&self, report: &Report, stamp: &str) -> Result<PathBuf, Error> {
        self.write_new_report(stamp, |writer| codec::write_report(report, writer))
    }

    /// Create a fresh report file and fill it with `write`. A file whose
    /// write fails is removed, so it can never be picked as the latest report.
    fn write_new_report<F>(&self, stamp: &str, write: F) -> Result<PathBuf, Error>
    where
        F: FnOnce(BufWriter<File>) -> Result<usize, Error>,
    {
        let (path, file) =
            create_unique(&self.dir, &self.report_prefix, stamp, REPORT_EXTENSION)?;
        match write(BufWriter::new(file)) {
            Ok(rows) => {
                info!("Wrote {} duplicate sets to {}", rows, path.display());
                Ok(path)
            }
            Err(err) => {
                if let Err(rm) = fs::remove_file(&path) {
                    warn!("Error removing incomplete report {}: {}", path.display(), rm);
                }
                Err(err)
            }
        }
    }

    pub fn read_report(&self, path: &Path) -> Result<LoadedReport, Error> {
        let file = File::open(path)?;
        let (entries, skipped_rows) = codec::read_report(BufReader::new(file), path)?;
        debug!(
            "Read {} sets from {} ({} rows skipped)",
            entries.len(),
            path.display(),
            skipped_rows
        );
        Ok(LoadedReport {
            path: path.to_path_buf(),
            entries,
            skipped_rows,
        })
    }

    /// Newest report in the directory by modification time; file names only
    /// break ties.
    pub fn latest_report(&self) -> Result<PathBuf, Error> {
        let pattern = format!(
            "{}/{}*.{}",
            Pattern::escape(&self.dir.to_string_lossy()),
            Pattern::escape(&self.report_prefix),
            REPORT_EXTENSION
        );

        let mut latest: Option<(SystemTime, PathBuf)> = None;
        for entry in glob::glob(&pattern)? {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!("Error reading report candidate: {}", e);
                    continue;
                }
            };
            let modified = match fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(e) => {
                    warn!("Error reading timestamp of {}: {}", path.display(), e);
                    continue;
                }
            };
            let candidate = (modified, path);
            if latest.as_ref().map_or(true, |best| candidate > *best) {
                latest = Some(candidate);
            }
        }

        latest.map(|(_, path)| path).ok_or_else(|| Error::NoReport {
            dir: self.dir.clone(),
        })
    }

    /// Open a fresh audit log for writing.
    pub fn create_audit_log(&self) -> Result<(PathBuf, File), Error> {
        Ok(create_unique(
            &self.dir,
            &self.audit_prefix,
            &timestamp(),
            AUDIT_EXTENSION,
        )?)
    }
}

pub fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

fn create_unique(
    dir: &Path,
    prefix: &str,
    stamp: &str,
    extension: &str,
) -> io::Result<(PathBuf, File)> {
    let mut sequence = 0u32;
    loop {
        let name = match sequence {
            0 => format!("{}{}.{}", prefix, stamp, extension),
            n => format!("{}{}_{}.{}", prefix, stamp, n, extension),
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!("{} already exists, trying next sequence", path.display());
                sequence += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

use std::path::PathBuf;

pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A regular file discovered during a scan walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: u64,
}

/// Duplicate heuristic: exact file name plus byte size. Not a content hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub name: String,
    pub size: u64,
}

/// Two or more paths sharing one `GroupKey`, in discovery order.
/// The first path is the one reconciliation keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub key: GroupKey,
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Bytes freed if every path but the first were removed.
    pub fn reclaimable_bytes(&self) -> u64 {
        self.key.size * (self.paths.len() as u64).saturating_sub(1)
    }
}

/// Output of one scan pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub groups: Vec<DuplicateGroup>,
}

impl Report {
    pub fn reclaimable_bytes(&self) -> u64 {
        self.groups.iter().map(DuplicateGroup::reclaimable_bytes).sum()
    }

    pub fn duplicate_files(&self) -> usize {
        self.groups.iter().map(|g| g.paths.len().saturating_sub(1)).sum()
    }
}

/// One group as read back from a persisted report.
///
/// The size is whatever the file carries: MB rounded to two decimals, so the
/// original byte count cannot be recovered.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub name: String,
    pub size_mb: f64,
    pub paths: Vec<PathBuf>,
}

/// A persisted report after parsing, with the count of rows that were skipped.
#[derive(Debug, Clone, Default)]
pub struct LoadedReport {
    pub path: PathBuf,
    pub entries: Vec<ReportEntry>,
    pub skipped_rows: usize,
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

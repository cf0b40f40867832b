//! Tabular report format: a header row then one row per duplicate group,
//! `name, size in MB (2 decimals), paths joined by '|'`.
//!
//! Sizes are deliberately stored in rounded megabytes. Reading a report back
//! gives the figure used for saved-space totals, never the exact byte count.

use crate::error::Error;
use crate::models::{bytes_to_mb, DuplicateGroup, Report, ReportEntry};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const PATH_DELIMITER: char = '|';
pub const HEADER: [&str; 3] = ["Filename", "Size (MB)", "Paths"];

/// Drop paths that contain the delimiter, since they would split into
/// different paths on the way back in, then drop groups left with fewer
/// than two paths.
pub fn persistable(report: &Report) -> Report {
    let groups = report
        .groups
        .iter()
        .filter_map(|group| {
            let paths: Vec<PathBuf> = group
                .paths
                .iter()
                .filter(|path| {
                    let clean = !path.to_string_lossy().contains(PATH_DELIMITER);
                    if !clean {
                        warn!(
                            "Path {} contains '{}' and cannot be listed in a report",
                            path.display(),
                            PATH_DELIMITER
                        );
                    }
                    clean
                })
                .cloned()
                .collect();
            (paths.len() > 1).then(|| DuplicateGroup {
                key: group.key.clone(),
                paths,
            })
        })
        .collect();
    Report { groups }
}

pub fn write_report<W: Write>(report: &Report, writer: W) -> Result<usize, Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;

    for group in &report.groups {
        let joined = group
            .paths
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(&PATH_DELIMITER.to_string());
        let size_mb = format!("{:.2}", bytes_to_mb(group.key.size));
        wtr.write_record([group.key.name.as_str(), size_mb.as_str(), joined.as_str()])?;
    }

    wtr.flush()?;
    Ok(report.groups.len())
}

/// Parse a whole report. Bad rows are skipped with a warning and counted;
/// a wrong header or undecodable content fails the whole read.
pub fn read_report<R: Read>(reader: R, source: &Path) -> Result<(Vec<ReportEntry>, usize), Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|e| malformed(source, e.to_string()))?;
    if headers.iter().map(str::trim).ne(HEADER.iter().copied()) {
        return Err(malformed(
            source,
            format!("unexpected header {:?}", headers.iter().collect::<Vec<_>>()),
        ));
    }

    let mut entries = Vec::new();
    let mut skipped = 0;

    for (i, result) in rdr.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| malformed(source, e.to_string()))?;

        if record.len() != HEADER.len() {
            warn!(
                "Skipping malformed row {}: expected {} columns, found {}",
                row,
                HEADER.len(),
                record.len()
            );
            skipped += 1;
            continue;
        }

        let size_mb = match record[1].trim().parse::<f64>() {
            Ok(size) if size.is_finite() && size >= 0.0 => size,
            _ => {
                warn!("Skipping malformed row {}: invalid size '{}'", row, &record[1]);
                skipped += 1;
                continue;
            }
        };

        let paths: Vec<PathBuf> = record[2]
            .split(PATH_DELIMITER)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect();
        if paths.len() < 2 {
            warn!(
                "Skipping row {} ({}): fewer than 2 paths listed",
                row, &record[0]
            );
            skipped += 1;
            continue;
        }

        entries.push(ReportEntry {
            name: record[0].to_string(),
            size_mb,
            paths,
        });
    }

    Ok((entries, skipped))
}

fn malformed(source: &Path, reason: String) -> Error {
    Error::MalformedReport {
        path: source.to_path_buf(),
        reason,
    }
}

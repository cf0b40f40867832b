use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use dupe_sweep_core::report::ReportStore;
use dupe_sweep_core::{Error, ReconcileOutcome, SilentReporter, SweepConfig, SweepEngine};

fn files_with_prefix(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().starts_with(prefix))
                .unwrap_or(false)
        })
        .collect();
    found.sort();
    found
}

/// Layout:
///   root/
///     folder_a/
///       unique_a.txt     ("unique content a")
///       shared.txt       ("shared content xyz")
///     folder_b/
///       unique_b.txt     ("unique content b")
///       shared.txt       ("another content xy")  same name and size as folder_a/shared.txt
///     folder_c/
///       nested/
///         shared.txt     ("shared content xyz")
///       large.bin        (4KB of 0xAA)
///     folder_d/
///       large.bin        (4KB of 0xBB)
///       large_copy.bin   (4KB of 0xAA)           same content, different name: not grouped
fn create_test_tree(root: &Path) {
    let folder_a = root.join("folder_a");
    let folder_b = root.join("folder_b");
    let folder_c = root.join("folder_c");
    let folder_d = root.join("folder_d");
    fs::create_dir_all(&folder_a).unwrap();
    fs::create_dir_all(&folder_b).unwrap();
    fs::create_dir_all(folder_c.join("nested")).unwrap();
    fs::create_dir_all(&folder_d).unwrap();

    fs::write(folder_a.join("unique_a.txt"), "unique content a").unwrap();
    fs::write(folder_b.join("unique_b.txt"), "unique content b").unwrap();

    fs::write(folder_a.join("shared.txt"), "shared content xyz").unwrap();
    fs::write(folder_b.join("shared.txt"), "another content xy").unwrap();
    fs::write(folder_c.join("nested/shared.txt"), "shared content xyz").unwrap();

    fs::write(folder_c.join("large.bin"), vec![0xAAu8; 4096]).unwrap();
    fs::write(folder_d.join("large.bin"), vec![0xBBu8; 4096]).unwrap();
    fs::write(folder_d.join("large_copy.bin"), vec![0xAAu8; 4096]).unwrap();
}

fn engine_for(root: &Path, output: &Path) -> SweepEngine {
    SweepEngine::new(SweepConfig::for_root(root).with_output_dir(output))
}

fn accept() -> impl FnMut(&str) -> io::Result<bool> {
    |_: &str| Ok::<bool, io::Error>(true)
}

fn decline() -> impl FnMut(&str) -> io::Result<bool> {
    |_: &str| Ok::<bool, io::Error>(false)
}

#[test]
fn test_full_scan_then_remove_pipeline() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("scan_root");
    create_test_tree(&root);
    let root = fs::canonicalize(&root).unwrap();
    let out = tempdir().unwrap();

    let engine = engine_for(&root, out.path());
    let result = engine.scan(&SilentReporter).unwrap();

    assert_eq!(result.total_files_scanned, 8);
    assert_eq!(result.duplicate_groups, 2);
    assert_eq!(result.duplicate_files, 3);
    assert_eq!(result.reclaimable_bytes, 18 * 2 + 4096);
    assert_eq!(result.warnings, 0);
    assert!(result.report_path.starts_with(out.path()));

    let loaded = ReportStore::from_config(engine.config())
        .read_report(&result.report_path)
        .unwrap();
    assert_eq!(loaded.entries.len(), 2);
    for entry in &loaded.entries {
        assert!(entry.paths.len() >= 2);
        for path in &entry.paths {
            assert_eq!(path.file_name().unwrap().to_string_lossy(), entry.name);
        }
    }

    let mut confirm = accept();
    let outcome = engine.remove(&mut confirm, &SilentReporter).unwrap();
    let summary = match outcome {
        ReconcileOutcome::Completed(summary) => summary,
        ReconcileOutcome::Cancelled => panic!("expected a completed run"),
    };

    assert_eq!(summary.report_path, result.report_path);
    assert_eq!(summary.kept, 2);
    assert_eq!(summary.removed, 3);
    assert_eq!(summary.errors, 0);

    // First-discovered copies survive, everything else in each set is gone.
    assert!(root.join("folder_a/shared.txt").exists());
    assert!(!root.join("folder_b/shared.txt").exists());
    assert!(!root.join("folder_c/nested/shared.txt").exists());
    assert!(root.join("folder_c/large.bin").exists());
    assert!(!root.join("folder_d/large.bin").exists());
    assert!(root.join("folder_d/large_copy.bin").exists());
    assert!(root.join("folder_a/unique_a.txt").exists());

    let logs = files_with_prefix(out.path(), "removal_log_");
    assert_eq!(logs, vec![summary.audit_log_path.clone()]);
    let log = fs::read_to_string(&logs[0]).unwrap();
    assert!(log.contains(&root.join("folder_a/shared.txt").display().to_string()));
    assert!(log.contains(&root.join("folder_d/large.bin").display().to_string()));
}

#[test]
fn test_scan_groups_only_matching_name_and_size() {
    let tmp = tempdir().unwrap();
    let root = fs::canonicalize(tmp.path()).unwrap();
    fs::create_dir_all(root.join("x")).unwrap();
    fs::create_dir_all(root.join("y")).unwrap();
    fs::write(root.join("x/a.txt"), "0123456789").unwrap();
    fs::write(root.join("y/a.txt"), "0123456789").unwrap();
    fs::write(root.join("x/b.txt"), "0123456789").unwrap();
    let out = tempdir().unwrap();

    let engine = engine_for(&root, out.path());
    let result = engine.scan(&SilentReporter).unwrap();
    assert_eq!(result.duplicate_groups, 1);

    let loaded = engine.store().read_report(&result.report_path).unwrap();
    assert_eq!(loaded.entries.len(), 1);
    assert_eq!(loaded.entries[0].name, "a.txt");
    assert_eq!(
        loaded.entries[0].paths,
        vec![root.join("x/a.txt"), root.join("y/a.txt")]
    );
}

#[test]
fn test_every_reported_group_shares_one_key() {
    let tmp = tempdir().unwrap();
    let root = fs::canonicalize(tmp.path()).unwrap();
    let names = ["alpha.dat", "beta.dat", "gamma.dat"];
    for dir in 0..5 {
        let d = root.join(format!("d{}", dir));
        fs::create_dir_all(&d).unwrap();
        for (i, name) in names.iter().enumerate() {
            // Sizes collide for some directories only.
            let len = (i + 1) * 100 + (dir % 2) * (i + 1);
            fs::write(d.join(name), vec![b'z'; len]).unwrap();
        }
    }
    let out = tempdir().unwrap();

    let result = engine_for(&root, out.path()).scan(&SilentReporter).unwrap();
    assert_eq!(result.duplicate_groups, 6);

    let loaded = ReportStore::new(out.path(), "duplicates_", "removal_log_")
        .read_report(&result.report_path)
        .unwrap();
    let mut seen = HashSet::new();
    for entry in &loaded.entries {
        assert!(entry.paths.len() >= 2);
        let sizes: HashSet<u64> = entry
            .paths
            .iter()
            .map(|p| fs::metadata(p).unwrap().len())
            .collect();
        assert_eq!(sizes.len(), 1);
        for path in &entry.paths {
            assert_eq!(path.file_name().unwrap().to_string_lossy(), entry.name);
            assert!(seen.insert(path.clone()), "path listed twice: {:?}", path);
        }
    }
}

#[test]
fn test_scan_without_duplicates_still_writes_report() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("only.txt"), "one").unwrap();
    let out = tempdir().unwrap();

    let result = engine_for(tmp.path(), out.path()).scan(&SilentReporter).unwrap();
    assert_eq!(result.duplicate_groups, 0);
    assert_eq!(result.reclaimable_bytes, 0);
    assert_eq!(
        fs::read_to_string(&result.report_path).unwrap(),
        "Filename,Size (MB),Paths\n"
    );
}

#[test]
fn test_rescan_ignores_previous_reports_and_logs() {
    let tmp = tempdir().unwrap();
    let root = fs::canonicalize(tmp.path()).unwrap();
    fs::create_dir_all(root.join("x")).unwrap();
    fs::create_dir_all(root.join("y")).unwrap();
    fs::write(root.join("x/a.txt"), "abc").unwrap();
    fs::write(root.join("y/a.txt"), "abc").unwrap();
    fs::write(root.join("x/removal_log_20240101_000000.txt"), "old").unwrap();
    fs::write(root.join("y/removal_log_20240101_000000.txt"), "old").unwrap();

    // Reports land inside the scanned tree.
    let engine = engine_for(&root, &root);
    let first = engine.scan(&SilentReporter).unwrap();
    let second = engine.scan(&SilentReporter).unwrap();

    assert_ne!(first.report_path, second.report_path);
    assert_eq!(first.total_files_scanned, 2);
    assert_eq!(second.total_files_scanned, 2);
    assert_eq!(second.duplicate_groups, 1);
}

#[test]
fn test_remove_without_report_fails_and_writes_nothing() {
    let tmp = tempdir().unwrap();
    let out = tempdir().unwrap();

    let mut confirm = accept();
    let err = engine_for(tmp.path(), out.path())
        .remove(&mut confirm, &SilentReporter)
        .unwrap_err();

    assert!(matches!(err, Error::NoReport { .. }));
    assert!(err.to_string().contains("Run the scan first"));
    assert!(files_with_prefix(out.path(), "removal_log_").is_empty());
}

#[test]
fn test_declined_removal_changes_nothing() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("scan_root");
    create_test_tree(&root);
    let out = tempdir().unwrap();

    let engine = engine_for(&root, out.path());
    engine.scan(&SilentReporter).unwrap();

    let mut confirm = decline();
    let outcome = engine.remove(&mut confirm, &SilentReporter).unwrap();

    assert!(matches!(outcome, ReconcileOutcome::Cancelled));
    assert!(root.join("folder_b/shared.txt").exists());
    assert!(root.join("folder_c/nested/shared.txt").exists());
    assert!(root.join("folder_d/large.bin").exists());
    assert!(files_with_prefix(out.path(), "removal_log_").is_empty());
}

#[test]
fn test_group_with_missing_original_is_left_alone() {
    let tmp = tempdir().unwrap();
    let root = fs::canonicalize(tmp.path()).unwrap();
    fs::create_dir_all(root.join("missing")).unwrap();
    fs::create_dir_all(root.join("real")).unwrap();
    fs::write(root.join("missing/a.txt"), "abc").unwrap();
    fs::write(root.join("real/a.txt"), "abc").unwrap();
    let out = tempdir().unwrap();

    let engine = engine_for(&root, out.path());
    engine.scan(&SilentReporter).unwrap();
    fs::remove_file(root.join("missing/a.txt")).unwrap();

    let mut confirm = accept();
    let outcome = engine.remove(&mut confirm, &SilentReporter).unwrap();
    let summary = match outcome {
        ReconcileOutcome::Completed(summary) => summary,
        ReconcileOutcome::Cancelled => panic!("expected a completed run"),
    };

    assert!(root.join("real/a.txt").exists());
    assert_eq!(summary.removed, 0);
    assert_eq!(summary.kept, 0);
    assert_eq!(summary.skipped_groups, 1);
    let log = fs::read_to_string(&summary.audit_log_path).unwrap();
    assert!(!log.contains("real/a.txt"));
}

#[test]
fn test_remove_uses_most_recent_report() {
    let tmp = tempdir().unwrap();
    let root = fs::canonicalize(tmp.path()).unwrap();
    fs::create_dir_all(root.join("x")).unwrap();
    fs::create_dir_all(root.join("y")).unwrap();
    fs::write(root.join("x/a.txt"), "abc").unwrap();
    fs::write(root.join("y/a.txt"), "abc").unwrap();
    let out = tempdir().unwrap();

    // A stale report with a name that sorts last but an old timestamp.
    let stale = out.path().join("duplicates_99991231_235959.csv");
    fs::write(
        &stale,
        format!(
            "Filename,Size (MB),Paths\na.txt,0.00,{}|{}\n",
            root.join("y/a.txt").display(),
            root.join("x/a.txt").display()
        ),
    )
    .unwrap();
    fs::File::options()
        .write(true)
        .open(&stale)
        .unwrap()
        .set_modified(std::time::SystemTime::now() - std::time::Duration::from_secs(3600))
        .unwrap();

    let engine = engine_for(&root, out.path());
    let fresh = engine.scan(&SilentReporter).unwrap();

    let mut confirm = accept();
    let summary = match engine.remove(&mut confirm, &SilentReporter).unwrap() {
        ReconcileOutcome::Completed(summary) => summary,
        ReconcileOutcome::Cancelled => panic!("expected a completed run"),
    };

    assert_eq!(summary.report_path, fresh.report_path);
    assert!(root.join("x/a.txt").exists());
    assert!(!root.join("y/a.txt").exists());
}

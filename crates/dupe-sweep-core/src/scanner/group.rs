use crate::models::{DuplicateGroup, FileRecord, GroupKey, Report};
use std::collections::HashMap;
use std::path::PathBuf;

/// Accumulates paths under their (name, size) key while preserving both the
/// order keys were first seen and the order paths were discovered.
#[derive(Debug, Default)]
pub struct GroupIndex {
    slots: HashMap<GroupKey, usize>,
    groups: Vec<(GroupKey, Vec<PathBuf>)>,
}

impl GroupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names are compared byte-exactly; a record whose name is not valid
    /// UTF-8 is not indexed.
    pub fn insert(&mut self, record: FileRecord) {
        let name = match record.path.file_name().and_then(|name| name.to_str()) {
            Some(name) => name.to_string(),
            None => return,
        };
        let key = GroupKey {
            name,
            size: record.size,
        };

        match self.slots.get(&key) {
            Some(&slot) => self.groups[slot].1.push(record.path),
            None => {
                self.slots.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![record.path]));
            }
        }
    }

    pub fn distinct_keys(&self) -> usize {
        self.groups.len()
    }

    /// Keep only keys seen at least twice.
    pub fn into_report(self) -> Report {
        let groups = self
            .groups
            .into_iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|(key, paths)| DuplicateGroup { key, paths })
            .collect();
        Report { groups }
    }
}

impl FromIterator<FileRecord> for GroupIndex {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let mut index = GroupIndex::new();
        for record in iter {
            index.insert(record);
        }
        index
    }
}

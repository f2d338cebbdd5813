mod terminal;
mod text;

pub use terminal::{TerminalSummary, DEFAULT_TOP};
pub use text::{
    render_size_report, render_unused_report, render_unused_section, NOT_DYNAMICALLY_LOADED_TITLE,
    NO_METADATA_TITLE, UNREFERENCED_TITLE,
};

use crate::discovery::AssetRecord;
use std::path::PathBuf;

/// One file line in a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl From<&AssetRecord> for FileEntry {
    fn from(asset: &AssetRecord) -> Self {
        Self {
            path: asset.path.clone(),
            size_bytes: asset.size_bytes,
        }
    }
}

/// Files sharing a key (resource kind or extension), largest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<K> {
    pub key: K,
    pub files: Vec<FileEntry>,
    pub total_size_bytes: u64,
}

/// Grouped files plus totals for one report section.
///
/// Totals are computed from exactly the files listed, so the header of a
/// rendered section always agrees with its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult<K> {
    pub groups: Vec<Group<K>>,
    pub total_count: u64,
    pub total_size_bytes: u64,
}

impl<K> Default for AnalysisResult<K> {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            total_count: 0,
            total_size_bytes: 0,
        }
    }
}

impl<K> AnalysisResult<K> {
    /// Build from groups in the given order. Files in each group are sorted by
    /// size, descending; equal sizes keep their discovery order.
    pub fn from_groups(groups: impl IntoIterator<Item = (K, Vec<FileEntry>)>) -> Self {
        let mut result = Self::default();

        for (key, mut files) in groups {
            if files.is_empty() {
                continue;
            }
            files.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));

            let total_size_bytes: u64 = files.iter().map(|f| f.size_bytes).sum();
            result.total_count += files.len() as u64;
            result.total_size_bytes += total_size_bytes;
            result.groups.push(Group {
                key,
                files,
                total_size_bytes,
            });
        }

        result
    }

    /// Reorder groups by their total size, descending (stable)
    pub fn sort_groups_by_size(&mut self) {
        self.groups
            .sort_by(|a, b| b.total_size_bytes.cmp(&a.total_size_bytes));
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All listed files in render order
    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.groups.iter().flat_map(|g| g.files.iter())
    }
}

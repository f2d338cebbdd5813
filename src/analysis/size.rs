use crate::discovery::DiscoveredFile;
use crate::report::{AnalysisResult, FileEntry};
use std::collections::HashMap;
use std::path::Path;

/// Label for files without an extension
pub const NO_EXTENSION: &str = "no_extension";

/// Report key for a file: `.png`, `.meta`, or `no_extension`
pub fn extension_key(path: &Path) -> String {
    match path.extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy()),
        None => NO_EXTENSION.to_string(),
    }
}

/// Groups every file under the root by extension, for a "where is the space
/// going" view. No classification or metadata is involved.
#[derive(Debug, Default)]
pub struct SizeAnalyzer;

impl SizeAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, files: &[DiscoveredFile]) -> AnalysisResult<String> {
        let mut order: Vec<(String, Vec<FileEntry>)> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();

        for file in files {
            let key = extension_key(&file.path);
            let slot = *slots.entry(key.clone()).or_insert_with(|| {
                order.push((key, Vec::new()));
                order.len() - 1
            });
            order[slot].1.push(FileEntry {
                path: file.path.clone(),
                size_bytes: file.size_bytes,
            });
        }

        let mut result = AnalysisResult::from_groups(order);
        result.sort_groups_by_size();
        result
    }
}

use super::kind::ResourceKind;
use crate::config::Config;
use crate::error::{AnalysisError, Result};
use crate::meta::MetaExtractor;
use crate::util::fs::read_text_lossy;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};
use walkdir::{DirEntry, WalkDir};

/// Shared flag a caller can flip to stop a running walk
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A regular file found under the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Absolute path as reached from the root
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// A binary resource that may turn out to be unreferenced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    pub path: PathBuf,
    pub kind: ResourceKind,
    /// Own identity first, then sub-resource identities; empty without metadata
    pub identities: Vec<String>,
    pub size_bytes: u64,
}

impl AssetRecord {
    pub fn has_identity(&self) -> bool {
        !self.identities.is_empty()
    }
}

/// Full text of a file that may mention asset identities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceBlob {
    pub path: PathBuf,
    pub kind: ResourceKind,
    pub content: String,
}

/// Everything the walker learned about a tree, in discovery order
#[derive(Debug, Default)]
pub struct WalkOutput {
    pub root: PathBuf,
    pub assets: Vec<AssetRecord>,
    pub blobs: Vec<ReferenceBlob>,
}

/// Walks an asset tree and sorts files into candidates and reference sources
pub struct TreeWalker<'a> {
    config: &'a Config,
    cancel: CancelToken,
    extractor: MetaExtractor,
}

impl<'a> TreeWalker<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
            extractor: MetaExtractor::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Canonicalize and validate the root directory
    pub fn resolve_root(root: &Path) -> Result<PathBuf> {
        let canonical = fs::canonicalize(root).map_err(|e| AnalysisError::InvalidSource {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;
        if !canonical.is_dir() {
            return Err(AnalysisError::InvalidSource {
                path: root.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }
        Ok(canonical)
    }

    /// List every regular file under `root` exactly once.
    ///
    /// Entries are visited in file-name order. Symlinks are followed only
    /// when their target stays inside the root, and a file reachable through
    /// several paths is reported under the first one.
    pub fn enumerate(&self, root: &Path) -> Result<(PathBuf, Vec<DiscoveredFile>)> {
        let root = Self::resolve_root(root)?;
        debug!("Scanning for files in: {}", root.display());

        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut files = Vec::new();

        let walker = WalkDir::new(&root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.admit(entry, &root));

        for entry in walker {
            if self.cancel.is_cancelled() {
                return Err(AnalysisError::Cancelled);
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let canonical = match fs::canonicalize(entry.path()) {
                Ok(path) => path,
                Err(e) => {
                    warn!("Cannot resolve {}: {}", entry.path().display(), e);
                    continue;
                }
            };
            if !seen.insert(canonical) {
                trace!("Already visited: {}", entry.path().display());
                continue;
            }

            let size_bytes = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(e) => {
                    warn!("Cannot stat {}: {}", entry.path().display(), e);
                    continue;
                }
            };

            files.push(DiscoveredFile {
                path: entry.into_path(),
                size_bytes,
            });
        }

        debug!("Found {} files", files.len());
        Ok((root, files))
    }

    /// Walk `root` and build the candidate and reference-source lists
    pub fn walk(&self, root: &Path) -> Result<WalkOutput> {
        let (root, files) = self.enumerate(root)?;

        let visits: Vec<(Option<AssetRecord>, Option<ReferenceBlob>)> = if self.config.parallel {
            files.par_iter().map(|file| self.visit(file)).collect()
        } else {
            files.iter().map(|file| self.visit(file)).collect()
        };

        if self.cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }

        let mut output = WalkOutput {
            root,
            ..WalkOutput::default()
        };
        for (asset, blob) in visits {
            output.assets.extend(asset);
            output.blobs.extend(blob);
        }

        debug!(
            "Walk complete: {} candidate assets, {} reference sources",
            output.assets.len(),
            output.blobs.len()
        );
        Ok(output)
    }

    /// Route one file. Prefabs produce both a candidate and a reference source.
    fn visit(&self, file: &DiscoveredFile) -> (Option<AssetRecord>, Option<ReferenceBlob>) {
        if self.cancel.is_cancelled() {
            return (None, None);
        }

        let kind = match ResourceKind::from_path(&file.path) {
            Some(kind) => kind,
            None => return (None, None),
        };

        let blob = if kind.is_reference_source() {
            match read_text_lossy(&file.path) {
                Ok(content) => Some(ReferenceBlob {
                    path: file.path.clone(),
                    kind,
                    content,
                }),
                Err(e) => {
                    warn!("Cannot read {}: {}", file.path.display(), e);
                    None
                }
            }
        } else {
            None
        };

        let asset = if kind.is_candidate() {
            Some(AssetRecord {
                path: file.path.clone(),
                kind,
                identities: self.extractor.extract(&file.path, kind),
                size_bytes: file.size_bytes,
            })
        } else {
            None
        };

        trace!("{:?}: {}", kind, file.path.display());
        (asset, blob)
    }

    fn admit(&self, entry: &DirEntry, root: &Path) -> bool {
        if entry.depth() == 0 {
            return true;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if self.config.should_exclude(relative) {
            trace!("Excluding: {}", entry.path().display());
            return false;
        }

        if entry.path_is_symlink() {
            match fs::canonicalize(entry.path()) {
                Ok(target) if target.starts_with(root) => {}
                Ok(target) => {
                    debug!(
                        "Not following {} -> {} (outside root)",
                        entry.path().display(),
                        target.display()
                    );
                    return false;
                }
                Err(e) => {
                    debug!("Dangling link {}: {}", entry.path().display(), e);
                    return false;
                }
            }
        }

        true
    }
}

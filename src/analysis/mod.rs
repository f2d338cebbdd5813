//! Unused-asset and asset-size analysis
//!
//! Both modes walk the tree once into a private in-memory snapshot, derive a
//! report from it and write the report as the only product of the run.

mod matcher;
mod size;

pub use matcher::{is_uuid_shaped, IdentityIndex, Partition, ReferenceMatcher};
pub use size::{extension_key, SizeAnalyzer, NO_EXTENSION};

use crate::config::Config;
use crate::discovery::{AssetRecord, CancelToken, ResourceKind, TreeWalker};
use crate::error::{AnalysisError, Result};
use crate::report::{render_size_report, render_unused_report, AnalysisResult, FileEntry};
use crate::util::fs::{absolute_path, write_report};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of an unused-asset run
#[derive(Debug, Default)]
pub struct UnusedReport {
    pub root: PathBuf,
    /// Assets with identities that nothing references
    pub unbound: AnalysisResult<ResourceKind>,
    /// Referenced assets in the dynamic-load directory that code never loads
    pub not_dynamically_loaded: AnalysisResult<ResourceKind>,
    /// Assets without usable metadata; their usage cannot be decided
    pub no_metadata: AnalysisResult<ResourceKind>,
    pub bound_count: usize,
    pub asset_count: usize,
    pub source_count: usize,
}

/// Result of an asset-size run
#[derive(Debug, Default)]
pub struct SizeReport {
    pub root: PathBuf,
    pub result: AnalysisResult<String>,
}

/// Runs analyses with a given configuration
pub struct Analyzer<'a> {
    config: &'a Config,
    cancel: CancelToken,
}

impl<'a> Analyzer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Honor `cancel` at file granularity; a cancelled run writes nothing
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Find unused assets under `source_dir` without writing anything
    pub fn find_unused(&self, source_dir: &Path, excludes: Option<&str>) -> Result<UnusedReport> {
        let keep = self.keep_patterns(excludes)?;

        info!("Looking up assets in {}", source_dir.display());
        let walk = TreeWalker::new(self.config)
            .with_cancel(self.cancel.clone())
            .walk(source_dir)?;
        info!(
            "Found {} candidate assets and {} reference sources",
            walk.assets.len(),
            walk.blobs.len()
        );

        let assets: Vec<AssetRecord> = walk
            .assets
            .into_iter()
            .filter(|asset| {
                let path = asset.path.to_string_lossy();
                let kept = keep.iter().any(|re| re.is_match(&path));
                if kept {
                    debug!("Keeping {}", asset.path.display());
                }
                !kept
            })
            .collect();

        let partition = ReferenceMatcher::new(&walk.root, self.config.resources_dir.clone())
            .with_parallel(self.config.parallel)
            .partition(&assets, &walk.blobs);

        Ok(UnusedReport {
            root: walk.root,
            unbound: by_kind(&partition.unbound),
            not_dynamically_loaded: by_kind(&partition.not_dynamically_loaded),
            no_metadata: by_kind(&partition.no_metadata),
            bound_count: partition.bound_count,
            asset_count: assets.len(),
            source_count: walk.blobs.len(),
        })
    }

    /// Measure every file under `source_dir` by extension without writing anything
    pub fn measure_sizes(&self, source_dir: &Path) -> Result<SizeReport> {
        info!("Measuring assets in {}", source_dir.display());
        let (root, files) = TreeWalker::new(self.config)
            .with_cancel(self.cancel.clone())
            .enumerate(source_dir)?;

        let result = SizeAnalyzer::new().analyze(&files);
        info!(
            "Measured {} files in {} extension groups",
            result.total_count,
            result.groups.len()
        );
        Ok(SizeReport { root, result })
    }

    /// Write the unused-asset report for `source_dir` to `dest_file`.
    ///
    /// `excludes` is a regex; matching assets are never reported. Deletion is
    /// not performed: `delete_unused` only produces a warning.
    pub fn analyze_unused(
        &self,
        source_dir: &Path,
        dest_file: &Path,
        delete_unused: bool,
        excludes: Option<&str>,
    ) -> Result<UnusedReport> {
        let dest = resolve_dest(dest_file)?;
        let report = self.find_unused(source_dir, excludes)?;

        if delete_unused {
            warn!(
                "Deleting unused assets is not supported; {} candidates are listed in the report only",
                report.unbound.total_count
            );
        }

        write(&dest, &render_unused_report(&report))?;
        info!("Unused asset report written to {}", dest.display());
        Ok(report)
    }

    /// Write the by-extension size report for `source_dir` to `dest_file`
    pub fn analyze_size(&self, source_dir: &Path, dest_file: &Path) -> Result<SizeReport> {
        let dest = resolve_dest(dest_file)?;
        let report = self.measure_sizes(source_dir)?;

        write(&dest, &render_size_report(&report))?;
        info!("Size report written to {}", dest.display());
        Ok(report)
    }

    fn keep_patterns(&self, excludes: Option<&str>) -> Result<Vec<Regex>> {
        let mut patterns = self.config.keep_patterns()?;
        if let Some(pattern) = excludes {
            patterns.push(Regex::new(pattern)?);
        }
        Ok(patterns)
    }
}

/// Write the unused-asset report using the default configuration
pub fn analyze_unused(
    source_dir: &Path,
    dest_file: &Path,
    delete_unused: bool,
    excludes: Option<&str>,
) -> Result<UnusedReport> {
    let config = Config::default();
    Analyzer::new(&config).analyze_unused(source_dir, dest_file, delete_unused, excludes)
}

/// Write the by-extension size report using the default configuration
pub fn analyze_size(source_dir: &Path, dest_file: &Path) -> Result<SizeReport> {
    let config = Config::default();
    Analyzer::new(&config).analyze_size(source_dir, dest_file)
}

fn by_kind(map: &BTreeMap<ResourceKind, Vec<AssetRecord>>) -> AnalysisResult<ResourceKind> {
    AnalysisResult::from_groups(
        map.iter()
            .map(|(kind, assets)| (*kind, assets.iter().map(FileEntry::from).collect())),
    )
}

fn resolve_dest(dest_file: &Path) -> Result<PathBuf> {
    absolute_path(dest_file).map_err(|source| AnalysisError::WriteReport {
        path: dest_file.to_path_buf(),
        source,
    })
}

fn write(dest: &Path, content: &str) -> Result<()> {
    write_report(dest, content).map_err(|source| AnalysisError::WriteReport {
        path: dest.to_path_buf(),
        source,
    })
}

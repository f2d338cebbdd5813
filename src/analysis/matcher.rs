// Reference matching between candidate assets and reference sources

use crate::discovery::{path_below_dir, AssetRecord, ReferenceBlob, ResourceKind};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Length of a canonical `8-4-4-4-12` identity
const UUID_LEN: usize = 36;
const UUID_DASHES: [usize; 4] = [8, 13, 18, 23];

/// Check if `bytes` is shaped like a canonical hex uuid
pub fn is_uuid_shaped(bytes: &[u8]) -> bool {
    bytes.len() == UUID_LEN
        && bytes.iter().enumerate().all(|(i, b)| {
            if UUID_DASHES.contains(&i) {
                *b == b'-'
            } else {
                b.is_ascii_hexdigit()
            }
        })
}

/// Every uuid-shaped window of `text`, including overlapping ones
fn uuid_tokens(text: &str) -> impl Iterator<Item = &str> + '_ {
    let bytes = text.as_bytes();
    let last_start = bytes.len().saturating_sub(UUID_LEN - 1);
    (0..last_start).filter_map(move |start| {
        // Cheap rejection on the first dash before checking the whole window
        if bytes[start + 8] != b'-' {
            return None;
        }
        let window = &bytes[start..start + UUID_LEN];
        if is_uuid_shaped(window) {
            // An all-ASCII window always sits on char boundaries
            Some(&text[start..start + UUID_LEN])
        } else {
            None
        }
    })
}

/// Identity occurrences across all reference sources.
///
/// Uuid-shaped identities are answered from a token set built in one pass over
/// the corpus. Anything else falls back to a substring scan, so an identity is
/// present exactly when it occurs verbatim in some reference source.
pub struct IdentityIndex<'a> {
    tokens: HashSet<&'a str>,
    sources: Vec<&'a str>,
}

impl<'a> IdentityIndex<'a> {
    pub fn build(blobs: &'a [ReferenceBlob], parallel: bool) -> Self {
        let sources: Vec<&str> = blobs
            .iter()
            .filter(|blob| blob.kind.is_reference_source())
            .map(|blob| blob.content.as_str())
            .collect();

        let tokens: HashSet<&str> = if parallel {
            sources
                .par_iter()
                .fold(HashSet::new, |mut set, text| {
                    set.extend(uuid_tokens(*text));
                    set
                })
                .reduce(HashSet::new, |mut a, b| {
                    a.extend(b);
                    a
                })
        } else {
            sources.iter().flat_map(|text| uuid_tokens(*text)).collect()
        };

        debug!(
            "Identity index: {} distinct tokens across {} sources",
            tokens.len(),
            sources.len()
        );
        Self { tokens, sources }
    }

    /// Check if `identity` occurs in any reference source
    pub fn contains(&self, identity: &str) -> bool {
        if identity.is_empty() {
            return false;
        }
        if is_uuid_shaped(identity.as_bytes()) {
            self.tokens.contains(identity)
        } else {
            self.sources.iter().any(|text| text.contains(identity))
        }
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

/// Candidate assets split by how they are referenced
#[derive(Debug, Default)]
pub struct Partition {
    /// Has identities, none of which is referenced
    pub unbound: BTreeMap<ResourceKind, Vec<AssetRecord>>,
    /// No identity to search for (no or unreadable metadata)
    pub no_metadata: BTreeMap<ResourceKind, Vec<AssetRecord>>,
    /// Referenced, but sits in the dynamic-load directory without being loaded from code
    pub not_dynamically_loaded: BTreeMap<ResourceKind, Vec<AssetRecord>>,
    pub bound_count: usize,
}

/// Decides which candidates are referenced from code, prefabs or scenes
pub struct ReferenceMatcher {
    /// Scanned root; only directories below it count as the resources directory
    root: PathBuf,
    resources_dir: String,
    parallel: bool,
}

impl ReferenceMatcher {
    pub fn new(root: impl Into<PathBuf>, resources_dir: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            resources_dir: resources_dir.into(),
            parallel: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Partition `assets` against the text of `blobs`.
    ///
    /// An asset is bound when any one of its identities is present; atlas
    /// frames count on their own, so a single referenced frame binds the atlas.
    pub fn partition(&self, assets: &[AssetRecord], blobs: &[ReferenceBlob]) -> Partition {
        let index = IdentityIndex::build(blobs, self.parallel);
        let code: Vec<&str> = blobs
            .iter()
            .filter(|blob| blob.kind == ResourceKind::Code)
            .map(|blob| blob.content.as_str())
            .collect();

        let mut partition = Partition::default();

        for asset in assets {
            if !asset.has_identity() {
                partition
                    .no_metadata
                    .entry(asset.kind)
                    .or_default()
                    .push(asset.clone());
                continue;
            }

            let bound = asset.identities.iter().any(|id| index.contains(id));
            if !bound {
                partition
                    .unbound
                    .entry(asset.kind)
                    .or_default()
                    .push(asset.clone());
                continue;
            }

            partition.bound_count += 1;

            if let Some(load_path) = self.load_path(&asset.path) {
                if !code.iter().any(|text| text.contains(load_path.as_str())) {
                    partition
                        .not_dynamically_loaded
                        .entry(asset.kind)
                        .or_default()
                        .push(asset.clone());
                }
            }
        }

        info!(
            "Matched {} assets: {} bound, {} unbound, {} without metadata",
            assets.len(),
            partition.bound_count,
            count(&partition.unbound),
            count(&partition.no_metadata)
        );
        partition
    }

    /// The path code would pass to a dynamic loader: relative to the
    /// resources directory, `/`-separated, extension stripped.
    ///
    /// The resources directory is searched for below the root only, so a
    /// project that itself lives under a `resources` folder is unaffected.
    pub fn load_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let below = path_below_dir(relative, &self.resources_dir)?;
        let stem = below.with_extension("");
        let parts: Vec<String> = stem
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }
}

fn count(map: &BTreeMap<ResourceKind, Vec<AssetRecord>>) -> usize {
    map.values().map(Vec::len).sum()
}

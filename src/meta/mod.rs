//! Identity extraction from `.meta` sidecar files
//!
//! Every asset in the project has a JSON sidecar carrying its `uuid`. Composite
//! assets (sprite atlases) additionally list one `subMetas` entry per embedded
//! frame, each with its own `uuid`. Scenes and prefabs reference assets by these
//! identities, so they are what the matcher searches for.

use crate::discovery::ResourceKind;
use crate::util::fs::{read_json, SideFileError};
use serde_json::Value;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// Suffix appended to an asset path to locate its sidecar
pub const META_SUFFIX: &str = ".meta";

/// Outcome of looking up an asset's sidecar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaLookup {
    /// No sidecar next to the asset
    Missing,
    /// Sidecar exists but could not be read or parsed
    Unreadable,
    /// Sidecar parsed; identities in document order, deduplicated
    Found(Vec<String>),
}

impl MetaLookup {
    /// Identities carried by the sidecar (empty unless `Found`)
    pub fn into_identities(self) -> Vec<String> {
        match self {
            MetaLookup::Found(ids) => ids,
            MetaLookup::Missing | MetaLookup::Unreadable => Vec::new(),
        }
    }
}

/// Path of the sidecar for `asset_path` (`foo.png` -> `foo.png.meta`)
pub fn meta_path(asset_path: &Path) -> PathBuf {
    let mut path: OsString = asset_path.as_os_str().to_os_string();
    path.push(META_SUFFIX);
    PathBuf::from(path)
}

/// Reads sidecars and pulls out the identities an asset can be referenced by
#[derive(Debug, Default, Clone, Copy)]
pub struct MetaExtractor;

impl MetaExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Identities for `asset_path`; never fails, a bad sidecar yields none
    pub fn extract(&self, asset_path: &Path, kind: ResourceKind) -> Vec<String> {
        self.lookup(asset_path, kind).into_identities()
    }

    /// Look up the sidecar, distinguishing a missing file from a broken one
    pub fn lookup(&self, asset_path: &Path, kind: ResourceKind) -> MetaLookup {
        let sidecar = meta_path(asset_path);
        if !sidecar.is_file() {
            trace!("No metadata for {}", asset_path.display());
            return MetaLookup::Missing;
        }

        match read_json(&sidecar) {
            Ok(document) => MetaLookup::Found(identities_from_document(&document, kind)),
            Err(SideFileError::ParseError(e)) => {
                warn!("Malformed metadata {}: {}", sidecar.display(), e);
                MetaLookup::Unreadable
            }
            Err(SideFileError::ReadError(e)) => {
                warn!("Cannot read metadata {}: {}", sidecar.display(), e);
                MetaLookup::Unreadable
            }
        }
    }
}

/// Collect the top-level `uuid` and, for atlases, every `subMetas.*.uuid`
pub fn identities_from_document(document: &Value, kind: ResourceKind) -> Vec<String> {
    let mut identities: Vec<String> = Vec::new();
    let mut push = |id: &str| {
        if !id.is_empty() && !identities.iter().any(|existing| existing == id) {
            identities.push(id.to_string());
        }
    };

    if let Some(uuid) = document.get("uuid").and_then(Value::as_str) {
        push(uuid);
    }

    if kind == ResourceKind::ImageAtlas {
        if let Some(sub_metas) = document.get("subMetas").and_then(Value::as_object) {
            for sub_meta in sub_metas.values() {
                if let Some(uuid) = sub_meta.get("uuid").and_then(Value::as_str) {
                    push(uuid);
                }
            }
        }
    }

    identities
}

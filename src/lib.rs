//! assetsweep - Find unreferenced assets in Cocos Creator projects
//!
//! This library scans a project's asset tree and reports binary assets
//! (images, atlases, fonts, spine data, prefabs) that nothing references,
//! plus a by-extension breakdown of where the disk space goes.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **Tree Walk** - Enumerate files once, classify them by extension
//! 2. **Identity Extraction** - Read each asset's `.meta` sidecar for its uuids
//! 3. **Reference Matching** - Look the uuids up in code, prefab and scene text
//! 4. **Reporting** - Render a fixed-format text report

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod error;
pub mod meta;
pub mod report;
pub mod util;
pub mod watch;

pub use analysis::{analyze_size, analyze_unused, Analyzer, SizeReport, UnusedReport};
pub use config::Config;
pub use discovery::{AssetRecord, CancelToken, ReferenceBlob, ResourceKind, TreeWalker};
pub use error::AnalysisError;
pub use meta::MetaExtractor;
pub use report::{AnalysisResult, TerminalSummary};

mod kind;
mod walker;

pub use kind::{is_under_dir, path_below_dir, ResourceKind};
pub use walker::{AssetRecord, CancelToken, DiscoveredFile, ReferenceBlob, TreeWalker, WalkOutput};

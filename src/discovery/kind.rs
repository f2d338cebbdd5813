use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// Kind of project resource, decided from the file extension alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Image,
    ImageAtlas,
    LabelAtlas,
    Animation,
    Spine,
    Prefab,
    Scene,
    Code,
    Font,
}

impl ResourceKind {
    /// Classify a path by its (case-insensitive) extension.
    ///
    /// Sidecar `.meta` files and anything unknown yield `None`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();

        match extension.as_str() {
            "png" | "jpg" | "jpeg" | "webp" | "bmp" => Some(ResourceKind::Image),
            "plist" => Some(ResourceKind::ImageAtlas),
            "labelatlas" => Some(ResourceKind::LabelAtlas),
            "anim" => Some(ResourceKind::Animation),
            "json" | "skel" | "atlas" => Some(ResourceKind::Spine),
            "prefab" => Some(ResourceKind::Prefab),
            "fire" | "scene" => Some(ResourceKind::Scene),
            "js" | "ts" => Some(ResourceKind::Code),
            "fnt" | "ttf" => Some(ResourceKind::Font),
            _ => None,
        }
    }

    /// Files whose text is searched for identities
    pub fn is_reference_source(&self) -> bool {
        matches!(
            self,
            ResourceKind::Code | ResourceKind::Prefab | ResourceKind::Scene
        )
    }

    /// Files that may be reported as unreferenced.
    ///
    /// Prefabs are both: they reference other assets and can themselves be
    /// orphaned. Scenes are entry points and code is never a candidate.
    pub fn is_candidate(&self) -> bool {
        !matches!(self, ResourceKind::Scene | ResourceKind::Code)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::ImageAtlas => "image atlas",
            ResourceKind::LabelAtlas => "label atlas",
            ResourceKind::Animation => "animation",
            ResourceKind::Spine => "spine",
            ResourceKind::Prefab => "prefab",
            ResourceKind::Scene => "scene",
            ResourceKind::Code => "code",
            ResourceKind::Font => "font",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Find the part of `path` below the first directory literally named `dir_name`.
///
/// Returns `None` when no such directory is an ancestor of the file.
pub fn path_below_dir<'a>(path: &'a Path, dir_name: &str) -> Option<&'a Path> {
    let mut components = path.components();
    while let Some(component) = components.next() {
        if let Component::Normal(name) = component {
            if name == dir_name {
                let rest = components.as_path();
                return if rest.as_os_str().is_empty() {
                    None
                } else {
                    Some(rest)
                };
            }
        }
    }
    None
}

/// Check if a file lives somewhere below a directory named `dir_name`
pub fn is_under_dir(path: &Path, dir_name: &str) -> bool {
    path_below_dir(path, dir_name).is_some()
}

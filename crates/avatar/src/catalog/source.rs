use crate::bounds::Aabb;

use super::{AssetSource, ClipInfo, MeshInfo, Result};

/// An asset described directly rather than parsed from a file.
///
/// Handy for tests, and for driving the engine from a hand-written JSON
/// description when no model file is around.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StaticAsset {
    pub clips: Vec<ClipInfo>,
    pub meshes: Vec<MeshInfo>,
    pub bounds: Option<Aabb>,
}

impl StaticAsset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clip(mut self, name: impl Into<String>, duration: f64) -> Self {
        self.clips.push(ClipInfo::new(name, duration));
        self
    }

    pub fn with_mesh(
        mut self,
        name: impl Into<String>,
        morph_targets: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.meshes.push(MeshInfo {
            name: name.into(),
            morph_targets: morph_targets.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

impl AssetSource for StaticAsset {
    fn clips(&self) -> Result<Vec<ClipInfo>> {
        Ok(self.clips.clone())
    }

    fn meshes(&self) -> Result<Vec<MeshInfo>> {
        Ok(self.meshes.clone())
    }

    fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }
}

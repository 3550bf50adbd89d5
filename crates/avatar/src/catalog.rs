//! What a loaded asset can do: its named clips and morph targets.
//!
//! The catalog is built once per asset by scanning an [`AssetSource`] and is
//! read-only afterwards. When two meshes expose a morph target with the same
//! name, the one scanned last owns the name. The shadowed channel is still
//! listed in [`AssetCatalog::channels`] so it can be zeroed.

mod error;
#[cfg(feature = "gltf")]
mod gltf;
mod source;

pub use error::{AwsmCatalogError, Result};
#[cfg(feature = "gltf")]
pub use self::gltf::GltfAsset;
pub use source::StaticAsset;

use indexmap::IndexMap;

use crate::bounds::Aabb;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClipInfo {
    pub name: String,
    /// Seconds.
    pub duration: f64,
}

impl ClipInfo {
    pub fn new(name: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// A mesh as the introspector sees it: a name (used for appearance matching)
/// and its morph target names in channel order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshInfo {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub morph_targets: Vec<String>,
}

/// One influence slot: morph target `index` on mesh `mesh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MorphChannel {
    pub mesh: usize,
    pub index: usize,
}

/// The seam to whatever loaded the asset.
pub trait AssetSource {
    /// Clips in asset order.
    fn clips(&self) -> Result<Vec<ClipInfo>>;

    /// Meshes in scan order.
    fn meshes(&self) -> Result<Vec<MeshInfo>>;

    fn bounds(&self) -> Option<Aabb> {
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    clips: IndexMap<String, ClipInfo>,
    morph_targets: IndexMap<String, MorphChannel>,
    channels: Vec<MorphChannel>,
    meshes: Vec<String>,
    bounds: Option<Aabb>,
}

impl AssetCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn scan(source: &impl AssetSource) -> Result<Self> {
        let mut clips = IndexMap::new();
        for clip in source.clips()? {
            if !(clip.duration.is_finite() && clip.duration >= 0.0) {
                return Err(AwsmCatalogError::InvalidClipDuration {
                    clip: clip.name,
                    duration: clip.duration,
                });
            }
            // a repeated name keeps its first position but takes the later info
            clips.insert(clip.name.clone(), clip);
        }

        let mut morph_targets = IndexMap::new();
        let mut channels = Vec::new();
        let mut meshes = Vec::new();

        for (mesh, info) in source.meshes()?.into_iter().enumerate() {
            for (index, name) in info.morph_targets.into_iter().enumerate() {
                let channel = MorphChannel { mesh, index };
                channels.push(channel);
                if let Some(previous) = morph_targets.insert(name.clone(), channel) {
                    tracing::debug!(
                        "morph target {name:?} on mesh {mesh} shadows the one on mesh {}",
                        previous.mesh
                    );
                }
            }
            meshes.push(info.name);
        }

        Ok(Self {
            clips,
            morph_targets,
            channels,
            meshes,
            bounds: source.bounds(),
        })
    }

    pub fn clips(&self) -> impl Iterator<Item = &ClipInfo> {
        self.clips.values()
    }

    pub fn clip_names(&self) -> impl Iterator<Item = &str> + Clone {
        self.clips.keys().map(String::as_str)
    }

    pub fn clip(&self, name: &str) -> Option<&ClipInfo> {
        self.clips.get(name)
    }

    pub fn morph_names(&self) -> impl Iterator<Item = &str> + Clone {
        self.morph_targets.keys().map(String::as_str)
    }

    pub fn morph_channel(&self, name: &str) -> Option<MorphChannel> {
        self.morph_targets.get(name).copied()
    }

    /// Every morph channel on the asset, including shadowed ones.
    pub fn channels(&self) -> &[MorphChannel] {
        &self.channels
    }

    pub fn mesh_names(&self) -> &[String] {
        &self.meshes
    }

    pub fn bounds(&self) -> Option<&Aabb> {
        self.bounds.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty() && self.channels.is_empty()
    }
}

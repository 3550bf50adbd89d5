use std::path::Path;

use anyhow::{Context, Result};
use awsm_avatar::{
    bounds::Aabb,
    catalog::{self, AssetSource, ClipInfo, GltfAsset, MeshInfo, StaticAsset},
};

/// An asset read from disk: a glTF model, or a hand-written JSON description
/// of one.
pub enum LoadedAsset {
    Gltf(Box<gltf::Gltf>),
    Static(StaticAsset),
}

impl LoadedAsset {
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "glb" | "gltf" => Self::from_gltf_slice(&bytes)
                .with_context(|| format!("parsing {}", path.display())),
            _ => Self::from_json_slice(&bytes)
                .with_context(|| format!("parsing {} as an asset description", path.display())),
        }
    }

    pub fn from_gltf_slice(bytes: &[u8]) -> Result<Self> {
        Ok(Self::Gltf(Box::new(gltf::Gltf::from_slice(bytes)?)))
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(Self::Static(serde_json::from_slice(bytes)?))
    }
}

impl AssetSource for LoadedAsset {
    fn clips(&self) -> catalog::Result<Vec<ClipInfo>> {
        match self {
            Self::Gltf(gltf) => GltfAsset::new(&gltf.document).clips(),
            Self::Static(asset) => asset.clips(),
        }
    }

    fn meshes(&self) -> catalog::Result<Vec<MeshInfo>> {
        match self {
            Self::Gltf(gltf) => GltfAsset::new(&gltf.document).meshes(),
            Self::Static(asset) => asset.meshes(),
        }
    }

    fn bounds(&self) -> Option<Aabb> {
        match self {
            Self::Gltf(gltf) => GltfAsset::new(&gltf.document).bounds(),
            Self::Static(asset) => asset.bounds(),
        }
    }
}

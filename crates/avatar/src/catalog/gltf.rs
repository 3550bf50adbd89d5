use glam::{Mat4, Vec3};

use crate::bounds::Aabb;

use super::{AssetSource, AwsmCatalogError, ClipInfo, MeshInfo, Result};

/// Catalog view over a parsed glTF document.
///
/// Only the JSON side is read: clip durations come from the sampler input
/// accessor bounds and morph target names from the mesh `extras.targetNames`,
/// so buffers never need to be loaded.
pub struct GltfAsset<'a> {
    doc: &'a gltf::Document,
}

impl<'a> GltfAsset<'a> {
    pub fn new(doc: &'a gltf::Document) -> Self {
        Self { doc }
    }

    // meshes reachable from the default (or first) scene, with world matrices,
    // in depth-first node order
    fn mesh_nodes(&self) -> Vec<(gltf::Node<'a>, Mat4)> {
        fn visit<'a>(node: gltf::Node<'a>, parent: Mat4, out: &mut Vec<(gltf::Node<'a>, Mat4)>) {
            let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
            if node.mesh().is_some() {
                out.push((node.clone(), world));
            }
            for child in node.children() {
                visit(child, world, out);
            }
        }

        let mut out = Vec::new();
        match self.doc.default_scene().or_else(|| self.doc.scenes().next()) {
            Some(scene) => {
                for node in scene.nodes() {
                    visit(node, Mat4::IDENTITY, &mut out);
                }
            }
            None => {
                for node in self.doc.nodes() {
                    if node.mesh().is_some() {
                        let world = Mat4::from_cols_array_2d(&node.transform().matrix());
                        out.push((node, world));
                    }
                }
            }
        }
        out
    }
}

impl AssetSource for GltfAsset<'_> {
    fn clips(&self) -> Result<Vec<ClipInfo>> {
        self.doc
            .animations()
            .map(|animation| {
                let name = animation
                    .name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("animation_{}", animation.index()));

                let mut duration = 0.0f64;
                for channel in animation.channels() {
                    let max = channel
                        .sampler()
                        .input()
                        .max()
                        .and_then(|value| value.as_array()?.first()?.as_f64())
                        .ok_or_else(|| AwsmCatalogError::MissingClipDuration {
                            clip: name.clone(),
                            channel_index: channel.index(),
                        })?;
                    duration = duration.max(max);
                }

                Ok(ClipInfo::new(name, duration))
            })
            .collect()
    }

    fn meshes(&self) -> Result<Vec<MeshInfo>> {
        self.mesh_nodes()
            .into_iter()
            .filter_map(|(node, _)| Some((node.mesh()?, node)))
            .map(|(mesh, node)| {
                let name = node
                    .name()
                    .or(mesh.name())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("mesh_{}", mesh.index()));

                let target_count = mesh
                    .weights()
                    .map(|weights| weights.len())
                    .or_else(|| mesh.primitives().next().map(|p| p.morph_targets().count()))
                    .unwrap_or(0);

                let morph_targets = match target_names(&mesh, &name)? {
                    Some(names) => names,
                    // unnamed targets are addressed by their index
                    None => (0..target_count).map(|index| index.to_string()).collect(),
                };

                Ok(MeshInfo {
                    name,
                    morph_targets,
                })
            })
            .collect()
    }

    fn bounds(&self) -> Option<Aabb> {
        let mut combined: Option<Aabb> = None;

        for (node, world) in self.mesh_nodes() {
            let Some(mesh) = node.mesh() else {
                continue;
            };
            for primitive in mesh.primitives() {
                let bounds = primitive.bounding_box();
                let aabb = Aabb::new(Vec3::from(bounds.min), Vec3::from(bounds.max))
                    .transformed(&world);
                match combined.as_mut() {
                    Some(combined) => combined.extend(&aabb),
                    None => combined = Some(aabb),
                }
            }
        }

        combined
    }
}

fn target_names(mesh: &gltf::Mesh, mesh_name: &str) -> Result<Option<Vec<String>>> {
    let Some(raw) = mesh.extras() else {
        return Ok(None);
    };

    let malformed = |reason: String| AwsmCatalogError::MalformedTargetNames {
        mesh: mesh_name.to_string(),
        reason,
    };

    let extras: serde_json::Value =
        serde_json::from_str(raw.get()).map_err(|err| malformed(err.to_string()))?;

    let Some(names) = extras.get("targetNames") else {
        return Ok(None);
    };

    names
        .as_array()
        .ok_or_else(|| malformed("not an array".to_string()))?
        .iter()
        .map(|name| {
            name.as_str()
                .map(str::to_string)
                .ok_or_else(|| malformed(format!("{name} is not a string")))
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

use awsm_avatar::{
    bounds::Aabb,
    catalog::{AssetCatalog, ClipInfo},
    transform::fit_to_bounds,
};
use glam::Quat;
use serde::Serialize;

/// The `catalog` subcommand's output.
#[derive(Debug, Serialize)]
pub struct CatalogReport {
    pub clips: Vec<ClipInfo>,
    pub morph_targets: Vec<MorphTargetReport>,
    pub meshes: Vec<String>,
    pub bounds: Option<Aabb>,
    /// Bounds once the engine has fitted the model, before user modifiers.
    pub fitted_bounds: Option<Aabb>,
}

#[derive(Debug, Serialize)]
pub struct MorphTargetReport {
    pub name: String,
    pub mesh: usize,
    pub index: usize,
}

impl CatalogReport {
    pub fn new(catalog: &AssetCatalog, fit_size: f32) -> Self {
        let fitted_bounds = catalog.bounds().map(|bounds| {
            let fit = fit_to_bounds(Some(bounds), fit_size, 1.0, Quat::IDENTITY);
            bounds.transformed(&fit.to_matrix())
        });

        Self {
            clips: catalog.clips().cloned().collect(),
            morph_targets: catalog
                .morph_names()
                .filter_map(|name| {
                    let channel = catalog.morph_channel(name)?;
                    Some(MorphTargetReport {
                        name: name.to_string(),
                        mesh: channel.mesh,
                        index: channel.index,
                    })
                })
                .collect(),
            meshes: catalog.mesh_names().to_vec(),
            bounds: catalog.bounds().copied(),
            fitted_bounds,
        }
    }
}

//! User appearance modifiers, matched onto meshes by name.
//!
//! Assets don't tag their meshes, so categories are guessed from lowercase
//! keywords in the mesh name. A mesh can fall in several categories; later
//! categories in [`MeshRole`] order win.

use glam::{EulerRot, Quat, Vec3};
use strum::IntoEnumIterator;

/// A `0xRRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Rgb(pub u32);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Accessories {
    pub hat: Option<bool>,
    pub glasses: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModelModifiers {
    /// Multiplies the fitted scale.
    pub scale: f32,
    /// Euler XYZ, radians.
    pub rotation: Vec3,
    pub skin_color: Option<Rgb>,
    pub hair_color: Option<Rgb>,
    pub clothes_color: Option<Rgb>,
    pub accessories: Accessories,
}

impl Default for ModelModifiers {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation: Vec3::ZERO,
            skin_color: None,
            hair_color: None,
            clothes_color: None,
            accessories: Accessories::default(),
        }
    }
}

impl ModelModifiers {
    /// The scale multiplier, with unusable values treated as 1.
    pub fn scale(&self) -> f32 {
        if self.scale > 0.0 && self.scale.is_finite() {
            self.scale
        } else {
            1.0
        }
    }

    pub fn rotation(&self) -> Quat {
        let rotation = if self.rotation.is_finite() {
            self.rotation
        } else {
            Vec3::ZERO
        };
        Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter, strum::Display)]
pub enum MeshRole {
    Skin,
    Hair,
    Clothes,
    Hat,
    Glasses,
}

impl MeshRole {
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Skin => &["skin", "face", "body"],
            Self::Hair => &["hair", "head"],
            Self::Clothes => &["cloth", "shirt", "dress", "pants"],
            Self::Hat => &["hat", "cap"],
            Self::Glasses => &["glass", "spectacle"],
        }
    }

    pub fn matches(self, mesh_name: &str) -> bool {
        let name = mesh_name.to_lowercase();
        self.keywords().iter().any(|keyword| name.contains(keyword))
    }
}

/// Appearance state for one mesh. `None` means the asset's own value, so a
/// modifier that was cleared puts the mesh back the way it was loaded.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshOverride {
    pub mesh: usize,
    pub name: String,
    pub color: Option<Rgb>,
    pub visible: Option<bool>,
}

/// One entry for every mesh that falls in a [`MeshRole`], in mesh order,
/// whether or not a modifier is currently set for it.
pub fn mesh_overrides(meshes: &[String], modifiers: &ModelModifiers) -> Vec<MeshOverride> {
    meshes
        .iter()
        .enumerate()
        .filter_map(|(mesh, name)| {
            let mut roles = MeshRole::iter().filter(|role| role.matches(name)).peekable();
            roles.peek()?;

            let mut color = None;
            let mut visible = None;

            for role in roles {
                match role {
                    MeshRole::Skin => color = modifiers.skin_color.or(color),
                    MeshRole::Hair => color = modifiers.hair_color.or(color),
                    MeshRole::Clothes => color = modifiers.clothes_color.or(color),
                    MeshRole::Hat => visible = modifiers.accessories.hat.or(visible),
                    MeshRole::Glasses => visible = modifiers.accessories.glasses.or(visible),
                }
            }

            Some(MeshOverride {
                mesh,
                name: name.clone(),
                color,
                visible,
            })
        })
        .collect()
}

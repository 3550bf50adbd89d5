use glam::{Quat, Vec3};

use crate::bounds::Aabb;

use super::Transform;

/// Places a model so its bounds are centered on the origin with the largest
/// dimension `size` units long, times `scale`.
///
/// Degenerate bounds (empty, flat to a point, non-finite) leave the model
/// unfitted, only applying `scale` and `rotation`.
pub fn fit_to_bounds(bounds: Option<&Aabb>, size: f32, scale: f32, rotation: Quat) -> Transform {
    let base = Transform::IDENTITY
        .with_rotation(rotation)
        .with_scale(Vec3::splat(scale));

    let Some(bounds) = bounds else {
        return base;
    };

    let max_dimension = bounds.max_dimension();
    if !(max_dimension > 0.0 && max_dimension.is_finite()) {
        tracing::debug!("model bounds {bounds:?} can't be fitted");
        return base;
    }

    let scale = Vec3::splat(size / max_dimension * scale);

    base.with_scale(scale)
        .with_translation(-(rotation * (bounds.center() * scale)))
}

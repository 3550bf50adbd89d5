use glam::{EulerRot, Quat, Vec2, Vec3};

use crate::config::{
    AvatarConfig, BobConfig, CameraPose, CameraPresets, ModelPresets, PointerConfig,
    SmoothingConfig,
};

use super::{frame_factor, Smoothed, Transform};

/// Pointer position in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerInput {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PointerInput {
    /// Position in `[-1, 1]` on both axes, `+y` down. Positions outside the
    /// viewport are clamped to its edge, a degenerate viewport is the center.
    pub fn normalized(&self) -> Vec2 {
        let axis = |value: f32, extent: f32| {
            if !(extent > 0.0) {
                return 0.0;
            }
            let n = value / extent * 2.0 - 1.0;
            if n.is_nan() {
                0.0
            } else {
                n.clamp(-1.0, 1.0)
            }
        };

        Vec2::new(axis(self.x, self.width), axis(self.y, self.height))
    }

    /// Target `(yaw, pitch)` in radians. Pointer right turns the model right,
    /// pointer up tilts it up.
    pub fn rotation(&self, limits: &PointerConfig) -> Vec2 {
        let n = self.normalized();
        Vec2::new(
            (n.x * limits.max_yaw).clamp(-limits.max_yaw, limits.max_yaw),
            (-n.y * limits.max_pitch).clamp(-limits.max_pitch, limits.max_pitch),
        )
    }
}

/// Per-frame inputs for [`TransformAnimator::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformInputs {
    pub focus: bool,
    /// `None` keeps following the last known pointer position.
    pub pointer: Option<PointerInput>,
    pub locomotion: bool,
}

/// Eases the camera and model root toward their presets.
#[derive(Debug, Clone)]
pub struct TransformAnimator {
    camera_position: Smoothed<Vec3>,
    camera_look_at: Smoothed<Vec3>,
    model_translation: Smoothed<Vec3>,
    model_scale: Smoothed<Vec3>,
    // yaw, pitch
    pointer: Smoothed<Vec2>,
    base: Transform,
    elapsed: f64,
    cameras: CameraPresets,
    models: ModelPresets,
    smoothing: SmoothingConfig,
    limits: PointerConfig,
    bob: BobConfig,
}

impl TransformAnimator {
    pub fn new(config: &AvatarConfig) -> Self {
        let normal = config.camera.normal;

        Self {
            camera_position: Smoothed::new(normal.position),
            camera_look_at: Smoothed::new(normal.look_at),
            model_translation: Smoothed::new(Vec3::ZERO),
            model_scale: Smoothed::new(Vec3::ONE),
            pointer: Smoothed::new(Vec2::ZERO),
            base: Transform::IDENTITY,
            elapsed: 0.0,
            cameras: config.camera.clone(),
            models: config.model.clone(),
            smoothing: config.smoothing.clone(),
            limits: config.pointer.clone(),
            bob: config.bob.clone(),
        }
    }

    /// The model transform outside focus mode: fitted bounds plus user scale
    /// and rotation. Eased toward on the following frames.
    pub fn set_base(&mut self, base: Transform) {
        self.base = base;
    }

    /// Jumps the model straight to `base`, for a freshly loaded asset.
    pub fn snap_base(&mut self, base: Transform) {
        self.base = base;
        self.model_translation.snap(base.translation);
        self.model_scale.snap(base.scale);
    }

    /// Current `(yaw, pitch)` of the pointer follow.
    pub fn pointer_rotation(&self) -> Vec2 {
        self.pointer.current
    }

    pub fn update(&mut self, time_delta: f64, inputs: &TransformInputs) -> (CameraPose, Transform) {
        if time_delta > 0.0 && time_delta.is_finite() {
            self.elapsed += time_delta;
        }

        let camera = if inputs.focus {
            self.cameras.focus
        } else {
            self.cameras.normal
        };
        self.camera_position.target = camera.position;
        self.camera_look_at.target = camera.look_at;

        if inputs.focus {
            self.model_translation.target = self.models.focus_translation;
            self.model_scale.target = self.base.scale * self.models.focus_scale;
        } else {
            self.model_translation.target = self.base.translation;
            self.model_scale.target = self.base.scale;
        }

        if let Some(pointer) = &inputs.pointer {
            self.pointer.target = pointer.rotation(&self.limits);
        }

        let fps = self.smoothing.reference_fps;
        let camera_k = frame_factor(self.smoothing.camera, time_delta, fps);
        let model_k = frame_factor(self.smoothing.model, time_delta, fps);
        let pointer_k = frame_factor(self.smoothing.pointer, time_delta, fps);

        let camera = CameraPose::new(
            self.camera_position.step(camera_k),
            self.camera_look_at.step(camera_k),
        );

        let translation = self.model_translation.step(model_k);
        let scale = self.model_scale.step(model_k);
        let angles = self.pointer.step(pointer_k);

        // bob rides on top of the eased position, it is never a target itself
        let bob = if inputs.locomotion {
            &self.bob.locomotion
        } else {
            &self.bob.idle
        };

        let model = Transform {
            translation: translation + Vec3::Y * bob.offset(self.elapsed),
            rotation: Quat::from_euler(EulerRot::YXZ, angles.x, angles.y, 0.0) * self.base.rotation,
            scale,
        };

        (camera, model)
    }
}

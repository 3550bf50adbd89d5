//! Engine tuning: fade durations, smoothing factors, presets and alias tables.
//!
//! Everything has a default matching the viewer's stock behavior, so most
//! callers just use `AvatarConfig::default()`. With the `serde` feature the
//! whole thing can be loaded from JSON, and missing fields fall back to the
//! defaults.

use glam::Vec3;
use thiserror::Error;

use crate::resolve::ExpressionAliases;

pub type Result<T> = std::result::Result<T, AwsmConfigError>;

#[derive(Error, Debug)]
pub enum AwsmConfigError {
    #[error("[config] fade duration `{name}` must be positive and finite, got {value}")]
    FadeDuration { name: &'static str, value: f64 },

    #[error("[config] smoothing factor `{name}` must be in (0, 1], got {value}")]
    SmoothingFactor { name: &'static str, value: f32 },

    #[error("[config] `{name}` must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("[config] symbol `{name}` is blank")]
    BlankSymbol { name: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AvatarConfig {
    pub fades: FadeConfig,
    pub smoothing: SmoothingConfig,
    pub pointer: PointerConfig,
    pub camera: CameraPresets,
    pub model: ModelPresets,
    pub bob: BobConfig,
    pub aliases: ExpressionAliases,
    /// Resolved at startup in default mode, so any clip at all will do.
    pub idle_symbol: String,
    pub talk_symbol: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            fades: FadeConfig::default(),
            smoothing: SmoothingConfig::default(),
            pointer: PointerConfig::default(),
            camera: CameraPresets::default(),
            model: ModelPresets::default(),
            bob: BobConfig::default(),
            aliases: ExpressionAliases::default(),
            idle_symbol: "idle".to_string(),
            talk_symbol: "talk".to_string(),
        }
    }
}

impl AvatarConfig {
    pub fn validate(&self) -> Result<()> {
        let fades = [
            ("startup", self.fades.startup),
            ("crossfade", self.fades.crossfade),
            ("gesture", self.fades.gesture),
            ("expression_out", self.fades.expression_out),
            ("restore", self.fades.restore),
        ];
        for (name, value) in fades {
            if !(value.is_finite() && value > 0.0) {
                return Err(AwsmConfigError::FadeDuration { name, value });
            }
        }

        let factors = [
            ("camera", self.smoothing.camera),
            ("model", self.smoothing.model),
            ("pointer", self.smoothing.pointer),
        ];
        for (name, value) in factors {
            if !(value > 0.0 && value <= 1.0) {
                return Err(AwsmConfigError::SmoothingFactor { name, value });
            }
        }

        let positives = [
            ("smoothing.reference_fps", self.smoothing.reference_fps),
            ("model.fit_size", self.model.fit_size as f64),
            ("model.focus_scale", self.model.focus_scale as f64),
        ];
        for (name, value) in positives {
            if !(value.is_finite() && value > 0.0) {
                return Err(AwsmConfigError::NotPositive { name, value });
            }
        }

        if self.idle_symbol.trim().is_empty() {
            return Err(AwsmConfigError::BlankSymbol {
                name: "idle_symbol",
            });
        }
        if self.talk_symbol.trim().is_empty() {
            return Err(AwsmConfigError::BlankSymbol {
                name: "talk_symbol",
            });
        }

        Ok(())
    }
}

/// Fade durations, in seconds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FadeConfig {
    /// Idle fade-in when an asset is first loaded.
    pub startup: f64,
    /// Continuous-channel crossfades: animation requests, talk on/off.
    pub crossfade: f64,
    /// Gesture fade-in, and the continuous clip dipping out underneath it.
    pub gesture: f64,
    /// Outgoing clip when an expression takes over as a clip.
    pub expression_out: f64,
    /// Continuous clip coming back after a gesture completes.
    pub restore: f64,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            startup: 0.5,
            crossfade: 0.3,
            gesture: 0.2,
            expression_out: 0.2,
            restore: 0.3,
        }
    }
}

/// Per-frame exponential smoothing factors, as fractions of the remaining
/// distance covered in one frame at `reference_fps`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SmoothingConfig {
    pub camera: f32,
    pub model: f32,
    pub pointer: f32,
    pub reference_fps: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            camera: 0.12,
            model: 0.15,
            pointer: 0.1,
            reference_fps: 60.0,
        }
    }
}

/// Pointer-follow limits, in radians.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PointerConfig {
    pub max_yaw: f32,
    pub max_pitch: f32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            max_yaw: 0.3,
            max_pitch: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    pub const fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CameraPresets {
    pub normal: CameraPose,
    pub focus: CameraPose,
}

impl Default for CameraPresets {
    fn default() -> Self {
        Self {
            normal: CameraPose::new(Vec3::new(0.0, 1.2, 3.5), Vec3::new(0.0, 1.0, 0.0)),
            focus: CameraPose::new(Vec3::new(0.0, 1.3, 2.2), Vec3::new(0.0, 1.2, 0.0)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModelPresets {
    /// Largest dimension of the asset after fitting, in world units.
    pub fit_size: f32,
    /// Scale multiplier applied on top of the base scale in focus mode.
    pub focus_scale: f32,
    pub focus_translation: Vec3,
}

impl Default for ModelPresets {
    fn default() -> Self {
        Self {
            fit_size: 1.8,
            focus_scale: 1.3,
            focus_translation: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bob {
    /// Radians per second fed into `sin`.
    pub frequency: f64,
    pub amplitude: f32,
}

impl Bob {
    pub fn offset(&self, elapsed: f64) -> f32 {
        (elapsed * self.frequency).sin() as f32 * self.amplitude
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BobConfig {
    pub idle: Bob,
    pub locomotion: Bob,
}

impl Default for BobConfig {
    fn default() -> Self {
        Self {
            idle: Bob {
                frequency: 0.8,
                amplitude: 0.02,
            },
            locomotion: Bob {
                frequency: 4.0,
                amplitude: 0.03,
            },
        }
    }
}

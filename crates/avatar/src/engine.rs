//! The per-frame entry point.
//!
//! One [`AvatarEngine`] drives one avatar. Each frame the caller hands over a
//! snapshot of UI state ([`FrameInputs`]) and gets back everything the
//! renderer needs to apply ([`FrameOutput`]). Nothing in `update` fails: a
//! request the asset can't satisfy is logged and skipped.

use crate::{
    animation::{ChannelRole, ChannelSnapshot, ClipWeight, Sequencer, SequencerInputs},
    appearance::{mesh_overrides, MeshOverride, ModelModifiers},
    catalog::{AssetCatalog, AssetSource, AwsmCatalogError},
    config::{AvatarConfig, CameraPose},
    debug::{AvatarLogging, LogSlot, UniqueLog},
    error::Result,
    expression::{BlendVector, ExpressionBlender, MorphWrite},
    transform::{fit_to_bounds, PointerInput, Transform, TransformAnimator, TransformInputs},
};

/// UI state sampled once per frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FrameInputs {
    pub requested_animation: Option<String>,
    pub expression: Option<String>,
    pub requested_gesture: Option<String>,
    pub is_talking: bool,
    /// Playback rate of the base continuous clip.
    pub animation_speed: f64,
    pub focus_mode: bool,
    pub pointer: Option<PointerInput>,
    pub locomotion_active: bool,
}

impl Default for FrameInputs {
    fn default() -> Self {
        Self {
            requested_animation: None,
            expression: None,
            requested_gesture: None,
            is_talking: false,
            animation_speed: 1.0,
            focus_mode: false,
            pointer: None,
            locomotion_active: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameOutput {
    pub camera: CameraPose,
    pub model: Transform,
    /// Every enabled clip with its blend weight, in asset order.
    pub clips: Vec<ClipWeight>,
    /// Morph influences that changed this frame.
    pub morphs: Vec<MorphWrite>,
    /// Set on frames where the overrides changed (asset or modifiers).
    pub mesh_overrides: Option<Vec<MeshOverride>>,
    pub gesture_completed: Option<String>,
}

/// How [`AvatarEngine::load_asset`] went.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded,
    /// The asset couldn't be read. The engine kept the previous asset if
    /// there was one, otherwise it runs with an empty one.
    Recovered {
        error: AwsmCatalogError,
        retained_previous: bool,
    },
}

pub struct AvatarEngine {
    /// `resolution_misses` takes effect from the next asset load.
    pub logging: AvatarLogging,
    config: AvatarConfig,
    catalog: Option<AssetCatalog>,
    sequencer: Sequencer,
    blender: ExpressionBlender,
    animator: TransformAnimator,
    modifiers: ModelModifiers,
    overrides_dirty: bool,
    unique_log: UniqueLog,
}

impl AvatarEngine {
    pub fn new(config: AvatarConfig) -> Result<Self> {
        Self::new_with_logging(config, AvatarLogging::default())
    }

    pub fn new_with_logging(config: AvatarConfig, logging: AvatarLogging) -> Result<Self> {
        config.validate()?;

        let empty = AssetCatalog::empty();

        Ok(Self {
            sequencer: Sequencer::new(&empty, &config, logging.resolution_misses),
            blender: ExpressionBlender::new(
                &empty,
                config.aliases.clone(),
                logging.resolution_misses,
            ),
            animator: TransformAnimator::new(&config),
            logging,
            config,
            catalog: None,
            modifiers: ModelModifiers::default(),
            overrides_dirty: false,
            unique_log: UniqueLog::default(),
        })
    }

    pub fn config(&self) -> &AvatarConfig {
        &self.config
    }

    /// The loaded asset's catalog, `None` while no asset is loaded.
    pub fn catalog(&self) -> Option<&AssetCatalog> {
        self.catalog.as_ref()
    }

    /// Scans `source` and rebuilds playback state around it. All sequencer and
    /// blender state from a previous asset is dropped.
    pub fn load_asset(&mut self, source: &impl AssetSource) -> LoadOutcome {
        match AssetCatalog::scan(source) {
            Ok(catalog) => {
                tracing::info!(
                    "asset loaded: {} clips, {} morph targets, {} meshes",
                    catalog.clips().count(),
                    catalog.morph_names().count(),
                    catalog.mesh_names().len()
                );
                self.install(catalog);
                LoadOutcome::Loaded
            }
            Err(error) => {
                let retained_previous = self.catalog.is_some();
                if retained_previous {
                    tracing::warn!("{error}, keeping the previous asset");
                } else {
                    tracing::warn!("{error}, running without an asset");
                    self.unload_asset();
                }
                LoadOutcome::Recovered {
                    error,
                    retained_previous,
                }
            }
        }
    }

    /// Like [`Self::load_asset`], but a scan failure is returned and leaves the
    /// engine untouched.
    pub fn try_load_asset(&mut self, source: &impl AssetSource) -> Result<()> {
        let catalog = AssetCatalog::scan(source)?;
        self.install(catalog);
        Ok(())
    }

    pub fn unload_asset(&mut self) {
        self.install(AssetCatalog::empty());
        self.catalog = None;
    }

    pub fn modifiers(&self) -> &ModelModifiers {
        &self.modifiers
    }

    /// Takes effect on the next `update`. Mesh overrides are reported once,
    /// on that frame.
    pub fn set_modifiers(&mut self, modifiers: ModelModifiers) {
        if modifiers == self.modifiers {
            return;
        }

        self.modifiers = modifiers;
        self.animator.set_base(self.base_transform());
        self.overrides_dirty = true;
    }

    pub fn channel(&self, role: ChannelRole) -> ChannelSnapshot {
        self.sequencer.channel(role)
    }

    pub fn influences(&self) -> &BlendVector {
        self.blender.influences()
    }

    pub fn update(&mut self, global_time_delta: f64, inputs: &FrameInputs) -> FrameOutput {
        let _maybe_span_guard = if self.logging.frame_timings {
            Some(tracing::span!(tracing::Level::INFO, "Avatar frame").entered())
        } else {
            None
        };

        let global_time_delta = if global_time_delta.is_finite() {
            global_time_delta.max(0.0)
        } else {
            0.0
        };

        let speed = self.animation_speed(inputs.animation_speed);

        let events = self.sequencer.update(
            global_time_delta,
            &SequencerInputs {
                animation: inputs.requested_animation.as_deref(),
                expression: inputs.expression.as_deref(),
                gesture: inputs.requested_gesture.as_deref(),
                is_talking: inputs.is_talking,
                speed,
            },
        );

        let morphs = self.blender.update(inputs.expression.as_deref());

        let (camera, model) = self.animator.update(
            global_time_delta,
            &TransformInputs {
                focus: inputs.focus_mode,
                pointer: inputs.pointer,
                locomotion: inputs.locomotion_active,
            },
        );

        let mesh_overrides = std::mem::take(&mut self.overrides_dirty).then(|| {
            let meshes = self
                .catalog
                .as_ref()
                .map(|catalog| catalog.mesh_names())
                .unwrap_or(&[]);
            mesh_overrides(meshes, &self.modifiers)
        });

        FrameOutput {
            camera,
            model,
            clips: self.sequencer.clip_weights(),
            morphs,
            mesh_overrides,
            gesture_completed: events.gesture_completed,
        }
    }

    fn install(&mut self, catalog: AssetCatalog) {
        let warn_on_miss = self.logging.resolution_misses;
        self.sequencer = Sequencer::new(&catalog, &self.config, warn_on_miss);
        self.blender = ExpressionBlender::new(&catalog, self.config.aliases.clone(), warn_on_miss);
        self.catalog = Some(catalog);
        self.animator.snap_base(self.base_transform());
        self.overrides_dirty = true;
    }

    fn base_transform(&self) -> Transform {
        fit_to_bounds(
            self.catalog.as_ref().and_then(|catalog| catalog.bounds()),
            self.config.model.fit_size,
            self.modifiers.scale(),
            self.modifiers.rotation(),
        )
    }

    fn animation_speed(&mut self, speed: f64) -> f64 {
        if speed > 0.0 && speed.is_finite() {
            self.unique_log.forget(LogSlot::AnimationSpeed);
            return speed;
        }

        self.unique_log
            .on_change(LogSlot::AnimationSpeed, &speed.to_string(), || {
                tracing::warn!("animation speed {speed} is not usable, playing at 1.0");
            });
        1.0
    }
}

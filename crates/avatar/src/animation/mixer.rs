use indexmap::IndexMap;
use slotmap::{new_key_type, DenseSlotMap};

use crate::catalog::AssetCatalog;

use super::{
    fade::Fade,
    player::{AnimationLoopStyle, AnimationPlayer, AnimationState},
};

new_key_type! {
    pub struct ActionKey;
}

/// One clip's playback plus its blend weight.
#[derive(Debug, Clone)]
pub struct ClipAction {
    pub clip: String,
    pub player: AnimationPlayer,
    weight: f32,
    fade: Option<Fade>,
    enabled: bool,
}

impl ClipAction {
    fn new(clip: String, duration: f64) -> Self {
        Self {
            clip,
            player: AnimationPlayer::new(duration),
            weight: 0.0,
            fade: None,
            enabled: false,
        }
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Enabled actions contribute to the pose, possibly with a fading weight.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_fading_in(&self) -> bool {
        self.fade.is_some_and(|fade| fade.target() > 0.0)
    }

    pub fn is_fading_out(&self) -> bool {
        self.fade.is_some_and(|fade| fade.target() <= 0.0)
    }
}

/// Weight and rate of an enabled clip, as reported to the renderer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClipWeight {
    pub clip: String,
    pub weight: f32,
    pub time: f64,
    pub speed: f64,
}

/// All clip actions for one asset. Each catalog clip gets exactly one action,
/// created up front and reused for every request that resolves to it.
#[derive(Debug, Clone, Default)]
pub struct Mixer {
    actions: DenseSlotMap<ActionKey, ClipAction>,
    by_name: IndexMap<String, ActionKey>,
}

impl Mixer {
    pub fn new(catalog: &AssetCatalog) -> Self {
        let mut actions = DenseSlotMap::with_key();
        let mut by_name = IndexMap::new();

        for clip in catalog.clips() {
            let key = actions.insert(ClipAction::new(clip.name.clone(), clip.duration));
            by_name.insert(clip.name.clone(), key);
        }

        Self { actions, by_name }
    }

    pub fn key(&self, clip: &str) -> Option<ActionKey> {
        self.by_name.get(clip).copied()
    }

    pub fn get(&self, key: ActionKey) -> Option<&ClipAction> {
        self.actions.get(key)
    }

    pub fn clip_name(&self, key: ActionKey) -> Option<&str> {
        self.actions.get(key).map(|action| action.clip.as_str())
    }

    /// Enables the action and ramps its weight up to 1 from wherever it is.
    pub fn fade_in(
        &mut self,
        key: ActionKey,
        duration: f64,
        loop_style: AnimationLoopStyle,
        restart: bool,
    ) {
        let Some(action) = self.actions.get_mut(key) else {
            return;
        };

        action.player.loop_style = loop_style;
        if restart || action.player.state() == AnimationState::Ended {
            action.player.restart();
        } else {
            action.player.play();
        }
        action.enabled = true;
        action.fade = Some(Fade::new(action.weight, 1.0, duration));
    }

    /// Ramps the weight down to 0. The action is disabled once it gets there.
    pub fn fade_out(&mut self, key: ActionKey, duration: f64) {
        let Some(action) = self.actions.get_mut(key) else {
            return;
        };

        if action.enabled {
            action.fade = Some(Fade::new(action.weight, 0.0, duration));
        }
    }

    pub fn set_speed(&mut self, key: ActionKey, speed: f64) {
        if let Some(action) = self.actions.get_mut(key) {
            action.player.speed = speed;
        }
    }

    /// Advances players and fades. Returns the one-shot actions that reached
    /// their end during this update.
    pub fn update(&mut self, global_time_delta: f64) -> Vec<ActionKey> {
        let mut finished = Vec::new();

        for (key, action) in self.actions.iter_mut() {
            if !action.enabled {
                continue;
            }

            if action.player.update(global_time_delta) {
                finished.push(key);
            }

            if let Some(fade) = action.fade.as_mut() {
                action.weight = fade.advance(global_time_delta);
                if fade.is_finished() {
                    let target = fade.target();
                    action.fade = None;
                    if target <= 0.0 {
                        action.enabled = false;
                        action.player.pause();
                    }
                }
            }
        }

        finished
    }

    /// Enabled actions in catalog order.
    pub fn weights(&self) -> Vec<ClipWeight> {
        self.by_name
            .values()
            .filter_map(|key| self.actions.get(*key))
            .filter(|action| action.enabled)
            .map(|action| ClipWeight {
                clip: action.clip.clone(),
                weight: action.weight,
                time: action.player.local_time(),
                speed: action.player.speed,
            })
            .collect()
    }
}

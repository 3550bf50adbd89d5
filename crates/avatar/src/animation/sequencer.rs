//! The two-channel playback state machine.
//!
//! The continuous channel always has a floor clip (idle, or whatever was last
//! requested) that loops. Talking temporarily replaces it. The transient
//! channel plays one gesture at a time, once, dipping the continuous clip out
//! underneath and bringing it back when the gesture finishes.
//!
//! Requests are edge-triggered: only a change in a requested symbol does
//! anything, so re-sending the same request every frame is free.

use crate::{
    catalog::AssetCatalog,
    config::{AvatarConfig, FadeConfig},
    resolve::{resolve, resolve_aliased, ExpressionAliases, ResolveMode},
};

use super::{
    mixer::{ActionKey, ClipWeight, Mixer},
    player::AnimationLoopStyle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ChannelRole {
    Continuous,
    Transient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FadeState {
    Empty,
    FadingIn,
    Playing,
    FadingOut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSnapshot {
    pub role: ChannelRole,
    pub active_clip: Option<String>,
    pub requested_symbol: Option<String>,
    pub fade_state: FadeState,
}

/// One frame's worth of requests, borrowed from the caller's input snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SequencerInputs<'a> {
    pub animation: Option<&'a str>,
    pub expression: Option<&'a str>,
    pub gesture: Option<&'a str>,
    pub is_talking: bool,
    pub speed: f64,
}

impl Default for SequencerInputs<'_> {
    fn default() -> Self {
        Self {
            animation: None,
            expression: None,
            gesture: None,
            is_talking: false,
            speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequencerEvents {
    /// The gesture symbol whose clip finished this frame.
    pub gesture_completed: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct Channel {
    active: Option<ActionKey>,
    requested_symbol: Option<String>,
    outgoing: Vec<ActionKey>,
}

#[derive(Debug, Clone, Default)]
struct LastInputs {
    animation: Option<String>,
    expression: Option<String>,
    gesture: Option<String>,
    is_talking: bool,
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    mixer: Mixer,
    clip_names: Vec<String>,
    fades: FadeConfig,
    aliases: ExpressionAliases,
    continuous: Channel,
    transient: Channel,
    // what the continuous channel returns to after talk or a gesture
    base: Option<ActionKey>,
    talk_clip: Option<ActionKey>,
    talking: Option<ActionKey>,
    gesture_symbol: Option<String>,
    last: LastInputs,
    warn_on_miss: bool,
}

impl Sequencer {
    /// Builds the sequencer for a freshly scanned asset and fades in its idle clip.
    pub fn new(catalog: &AssetCatalog, config: &AvatarConfig, warn_on_miss: bool) -> Self {
        let mut sequencer = Self {
            mixer: Mixer::new(catalog),
            clip_names: catalog.clip_names().map(str::to_string).collect(),
            fades: config.fades.clone(),
            aliases: config.aliases.clone(),
            continuous: Channel::default(),
            transient: Channel::default(),
            base: None,
            talk_clip: None,
            talking: None,
            gesture_symbol: None,
            last: LastInputs::default(),
            warn_on_miss,
        };

        sequencer.start(&config.idle_symbol, &config.talk_symbol);
        sequencer
    }

    fn start(&mut self, idle_symbol: &str, talk_symbol: &str) {
        self.talk_clip = self.resolve_clip(talk_symbol, ResolveMode::Strict);

        match self.resolve_clip(idle_symbol, ResolveMode::Default) {
            Some(idle) => {
                tracing::debug!("idle clip: {:?}", self.mixer.clip_name(idle));
                self.base = Some(idle);
                self.continuous.requested_symbol = Some(idle_symbol.to_string());
                self.mixer
                    .fade_in(idle, self.fades.startup, AnimationLoopStyle::Loop, true);
                self.continuous.active = Some(idle);
            }
            None => {
                tracing::debug!("asset has no clips, animation requests are no-ops");
            }
        }
    }

    pub fn update(&mut self, global_time_delta: f64, inputs: &SequencerInputs) -> SequencerEvents {
        let mut events = SequencerEvents::default();

        // talk first, so other requests on the same frame see the override
        if inputs.is_talking != self.last.is_talking {
            self.last.is_talking = inputs.is_talking;
            if inputs.is_talking {
                self.start_talking();
            } else {
                self.stop_talking();
            }
        }

        if changed(&mut self.last.animation, inputs.animation) {
            if let Some(symbol) = inputs.animation {
                let fade_out = self.fades.crossfade;
                self.request_continuous(symbol, fade_out);
            }
        }

        if changed(&mut self.last.expression, inputs.expression) {
            if let Some(symbol) = inputs.expression {
                self.request_expression_clip(symbol);
            }
        }

        if changed(&mut self.last.gesture, inputs.gesture) {
            if let Some(symbol) = inputs.gesture {
                self.request_gesture(symbol);
            }
        }

        self.apply_speed(inputs.speed);

        for key in self.mixer.update(global_time_delta) {
            if self.transient.active == Some(key) {
                events.gesture_completed = self.complete_gesture(key);
            }
        }

        self.prune();

        events
    }

    pub fn channel(&self, role: ChannelRole) -> ChannelSnapshot {
        let channel = match role {
            ChannelRole::Continuous => &self.continuous,
            ChannelRole::Transient => &self.transient,
        };

        let fade_state = match channel.active.and_then(|key| self.mixer.get(key)) {
            Some(action) if action.is_fading_in() => FadeState::FadingIn,
            Some(action) if action.is_enabled() => FadeState::Playing,
            _ if !channel.outgoing.is_empty() => FadeState::FadingOut,
            _ => FadeState::Empty,
        };

        ChannelSnapshot {
            role,
            active_clip: channel
                .active
                .and_then(|key| self.mixer.clip_name(key))
                .map(str::to_string),
            requested_symbol: channel.requested_symbol.clone(),
            fade_state,
        }
    }

    pub fn clip_weights(&self) -> Vec<ClipWeight> {
        self.mixer.weights()
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    pub fn is_talking(&self) -> bool {
        self.talking.is_some()
    }

    fn resolve_clip(&self, symbol: &str, mode: ResolveMode) -> Option<ActionKey> {
        resolve(symbol, self.clip_names.iter().map(String::as_str), mode)
            .and_then(|name| self.mixer.key(name))
    }

    fn log_miss(&self, kind: &str, symbol: &str) {
        if self.warn_on_miss {
            tracing::warn!("no clip for {kind} {symbol:?}");
        } else {
            tracing::debug!("no clip for {kind} {symbol:?}");
        }
    }

    fn request_continuous(&mut self, symbol: &str, fade_out: f64) {
        self.continuous.requested_symbol = Some(symbol.to_string());

        match self.resolve_clip(symbol, ResolveMode::Strict) {
            Some(key) => self.set_base(key, fade_out),
            None => self.log_miss("animation", symbol),
        }
    }

    fn request_expression_clip(&mut self, symbol: &str) {
        let key = resolve_aliased(
            self.aliases.aliases_for(symbol),
            self.clip_names.iter().map(String::as_str),
        )
        .and_then(|name| self.mixer.key(name));

        match key {
            Some(key) => {
                tracing::debug!(
                    "expression {symbol:?} plays as clip {:?}",
                    self.mixer.clip_name(key)
                );
                self.continuous.requested_symbol = Some(symbol.to_string());
                let fade_out = self.fades.expression_out;
                self.set_base(key, fade_out);
            }
            None => {
                tracing::debug!("expression {symbol:?} has no clip, morph targets only");
            }
        }
    }

    fn set_base(&mut self, key: ActionKey, fade_out: f64) {
        self.base = Some(key);

        if self.talking.is_some() || self.transient.active.is_some() {
            tracing::debug!(
                "{:?} deferred until the current override ends",
                self.mixer.clip_name(key)
            );
            return;
        }

        let fade_in = self.fades.crossfade;
        self.crossfade_continuous(key, fade_out, fade_in, true);
    }

    fn crossfade_continuous(&mut self, key: ActionKey, fade_out: f64, fade_in: f64, restart: bool) {
        if self.continuous.active == Some(key) {
            return;
        }

        if let Some(previous) = self.continuous.active.take() {
            self.mixer.fade_out(previous, fade_out);
            self.continuous.outgoing.push(previous);
        }

        self.continuous.outgoing.retain(|outgoing| *outgoing != key);
        self.mixer
            .fade_in(key, fade_in, AnimationLoopStyle::Loop, restart);
        self.continuous.active = Some(key);
    }

    fn start_talking(&mut self) {
        let Some(talk) = self.talk_clip else {
            tracing::debug!("no talk clip, talking shows through morph targets only");
            return;
        };

        // talking cuts a running gesture short
        if let Some(gesture) = self.transient.active.take() {
            self.mixer.fade_out(gesture, self.fades.gesture);
            self.transient.outgoing.push(gesture);
            self.gesture_symbol = None;
        }

        self.talking = Some(talk);
        self.mixer.set_speed(talk, 1.0);
        let fade = self.fades.crossfade;
        self.crossfade_continuous(talk, fade, fade, true);
    }

    fn stop_talking(&mut self) {
        let Some(talk) = self.talking.take() else {
            return;
        };

        let fade = self.fades.crossfade;
        match self.base {
            Some(base) if base != talk => self.crossfade_continuous(base, fade, fade, true),
            // talk was also the floor clip, it keeps looping
            Some(_) => {}
            None => {
                if self.continuous.active == Some(talk) {
                    self.continuous.active = None;
                    self.mixer.fade_out(talk, fade);
                    self.continuous.outgoing.push(talk);
                }
            }
        }
    }

    fn request_gesture(&mut self, symbol: &str) {
        if self.talking.is_some() {
            tracing::debug!("gesture {symbol:?} ignored while talking");
            return;
        }

        self.transient.requested_symbol = Some(symbol.to_string());

        let Some(key) = self.resolve_clip(symbol, ResolveMode::Strict) else {
            self.log_miss("gesture", symbol);
            return;
        };

        let fade = self.fades.gesture;

        // a new gesture pre-empts the running one
        if let Some(previous) = self.transient.active.take() {
            if previous != key {
                self.mixer.fade_out(previous, fade);
                self.transient.outgoing.push(previous);
            }
        }

        if let Some(continuous) = self.continuous.active.take() {
            if continuous != key {
                self.mixer.fade_out(continuous, fade);
                self.continuous.outgoing.push(continuous);
            }
        }

        self.transient.outgoing.retain(|outgoing| *outgoing != key);
        self.continuous.outgoing.retain(|outgoing| *outgoing != key);

        self.mixer.set_speed(key, 1.0);
        self.mixer.fade_in(key, fade, AnimationLoopStyle::Once, true);
        self.transient.active = Some(key);
        self.gesture_symbol = Some(symbol.to_string());
    }

    fn complete_gesture(&mut self, key: ActionKey) -> Option<String> {
        self.transient.active = None;

        let fade = self.fades.restore;

        if self.base != Some(key) {
            self.mixer.fade_out(key, fade);
            self.transient.outgoing.push(key);
        }

        if let Some(base) = self.base {
            self.continuous.outgoing.retain(|outgoing| *outgoing != base);
            // the gesture clip may itself be the floor clip, which is clamped at its end
            self.mixer
                .fade_in(base, fade, AnimationLoopStyle::Loop, base == key);
            self.continuous.active = Some(base);
        }

        let symbol = self.gesture_symbol.take();
        tracing::debug!("gesture {symbol:?} completed");
        symbol
    }

    fn apply_speed(&mut self, speed: f64) {
        if self.talking.is_some() {
            return;
        }

        // players only wrap forward
        let speed = if speed > 0.0 && speed.is_finite() {
            speed
        } else {
            1.0
        };

        if let Some(base) = self.base {
            if self.continuous.active == Some(base) {
                self.mixer.set_speed(base, speed);
            }
        }
    }

    fn prune(&mut self) {
        let mixer = &self.mixer;
        for channel in [&mut self.continuous, &mut self.transient] {
            channel.outgoing.retain(|key| {
                mixer
                    .get(*key)
                    .is_some_and(|action| action.is_enabled() && action.is_fading_out())
            });
        }
    }
}

fn changed(last: &mut Option<String>, next: Option<&str>) -> bool {
    let next = next.map(str::trim).filter(|symbol| !symbol.is_empty());
    if last.as_deref() == next {
        return false;
    }
    *last = next.map(str::to_string);
    true
}

#[cfg(test)]
mod tests;

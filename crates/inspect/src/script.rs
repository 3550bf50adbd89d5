//! Timelines of UI input changes.
//!
//! ```json
//! {
//!   "duration": 4.0,
//!   "events": [
//!     { "at": 0.5, "animation": "Walk" },
//!     { "at": 1.0, "gesture": "wave" },
//!     { "at": 2.0, "talking": true },
//!     { "at": 3.0, "expression": null }
//!   ]
//! }
//! ```

use anyhow::{bail, Result};
use awsm_avatar::{appearance::ModelModifiers, transform::PointerInput, FrameInputs};
use serde::Deserialize;

/// Longest timeline accepted, in seconds. Every frame is simulated and
/// eventful ones are held in memory.
pub const MAX_DURATION: f64 = 60.0 * 60.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    /// Seconds to simulate. Defaults to two seconds past the last event.
    #[serde(default)]
    pub duration: Option<f64>,
    pub events: Vec<ScriptEvent>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptEvent {
    /// Seconds from the start.
    pub at: f64,
    #[serde(flatten)]
    pub change: InputChange,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputChange {
    Animation(Option<String>),
    Expression(Option<String>),
    Gesture(Option<String>),
    Talking(bool),
    Speed(f64),
    Focus(bool),
    Pointer(Option<PointerInput>),
    Locomotion(bool),
    Modifiers(ModelModifiers),
}

impl InputChange {
    /// Applies the change to the held input state. Modifier changes go to the
    /// engine directly, so they're handed back instead.
    pub fn apply(self, inputs: &mut FrameInputs) -> Option<ModelModifiers> {
        match self {
            Self::Animation(value) => inputs.requested_animation = value,
            Self::Expression(value) => inputs.expression = value,
            Self::Gesture(value) => inputs.requested_gesture = value,
            Self::Talking(value) => inputs.is_talking = value,
            Self::Speed(value) => inputs.animation_speed = value,
            Self::Focus(value) => inputs.focus_mode = value,
            Self::Pointer(value) => inputs.pointer = value,
            Self::Locomotion(value) => inputs.locomotion_active = value,
            Self::Modifiers(modifiers) => return Some(modifiers),
        }
        None
    }
}

impl Script {
    pub fn parse(json: &str) -> Result<Self> {
        let mut script: Self = serde_json::from_str(json)?;

        for event in &script.events {
            if !(event.at.is_finite() && event.at >= 0.0) {
                bail!("event time {} is not a usable time", event.at);
            }
            if event.at > MAX_DURATION {
                bail!("event time {} is past the {MAX_DURATION}s limit", event.at);
            }
        }
        if let Some(duration) = script.duration {
            if !(duration.is_finite() && duration >= 0.0) {
                bail!("duration {duration} is not a usable time");
            }
            if duration > MAX_DURATION {
                bail!("duration {duration} is past the {MAX_DURATION}s limit");
            }
        }

        // stable, so same-time events keep their written order
        script.events.sort_by(|a, b| a.at.total_cmp(&b.at));

        Ok(script)
    }

    pub fn duration(&self) -> f64 {
        self.duration.unwrap_or_else(|| {
            self.events.last().map(|event| event.at).unwrap_or(0.0) + 2.0
        })
    }
}

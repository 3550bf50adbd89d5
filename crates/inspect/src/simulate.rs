use awsm_avatar::{AvatarEngine, FrameInputs, FrameOutput};
use serde::Serialize;

use crate::script::Script;

/// One eventful frame.
#[derive(Debug, Serialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub time: f64,
    #[serde(flatten)]
    pub output: FrameOutput,
}

/// Steps the engine at a fixed rate, applying script events as their time
/// comes up. Only frames where something discrete happened are kept: the
/// first frame, a change in the set of playing clips, morph writes, mesh
/// overrides, or a completed gesture.
pub fn simulate(engine: &mut AvatarEngine, script: &Script, fps: f64) -> Vec<FrameRecord> {
    let time_delta = 1.0 / fps;
    let frames = (script.duration() * fps).ceil() as u64;

    let mut inputs = FrameInputs::default();
    let mut events = script.events.iter().peekable();
    let mut playing: Vec<String> = Vec::new();
    let mut records = Vec::new();

    for frame in 0..=frames {
        let time = frame as f64 * time_delta;

        while let Some(event) = events.next_if(|event| event.at <= time) {
            tracing::debug!("{time:.3}s: {:?}", event.change);
            if let Some(modifiers) = event.change.clone().apply(&mut inputs) {
                engine.set_modifiers(modifiers);
            }
        }

        let output = engine.update(time_delta, &inputs);

        let now_playing: Vec<String> = output.clips.iter().map(|clip| clip.clip.clone()).collect();
        let clips_changed = now_playing != playing;
        playing = now_playing;

        if frame == 0
            || clips_changed
            || !output.morphs.is_empty()
            || output.mesh_overrides.is_some()
            || output.gesture_completed.is_some()
        {
            records.push(FrameRecord {
                frame,
                time,
                output,
            });
        }
    }

    records
}

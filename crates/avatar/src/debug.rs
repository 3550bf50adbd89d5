//! Debug helpers and logging flags.

use std::collections::HashMap;

/// Engine logging flags.
#[derive(Clone, Debug, Default)]
pub struct AvatarLogging {
    /// Wraps every frame update in an INFO span.
    pub frame_timings: bool,
    /// Logs clip and morph resolution misses at WARN instead of DEBUG.
    pub resolution_misses: bool,
}

/// Keys for [`UniqueLog`]. One slot per kind of per-frame message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogSlot {
    ExpressionMorph,
    AnimationSpeed,
}

/// Remembers the last input logged under each slot so that code running every
/// frame only logs when the input changes.
#[derive(Clone, Debug, Default)]
pub struct UniqueLog {
    last: HashMap<LogSlot, String>,
}

impl UniqueLog {
    /// Runs the closure if the input differs from the last one seen for the slot.
    pub fn on_change(&mut self, slot: LogSlot, input: &str, f: impl FnOnce()) {
        if let Some(value) = self.last.get(&slot) {
            if value == input {
                return; // already logged
            }
        }

        f();
        self.last.insert(slot, input.to_string());
    }

    pub fn forget(&mut self, slot: LogSlot) {
        self.last.remove(&slot);
    }
}

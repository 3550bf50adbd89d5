use super::interpolate::interpolate_linear_f32;

/// A linear weight ramp over a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    from: f32,
    to: f32,
    duration: f64,
    elapsed: f64,
}

impl Fade {
    pub fn new(from: f32, to: f32, duration: f64) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
        }
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn weight(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        interpolate_linear_f32(self.from, self.to, self.elapsed / self.duration)
    }

    /// Advances the ramp and returns the new weight.
    pub fn advance(&mut self, time_delta: f64) -> f32 {
        self.elapsed += time_delta.max(0.0);
        self.weight()
    }
}

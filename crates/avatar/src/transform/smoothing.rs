use glam::{Vec2, Vec3};

/// Values that can be eased toward a target.
pub trait Lerp: Copy {
    fn lerp_to(self, target: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp_to(self, target: Self, t: f32) -> Self {
        self + (target - self) * t
    }
}

impl Lerp for Vec2 {
    fn lerp_to(self, target: Self, t: f32) -> Self {
        self.lerp(target, t)
    }
}

impl Lerp for Vec3 {
    fn lerp_to(self, target: Self, t: f32) -> Self {
        self.lerp(target, t)
    }
}

/// Converts a per-frame smoothing factor tuned at `reference_fps` into the
/// factor for a frame of `time_delta` seconds, so the easing takes the same
/// wall-clock time at any frame rate.
pub fn frame_factor(factor: f32, time_delta: f64, reference_fps: f64) -> f32 {
    if !(time_delta > 0.0 && time_delta.is_finite()) {
        return 0.0;
    }

    let factor = f64::from(factor.clamp(0.0, 1.0));
    (1.0 - (1.0 - factor).powf(time_delta * reference_fps)) as f32
}

/// A value chasing its target by exponential interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothed<T> {
    pub current: T,
    pub target: T,
}

impl<T: Lerp> Smoothed<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: value,
            target: value,
        }
    }

    /// Jumps straight to `value`, no easing.
    pub fn snap(&mut self, value: T) {
        self.current = value;
        self.target = value;
    }

    /// Moves `current` a fraction `t` of the way to `target`.
    pub fn step(&mut self, t: f32) -> T {
        self.current = self.current.lerp_to(self.target, t);
        self.current
    }
}

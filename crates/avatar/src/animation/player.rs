#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    pub speed: f64,
    pub loop_style: AnimationLoopStyle,
    duration: f64,
    state: AnimationState,
    local_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Playing,
    Paused,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationLoopStyle {
    Loop,
    /// Plays to the end and holds the last frame.
    Once,
}

impl AnimationPlayer {
    pub fn new(duration: f64) -> Self {
        Self {
            speed: 1.0,
            loop_style: AnimationLoopStyle::Loop,
            duration,
            state: AnimationState::Paused,
            local_time: 0.0,
        }
    }

    pub fn play(&mut self) {
        if self.state == AnimationState::Paused {
            self.state = AnimationState::Playing;
        }
    }

    pub fn pause(&mut self) {
        if self.state == AnimationState::Playing {
            self.state = AnimationState::Paused;
        }
    }

    /// Rewinds and starts playing, even after the clip ended.
    pub fn restart(&mut self) {
        self.local_time = 0.0;
        self.state = AnimationState::Playing;
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn local_time(&self) -> f64 {
        self.local_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Advances the clip. Returns true on the update where a one-shot clip
    /// reaches its end.
    pub fn update(&mut self, global_time_delta: f64) -> bool {
        if self.state != AnimationState::Playing {
            return false;
        }

        self.local_time += global_time_delta * self.speed;

        if self.local_time >= self.duration {
            match self.loop_style {
                AnimationLoopStyle::Loop => {
                    // zero-length clips just sit at the start
                    self.local_time = if self.duration > 0.0 {
                        self.local_time.rem_euclid(self.duration)
                    } else {
                        0.0
                    };
                }
                AnimationLoopStyle::Once => {
                    self.local_time = self.duration;
                    self.state = AnimationState::Ended;
                    return true;
                }
            }
        }

        false
    }
}

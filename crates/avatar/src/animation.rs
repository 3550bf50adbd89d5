mod fade;
mod interpolate;
mod mixer;
mod player;
mod sequencer;

pub use fade::*;
pub use interpolate::*;
pub use mixer::*;
pub use player::*;
pub use sequencer::*;

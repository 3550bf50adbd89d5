pub mod animation;
pub mod appearance;
pub mod bounds;
pub mod catalog;
pub mod config;
pub mod debug;
pub mod engine;
pub mod error;
pub mod expression;
pub mod resolve;
pub mod transform;

pub use engine::{AvatarEngine, FrameInputs, FrameOutput, LoadOutcome};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AwsmCatalogError>;

#[derive(Error, Debug)]
pub enum AwsmCatalogError {
    #[error("[catalog] clip {clip:?} has invalid duration {duration}")]
    InvalidClipDuration { clip: String, duration: f64 },

    #[error("[catalog] clip {clip:?} channel {channel_index} has no input bounds")]
    MissingClipDuration { clip: String, channel_index: usize },

    #[error("[catalog] mesh {mesh:?} has malformed targetNames: {reason}")]
    MalformedTargetNames { mesh: String, reason: String },
}

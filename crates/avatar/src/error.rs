use thiserror::Error;

use crate::{catalog::AwsmCatalogError, config::AwsmConfigError};

#[derive(Error, Debug)]
pub enum AwsmAvatarError {
    #[error("{0}")]
    Catalog(#[from] AwsmCatalogError),

    #[error("{0}")]
    Config(#[from] AwsmConfigError),
}

pub type Result<T> = std::result::Result<T, AwsmAvatarError>;

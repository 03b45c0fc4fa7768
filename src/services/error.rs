use thiserror::Error;

use crate::{cache::error::CacheError, config::ConfigError, domain::error::TrackError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Duplication(#[from] TrackError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("track \"{0}\" not found in library")]
    NotInLibrary(String),

    #[error("track \"{0}\" not found in cache")]
    NotInCache(String),

    #[error("playlist '{0}' not found in configuration")]
    PlaylistNotFound(String),

    #[error("playlist '{0}' is empty")]
    EmptyPlaylist(String),
}

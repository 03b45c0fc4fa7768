use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache capacity must be at least 1")]
    ZeroCapacity,

    #[error("cache capacity can only be set before the first insertion")]
    AlreadyConfigured,
}

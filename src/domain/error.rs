use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("track \"{0}\" failed to duplicate")]
    Duplication(String),
}

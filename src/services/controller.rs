use std::fmt::{self, Display};

use log::{debug, error};

use crate::{
    cache::{LruCache, error::CacheError},
    domain::track::AudioTrack,
};

/// Result of asking the controller to hold a track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Hit,
    MissNoEviction,
    MissWithEviction,
}

impl LoadOutcome {
    /// 1 for a hit, 0 for a plain miss, -1 for a miss that evicted
    pub fn code(self) -> i8 {
        match self {
            LoadOutcome::Hit => 1,
            LoadOutcome::MissNoEviction => 0,
            LoadOutcome::MissWithEviction => -1,
        }
    }

    pub fn is_hit(self) -> bool {
        self == LoadOutcome::Hit
    }
}

impl Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadOutcome::Hit => write!(f, "HIT"),
            LoadOutcome::MissNoEviction => write!(f, "MISS"),
            LoadOutcome::MissWithEviction => write!(f, "MISS (evicted)"),
        }
    }
}

/// The controller's track memory.
///
/// Keeps prepared copies of library tracks in an [`LruCache`]. On a hit the entry
/// is promoted; on a miss the source is duplicated, prepared, analyzed and stored.
#[derive(Debug, Default)]
pub struct ControllerService {
    cache: LruCache,
}

impl ControllerService {
    pub fn new(cache_size: usize) -> Result<Self, CacheError> {
        Ok(Self {
            cache: LruCache::new(cache_size)?,
        })
    }

    pub fn load_track_to_cache(&mut self, track: &dyn AudioTrack) -> LoadOutcome {
        let title = track.title();
        if self.cache.contains(title) {
            self.cache.get(title);
            debug!("cache hit for \"{title}\"");
            return LoadOutcome::Hit;
        }

        let mut copy = match track.duplicate() {
            Ok(copy) => copy,
            Err(e) => {
                error!("{e}");
                return LoadOutcome::MissNoEviction;
            }
        };
        copy.prepare();
        copy.analyze();

        if self.cache.put(copy) {
            LoadOutcome::MissWithEviction
        } else {
            LoadOutcome::MissNoEviction
        }
    }

    /// Fetches a cached track, marking it most recently used
    pub fn get_track_from_cache(&mut self, title: &str) -> Option<&dyn AudioTrack> {
        self.cache.get(title)
    }

    /// One-time resize, see [`LruCache::set_capacity`]
    pub fn set_cache_size(&mut self, size: usize) -> Result<(), CacheError> {
        self.cache.set_capacity(size)
    }

    pub fn cache(&self) -> &LruCache {
        &self.cache
    }
}

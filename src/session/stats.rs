use std::fmt::{self, Display};

use serde::Serialize;

use crate::services::controller::LoadOutcome;

/// Counters for one playlist run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub tracks_processed: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub cache_evictions: usize,
    pub deck_loads_a: usize,
    pub deck_loads_b: usize,
    pub transitions: usize,
    pub errors: usize,
}

impl SessionStats {
    pub fn record_cache(&mut self, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Hit => self.cache_hits += 1,
            LoadOutcome::MissNoEviction => self.cache_misses += 1,
            LoadOutcome::MissWithEviction => {
                self.cache_misses += 1;
                self.cache_evictions += 1;
            }
        }
    }

    pub fn record_deck_load(&mut self, deck: usize) {
        if deck == 0 {
            self.deck_loads_a += 1;
        } else {
            self.deck_loads_b += 1;
        }
        self.transitions += 1;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session: String,
    pub playlist: String,
    pub started_at: String,
    pub stats: SessionStats,
}

impl Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;
        writeln!(f, "=== DJ Session Summary ===")?;
        writeln!(f, "Session: {} (started {})", self.session, self.started_at)?;
        writeln!(f, "Playlist: {}", self.playlist)?;
        writeln!(f, "Tracks processed: {}", s.tracks_processed)?;
        writeln!(f, "Cache hits: {}", s.cache_hits)?;
        writeln!(f, "Cache misses: {}", s.cache_misses)?;
        writeln!(f, "Cache evictions: {}", s.cache_evictions)?;
        writeln!(f, "Deck A loads: {}", s.deck_loads_a)?;
        writeln!(f, "Deck B loads: {}", s.deck_loads_b)?;
        writeln!(f, "Transitions: {}", s.transitions)?;
        write!(f, "Errors: {}", s.errors)
    }
}

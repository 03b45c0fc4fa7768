use log::{debug, error, info};

use crate::{
    config::MixingConfig,
    domain::{error::TrackError, track::AudioTrack},
    services::error::ServiceError,
};

pub const DECK_COUNT: usize = 2;

/// Two-deck mixer with instant transitions.
///
/// Each load targets the deck that is not playing, installs a prepared copy
/// of the track there, unloads the previously active deck and makes the new
/// deck active. When both decks are empty the load goes to deck 0.
#[derive(Debug, Default)]
pub struct MixingEngine {
    decks: [Option<Box<dyn AudioTrack>>; DECK_COUNT],
    active_deck: usize,
    auto_sync: bool,
    bpm_tolerance: u32,
}

impl MixingEngine {
    pub fn new(config: MixingConfig) -> Self {
        Self {
            auto_sync: config.auto_sync,
            bpm_tolerance: config.bpm_tolerance,
            ..Self::default()
        }
    }

    /// Loads a copy of `track` onto the next deck and returns its index.
    ///
    /// If the copy cannot be made no deck is touched.
    pub fn load_track_to_deck(&mut self, track: &dyn AudioTrack) -> Result<usize, ServiceError> {
        let first_track = self.decks.iter().all(Option::is_none);
        let target = if first_track {
            0
        } else {
            1 - self.active_deck
        };

        let mut copy = track.duplicate().inspect_err(|e| error!("{e}"))?;
        debug!("target deck for \"{}\": {target}", copy.title());
        if first_track {
            self.active_deck = 0;
        }

        if let Some(stale) = self.decks[target].take() {
            debug!("clearing deck {target} ({})", stale.title());
        }

        copy.prepare();
        copy.analyze();

        if self.auto_sync && self.active_track().is_some() && !self.can_mix_tracks(&*copy) {
            self.sync_bpm(&mut *copy);
        }

        info!("\"{}\" is now loaded in deck {target}", copy.title());
        self.decks[target] = Some(copy);

        if self.active_deck != target {
            if let Some(previous) = self.decks[self.active_deck].take() {
                info!(
                    "Unloading previous deck {} ({})",
                    self.active_deck,
                    previous.title()
                );
            }
        }

        self.active_deck = target;
        Ok(target)
    }

    /// Whether `candidate` is within the BPM tolerance of the active deck.
    ///
    /// Always `false` while the active deck is empty.
    pub fn can_mix_tracks(&self, candidate: &dyn AudioTrack) -> bool {
        self.active_track()
            .is_some_and(|active| active.bpm().abs_diff(candidate.bpm()) <= self.bpm_tolerance)
    }

    /// Sets the BPM of `candidate` to the average of its own and the active
    /// deck's BPM. Does nothing while the active deck is empty.
    pub fn sync_bpm(&self, candidate: &mut dyn AudioTrack) {
        let Some(active) = self.active_track() else {
            return;
        };
        let original = candidate.bpm();
        let synced = original.midpoint(active.bpm());
        candidate.set_bpm(synced);
        info!("Syncing BPM of \"{}\" from {original} to {synced}", candidate.title());
    }

    /// Deep copy: both decks are duplicated independently
    pub fn try_clone(&self) -> Result<Self, TrackError> {
        let mut decks: [Option<Box<dyn AudioTrack>>; DECK_COUNT] = Default::default();
        for (copy, deck) in decks.iter_mut().zip(&self.decks) {
            *copy = deck.as_ref().map(|t| t.duplicate()).transpose()?;
        }
        Ok(Self {
            decks,
            active_deck: self.active_deck,
            auto_sync: self.auto_sync,
            bpm_tolerance: self.bpm_tolerance,
        })
    }

    pub fn set_auto_sync(&mut self, enabled: bool) {
        self.auto_sync = enabled;
    }

    pub fn set_bpm_tolerance(&mut self, tolerance: u32) {
        self.bpm_tolerance = tolerance;
    }

    pub fn deck(&self, index: usize) -> Option<&dyn AudioTrack> {
        self.decks.get(index)?.as_deref()
    }

    pub fn active_deck(&self) -> usize {
        self.active_deck
    }

    pub fn active_track(&self) -> Option<&dyn AudioTrack> {
        self.deck(self.active_deck)
    }
}

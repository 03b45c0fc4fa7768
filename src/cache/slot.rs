use crate::domain::track::AudioTrack;

/// One storage cell of the cache
#[derive(Debug, Default)]
pub struct CacheSlot {
    track: Option<Box<dyn AudioTrack>>,
    last_access_time: u64,
}

impl CacheSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `track`, dropping whatever the slot held before.
    pub fn store(&mut self, track: Box<dyn AudioTrack>, access_time: u64) {
        self.track = Some(track);
        self.last_access_time = access_time;
    }

    /// Stamps the slot with `access_time` and returns the held track.
    ///
    /// An empty slot is left untouched.
    pub fn access(&mut self, access_time: u64) -> Option<&dyn AudioTrack> {
        let track = self.track.as_deref()?;
        self.last_access_time = access_time;
        Some(track)
    }

    /// like [`CacheSlot::access`], without touching the timestamp
    pub fn peek(&self) -> Option<&dyn AudioTrack> {
        self.track.as_deref()
    }

    /// Moves the track out and resets the slot
    pub fn take(&mut self) -> Option<Box<dyn AudioTrack>> {
        self.last_access_time = 0;
        self.track.take()
    }

    pub fn clear(&mut self) {
        self.take();
    }

    pub fn is_occupied(&self) -> bool {
        self.track.is_some()
    }

    pub fn last_access_time(&self) -> u64 {
        self.last_access_time
    }

    pub(crate) fn holds(&self, title: &str) -> bool {
        self.peek().is_some_and(|t| t.title() == title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        track::TrackMetadata,
        wav::WavTrack,
    };

    fn track(title: &str) -> Box<dyn AudioTrack> {
        Box::new(WavTrack::new(
            TrackMetadata::with_waveform_samples(title, vec![], 60, 120, 4),
            44_100,
            16,
        ))
    }

    #[test]
    fn new_slot_is_empty() {
        let mut slot = CacheSlot::new();
        assert!(!slot.is_occupied());
        assert_eq!(slot.last_access_time(), 0);
        assert!(slot.access(5).is_none());
        // access on an empty slot does not stamp it
        assert_eq!(slot.last_access_time(), 0);
    }

    #[test]
    fn store_then_access_updates_timestamp() {
        let mut slot = CacheSlot::new();
        slot.store(track("A"), 3);

        assert!(slot.is_occupied());
        assert_eq!(slot.last_access_time(), 3);

        assert_eq!(slot.access(7).map(|t| t.title().to_string()), Some("A".into()));
        assert_eq!(slot.last_access_time(), 7);

        assert!(slot.peek().is_some());
        assert_eq!(slot.last_access_time(), 7);
    }

    #[test]
    fn store_replaces_previous_track() {
        let mut slot = CacheSlot::new();
        slot.store(track("A"), 1);
        slot.store(track("B"), 2);

        assert!(slot.holds("B"));
        assert!(!slot.holds("A"));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut slot = CacheSlot::new();
        slot.store(track("A"), 9);

        slot.clear();
        slot.clear();

        assert!(!slot.is_occupied());
        assert_eq!(slot.last_access_time(), 0);
        assert!(slot.peek().is_none());
    }
}

use log::debug;

use crate::{
    cache::{error::CacheError, slot::CacheSlot},
    config::DEFAULT_CACHE_SIZE,
    domain::track::AudioTrack,
};

/// Fixed-capacity track cache keyed by title.
///
/// Every `get` hit and every `put` draws a fresh value from a logical access
/// counter; the occupied slot with the smallest stamp is the eviction
/// candidate, ties going to the lowest slot index. Lookups are linear scans
/// over the slot array, which stays small (8 slots by default).
#[derive(Debug)]
pub struct LruCache {
    slots: Vec<CacheSlot>,
    access_counter: u64,
    configured: bool,
}

impl LruCache {
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::ZeroCapacity);
        }
        Ok(Self {
            slots: empty_slots(capacity),
            access_counter: 0,
            configured: false,
        })
    }

    /// One-time capacity configuration.
    ///
    /// Only allowed once, and only before anything has been stored.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<(), CacheError> {
        if capacity == 0 {
            return Err(CacheError::ZeroCapacity);
        }
        if self.configured || self.access_counter > 0 {
            return Err(CacheError::AlreadyConfigured);
        }
        self.slots = empty_slots(capacity);
        self.configured = true;
        Ok(())
    }

    pub fn contains(&self, title: &str) -> bool {
        self.find_slot(title).is_some()
    }

    /// Returns the cached track and marks it most recently used
    pub fn get(&mut self, title: &str) -> Option<&dyn AudioTrack> {
        let index = self.find_slot(title)?;
        let now = self.tick();
        self.slots[index].access(now)
    }

    /// Takes ownership of `track`, evicting the least recently used entry if
    /// the cache is full.
    ///
    /// Returns `true` if an eviction happened. A track whose title is already
    /// cached replaces the old copy in place.
    pub fn put(&mut self, track: Box<dyn AudioTrack>) -> bool {
        let now = self.tick();

        if let Some(index) = self.find_slot(track.title()) {
            debug!("replacing cached \"{}\" in slot {index}", track.title());
            self.slots[index].store(track, now);
            return false;
        }

        if let Some(index) = self.find_empty_slot() {
            self.slots[index].store(track, now);
            return false;
        }

        // capacity is at least 1, so a full cache always has an LRU slot
        let Some(index) = self.find_lru_slot() else {
            return false;
        };
        self.evict_slot(index);
        self.slots[index].store(track, now);
        true
    }

    /// Drops the least recently used track. `false` if the cache is empty.
    pub fn evict_lru(&mut self) -> bool {
        match self.find_lru_slot() {
            Some(index) => {
                self.evict_slot(index);
                true
            }
            None => false,
        }
    }

    /// number of occupied slots
    pub fn size(&self) -> usize {
        self.slots.iter().filter(|s| s.is_occupied()).count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.size() >= self.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(CacheSlot::clear);
    }

    /// Occupied slots as `(slot index, last access, track)`, in slot order
    pub fn entries(&self) -> impl Iterator<Item = (usize, u64, &dyn AudioTrack)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.peek().map(|t| (i, slot.last_access_time(), t)))
    }

    /// cached titles from least to most recently used
    pub fn lru_order(&self) -> Vec<&str> {
        let mut entries = self.entries().collect::<Vec<_>>();
        entries.sort_by_key(|(index, last_access, _)| (*last_access, *index));
        entries.into_iter().map(|(_, _, t)| t.title()).collect()
    }

    fn tick(&mut self) -> u64 {
        self.access_counter += 1;
        self.access_counter
    }

    fn evict_slot(&mut self, index: usize) {
        if let Some(evicted) = self.slots[index].take() {
            debug!("evicting \"{}\" from slot {index}", evicted.title());
        }
    }

    fn find_slot(&self, title: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.holds(title))
    }

    fn find_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(|s| !s.is_occupied())
    }

    fn find_lru_slot(&self) -> Option<usize> {
        let mut lru: Option<(usize, u64)> = None;
        for (index, slot) in self.slots.iter().enumerate() {
            if !slot.is_occupied() {
                continue;
            }
            // strict comparison keeps the first slot on ties
            if lru.is_none_or(|(_, oldest)| slot.last_access_time() < oldest) {
                lru = Some((index, slot.last_access_time()));
            }
        }
        lru.map(|(index, _)| index)
    }
}

impl Default for LruCache {
    fn default() -> Self {
        Self {
            slots: empty_slots(DEFAULT_CACHE_SIZE),
            access_counter: 0,
            configured: false,
        }
    }
}

fn empty_slots(capacity: usize) -> Vec<CacheSlot> {
    (0..capacity).map(|_| CacheSlot::new()).collect()
}

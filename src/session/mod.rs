//! Runs playlists through the controller cache and the mixer.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use log::{error, info, warn};

use crate::{
    config::Config,
    domain::{library::Library, playlist::Playlist},
    services::{
        controller::{ControllerService, LoadOutcome},
        error::ServiceError,
        mixer::MixingEngine,
    },
};

pub mod stats;

use stats::{SessionStats, SessionSummary};

pub struct Session {
    name: String,
    library: Library,
    controller: ControllerService,
    mixer: MixingEngine,
    playlists: BTreeMap<String, Vec<usize>>,
    stats: SessionStats,
    started_at: DateTime<Local>,
}

impl Session {
    pub fn new(config: Config) -> Result<Self, ServiceError> {
        config.validate()?;
        let library = Library::from_records(&config.library)?;
        let controller = ControllerService::new(config.cache.size)?;
        let mixer = MixingEngine::new(config.mixing);

        info!(
            "Session '{}': cache {} slots (LRU), BPM tolerance {}, auto sync {}",
            config.session.name,
            config.cache.size,
            config.mixing.bpm_tolerance,
            if config.mixing.auto_sync { "enabled" } else { "disabled" }
        );

        Ok(Self {
            name: config.session.name,
            library,
            controller,
            mixer,
            playlists: config.playlists,
            stats: SessionStats::default(),
            started_at: Local::now(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn controller(&self) -> &ControllerService {
        &self.controller
    }

    pub fn mixer(&self) -> &MixingEngine {
        &self.mixer
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// playlist names in sorted order
    pub fn playlist_names(&self) -> impl Iterator<Item = &str> {
        self.playlists.keys().map(String::as_str)
    }

    pub fn load_playlist(&self, name: &str) -> Result<Playlist, ServiceError> {
        let indices = self
            .playlists
            .get(name)
            .ok_or_else(|| ServiceError::PlaylistNotFound(name.to_string()))?;
        let playlist = self.library.playlist_from_indices(name, indices);
        if playlist.is_empty() {
            return Err(ServiceError::EmptyPlaylist(name.to_string()));
        }
        Ok(playlist)
    }

    /// Makes sure the library track `title` is cached.
    ///
    /// `None` if the library has no such track.
    pub fn load_track_to_controller(&mut self, title: &str) -> Option<LoadOutcome> {
        let Some(track) = self.library.find(title) else {
            error!("{}", ServiceError::NotInLibrary(title.to_string()));
            self.stats.errors += 1;
            return None;
        };

        let outcome = self.controller.load_track_to_cache(track);
        info!("Loading \"{title}\" to controller: {outcome}");
        self.stats.record_cache(outcome);
        Some(outcome)
    }

    /// Moves a copy of the cached track `title` onto the next deck
    pub fn load_track_to_mixer_deck(&mut self, title: &str) -> bool {
        let Some(track) = self.controller.get_track_from_cache(title) else {
            error!("{}", ServiceError::NotInCache(title.to_string()));
            self.stats.errors += 1;
            return false;
        };

        match self.mixer.load_track_to_deck(track) {
            Ok(deck) => {
                self.stats.record_deck_load(deck);
                true
            }
            Err(e) => {
                error!("failed to load \"{title}\" to a deck: {e}");
                self.stats.errors += 1;
                false
            }
        }
    }

    /// Plays every track of a playlist, starting from fresh statistics
    pub fn play_playlist(&mut self, name: &str) -> Result<SessionSummary, ServiceError> {
        self.play_playlist_skipping(name, &[])
    }

    /// Like [`Session::play_playlist`], leaving out the first entry for
    /// each title in `skip`
    pub fn play_playlist_skipping(
        &mut self,
        name: &str,
        skip: &[String],
    ) -> Result<SessionSummary, ServiceError> {
        let mut playlist = self.load_playlist(name)?;
        for title in skip {
            if !playlist.remove(title) {
                warn!("\"{title}\" is not in playlist '{name}', nothing to skip");
            }
        }
        if playlist.is_empty() {
            return Err(ServiceError::EmptyPlaylist(name.to_string()));
        }
        self.stats = SessionStats::default();
        info!("Loading playlist: {name} ({} tracks)", playlist.len());

        for title in playlist.titles() {
            self.stats.tracks_processed += 1;
            self.load_track_to_controller(title);
            self.log_cache_status();
            if self.load_track_to_mixer_deck(title) {
                self.log_deck_status();
            }
        }

        Ok(self.summary(name))
    }

    /// Plays all playlists in name order, skipping the ones that fail to load
    pub fn play_all(&mut self) -> Vec<SessionSummary> {
        let names = self.playlists.keys().cloned().collect::<Vec<_>>();
        names
            .iter()
            .filter_map(|name| match self.play_playlist(name) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    warn!("skipping playlist '{name}': {e}");
                    None
                }
            })
            .collect()
    }

    pub fn summary(&self, playlist: &str) -> SessionSummary {
        SessionSummary {
            session: self.name.clone(),
            playlist: playlist.to_string(),
            started_at: self.started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            stats: self.stats.clone(),
        }
    }

    fn log_cache_status(&self) {
        let cache = self.controller.cache();
        info!(
            "Cache [{}/{}] LRU -> MRU: {}",
            cache.size(),
            cache.capacity(),
            cache.lru_order().join(", ")
        );
    }

    fn log_deck_status(&self) {
        let deck = |i| {
            self.mixer
                .deck(i)
                .map_or("[EMPTY]".to_string(), |t| t.title().to_string())
        };
        info!(
            "Decks: 0 = {}, 1 = {}, active = {}",
            deck(0),
            deck(1),
            self.mixer.active_deck()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
version = 1

[session]
name = "Test Session"

[cache]
size = 2

[mixing]
bpm_tolerance = 4
auto_sync = true

[[library]]
format = "mp3"
title = "A"
duration = 180
bpm = 120
bitrate = 320

[[library]]
format = "wav"
title = "B"
duration = 200
bpm = 124
sample_rate = 44100
bit_depth = 16

[[library]]
format = "mp3"
title = "C"
duration = 240
bpm = 140
bitrate = 192

[playlists]
warmup = [1, 2, 1]
rotation = [1, 2, 3, 1]
broken = [9]
"#;

    fn session() -> anyhow::Result<Session> {
        let config: Config = toml::from_str(CONFIG)?;
        Ok(Session::new(config)?)
    }

    #[test]
    fn new_session_from_config() -> anyhow::Result<()> {
        let session = session()?;

        assert_eq!(session.name(), "Test Session");
        assert_eq!(session.library().len(), 3);
        assert_eq!(session.controller().cache().capacity(), 2);
        assert_eq!(
            session.playlist_names().collect::<Vec<_>>(),
            ["broken", "rotation", "warmup"]
        );
        Ok(())
    }

    #[test]
    fn invalid_config_is_rejected() -> anyhow::Result<()> {
        let config: Config = toml::from_str("version = 1\n[cache]\nsize = 0")?;
        assert!(matches!(Session::new(config), Err(ServiceError::Config(_))));
        Ok(())
    }

    #[test]
    fn play_playlist_counts_hits_and_decks() -> anyhow::Result<()> {
        let mut session = session()?;

        let summary = session.play_playlist("warmup")?;

        assert_eq!(
            summary.stats,
            SessionStats {
                tracks_processed: 3,
                cache_hits: 1,
                cache_misses: 2,
                cache_evictions: 0,
                deck_loads_a: 2,
                deck_loads_b: 1,
                transitions: 3,
                errors: 0,
            }
        );
        assert_eq!(summary.playlist, "warmup");
        Ok(())
    }

    #[test]
    fn play_playlist_with_evictions() -> anyhow::Result<()> {
        let mut session = session()?;

        let stats = session.play_playlist("rotation")?.stats;

        // A, B miss; C evicts A; A evicts B
        assert_eq!(stats.cache_hits, 0);
        assert_eq!(stats.cache_misses, 4);
        assert_eq!(stats.cache_evictions, 2);
        assert_eq!(stats.transitions, 4);
        assert_eq!(session.controller().cache().lru_order(), ["C", "A"]);
        Ok(())
    }

    #[test]
    fn auto_sync_applies_to_deck_copy() -> anyhow::Result<()> {
        let mut session = session()?;
        session.play_playlist("rotation")?;

        // C (140) was synced against B (124) on its way onto the deck, then A
        // (120) against the synced C (132)
        assert_eq!(session.mixer().active_track().unwrap().bpm(), 126);
        assert_eq!(session.library().find("C").unwrap().bpm(), 140);
        Ok(())
    }

    #[test]
    fn unknown_and_empty_playlists() -> anyhow::Result<()> {
        let mut session = session()?;

        assert!(matches!(
            session.play_playlist("nope"),
            Err(ServiceError::PlaylistNotFound(_))
        ));
        assert!(matches!(
            session.play_playlist("broken"),
            Err(ServiceError::EmptyPlaylist(_))
        ));
        Ok(())
    }

    #[test]
    fn skipped_titles_are_left_out() -> anyhow::Result<()> {
        let mut session = session()?;

        // only the first "A" of A, B, A goes
        let stats = session
            .play_playlist_skipping("warmup", &["A".into(), "Z".into()])?
            .stats;

        assert_eq!(stats.tracks_processed, 2);
        assert_eq!(stats.cache_misses, 2);
        assert_eq!(stats.cache_hits, 0);
        assert_eq!(session.controller().cache().lru_order(), ["B", "A"]);
        Ok(())
    }

    #[test]
    fn skipping_every_title_is_an_empty_playlist() -> anyhow::Result<()> {
        let mut session = session()?;
        let skip = ["A", "B", "C", "A"].map(String::from);

        assert!(matches!(
            session.play_playlist_skipping("rotation", &skip),
            Err(ServiceError::EmptyPlaylist(_))
        ));
        assert_eq!(session.controller().cache().size(), 0);
        Ok(())
    }

    #[test]
    fn missing_tracks_count_as_errors() -> anyhow::Result<()> {
        let mut session = session()?;

        assert!(session.load_track_to_controller("Unknown").is_none());
        assert!(!session.load_track_to_mixer_deck("Unknown"));
        assert_eq!(session.stats().errors, 2);
        Ok(())
    }

    #[test]
    fn play_all_runs_in_name_order() -> anyhow::Result<()> {
        let mut session = session()?;

        let summaries = session.play_all();

        let names = summaries.iter().map(|s| s.playlist.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["rotation", "warmup"]);
        // stats restart per playlist
        assert_eq!(summaries[1].stats.tracks_processed, 3);
        Ok(())
    }
}

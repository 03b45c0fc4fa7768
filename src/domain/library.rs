use log::{info, warn};

use crate::{
    config::{ConfigError, TrackRecord},
    domain::{
        mp3::Mp3Track,
        playlist::Playlist,
        track::{AudioTrack, TrackFormat, TrackMetadata},
        wav::WavTrack,
    },
};

const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Owner of the canonical track instances.
///
/// Everything downstream (cache, decks) works on duplicates of these.
#[derive(Debug, Default)]
pub struct Library {
    tracks: Vec<Box<dyn AudioTrack>>,
}

impl Library {
    pub fn from_records(records: &[TrackRecord]) -> Result<Self, ConfigError> {
        let tracks = records
            .iter()
            .map(build_track)
            .collect::<Result<Vec<_>, _>>()?;
        info!("Track library built: {} tracks loaded", tracks.len());
        Ok(Self { tracks })
    }

    pub fn find(&self, title: &str) -> Option<&dyn AudioTrack> {
        self.tracks
            .iter()
            .find(|t| t.title() == title)
            .map(|t| t.as_ref())
    }

    pub fn tracks(&self) -> impl Iterator<Item = &dyn AudioTrack> {
        self.tracks.iter().map(|t| t.as_ref())
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Builds a playlist from 1-based library indices.
    ///
    /// Indices that do not point into the library are skipped.
    pub fn playlist_from_indices(&self, name: &str, indices: &[usize]) -> Playlist {
        let mut playlist = Playlist::new(name);
        for &index in indices {
            match index.checked_sub(1).and_then(|i| self.tracks.get(i)) {
                Some(track) => playlist.add(track.title()),
                None => warn!("playlist '{name}': track index {index} is out of range, skipping"),
            }
        }
        playlist
    }
}

fn build_track(record: &TrackRecord) -> Result<Box<dyn AudioTrack>, ConfigError> {
    let artists = if record.artists.is_empty() {
        vec![UNKNOWN_ARTIST.to_string()]
    } else {
        record.artists.clone()
    };
    let meta = TrackMetadata::new(record.title.clone(), artists, record.duration, record.bpm);

    let track: Box<dyn AudioTrack> = match record.format {
        TrackFormat::Mp3 => {
            let bitrate = record.require(record.bitrate, "bitrate")?;
            Box::new(Mp3Track::new(meta, bitrate, record.has_tags))
        }
        TrackFormat::Wav => {
            let sample_rate = record.require(record.sample_rate, "sample_rate")?;
            let bit_depth = record.require(record.bit_depth, "bit_depth")?;
            Box::new(WavTrack::new(meta, sample_rate, bit_depth))
        }
    };
    Ok(track)
}

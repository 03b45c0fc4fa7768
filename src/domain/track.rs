use std::fmt::{self, Debug, Display};

use serde::Deserialize;

use super::{
    error::TrackError,
    waveform::{DEFAULT_WAVEFORM_SAMPLES, Waveform},
};

/// Format family of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackFormat {
    /// lossy, bitrate-driven (MP3)
    Mp3,
    /// uncompressed PCM (WAV)
    Wav,
}

impl Display for TrackFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackFormat::Mp3 => write!(f, "MP3"),
            TrackFormat::Wav => write!(f, "WAV"),
        }
    }
}

/// Metadata shared by every track format.
///
/// The title is the identity key used by the cache. It cannot be changed after
/// construction; BPM is the only field the mixer is allowed to adjust.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMetadata {
    title: String,
    artists: Vec<String>,
    duration_secs: u32,
    bpm: u32,
    waveform: Waveform,
}

impl TrackMetadata {
    pub fn new(title: impl Into<String>, artists: Vec<String>, duration_secs: u32, bpm: u32) -> Self {
        Self::with_waveform_samples(title, artists, duration_secs, bpm, DEFAULT_WAVEFORM_SAMPLES)
    }

    pub fn with_waveform_samples(
        title: impl Into<String>,
        artists: Vec<String>,
        duration_secs: u32,
        bpm: u32,
        samples: usize,
    ) -> Self {
        let title = title.into();
        let waveform = Waveform::synthesize(&title, samples);
        Self {
            title,
            artists,
            duration_secs,
            bpm,
            waveform,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artists(&self) -> &[String] {
        &self.artists
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    pub fn set_bpm(&mut self, bpm: u32) {
        self.bpm = bpm;
    }

    pub fn waveform(&self) -> &Waveform {
        &self.waveform
    }

    /// estimated number of beats over the whole track
    pub fn estimated_beats(&self) -> f64 {
        self.duration_secs as f64 / 60.0 * self.bpm as f64
    }
}

/// Result of the simulated beat grid analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatGrid {
    pub estimated_beats: f64,
    pub precision_factor: f64,
}

/// A track in the DJ pipeline.
///
/// Implementations are owned through `Box<dyn AudioTrack>` and are never
/// shared: whenever a track crosses an ownership boundary (library to cache,
/// cache to deck) the receiver gets its own copy from [`AudioTrack::duplicate`].
pub trait AudioTrack: Debug {
    fn metadata(&self) -> &TrackMetadata;

    fn metadata_mut(&mut self) -> &mut TrackMetadata;

    fn format(&self) -> TrackFormat;

    /// Format specific preparation, run once when a copy is taken into the
    /// cache or onto a deck. Must not change the title or BPM.
    fn prepare(&mut self);

    /// Beat grid analysis. Always runs after [`AudioTrack::prepare`].
    fn analyze(&mut self);

    fn is_prepared(&self) -> bool;

    fn beat_grid(&self) -> Option<BeatGrid>;

    /// Quality score in `[0, 100]` derived from the format parameters
    fn quality_score(&self) -> f64;

    /// Deep copy with its own metadata and waveform buffer
    fn duplicate(&self) -> Result<Box<dyn AudioTrack>, TrackError>;

    fn title(&self) -> &str {
        self.metadata().title()
    }

    fn bpm(&self) -> u32 {
        self.metadata().bpm()
    }

    fn set_bpm(&mut self, bpm: u32) {
        self.metadata_mut().set_bpm(bpm);
    }
}

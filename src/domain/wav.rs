use log::{debug, info};

use super::{
    error::TrackError,
    track::{AudioTrack, BeatGrid, TrackFormat, TrackMetadata},
};

/// Uncompressed track (WAV)
#[derive(Debug, Clone)]
pub struct WavTrack {
    meta: TrackMetadata,
    /// Hz: 44100 (CD), 48000, 96000+
    sample_rate: u32,
    /// bits per sample: 16, 24, 32
    bit_depth: u32,
    prepared: bool,
    beat_grid: Option<BeatGrid>,
}

impl WavTrack {
    pub fn new(meta: TrackMetadata, sample_rate: u32, bit_depth: u32) -> Self {
        debug!(
            "WAV track created: \"{}\" {sample_rate}Hz/{bit_depth}bit",
            meta.title()
        );
        Self {
            meta,
            sample_rate,
            bit_depth,
            prepared: false,
            beat_grid: None,
        }
    }

    /// stereo PCM size in bytes, saturating at `u64::MAX`
    pub fn estimated_file_size(&self) -> u64 {
        u64::from(self.meta.duration_secs())
            .saturating_mul(u64::from(self.sample_rate))
            .saturating_mul(u64::from(self.bit_depth / 8))
            .saturating_mul(2)
    }
}

impl AudioTrack for WavTrack {
    fn metadata(&self) -> &TrackMetadata {
        &self.meta
    }

    fn metadata_mut(&mut self) -> &mut TrackMetadata {
        &mut self.meta
    }

    fn format(&self) -> TrackFormat {
        TrackFormat::Wav
    }

    fn prepare(&mut self) {
        info!(
            "Loading WAV \"{}\" at {}Hz/{}bit (uncompressed), estimated size {} bytes",
            self.meta.title(),
            self.sample_rate,
            self.bit_depth,
            self.estimated_file_size()
        );
        self.prepared = true;
    }

    fn analyze(&mut self) {
        let grid = BeatGrid {
            estimated_beats: self.meta.estimated_beats(),
            precision_factor: 1.0,
        };
        info!(
            "Beat grid for \"{}\": {} beats, precision factor 1 (uncompressed audio)",
            self.meta.title(),
            grid.estimated_beats
        );
        self.beat_grid = Some(grid);
    }

    fn is_prepared(&self) -> bool {
        self.prepared
    }

    fn beat_grid(&self) -> Option<BeatGrid> {
        self.beat_grid
    }

    fn quality_score(&self) -> f64 {
        let mut score = 70.0;
        if self.sample_rate >= 44_100 {
            score += 10.0;
        }
        if self.sample_rate >= 96_000 {
            score += 5.0;
        }
        if self.bit_depth >= 16 {
            score += 10.0;
        }
        if self.bit_depth >= 24 {
            score += 5.0;
        }
        score
    }

    fn duplicate(&self) -> Result<Box<dyn AudioTrack>, TrackError> {
        Ok(Box::new(self.clone()))
    }
}

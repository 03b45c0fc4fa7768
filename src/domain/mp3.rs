use log::{debug, info};

use super::{
    error::TrackError,
    track::{AudioTrack, BeatGrid, TrackFormat, TrackMetadata},
};

const REFERENCE_BITRATE: f64 = 320.0;
const LOW_BITRATE: u32 = 128;

/// Compressed track (MP3)
#[derive(Debug, Clone)]
pub struct Mp3Track {
    meta: TrackMetadata,
    /// kbps: 128, 192, 320...
    bitrate: u32,
    has_id3_tags: bool,
    prepared: bool,
    beat_grid: Option<BeatGrid>,
}

impl Mp3Track {
    pub fn new(meta: TrackMetadata, bitrate: u32, has_id3_tags: bool) -> Self {
        debug!("MP3 track created: \"{}\" {bitrate} kbps", meta.title());
        Self {
            meta,
            bitrate,
            has_id3_tags,
            prepared: false,
            beat_grid: None,
        }
    }

    fn precision_factor(&self) -> f64 {
        self.bitrate as f64 / REFERENCE_BITRATE
    }
}

impl AudioTrack for Mp3Track {
    fn metadata(&self) -> &TrackMetadata {
        &self.meta
    }

    fn metadata_mut(&mut self) -> &mut TrackMetadata {
        &mut self.meta
    }

    fn format(&self) -> TrackFormat {
        TrackFormat::Mp3
    }

    fn prepare(&mut self) {
        info!(
            "Loading MP3 \"{}\" at {} kbps",
            self.meta.title(),
            self.bitrate
        );
        if self.has_id3_tags {
            debug!("processing ID3 metadata for \"{}\"", self.meta.title());
        } else {
            debug!("no ID3 tags found for \"{}\"", self.meta.title());
        }
        self.prepared = true;
    }

    fn analyze(&mut self) {
        let grid = BeatGrid {
            // compressed analysis only resolves whole beats
            estimated_beats: self.meta.estimated_beats().trunc(),
            precision_factor: self.precision_factor(),
        };
        info!(
            "Beat grid for \"{}\": {} beats, compression precision factor {:.3}",
            self.meta.title(),
            grid.estimated_beats,
            grid.precision_factor
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
        let mut score = self.precision_factor() * 100.0;
        if self.has_id3_tags {
            score += 5.0;
        }
        if self.bitrate < LOW_BITRATE {
            score -= 10.0;
        }
        score.clamp(0.0, 100.0)
    }

    fn duplicate(&self) -> Result<Box<dyn AudioTrack>, TrackError> {
        Ok(Box::new(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mp3(bitrate: u32, tags: bool) -> Mp3Track {
        Mp3Track::new(
            TrackMetadata::new("Sunset Lover", vec!["Petit Biscuit".into()], 180, 120),
            bitrate,
            tags,
        )
    }

    #[test]
    fn quality_score_from_bitrate() {
        assert_eq!(mp3(320, false).quality_score(), 100.0);
        assert_eq!(mp3(320, true).quality_score(), 100.0);
        assert_eq!(mp3(160, true).quality_score(), 55.0);
        // low bitrate penalty
        assert_eq!(mp3(64, false).quality_score(), 10.0);
        assert_eq!(mp3(0, false).quality_score(), 0.0);
    }

    #[test]
    fn analyze_records_beat_grid() {
        let mut track = mp3(160, true);
        assert!(track.beat_grid().is_none());

        track.prepare();
        track.analyze();

        let grid = track.beat_grid().unwrap();
        assert_eq!(grid.estimated_beats, 360.0);
        assert_eq!(grid.precision_factor, 0.5);
        assert_eq!(track.bpm(), 120);
        assert_eq!(track.title(), "Sunset Lover");
    }

    #[test]
    fn duplicate_is_independent() {
        let original = mp3(256, true);
        let mut copy = original.duplicate().unwrap();

        copy.set_bpm(90);

        assert_eq!(original.bpm(), 120);
        assert_eq!(copy.bpm(), 90);
        assert_eq!(copy.format(), TrackFormat::Mp3);
        assert_eq!(copy.quality_score(), original.quality_score());
        assert_eq!(copy.metadata().waveform(), original.metadata().waveform());
    }

    #[test]
    fn duplicate_carries_analysis() {
        let mut original = mp3(256, true);
        original.prepare();
        original.analyze();

        let copy = original.duplicate().unwrap();
        assert!(copy.is_prepared());
        assert_eq!(copy.beat_grid(), original.beat_grid());
    }
}

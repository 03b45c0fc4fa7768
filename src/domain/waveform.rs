//! Simulated waveform payload.
//!
//! Nothing is decoded; samples are derived from the track title instead. The
//! blake3 extendable output of the title is read 8 bytes per sample and
//! mapped into `[-1.0, 1.0)`. The same title always yields the same buffer.

pub const DEFAULT_WAVEFORM_SAMPLES: usize = 1000;

/// Fixed-size buffer of analysis samples.
///
/// The length is set at construction and never changes. `Clone` copies the
/// samples, so two tracks never share a buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform(Vec<f64>);

impl Waveform {
    pub fn synthesize(seed: &str, samples: usize) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(seed.as_bytes());
        let mut reader = hasher.finalize_xof();

        let mut bytes = [0u8; 8];
        let data = (0..samples)
            .map(|_| {
                reader.fill(&mut bytes);
                // top 53 bits give a uniform value in [0, 1)
                let unit = (u64::from_le_bytes(bytes) >> 11) as f64 / (1u64 << 53) as f64;
                unit * 2.0 - 1.0
            })
            .collect();

        Self(data)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn samples(&self) -> &[f64] {
        &self.0
    }

    /// copies the first `count` samples, or `None` if the buffer is shorter
    pub fn copy_prefix(&self, count: usize) -> Option<Vec<f64>> {
        self.0.get(..count).map(|s| s.to_vec())
    }
}

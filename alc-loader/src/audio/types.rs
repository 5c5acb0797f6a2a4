//! Decoded audio buffer types

use std::ops::Deref;

/// Decoded 16 kHz mono waveform for one recording.
///
/// Never mutated after creation. Truncation produces a new buffer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Waveform {
    samples: Vec<f32>,
}

impl Waveform {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    /// Copy of the first `k` samples, or of the whole buffer if it is shorter.
    pub fn truncated(&self, k: usize) -> Waveform {
        let end = k.min(self.samples.len());
        Waveform::new(self.samples[..end].to_vec())
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

impl Deref for Waveform {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.samples
    }
}

impl From<Vec<f32>> for Waveform {
    fn from(samples: Vec<f32>) -> Self {
        Self::new(samples)
    }
}

/// Raw decoder output before downmix/resample.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Source sample rate
    pub sample_rate: u32,
    /// Source channel count
    pub channels: u16,
}

impl DecodedAudio {
    /// Downmix to mono by averaging channels.
    pub fn to_mono(&self) -> Vec<f32> {
        if self.channels <= 1 {
            return self.samples.clone();
        }

        self.samples
            .chunks_exact(self.channels as usize)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    }
}

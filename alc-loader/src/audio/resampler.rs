//! Audio resampling using rubato
//!
//! Converts decoded mono audio to the fixed 16 kHz corpus rate.

use crate::error::{Error, Result};
use rubato::{FastFixedIn, PolynomialDegree, Resampler as RubatoResampler};
use tracing::debug;

/// Sample rate of every waveform handed to callers
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Upper bound on zero-input flush calls for one file
const MAX_FLUSHES: usize = 64;

/// Mono resampler using rubato's polynomial interpolator.
pub struct Resampler;

impl Resampler {
    /// Resample mono audio to [`TARGET_SAMPLE_RATE`].
    ///
    /// Returns a copy without resampling if the input is already at the
    /// target rate.
    pub fn resample(input: &[f32], input_rate: u32) -> Result<Vec<f32>> {
        Self::resample_to(input, input_rate, TARGET_SAMPLE_RATE)
    }

    /// Resample mono audio between arbitrary rates.
    pub fn resample_to(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
        if input_rate == 0 {
            return Err(Error::Decode("Input sample rate is zero".to_string()));
        }

        if input_rate == output_rate {
            debug!("Sample rate already at {}Hz, skipping resample", output_rate);
            return Ok(input.to_vec());
        }

        if input.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Resampling {} frames from {}Hz to {}Hz", input.len(), input_rate, output_rate);

        let ratio = output_rate as f64 / input_rate as f64;
        let expected = ((input.len() as f64 * ratio).round() as usize).max(1);

        // Whole file in a single chunk
        let mut resampler = FastFixedIn::<f32>::new(
            ratio,
            1.0, // no runtime ratio changes
            PolynomialDegree::Septic,
            input.len(),
            1,
        )
        .map_err(|e| Error::Decode(format!("Failed to create resampler: {}", e)))?;
        let delay = resampler.output_delay();

        let mut output = resampler
            .process(&[input], None)
            .map_err(|e| Error::Decode(format!("Resampling failed: {}", e)))?
            .pop()
            .unwrap_or_default();

        // Flush the filter tail so the last input frames reach the output
        let mut flushes = 0;
        while output.len() < delay + expected && flushes < MAX_FLUSHES {
            let tail = resampler
                .process_partial(None::<&[Vec<f32>]>, None)
                .map_err(|e| Error::Decode(format!("Resampler flush failed: {}", e)))?;
            output.extend(tail.into_iter().next().unwrap_or_default());
            flushes += 1;
        }

        // Drop the warm-up frames, then pin the length to the rate ratio
        output.drain(..delay.min(output.len()));
        output.resize(expected, 0.0);

        debug!("Resampled {} input frames to {} output frames", input.len(), output.len());

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resample_same_rate() {
        let input = vec![0.1, 0.2, 0.3, 0.4];
        let output = Resampler::resample(&input, TARGET_SAMPLE_RATE).unwrap();

        // Should return copy when already at target rate
        assert_eq!(output, input);
    }

    #[test]
    fn test_resample_empty() {
        let output = Resampler::resample(&[], 44100).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_resample_zero_rate_rejected() {
        assert!(Resampler::resample(&[0.0; 8], 0).is_err());
    }

    #[test]
    fn test_resample_downsample_length() {
        // 0.5s of 440 Hz at 48kHz
        let input_rate = 48000;
        let frames = 24000;
        let input: Vec<f32> = (0..frames)
            .map(|i| {
                let t = i as f32 / input_rate as f32;
                (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
            })
            .collect();

        let output = Resampler::resample(&input, input_rate).unwrap();

        assert_eq!(output.len(), frames * 16000 / input_rate as usize);
    }

    #[test]
    fn test_resample_length_follows_ratio() {
        assert_eq!(Resampler::resample(&vec![0.25; 4410], 44100).unwrap().len(), 1600);
        assert_eq!(Resampler::resample(&vec![0.25; 8000], 8000).unwrap().len(), 16000);
    }

    #[test]
    fn test_resample_single_frame_not_lost() {
        let output = Resampler::resample(&[0.5], 44100).unwrap();
        assert_eq!(output.len(), 1);
    }

    #[test]
    fn test_upsampled_constant_has_no_warmup_silence() {
        let output = Resampler::resample(&vec![0.5; 8000], 8000).unwrap();
        // Away from both edges, a constant input stays constant
        for (i, &s) in output.iter().enumerate().take(15000).skip(16) {
            assert!((s - 0.5).abs() < 0.05, "sample {} = {}", i, s);
        }
    }
}

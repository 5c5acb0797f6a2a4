//! Audio Test File Generation Utilities
//!
//! Generates small WAV files with known sample counts so decoded lengths can
//! be asserted exactly.

use hound::{WavSpec, WavWriter};
use std::f32::consts::PI;
use std::path::Path;

/// Write a 16-bit PCM ramp: frame `i` holds `(i + 1) * 256` on every channel.
///
/// A ramp makes ordering mistakes visible in the decoded values.
pub fn generate_ramp_wav<P: AsRef<Path>>(
    path: P,
    frames: usize,
    sample_rate: u32,
    channels: u16,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for i in 0..frames {
        let value = (((i + 1) * 256) % 32768) as i16;
        for _ in 0..channels {
            writer.write_sample(value)?;
        }
    }
    writer.finalize()?;
    Ok(())
}

/// Write a 16-bit PCM sine wave.
///
/// # Arguments
/// * `path` - Output file path
/// * `frames` - Number of sample frames
/// * `sample_rate` - Rate in Hz
/// * `channels` - Channel count (same signal on every channel)
/// * `frequency_hz` - Sine frequency
pub fn generate_sine_wav<P: AsRef<Path>>(
    path: P,
    frames: usize,
    sample_rate: u32,
    channels: u16,
    frequency_hz: f32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let value = ((2.0 * PI * frequency_hz * t).sin() * 0.5 * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(value)?;
        }
    }
    writer.finalize()?;
    Ok(())
}

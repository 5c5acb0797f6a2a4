//! Audio decoder using symphonia
//!
//! Decodes a whole recording into memory, downmixes it to mono and resamples
//! it to [`TARGET_SAMPLE_RATE`]. Formats are whatever symphonia's probe
//! recognizes with the enabled features (WAV/PCM, FLAC, MP3, AAC, Vorbis).

use crate::audio::resampler::{Resampler, TARGET_SAMPLE_RATE};
use crate::audio::types::{DecodedAudio, Waveform};
use crate::error::{Error, Result};
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::IntoSample;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Turns a file on disk into a 16 kHz mono waveform.
///
/// Implementations are shared by every worker in the decode pool, so they
/// must be `Send + Sync` and must not hold per-file state between calls.
pub trait AudioDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<Waveform>;
}

/// Production decoder backed by symphonia + rubato.
#[derive(Debug, Clone, Copy)]
pub struct SymphoniaDecoder {
    target_rate: u32,
}

impl Default for SymphoniaDecoder {
    fn default() -> Self {
        Self {
            target_rate: TARGET_SAMPLE_RATE,
        }
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, path: &Path) -> Result<Waveform> {
        let decoded = Self::decode_file(path)?;
        let mono = decoded.to_mono();
        let samples = Resampler::resample_to(&mono, decoded.sample_rate, self.target_rate)?;
        Ok(Waveform::new(samples))
    }
}

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode entire audio file to interleaved PCM samples.
    ///
    /// # Returns
    /// Samples normalized to [-1.0, 1.0] at the source rate and channel count.
    ///
    /// # Errors
    /// - Failed to open file
    /// - Unsupported audio format
    /// - Corrupt stream
    pub fn decode_file(path: &Path) -> Result<DecodedAudio> {
        debug!("Decoding entire file: {}", path.display());

        let file = std::fs::File::open(path)
            .map_err(|e| Error::Decode(format!("Failed to open file {}: {}", path.display(), e)))?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Create a hint to help the format registry guess the format
        let mut hint = Hint::new();
        if let Some(ext_str) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext_str);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| Error::Decode(format!("Failed to probe {}: {}", path.display(), e)))?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| Error::Decode(format!("No audio track in {}", path.display())))?;

        let track_id = track.id;

        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| Error::Decode("Sample rate not found".to_string()))?;

        // Some containers omit the channel layout; the first decoded buffer
        // carries it, so fall back to that.
        let mut channels = track.codec_params.channels.map(|c| c.count() as u16);

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| Error::Decode(format!("Failed to create decoder: {}", e)))?;

        let mut samples = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    return Err(Error::Decode(format!(
                        "Error reading packet from {}: {}",
                        path.display(),
                        e
                    )));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    if channels.is_none() {
                        channels = Some(decoded.spec().channels.count() as u16);
                    }
                    append_interleaved(&decoded, &mut samples);
                }
                // Recoverable: skip the corrupt packet
                Err(symphonia::core::errors::Error::DecodeError(e)) => {
                    warn!("Skipping undecodable packet in {}: {}", path.display(), e);
                    continue;
                }
                Err(e) => {
                    return Err(Error::Decode(format!(
                        "Decode failed for {}: {}",
                        path.display(),
                        e
                    )));
                }
            }
        }

        let channels = channels.unwrap_or(1).max(1);

        debug!(
            "Decoded {} samples ({} frames, {}Hz, {} ch)",
            samples.len(),
            samples.len() / channels as usize,
            sample_rate,
            channels
        );

        Ok(DecodedAudio {
            samples,
            sample_rate,
            channels,
        })
    }
}

/// Interleave any symphonia sample buffer into f32 output.
fn append_interleaved(decoded: &AudioBufferRef, output: &mut Vec<f32>) {
    match decoded {
        AudioBufferRef::F32(buf) => interleave(&**buf, output),
        AudioBufferRef::F64(buf) => interleave(&**buf, output),
        AudioBufferRef::S32(buf) => interleave(&**buf, output),
        AudioBufferRef::S24(buf) => interleave(&**buf, output),
        AudioBufferRef::S16(buf) => interleave(&**buf, output),
        AudioBufferRef::S8(buf) => interleave(&**buf, output),
        AudioBufferRef::U32(buf) => interleave(&**buf, output),
        AudioBufferRef::U24(buf) => interleave(&**buf, output),
        AudioBufferRef::U16(buf) => interleave(&**buf, output),
        AudioBufferRef::U8(buf) => interleave(&**buf, output),
    }
}

fn interleave<S>(buf: &symphonia::core::audio::AudioBuffer<S>, output: &mut Vec<f32>)
where
    S: symphonia::core::sample::Sample + IntoSample<f32>,
{
    let num_channels = buf.spec().channels.count();
    let num_frames = buf.frames();
    output.reserve(num_frames * num_channels);

    for frame_idx in 0..num_frames {
        for ch_idx in 0..num_channels {
            output.push(buf.chan(ch_idx)[frame_idx].into_sample());
        }
    }
}

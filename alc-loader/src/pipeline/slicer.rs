//! Fixed-length prefix slicing of decoded waveforms

use crate::audio::Waveform;
use crate::error::{Error, Result};

/// First `k` samples of every waveform, paired with the labels unchanged.
///
/// A waveform shorter than `k` is returned whole; nothing is padded.
///
/// # Errors
/// `LengthMismatch` if the two sequences differ in length.
pub fn slice(waveforms: &[Waveform], labels: &[u8], k: usize) -> Result<(Vec<Waveform>, Vec<u8>)> {
    if waveforms.len() != labels.len() {
        return Err(Error::LengthMismatch {
            waveforms: waveforms.len(),
            labels: labels.len(),
        });
    }

    let sliced = waveforms.iter().map(|w| w.truncated(k)).collect();
    Ok((sliced, labels.to_vec()))
}

//! Result Aggregator
//!
//! Merges the per-worker result maps and projects the merged map back onto
//! the caller's ordered identifier list.

use crate::audio::Waveform;
use crate::error::{Error, Result};
use std::collections::HashMap;
use tracing::debug;

/// Union of the per-worker maps.
///
/// Every identifier is consumed by exactly one worker, so keys are expected
/// to be disjoint.
///
/// # Errors
/// `DuplicateResult` if two maps share a key.
pub fn merge<I>(worker_maps: I) -> Result<HashMap<String, Waveform>>
where
    I: IntoIterator<Item = HashMap<String, Waveform>>,
{
    let mut merged = HashMap::new();
    for map in worker_maps {
        merged.reserve(map.len());
        for (file_id, waveform) in map {
            if merged.contains_key(&file_id) {
                return Err(Error::DuplicateResult(file_id));
            }
            merged.insert(file_id, waveform);
        }
    }
    debug!("Merged {} decoded waveform(s)", merged.len());
    Ok(merged)
}

/// Waveforms in `ordered_ids` order, moved out of `merged`.
///
/// # Errors
/// `MissingResult` listing every identifier absent from `merged`. An
/// identifier listed twice counts as missing the second time.
pub fn project(ordered_ids: &[String], mut merged: HashMap<String, Waveform>) -> Result<Vec<Waveform>> {
    let mut waveforms = Vec::with_capacity(ordered_ids.len());
    let mut missing = Vec::new();

    for file_id in ordered_ids {
        match merged.remove(file_id) {
            Some(waveform) => waveforms.push(waveform),
            None => missing.push(file_id.clone()),
        }
    }

    if !missing.is_empty() {
        return Err(Error::MissingResult {
            missing,
            failures: Vec::new(),
        });
    }

    Ok(waveforms)
}

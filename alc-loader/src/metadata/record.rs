//! Metadata rows and the file-name/label rules applied to them

use crate::error::{Error, Result};

/// Character written over the variant position of every file name
pub const VARIANT_MARKER: char = 'm';

/// Position of the variant character, counted from the end of the name
pub const VARIANT_OFFSET_FROM_END: usize = 8;

/// Raw user-state code marking an intoxicated speaker
pub const INTOXICATED_CODE: &str = "I";

/// One parsed table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    /// Normalized identifier, relative to the data directory
    pub file_id: String,
    /// BAC value as written in the table
    pub bac: String,
    /// Raw user-state code (`I` or `NI`)
    pub user_state: String,
    /// 1 if intoxicated, else 0
    pub label: u8,
    /// Recording session (first path component of `file_id`)
    pub session: String,
}

impl MetadataRecord {
    /// Build a record from the first three table fields.
    pub fn from_fields(file_name: &str, bac: &str, user_state: &str) -> Result<Self> {
        let file_id = normalize_file_name(file_name)?;
        let session = session_of(&file_id).to_string();
        let user_state = user_state.trim().to_string();

        Ok(Self {
            label: derive_label(&user_state),
            file_id,
            bac: bac.trim().to_string(),
            user_state,
            session,
        })
    }
}

/// Normalize a table file name into a file identifier.
///
/// Drops everything up to and including the first `/`, lower-cases the rest
/// and overwrites the 8th character from the end with [`VARIANT_MARKER`].
///
/// `"BLOCK30/SES3034/0303034001_h_00.WAV"` becomes
/// `"ses3034/0303034001_m_00.wav"`.
pub fn normalize_file_name(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let stripped = match raw.find('/') {
        Some(idx) => &raw[idx + 1..],
        None => raw,
    };

    let mut chars: Vec<char> = stripped.to_lowercase().chars().collect();
    if chars.len() < VARIANT_OFFSET_FROM_END {
        return Err(Error::Metadata(format!(
            "File name '{}' is too short to carry a variant marker",
            raw
        )));
    }

    let idx = chars.len() - VARIANT_OFFSET_FROM_END;
    chars[idx] = VARIANT_MARKER;
    Ok(chars.into_iter().collect())
}

/// Session directory of a normalized identifier, empty if it has none.
pub fn session_of(file_id: &str) -> &str {
    file_id.split_once('/').map(|(session, _)| session).unwrap_or("")
}

pub fn derive_label(user_state: &str) -> u8 {
    u8::from(user_state == INTOXICATED_CODE)
}

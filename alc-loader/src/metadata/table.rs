//! Tab-separated split tables
//!
//! Tables have no header row. Only the leading fifth of each table is read:
//! with `total` lines in the file, the first `total / 5` rows are parsed and
//! the rest of the file is ignored. Blank lines inside that window are
//! skipped and do not count as rows.

use crate::error::{Error, Result};
use crate::metadata::record::MetadataRecord;
use crate::metadata::split::Split;
use std::path::Path;
use tracing::debug;

/// Fields kept from every row: file_name, bac, user_state
const KEPT_FIELDS: usize = 3;

/// Number of rows read from a table with `total_lines` lines.
pub fn sampled_row_count(total_lines: usize) -> usize {
    total_lines / 5
}

/// Ordered records of one split, in on-disk row order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitTable {
    split: Split,
    records: Vec<MetadataRecord>,
}

impl SplitTable {
    pub fn new(split: Split, records: Vec<MetadataRecord>) -> Self {
        Self { split, records }
    }

    /// Read and parse a table file.
    pub fn load(path: &Path, split: Split) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Metadata(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let table = Self::parse(&content, split, &path.display().to_string())?;

        debug!(
            "Loaded {} table from {}: {} record(s)",
            split,
            path.display(),
            table.len()
        );

        Ok(table)
    }

    /// Parse table text. `source` names the table in error messages.
    pub fn parse(content: &str, split: Split, source: &str) -> Result<Self> {
        let total_lines = content.lines().count();
        let wanted = sampled_row_count(total_lines);

        let mut records = Vec::with_capacity(wanted);
        for (line_idx, line) in content.lines().enumerate() {
            if records.len() == wanted {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < KEPT_FIELDS {
                return Err(Error::Metadata(format!(
                    "{}:{}: expected {} tab-separated fields, found {}",
                    source,
                    line_idx + 1,
                    split.field_count(),
                    fields.len()
                )));
            }

            let record = MetadataRecord::from_fields(fields[0], fields[1], fields[2])
                .map_err(|e| match e {
                    Error::Metadata(msg) => {
                        Error::Metadata(format!("{}:{}: {}", source, line_idx + 1, msg))
                    }
                    other => other,
                })?;
            records.push(record);
        }

        Ok(Self { split, records })
    }

    pub fn split(&self) -> Split {
        self.split
    }

    pub fn records(&self) -> &[MetadataRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetadataRecord> {
        self.records.iter()
    }

    /// File identifiers in row order.
    pub fn file_ids(&self) -> Vec<String> {
        self.records.iter().map(|r| r.file_id.clone()).collect()
    }

    /// Binary labels in row order.
    pub fn labels(&self) -> Vec<u8> {
        self.records.iter().map(|r| r.label).collect()
    }
}

impl<'a> IntoIterator for &'a SplitTable {
    type Item = &'a MetadataRecord;
    type IntoIter = std::slice::Iter<'a, MetadataRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

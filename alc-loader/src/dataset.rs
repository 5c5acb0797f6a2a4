//! ALC corpus dataset
//!
//! Opens a corpus checkout, loads its four split tables, and decodes a split
//! into waveforms in table order.

use crate::audio::{AudioDecoder, SymphoniaDecoder, Waveform};
use crate::error::{Error, Result};
use crate::metadata::{DatasetLayout, Split, SplitTable};
use crate::pipeline::{self, CompletionReport, DecoderPool, PoolConfig};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// A split decoded in table order.
#[derive(Debug)]
pub struct LoadedSplit {
    /// The i-th waveform belongs to the i-th table row
    pub waveforms: Vec<Waveform>,
    pub table: SplitTable,
    pub report: CompletionReport,
}

impl LoadedSplit {
    pub fn len(&self) -> usize {
        self.waveforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waveforms.is_empty()
    }

    /// Total sample count, with each waveform capped at `limit` samples
    /// when given. Counts what [`AlcDataset::slice`] would keep without
    /// building the slices.
    pub fn total_samples(&self, limit: Option<usize>) -> usize {
        let limit = limit.unwrap_or(usize::MAX);
        self.waveforms.iter().map(|w| w.len().min(limit)).sum()
    }
}

/// A split decoded without the strict ordering step: whatever succeeded,
/// plus the report of what did not.
#[derive(Debug)]
pub struct SplitDecode {
    pub decoded: HashMap<String, Waveform>,
    pub report: CompletionReport,
}

/// Corpus handle with all split tables loaded.
#[derive(Debug, Clone)]
pub struct AlcDataset {
    layout: DatasetLayout,
    tables: BTreeMap<Split, SplitTable>,
}

impl AlcDataset {
    /// Open the corpus at `root` and parse all four split tables.
    ///
    /// # Errors
    /// - `DatasetRootNotFound` if `root` does not exist
    /// - `Metadata` if any table is missing or malformed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            return Err(Error::DatasetRootNotFound(root));
        }

        let layout = DatasetLayout::new(root);
        let mut tables = BTreeMap::new();
        for split in Split::ALL {
            let table = SplitTable::load(&layout.table_path(split), split)?;
            tables.insert(split, table);
        }

        info!(
            "Opened dataset at {} (train={}, dev1={}, dev2={}, test={})",
            layout.root().display(),
            tables[&Split::Train].len(),
            tables[&Split::Dev1].len(),
            tables[&Split::Dev2].len(),
            tables[&Split::Test].len()
        );

        Ok(Self { layout, tables })
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    pub fn table(&self, split: Split) -> &SplitTable {
        // Every split is inserted by `open`
        &self.tables[&split]
    }

    /// Decode a split with the default pool (4 workers, symphonia decoder).
    ///
    /// `split_name` is case-insensitive: train, dev1, dev2 or test.
    pub fn load_split(&self, split_name: &str) -> Result<LoadedSplit> {
        let split: Split = split_name.parse()?;
        let decoder: Arc<dyn AudioDecoder> = Arc::new(SymphoniaDecoder::new());
        let pool = DecoderPool::new(PoolConfig::default(), decoder)?;
        self.load_split_with(split, &pool)
    }

    /// Decode a split and return waveforms in table order.
    ///
    /// # Errors
    /// `MissingResult` if any row has no decoded waveform; the error carries
    /// the recorded decode failures.
    pub fn load_split_with(&self, split: Split, pool: &DecoderPool) -> Result<LoadedSplit> {
        let SplitDecode { decoded, report } = self.decode_split(split, pool)?;
        let table = self.table(split).clone();

        let waveforms = pipeline::project(&table.file_ids(), decoded).map_err(|e| match e {
            Error::MissingResult { missing, .. } => Error::MissingResult {
                missing,
                failures: report.failures.clone(),
            },
            other => other,
        })?;

        Ok(LoadedSplit {
            waveforms,
            table,
            report,
        })
    }

    /// Decode a split, keeping partial results instead of failing on the
    /// first missing recording.
    pub fn decode_split(&self, split: Split, pool: &DecoderPool) -> Result<SplitDecode> {
        let file_ids = self.table(split).file_ids();
        info!("Loading {} split: {} file(s)", split, file_ids.len());

        let outcome = pool.decode_all(&self.layout.data_dir(), &file_ids)?;
        let decoded = pipeline::merge(outcome.worker_maps)?;

        Ok(SplitDecode {
            decoded,
            report: outcome.report,
        })
    }

    /// First `k` samples of every waveform plus the split's labels.
    pub fn slice(&self, loaded: &LoadedSplit, k: usize) -> Result<(Vec<Waveform>, Vec<u8>)> {
        pipeline::slice(&loaded.waveforms, &loaded.table.labels(), k)
    }
}

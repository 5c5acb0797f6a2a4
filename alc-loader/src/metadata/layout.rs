//! Fixed on-disk layout of the corpus

use crate::metadata::split::Split;
use std::path::{Path, PathBuf};

/// Directory (relative to the dataset root) holding the metadata tables
pub const DOC_DIR: &str = "alc_original/DOC/IS2011CHALLENGE";

/// Directory (relative to the dataset root) that file identifiers resolve against
pub const DATA_DIR: &str = "alc_original";

pub const TRAIN_TABLE: &str = "TRAIN.TBL";
pub const DEV1_TABLE: &str = "D1.TBL";
pub const DEV2_TABLE: &str = "D2.TBL";
pub const TEST_TABLE: &str = "TESTMAPPING.txt";

/// Paths of one corpus checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn doc_dir(&self) -> PathBuf {
        self.root.join(DOC_DIR)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    pub fn table_path(&self, split: Split) -> PathBuf {
        let name = match split {
            Split::Train => TRAIN_TABLE,
            Split::Dev1 => DEV1_TABLE,
            Split::Dev2 => DEV2_TABLE,
            Split::Test => TEST_TABLE,
        };
        self.doc_dir().join(name)
    }

    /// Absolute path of the recording named by `file_id`.
    pub fn audio_path(&self, file_id: &str) -> PathBuf {
        self.data_dir().join(file_id)
    }
}

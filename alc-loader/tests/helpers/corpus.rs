//! Throwaway corpus checkouts
//!
//! Builds the on-disk layout the loader expects (tables under
//! `alc_original/DOC/IS2011CHALLENGE`, audio under `alc_original`) inside a
//! `TempDir`.

use super::audio_generator::generate_ramp_wav;
use alc_loader::metadata::layout::{DATA_DIR, DOC_DIR};
use alc_loader::metadata::{normalize_file_name, DatasetLayout, Split};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One table line.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub file_name: String,
    pub bac: String,
    pub user_state: String,
}

impl TableRow {
    /// Row for session `session`, utterance `n`, headset variant.
    pub fn new(session: u32, n: u32, user_state: &str) -> Self {
        Self {
            file_name: format!("BLOCK{:02}/SES{:04}/{:06}{:04}_h_00.WAV", session / 100, session, session, n),
            bac: if user_state == "I" { "0.00090".to_string() } else { "0.00000".to_string() },
            user_state: user_state.to_string(),
        }
    }

    pub fn file_id(&self) -> String {
        normalize_file_name(&self.file_name).expect("valid test file name")
    }
}

pub struct TestCorpus {
    dir: TempDir,
    rows: BTreeMap<Split, Vec<TableRow>>,
}

impl TestCorpus {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        fs::create_dir_all(dir.path().join(DOC_DIR)).expect("create doc dir");
        fs::create_dir_all(dir.path().join(DATA_DIR)).expect("create data dir");
        Self {
            dir,
            rows: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn layout(&self) -> DatasetLayout {
        DatasetLayout::new(self.root())
    }

    /// Add a table row and write its recording with `frames` samples at 16 kHz.
    pub fn add_recording(&mut self, split: Split, row: TableRow, frames: usize) -> PathBuf {
        let path = self.layout().audio_path(&row.file_id());
        fs::create_dir_all(path.parent().expect("audio path has parent")).expect("create session dir");
        generate_ramp_wav(&path, frames, 16_000, 1).expect("write wav");
        self.add_row(split, row);
        path
    }

    /// Add a table row without any audio file.
    pub fn add_row(&mut self, split: Split, row: TableRow) {
        self.rows.entry(split).or_default().push(row);
    }

    /// Write every table. Each table gets four filler lines per real row so
    /// the leading-fifth sampling reads exactly the rows that were added.
    pub fn write_tables(&self) {
        for split in Split::ALL {
            let rows = self.rows.get(&split).cloned().unwrap_or_default();
            let mut content = String::new();

            for row in &rows {
                content.push_str(&Self::format_row(split, row));
            }
            for i in 0..rows.len() * 4 {
                let filler = TableRow::new(9999, 9000 + i as u32, "NI");
                content.push_str(&Self::format_row(split, &filler));
            }

            fs::write(self.layout().table_path(split), content).expect("write table");
        }
    }

    fn format_row(split: Split, row: &TableRow) -> String {
        match split {
            Split::Test => format!(
                "{}\t{}\t{}\tTEST/{}.WAV\n",
                row.file_name, row.bac, row.user_state, row.file_name.len()
            ),
            _ => format!("{}\t{}\t{}\n", row.file_name, row.bac, row.user_state),
        }
    }
}

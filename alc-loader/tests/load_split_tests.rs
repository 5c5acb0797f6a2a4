//! End-to-end tests: corpus on disk → ordered waveforms + labels
//!
//! Every test builds a throwaway corpus with real WAV files and decodes it
//! through the symphonia-backed pool.

mod helpers;

use alc_loader::pipeline::{DecoderPool, PoolConfig};
use alc_loader::{AlcDataset, Error, Split, SymphoniaDecoder};
use helpers::{TableRow, TestCorpus};
use std::fs;
use std::sync::Arc;

fn pool(threads: usize) -> DecoderPool {
    DecoderPool::new(PoolConfig::with_threads(threads), Arc::new(SymphoniaDecoder::new())).unwrap()
}

#[test]
fn test_three_recordings_load_in_table_order_and_slice() {
    let mut corpus = TestCorpus::new();
    corpus.add_recording(Split::Train, TableRow::new(1006, 1, "I"), 5);
    corpus.add_recording(Split::Train, TableRow::new(1006, 2, "NI"), 3);
    corpus.add_recording(Split::Train, TableRow::new(2011, 1, "I"), 8);
    corpus.write_tables();

    let dataset = AlcDataset::open(corpus.root()).unwrap();
    let loaded = dataset.load_split("train").unwrap();

    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded.table.len(), 3);
    let lengths: Vec<usize> = loaded.waveforms.iter().map(|w| w.len()).collect();
    assert_eq!(lengths, vec![5, 3, 8]);
    assert!(loaded.report.is_complete());

    let (sliced, labels) = dataset.slice(&loaded, 4).unwrap();
    let sliced_lengths: Vec<usize> = sliced.iter().map(|w| w.len()).collect();
    assert_eq!(sliced_lengths, vec![4, 3, 4]);
    assert_eq!(loaded.total_samples(Some(4)), 11);
    assert_eq!(loaded.total_samples(None), 16);
    assert_eq!(labels, vec![1, 0, 1]);
    assert_eq!(sliced[1], loaded.waveforms[1]);
}

#[test]
fn test_order_preserved_across_many_workers() {
    let mut corpus = TestCorpus::new();
    // Varied lengths make row/waveform mix-ups visible
    let lengths: Vec<usize> = (0..40).map(|i| 10 + (i * 7) % 53 + i).collect();
    for (i, &len) in lengths.iter().enumerate() {
        let state = if i % 3 == 0 { "I" } else { "NI" };
        corpus.add_recording(Split::Dev1, TableRow::new(3000 + (i as u32 % 4), i as u32, state), len);
    }
    corpus.write_tables();

    let dataset = AlcDataset::open(corpus.root()).unwrap();
    let loaded = dataset.load_split_with(Split::Dev1, &pool(6)).unwrap();

    let decoded: Vec<usize> = loaded.waveforms.iter().map(|w| w.len()).collect();
    assert_eq!(decoded, lengths);

    for (record, waveform) in loaded.table.iter().zip(&loaded.waveforms) {
        assert!(record.file_id.starts_with(&format!("{}/", record.session)));
        // Ramp fixture: first sample is 256 / 32768
        assert!((waveform[0] - 256.0 / 32768.0).abs() < 1e-6);
    }
}

#[test]
fn test_missing_recording_reports_instead_of_hanging() {
    let mut corpus = TestCorpus::new();
    corpus.add_recording(Split::Train, TableRow::new(1006, 1, "I"), 5);
    let absent = TableRow::new(1006, 2, "NI");
    let absent_id = absent.file_id();
    corpus.add_row(Split::Train, absent);
    corpus.add_recording(Split::Train, TableRow::new(1006, 3, "NI"), 7);
    corpus.write_tables();

    let dataset = AlcDataset::open(corpus.root()).unwrap();
    let err = dataset.load_split_with(Split::Train, &pool(2)).unwrap_err();

    match err {
        Error::MissingResult { missing, failures } => {
            assert_eq!(missing, vec![absent_id.clone()]);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].file_id, absent_id);
        }
        other => panic!("expected MissingResult, got {other}"),
    }
}

#[test]
fn test_decode_split_keeps_partial_results() {
    let mut corpus = TestCorpus::new();
    corpus.add_recording(Split::Test, TableRow::new(4001, 1, "I"), 4);
    corpus.add_row(Split::Test, TableRow::new(4001, 2, "I"));
    corpus.write_tables();

    let dataset = AlcDataset::open(corpus.root()).unwrap();
    let partial = dataset.decode_split(Split::Test, &pool(2)).unwrap();

    assert_eq!(partial.decoded.len(), 1);
    assert_eq!(partial.report.submitted, 2);
    assert_eq!(partial.report.succeeded, 1);
    assert_eq!(partial.report.failures.len(), 1);
}

#[test]
fn test_corrupt_file_is_a_failure_not_a_crash() {
    let mut corpus = TestCorpus::new();
    let path = corpus.add_recording(Split::Dev2, TableRow::new(5001, 1, "NI"), 6);
    corpus.add_recording(Split::Dev2, TableRow::new(5001, 2, "NI"), 6);
    fs::write(&path, b"definitely not a wav file").unwrap();
    corpus.write_tables();

    let dataset = AlcDataset::open(corpus.root()).unwrap();
    let partial = dataset.decode_split(Split::Dev2, &pool(4)).unwrap();

    assert_eq!(partial.report.succeeded, 1);
    assert_eq!(partial.report.failures[0].path, path);
}

#[test]
fn test_split_names_are_case_insensitive() {
    let mut corpus = TestCorpus::new();
    corpus.add_recording(Split::Dev2, TableRow::new(5001, 1, "NI"), 2);
    corpus.write_tables();

    let dataset = AlcDataset::open(corpus.root()).unwrap();
    assert_eq!(dataset.load_split("DEV2").unwrap().len(), 1);
    assert_eq!(dataset.load_split("d2").unwrap().len(), 1);
    assert!(dataset.load_split("Train").unwrap().is_empty());
}

#[test]
fn test_invalid_split_name() {
    let corpus = TestCorpus::new();
    corpus.write_tables();

    let dataset = AlcDataset::open(corpus.root()).unwrap();
    let err = dataset.load_split("holdout").unwrap_err();
    assert!(matches!(err, Error::InvalidSplit(ref s) if s == "holdout"));
}

#[test]
fn test_dataset_root_not_found() {
    let corpus = TestCorpus::new();
    let missing = corpus.root().join("nowhere");

    let err = AlcDataset::open(&missing).unwrap_err();
    assert!(matches!(err, Error::DatasetRootNotFound(ref p) if *p == missing));
}

#[test]
fn test_missing_table_is_metadata_error() {
    let corpus = TestCorpus::new();
    corpus.write_tables();
    fs::remove_file(corpus.layout().table_path(Split::Dev1)).unwrap();

    let err = AlcDataset::open(corpus.root()).unwrap_err();
    assert!(matches!(err, Error::Metadata(_)));
}

#[test]
fn test_tables_loaded_with_labels_and_sessions() {
    let mut corpus = TestCorpus::new();
    corpus.add_row(Split::Test, TableRow::new(4002, 7, "I"));
    corpus.add_row(Split::Test, TableRow::new(4003, 8, "NI"));
    corpus.write_tables();

    let dataset = AlcDataset::open(corpus.root()).unwrap();
    let table = dataset.table(Split::Test);

    assert_eq!(table.labels(), vec![1, 0]);
    assert_eq!(table.records()[0].session, "ses4002");
    assert_eq!(table.records()[1].file_id, "ses4003/0040030008_m_00.wav");
}

//! ALC corpus loader (alc-loader) - Main entry point
//!
//! Decodes one split of the corpus and prints a summary. Useful for
//! checking a corpus checkout and timing the decode pool.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use alc_common::config::{resolve_dataset_root, DATASET_ROOT_ENV};
use alc_common::TomlConfig;
use alc_loader::pipeline::LogProgress;
use alc_loader::{AlcDataset, DecoderPool, PoolConfig, Split, SymphoniaDecoder};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for alc-loader
#[derive(Parser, Debug)]
#[command(name = "alc-loader")]
#[command(about = "Decode a split of the ALC speech corpus")]
#[command(version)]
struct Args {
    /// Corpus root (directory containing alc_original/)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// TOML config file (defaults to the platform config directory)
    #[arg(short, long, env = "ALC_CONFIG")]
    config: Option<PathBuf>,

    /// Split to load: train, dev1, dev2 or test
    #[arg(short, long, default_value = "train")]
    split: String,

    /// Decode worker threads (overrides config)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Give up if the pool has not drained after this many seconds
    #[arg(long)]
    join_timeout_secs: Option<u64>,

    /// Truncate every waveform to this many samples
    #[arg(short = 'k', long)]
    slice: Option<usize>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing(config: &TomlConfig) -> Result<()> {
    let writer = match &config.logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            BoxMakeWriter::new(Arc::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("alc_loader={0},alc_common={0}", config.logging.level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, source) = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    init_tracing(&config)?;
    source.log();

    let root = resolve_dataset_root(args.root.as_deref(), DATASET_ROOT_ENV, &config)
        .context("Failed to resolve dataset root")?;
    let split: Split = args.split.parse()?;

    let mut pool_config = PoolConfig::from(&config.pool);
    if let Some(threads) = args.threads {
        pool_config.num_threads = threads;
    }
    if let Some(secs) = args.join_timeout_secs {
        pool_config.join_timeout = Some(Duration::from_secs(secs));
    }

    info!("Dataset root: {}", root.display());

    let dataset = AlcDataset::open(&root).context("Failed to open dataset")?;
    let pool = DecoderPool::new(pool_config, Arc::new(SymphoniaDecoder::new()))?
        .with_progress(Arc::new(LogProgress::new(100)));

    let loaded = dataset
        .load_split_with(split, &pool)
        .with_context(|| format!("Failed to load {} split", split))?;

    let total_samples = loaded.total_samples(args.slice);
    let positives = loaded.table.labels().iter().filter(|&&l| l == 1).count();

    if args.json {
        let summary = serde_json::json!({
            "split": split.to_string(),
            "rows": loaded.table.len(),
            "total_samples": total_samples,
            "intoxicated": positives,
            "slice": args.slice,
            "report": loaded.report,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("split:        {}", split);
        println!("rows:         {}", loaded.table.len());
        println!("intoxicated:  {}", positives);
        println!("samples:      {}", total_samples);
        println!("decode time:  {:.2?}", loaded.report.elapsed);
    }

    Ok(())
}

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fathom_core::accumulator::DEFAULT_SPILL_THRESHOLD;
use fathom_core::{build_index, Config};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build the weighted TF-IDF inverted index from an HTML corpus", long_about = None)]
struct Cli {
    /// JSON config holding CORPUS_PATH and INDEX_STORAGE
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Spill the in-memory partial index once its estimated footprint
    /// exceeds this many bytes
    #[arg(long, default_value_t = DEFAULT_SPILL_THRESHOLD)]
    spill_threshold: usize,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let stats = build_index(&config, cli.spill_threshold)?;
    tracing::info!(
        docs_indexed = stats.docs_indexed,
        docs_skipped = stats.docs_skipped,
        partials = stats.partials_written,
        terms = stats.terms,
        "index build complete"
    );
    Ok(())
}

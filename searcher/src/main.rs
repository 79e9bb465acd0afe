use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use fathom_core::{Config, SearchEngine, DEFAULT_TOP_K};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "searcher")]
#[command(about = "Query the inverted index from the terminal", long_about = None)]
struct Cli {
    /// JSON config holding CORPUS_PATH and INDEX_STORAGE
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Results to print per query
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,
}

/// Read queries until an empty line; print the top URLs with timing.
fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let mut engine = SearchEngine::open(&config.index_storage)?;
    tracing::info!(docs = engine.doc_count(), "index loaded");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        write!(stdout, "query> ")?;
        stdout.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            break;
        }

        let start = Instant::now();
        let results = engine.search(query, cli.top_k)?;
        let elapsed = start.elapsed();

        writeln!(stdout, "({:.4} seconds)", elapsed.as_secs_f64())?;
        if results.is_empty() {
            writeln!(stdout, "no results")?;
        }
        for (rank, url) in results.iter().enumerate() {
            writeln!(stdout, "{}: {}", rank + 1, url)?;
        }
        writeln!(stdout)?;
    }
    Ok(())
}

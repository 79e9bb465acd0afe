use std::fs;
use std::path::PathBuf;

use crate::accumulator::PostingAccumulator;
use crate::config::Config;
use crate::error::IndexError;
use crate::merge::merge_partials;
use crate::partial::write_partial;
use crate::paths::StoragePaths;
use crate::postings::DocId;
use crate::registry::{corpus_files, read_corpus_doc, write_urls};
use crate::rewrite::rewrite_with_scores;
use crate::tokenizer::tokenize_html;

/// Summary of one indexing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub docs_indexed: u32,
    pub docs_skipped: u32,
    pub partials_written: u32,
    /// Distinct tokens in the final index.
    pub terms: u64,
}

/// Run the full indexing pipeline: walk the corpus, tokenize and accumulate
/// postings, spill size-bounded partials, merge them, rewrite with TF-IDF
/// scores, and persist the meta-index and URL registry.
///
/// Re-running over an unchanged corpus reproduces every artifact byte for
/// byte. Partial files and the unified pre-scoring index are transient and
/// removed once the final artifacts exist.
pub fn build_index(config: &Config, spill_threshold: usize) -> Result<IndexStats, IndexError> {
    let paths = StoragePaths::new(&config.index_storage);
    fs::create_dir_all(&paths.root)
        .map_err(|source| IndexError::Storage { path: paths.root.clone(), source })?;

    let mut accumulator = PostingAccumulator::new(spill_threshold);
    let mut urls: Vec<String> = Vec::new();
    let mut partials: Vec<PathBuf> = Vec::new();
    let mut skipped: u32 = 0;

    for file in corpus_files(&config.corpus_path) {
        let Some(doc) = read_corpus_doc(&file) else {
            skipped += 1;
            continue;
        };
        let doc_id = urls.len() as DocId;
        let tokens = tokenize_html(&doc.content);
        accumulator.ingest(doc_id, &tokens);
        urls.push(doc.url);
        tracing::debug!(doc_id, tokens = tokens.len(), "indexed document");

        if accumulator.should_flush() {
            let path = paths.partial(partials.len());
            tracing::info!(partial = %path.display(), terms = accumulator.len(), "spilling partial index");
            write_partial(&path, accumulator.drain())?;
            partials.push(path);
        }
    }

    if !accumulator.is_empty() {
        let path = paths.partial(partials.len());
        write_partial(&path, accumulator.drain())?;
        partials.push(path);
    }

    write_urls(&paths.urls(), &urls)?;
    let doc_count = urls.len() as u32;
    tracing::info!(doc_count, skipped, partials = partials.len(), "corpus pass complete");

    let unified = paths.unified();
    let terms = merge_partials(&partials, &unified)?;
    let meta = rewrite_with_scores(&unified, &paths.final_index(), doc_count)?;
    meta.save(&paths.meta_index()).map_err(IndexError::FinalIndexWrite)?;

    for path in &partials {
        fs::remove_file(path)
            .map_err(|source| IndexError::Storage { path: path.clone(), source })?;
    }
    fs::remove_file(&unified)
        .map_err(|source| IndexError::Storage { path: unified.clone(), source })?;

    Ok(IndexStats {
        docs_indexed: doc_count,
        docs_skipped: skipped,
        partials_written: partials.len() as u32,
        terms,
    })
}

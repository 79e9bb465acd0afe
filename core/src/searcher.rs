use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::SearchError;
use crate::meta::{MetaIndex, TokenSpan};
use crate::paths::StoragePaths;
use crate::postings::{DocId, FinalPosting, IndexRecord};
use crate::registry::load_urls;
use crate::tokenizer::tokenize;

/// Number of results a query returns unless the caller asks otherwise.
pub const DEFAULT_TOP_K: usize = 5;

/// Read side of the engine.
///
/// `open` loads the meta-index and URL registry once and keeps a handle on
/// the final index; all of it is immutable afterwards. Each query costs one
/// seek plus one bounded read per term present in the index, never a scan.
/// Parallel querying wants one `SearchEngine` per thread, each with its own
/// file handle.
pub struct SearchEngine {
    index: File,
    meta: MetaIndex,
    urls: Vec<String>,
}

impl SearchEngine {
    /// Load query-time state from the index storage directory.
    pub fn open<P: AsRef<Path>>(storage: P) -> Result<Self, SearchError> {
        let paths = StoragePaths::new(storage);
        let index_path = paths.final_index();
        let index = File::open(&index_path)
            .map_err(|source| SearchError::FinalIndexOpen { path: index_path, source })?;
        let meta = MetaIndex::load(&paths.meta_index())?;
        let urls = load_urls(&paths.urls())?;
        Ok(Self { index, meta, urls })
    }

    pub fn doc_count(&self) -> usize {
        self.urls.len()
    }

    /// Top-`k` document URLs for a free-text query, best first.
    ///
    /// Query terms are deduplicated; terms missing from the index contribute
    /// nothing, and an empty or fully-missing query yields an empty list.
    /// Ties in score break toward the lower doc id. Terms are processed in
    /// sorted order, so the result is invariant under permutation of the
    /// query words.
    pub fn search(&mut self, query: &str, k: usize) -> Result<Vec<String>, SearchError> {
        let mut terms: Vec<String> = tokenize(query).into_iter().map(|(stem, _)| stem).collect();
        terms.sort();
        terms.dedup();

        let mut scores: HashMap<DocId, f64> = HashMap::new();
        for term in &terms {
            let Some(span) = self.meta.get(term) else { continue };
            let record = self.read_record(term, span)?;
            for posting in record.postings {
                *scores.entry(posting.doc_id).or_insert(0.0) += posting.tf_idf;
            }
        }

        let mut ranked: Vec<(DocId, f64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0))
        });
        ranked.truncate(k);

        Ok(ranked
            .into_iter()
            .filter_map(|(doc_id, _)| self.urls.get(doc_id as usize).cloned())
            .collect())
    }

    fn read_record(
        &mut self,
        token: &str,
        span: TokenSpan,
    ) -> Result<IndexRecord<FinalPosting>, SearchError> {
        self.index.seek(SeekFrom::Start(span.offset))?;
        let mut buf = vec![0u8; span.length as usize];
        self.index.read_exact(&mut buf)?;
        let corrupt = || SearchError::Corrupt { token: token.to_string() };
        let line = std::str::from_utf8(&buf).map_err(|_| corrupt())?;
        IndexRecord::from_json_line(line).map_err(|_| corrupt())
    }
}

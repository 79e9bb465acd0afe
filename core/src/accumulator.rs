use std::collections::BTreeMap;
use std::mem;

use crate::postings::{BuildPosting, DocId};

/// Default spill threshold: 256 MiB of estimated heap.
pub const DEFAULT_SPILL_THRESHOLD: usize = 256 * 1024 * 1024;

// Rough per-entry heap costs behind the spill estimate. TOKEN_OVERHEAD
// covers the String header, map node, and posting-vec header for a new term.
const TOKEN_OVERHEAD: usize = 64;
const POSTING_SIZE: usize = mem::size_of::<BuildPosting>();

/// In-memory partial inverted index: `token -> postings`, tokens kept
/// sorted.
///
/// Documents must be ingested in non-decreasing doc-id order; each posting
/// list is then sorted by construction and a doc id never appears twice in
/// one list.
pub struct PostingAccumulator {
    map: BTreeMap<String, Vec<BuildPosting>>,
    estimated_bytes: usize,
    threshold: usize,
    last_doc: Option<DocId>,
}

impl PostingAccumulator {
    pub fn new(threshold: usize) -> Self {
        Self { map: BTreeMap::new(), estimated_bytes: 0, threshold, last_doc: None }
    }

    /// Fold one document's token stream in: for every `(token, weight)`
    /// occurrence, tf rises by one and importance by the occurrence weight.
    pub fn ingest(&mut self, doc_id: DocId, tokens: &[(String, u32)]) {
        debug_assert!(self.last_doc.map_or(true, |last| last <= doc_id));
        self.last_doc = Some(doc_id);
        for (token, weight) in tokens {
            match self.map.get_mut(token) {
                Some(list) => match list.last_mut() {
                    Some(last) if last.doc_id == doc_id => {
                        last.tf += 1;
                        last.importance += weight;
                    }
                    _ => {
                        list.push(BuildPosting { doc_id, tf: 1, importance: *weight });
                        self.estimated_bytes += POSTING_SIZE;
                    }
                },
                None => {
                    let posting = BuildPosting { doc_id, tf: 1, importance: *weight };
                    self.estimated_bytes += token.len() + TOKEN_OVERHEAD + POSTING_SIZE;
                    self.map.insert(token.clone(), vec![posting]);
                }
            }
        }
    }

    /// True once the estimated footprint exceeds the configured threshold.
    pub fn should_flush(&self) -> bool {
        self.estimated_bytes > self.threshold
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of distinct tokens currently held.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Hand the accumulated state over and reset to empty. Doc ids keep
    /// rising across drains, so later partials cover strictly later ranges.
    pub fn drain(&mut self) -> BTreeMap<String, Vec<BuildPosting>> {
        self.estimated_bytes = 0;
        mem::take(&mut self.map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize_html;

    #[test]
    fn sums_tf_and_importance_per_document() {
        let mut acc = PostingAccumulator::new(DEFAULT_SPILL_THRESHOLD);
        acc.ingest(0, &tokenize_html("<title>Cats</title><p>cat cat dog</p>"));
        acc.ingest(1, &tokenize_html("<p>dog dog dog</p>"));

        let map = acc.drain();
        assert_eq!(map["cat"], vec![BuildPosting { doc_id: 0, tf: 3, importance: 12 }]);
        assert_eq!(
            map["dog"],
            vec![
                BuildPosting { doc_id: 0, tf: 1, importance: 1 },
                BuildPosting { doc_id: 1, tf: 3, importance: 3 },
            ]
        );
    }

    #[test]
    fn posting_lists_stay_sorted_by_doc_id() {
        let mut acc = PostingAccumulator::new(DEFAULT_SPILL_THRESHOLD);
        for doc_id in 0..5 {
            acc.ingest(doc_id, &[("term".to_string(), 1)]);
        }
        let map = acc.drain();
        let ids: Vec<u32> = map["term"].iter().map(|p| p.doc_id).collect();
        assert_eq!(ids, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn flush_fires_once_threshold_is_crossed() {
        let mut acc = PostingAccumulator::new(1);
        assert!(!acc.should_flush());
        acc.ingest(0, &[("term".to_string(), 1)]);
        assert!(acc.should_flush());
        acc.drain();
        assert!(!acc.should_flush());
        assert!(acc.is_empty());
    }
}

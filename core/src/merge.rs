use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::IndexError;
use crate::partial::PartialReader;
use crate::postings::{BuildPosting, IndexRecord};

/// k-way streaming merge of sorted partial files into one sorted unified
/// file. Returns the number of distinct tokens written.
///
/// A min-heap keyed on `(token, partial id)` tracks the head record of every
/// partial; equal tokens pop in ascending partial order. Partials cover
/// disjoint, ascending doc-id ranges, so concatenating their lists in that
/// order keeps the merged posting list sorted by doc id. Only one record per
/// partial is in memory at any point.
pub fn merge_partials(partials: &[PathBuf], unified: &Path) -> Result<u64, IndexError> {
    let mut readers = Vec::with_capacity(partials.len());
    for path in partials {
        readers.push(PartialReader::open(path)?);
    }

    let mut heap: BinaryHeap<Reverse<(String, usize)>> = BinaryHeap::new();
    let mut current: Vec<Option<IndexRecord<BuildPosting>>> = vec![None; readers.len()];
    for (id, reader) in readers.iter_mut().enumerate() {
        if let Some(record) = reader.next_record()? {
            heap.push(Reverse((record.token.clone(), id)));
            current[id] = Some(record);
        }
    }

    let file = File::create(unified).map_err(IndexError::MergeIo)?;
    let mut out = BufWriter::new(file);
    let mut written: u64 = 0;

    while let Some(Reverse((token, id))) = heap.pop() {
        let mut record = current[id].take().expect("heap entry backed by a record");
        if let Some(next) = readers[id].next_record()? {
            heap.push(Reverse((next.token.clone(), id)));
            current[id] = Some(next);
        }

        // Pull every other partial holding the same token.
        while matches!(heap.peek(), Some(Reverse((t, _))) if *t == token) {
            let Reverse((_, other)) = heap.pop().expect("peeked above");
            let more = current[other].take().expect("heap entry backed by a record");
            record.postings.extend(more.postings);
            if let Some(next) = readers[other].next_record()? {
                heap.push(Reverse((next.token.clone(), other)));
                current[other] = Some(next);
            }
        }

        let line = record.to_json_line().map_err(io::Error::from).map_err(IndexError::MergeIo)?;
        out.write_all(line.as_bytes()).map_err(IndexError::MergeIo)?;
        out.write_all(b"\n").map_err(IndexError::MergeIo)?;
        written += 1;
    }
    out.flush().map_err(IndexError::MergeIo)?;
    Ok(written)
}

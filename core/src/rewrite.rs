use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::IndexError;
use crate::meta::MetaIndex;
use crate::postings::{BuildPosting, FinalPosting, IndexRecord};

/// Stream the unified index one record at a time, replace construction
/// stats with weighted TF-IDF scores, and capture every token's byte range
/// while the final index is written.
///
/// For each record: `df` is the posting-list length, `idf = log10(N / df)`
/// (exactly zero when df == N; the record is still emitted), and each
/// posting becomes `importance * (1 + log10(tf)) * idf`.
pub fn rewrite_with_scores(
    unified: &Path,
    final_index: &Path,
    doc_count: u32,
) -> Result<MetaIndex, IndexError> {
    let input = File::open(unified).map_err(IndexError::FinalIndexWrite)?;
    let output = File::create(final_index).map_err(IndexError::FinalIndexWrite)?;
    let mut out = BufWriter::new(output);
    let mut meta = MetaIndex::new();
    let mut offset: u64 = 0;

    for line in BufReader::new(input).lines() {
        let line = line.map_err(IndexError::FinalIndexWrite)?;
        let record: IndexRecord<BuildPosting> =
            IndexRecord::from_json_line(&line).map_err(|e| IndexError::MergeInputMalformed {
                path: unified.to_path_buf(),
                reason: e.to_string(),
            })?;

        let df = record.postings.len() as u32;
        let idf = (f64::from(doc_count) / f64::from(df)).log10();
        let postings = record
            .postings
            .iter()
            .map(|p| FinalPosting {
                doc_id: p.doc_id,
                tf_idf: f64::from(p.importance) * (1.0 + f64::from(p.tf).log10()) * idf,
            })
            .collect();

        let scored = IndexRecord { token: record.token, postings };
        let line = scored.to_json_line().map_err(io::Error::from).map_err(IndexError::FinalIndexWrite)?;
        out.write_all(line.as_bytes()).map_err(IndexError::FinalIndexWrite)?;
        out.write_all(b"\n").map_err(IndexError::FinalIndexWrite)?;
        meta.insert(scored.token, offset, line.len() as u32);
        offset += line.len() as u64 + 1;
    }
    out.flush().map_err(IndexError::FinalIndexWrite)?;

    tracing::info!(tokens = meta.len(), doc_count, "final index written");
    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;

    use crate::partial::write_partial;

    fn unified_from(entries: &[(&str, Vec<BuildPosting>)], dir: &Path) -> std::path::PathBuf {
        // A single sorted partial already has the unified shape.
        let path = dir.join("unified.jsonl");
        let mut map = BTreeMap::new();
        for (token, postings) in entries {
            map.insert(token.to_string(), postings.clone());
        }
        write_partial(&path, map).unwrap();
        path
    }

    #[test]
    fn scores_match_the_formula() {
        let dir = tempfile::tempdir().unwrap();
        let unified = unified_from(
            &[
                ("cat", vec![BuildPosting { doc_id: 0, tf: 3, importance: 12 }]),
                (
                    "dog",
                    vec![
                        BuildPosting { doc_id: 0, tf: 1, importance: 1 },
                        BuildPosting { doc_id: 1, tf: 3, importance: 3 },
                    ],
                ),
            ],
            dir.path(),
        );
        let final_index = dir.path().join("index.jsonl");
        let meta = rewrite_with_scores(&unified, &final_index, 2).unwrap();
        assert_eq!(meta.len(), 2);

        let text = fs::read_to_string(&final_index).unwrap();
        let records: Vec<IndexRecord<FinalPosting>> =
            text.lines().map(|l| IndexRecord::from_json_line(l).unwrap()).collect();

        let expected_cat = 12.0 * (1.0 + 3f64.log10()) * 2f64.log10();
        assert!((records[0].postings[0].tf_idf - expected_cat).abs() < 1e-9);

        // df == N: idf collapses to zero but the postings stay in the index.
        assert_eq!(records[1].postings.len(), 2);
        assert_eq!(records[1].postings[0].tf_idf, 0.0);
        assert_eq!(records[1].postings[1].tf_idf, 0.0);
    }

    #[test]
    fn meta_spans_address_exact_lines() {
        let dir = tempfile::tempdir().unwrap();
        let unified = unified_from(
            &[
                ("alpha", vec![BuildPosting { doc_id: 0, tf: 1, importance: 1 }]),
                ("beta", vec![BuildPosting { doc_id: 1, tf: 2, importance: 4 }]),
            ],
            dir.path(),
        );
        let final_index = dir.path().join("index.jsonl");
        let meta = rewrite_with_scores(&unified, &final_index, 3).unwrap();

        let bytes = fs::read(&final_index).unwrap();
        for (token, span) in meta.iter() {
            let start = span.offset as usize;
            let end = start + span.length as usize;
            let record =
                IndexRecord::<FinalPosting>::from_json_line(
                    std::str::from_utf8(&bytes[start..end]).unwrap(),
                )
                .unwrap();
            assert_eq!(record.token, token);
        }
    }
}

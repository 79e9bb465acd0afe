use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::IndexError;
use crate::postings::{BuildPosting, IndexRecord};

/// Serialize one drained accumulator snapshot as a line-delimited partial
/// file: one token-sorted record per line, parseable a line at a time.
pub fn write_partial(
    path: &Path,
    entries: BTreeMap<String, Vec<BuildPosting>>,
) -> Result<(), IndexError> {
    let spill = |source: io::Error| IndexError::Spill { path: path.to_path_buf(), source };
    let file = File::create(path).map_err(spill)?;
    let mut out = BufWriter::new(file);
    for (token, postings) in entries {
        let record = IndexRecord { token, postings };
        let line = record.to_json_line().map_err(io::Error::from).map_err(spill)?;
        out.write_all(line.as_bytes()).map_err(spill)?;
        out.write_all(b"\n").map_err(spill)?;
    }
    out.flush().map_err(spill)?;
    Ok(())
}

/// Streams records off one partial file, a line at a time. The merger holds
/// one of these per partial, so only one record per file is ever in memory.
pub struct PartialReader {
    path: PathBuf,
    lines: io::Lines<BufReader<File>>,
}

impl PartialReader {
    pub fn open(path: &Path) -> Result<Self, IndexError> {
        let file = File::open(path).map_err(IndexError::MergeIo)?;
        Ok(Self { path: path.to_path_buf(), lines: BufReader::new(file).lines() })
    }

    /// Next record, or `None` at end of file. A line that does not parse as
    /// a single-token record makes the whole merge fatal.
    pub fn next_record(&mut self) -> Result<Option<IndexRecord<BuildPosting>>, IndexError> {
        match self.lines.next() {
            None => Ok(None),
            Some(Err(source)) => Err(IndexError::MergeIo(source)),
            Some(Ok(line)) => IndexRecord::from_json_line(&line).map(Some).map_err(|e| {
                IndexError::MergeInputMalformed { path: self.path.clone(), reason: e.to_string() }
            }),
        }
    }
}

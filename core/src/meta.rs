use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Byte range of one token's record inside the final index file. `offset`
/// is the first byte of the line; `length` excludes the trailing newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpan {
    pub offset: u64,
    pub length: u32,
}

/// Sparse index over the final index file: token to the byte range of its
/// line. Built during the rewrite pass, fully loaded at query time so a
/// lookup costs one seek and one bounded read, never a scan.
///
/// The ordered map keeps the bincode dump byte-stable across identical runs.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaIndex {
    spans: BTreeMap<String, TokenSpan>,
}

impl MetaIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: String, offset: u64, length: u32) {
        self.spans.insert(token, TokenSpan { offset, length });
    }

    pub fn get(&self, token: &str) -> Option<TokenSpan> {
        self.spans.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TokenSpan)> {
        self.spans.iter().map(|(token, span)| (token.as_str(), *span))
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        bincode::serialize_into(BufWriter::new(file), self).map_err(io::Error::other)
    }

    pub fn load(path: &Path) -> Result<Self, SearchError> {
        let fail = |source: bincode::Error| SearchError::MetaIndexLoad {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path)
            .map_err(|e| fail(Box::new(bincode::ErrorKind::Io(e))))?;
        bincode::deserialize_from(BufReader::new(file)).map_err(fail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta_index.bin");

        let mut meta = MetaIndex::new();
        meta.insert("cat".to_string(), 0, 57);
        meta.insert("dog".to_string(), 58, 91);
        meta.save(&path).unwrap();

        let loaded = MetaIndex::load(&path).unwrap();
        assert_eq!(loaded, meta);
        assert_eq!(loaded.get("cat"), Some(TokenSpan { offset: 0, length: 57 }));
        assert_eq!(loaded.get("missing"), None);
    }

    #[test]
    fn missing_file_is_a_structured_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MetaIndex::load(&dir.path().join("meta_index.bin")).unwrap_err();
        assert!(matches!(err, SearchError::MetaIndexLoad { .. }));
    }
}

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::{IndexError, SearchError};

/// One corpus item: `{ "url": ..., "content": raw html }`.
#[derive(Debug, Deserialize)]
pub struct CorpusDoc {
    pub url: String,
    pub content: String,
}

/// Deterministic traversal of the corpus directory: sorted walk, `.json`
/// files only. Subdirectory names are advisory and carry no meaning for
/// doc-id assignment beyond their place in the sort order.
pub fn corpus_files(corpus: &Path) -> Vec<PathBuf> {
    WalkDir::new(corpus)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect()
}

/// Parse one corpus file. `None` means the item is malformed and is skipped
/// without consuming a doc id.
pub fn read_corpus_doc(path: &Path) -> Option<CorpusDoc> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "skipping unreadable corpus file");
            return None;
        }
    };
    match serde_json::from_reader(BufReader::new(file)) {
        Ok(doc) => Some(doc),
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "skipping malformed corpus file");
            None
        }
    }
}

/// Persist the doc-id to URL map: line `k` (1-indexed) holds the URL of doc
/// `k - 1`.
pub fn write_urls(path: &Path, urls: &[String]) -> Result<(), IndexError> {
    let fail = |source| IndexError::UrlRegistryWrite { path: path.to_path_buf(), source };
    let file = File::create(path).map_err(fail)?;
    let mut out = BufWriter::new(file);
    for url in urls {
        out.write_all(url.as_bytes()).map_err(fail)?;
        out.write_all(b"\n").map_err(fail)?;
    }
    out.flush().map_err(fail)?;
    Ok(())
}

/// Load the URL registry into memory for query-time doc-id resolution.
pub fn load_urls(path: &Path) -> Result<Vec<String>, SearchError> {
    let fail = |source| SearchError::UrlRegistryLoad { path: path.to_path_buf(), source };
    let file = File::open(path).map_err(fail)?;
    BufReader::new(file)
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(fail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn walk_is_sorted_and_json_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("b.com")).unwrap();
        fs::create_dir(dir.path().join("a.com")).unwrap();
        fs::write(dir.path().join("b.com/2.json"), "{}").unwrap();
        fs::write(dir.path().join("a.com/9.json"), "{}").unwrap();
        fs::write(dir.path().join("a.com/1.json"), "{}").unwrap();
        fs::write(dir.path().join("a.com/readme.txt"), "ignored").unwrap();

        let names: Vec<String> = corpus_files(dir.path())
            .iter()
            .map(|p| {
                p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/")
            })
            .collect();
        assert_eq!(names, ["a.com/1.json", "a.com/9.json", "b.com/2.json"]);
    }

    #[test]
    fn malformed_items_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        fs::write(&good, r#"{"url": "https://a/", "content": "<p>hi</p>"}"#).unwrap();
        fs::write(&bad, r#"{"url": "https://b/"}"#).unwrap();

        assert_eq!(read_corpus_doc(&good).unwrap().url, "https://a/");
        assert!(read_corpus_doc(&bad).is_none());
        assert!(read_corpus_doc(&dir.path().join("absent.json")).is_none());
    }

    #[test]
    fn url_registry_round_trips_by_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        let urls = vec!["https://a/".to_string(), "https://b/".to_string()];
        write_urls(&path, &urls).unwrap();
        assert_eq!(load_urls(&path).unwrap(), urls);
    }
}

use std::path::{Path, PathBuf};

/// Locations of every artifact inside the index storage directory.
///
/// `partial_*.jsonl` and `unified.jsonl` exist only while a build is
/// running; the other three are the long-lived query-time artifacts.
pub struct StoragePaths {
    pub root: PathBuf,
}

impl StoragePaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn final_index(&self) -> PathBuf {
        self.root.join("index.jsonl")
    }

    pub fn meta_index(&self) -> PathBuf {
        self.root.join("meta_index.bin")
    }

    pub fn urls(&self) -> PathBuf {
        self.root.join("urls.txt")
    }

    pub fn partial(&self, seq: usize) -> PathBuf {
        self.root.join(format!("partial_{seq}.jsonl"))
    }

    pub fn unified(&self) -> PathBuf {
        self.root.join("unified.jsonl")
    }
}

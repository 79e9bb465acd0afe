use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Engine configuration: where the corpus lives and where index artifacts
/// are written and later read. The on-disk form is a JSON object with
/// exactly these two keys.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "CORPUS_PATH")]
    pub corpus_path: PathBuf,
    #[serde(rename = "INDEX_STORAGE")]
    pub index_storage: PathBuf,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

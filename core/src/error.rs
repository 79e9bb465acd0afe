use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures of the indexing pipeline.
///
/// Malformed corpus items are not represented here: the registry logs and
/// skips them without consuming a doc id.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("failed to prepare index storage at {}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to spill partial index {}", path.display())]
    Spill {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed record in partial index {}: {reason}", path.display())]
    MergeInputMalformed { path: PathBuf, reason: String },

    #[error("i/o failure while merging partial indexes")]
    MergeIo(#[source] io::Error),

    #[error("failed to write final index")]
    FinalIndexWrite(#[source] io::Error),

    #[error("failed to write url registry {}", path.display())]
    UrlRegistryWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Query-engine failures: structured startup errors plus artifact i/o.
///
/// A query term missing from the index is not an error; it contributes
/// nothing to the scores.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("failed to load meta-index {}", path.display())]
    MetaIndexLoad {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("failed to open final index {}", path.display())]
    FinalIndexOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to load url registry {}", path.display())]
    UrlRegistryLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("i/o failure reading the final index")]
    Io(#[from] io::Error),

    #[error("corrupt posting record for token {token:?}")]
    Corrupt { token: String },
}

/// Problems with the engine configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to create cache directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cache I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("cache record encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

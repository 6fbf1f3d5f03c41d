use std::path::PathBuf;

use thiserror::Error;

use crate::feed::FeedError;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("no cache file at {}", .0.display())]
    Missing(PathBuf),

    #[error("cache i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A present but unreadable cache is fatal. Deleting the file and
    /// re-seeding with `update-cache` is the recovery path.
    #[error("cache file is corrupt, delete it to rebuild: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("cannot read genre list: {0}")]
    GenreList(std::io::Error),
}

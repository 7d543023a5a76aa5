//! Collection storage.
//!
//! Every call reads or rewrites the whole collection; there is no cache and
//! no locking between concurrent requests.

pub mod json_file;

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::Todo;

pub use json_file::JsonFileStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize todos: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to rename '{from}' -> '{to}': {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// How a full-collection write reaches the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Truncate and rewrite the target file in place.
    #[default]
    Overwrite,
    /// Write a sibling `.tmp` file, then rename it over the target.
    AtomicRename,
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Loads the whole collection in stored order.
    async fn read_all(&self) -> StorageResult<Vec<Todo>>;

    /// Replaces the stored collection with `todos`.
    async fn write_all(&self, todos: &[Todo]) -> StorageResult<()>;
}

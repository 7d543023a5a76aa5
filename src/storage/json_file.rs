use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{StorageError, StorageResult, TodoStore, WriteMode};
use crate::models::Todo;

/// Collection stored as one pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    write_mode: WriteMode,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_mode: WriteMode::default(),
        }
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }
}

#[async_trait]
impl TodoStore for JsonFileStore {
    async fn read_all(&self) -> StorageResult<Vec<Todo>> {
        let bytes = fs::read(&self.path).await.map_err(|source| StorageError::Read {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_slice(&bytes).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    async fn write_all(&self, todos: &[Todo]) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(todos).map_err(StorageError::Serialize)?;

        match self.write_mode {
            WriteMode::Overwrite => overwrite(&self.path, &bytes).await,
            WriteMode::AtomicRename => atomic_write(&self.path, &bytes).await,
        }
    }
}

async fn overwrite(path: &Path, bytes: &[u8]) -> StorageResult<()> {
    fs::write(path, bytes)
        .await
        .map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })
}

async fn atomic_write(path: &Path, bytes: &[u8]) -> StorageResult<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)
        .await
        .map_err(|source| StorageError::Write {
            path: tmp.clone(),
            source,
        })?;

    fs::rename(&tmp, path)
        .await
        .map_err(|source| StorageError::Rename {
            from: tmp.clone(),
            to: path.to_path_buf(),
            source,
        })
}

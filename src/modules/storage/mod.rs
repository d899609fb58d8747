//! Storage module for the product collection
//!
//! The collection is always read and written as one whole JSON document.
//! A [`BlobBackend`] only knows how to fetch and replace that document;
//! two backends exist:
//!
//! - [`FileBlob`]: a JSON file on disk, replaced through a temp file + rename
//! - [`LocalStorageBlob`]: one entry under a fixed key in a process-local
//!   key/value store, the server-side counterpart of browser local storage

mod file_blob;
mod local_storage;

use async_trait::async_trait;
use thiserror::Error;

pub use file_blob::FileBlob;
pub use local_storage::{LocalStorage, LocalStorageBlob};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid collection document: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Whole-document read/write primitive
#[async_trait]
pub trait BlobBackend: Send + Sync {
    /// Current document, `None` when nothing has been written yet
    async fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replace the document
    async fn write(&self, contents: String) -> Result<(), StorageError>;

    /// Whether the document should be pretty-printed
    fn pretty(&self) -> bool {
        false
    }

    /// Human-readable location, used in logs
    fn describe(&self) -> String;
}

//! JSON file backend
//!
//! Writes go to `<path>.tmp` first and are renamed over the target, so a
//! failed write leaves the previous document untouched.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::{BlobBackend, StorageError};

pub struct FileBlob {
    path: PathBuf,
}

impl FileBlob {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl BlobBackend for FileBlob {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Data file {} does not exist yet", self.path.display());
                Ok(None)
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    async fn write(&self, contents: String) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, contents)
            .await
            .map_err(|e| self.io_error(e))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn pretty(&self) -> bool {
        true
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let blob = FileBlob::new(dir.path().join("data.json"));

        assert_eq!(blob.read().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let blob = FileBlob::new(dir.path().join("nested").join("data.json"));

        blob.write("[]".to_string()).await.unwrap();

        assert_eq!(blob.read().await.unwrap().as_deref(), Some("[]"));
        assert!(!dir.path().join("nested").join("data.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_write_replaces_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let blob = FileBlob::new(dir.path().join("data.json"));

        blob.write("[1]".to_string()).await.unwrap();
        blob.write("[2]".to_string()).await.unwrap();

        assert_eq!(blob.read().await.unwrap().as_deref(), Some("[2]"));
    }

    #[tokio::test]
    async fn test_tmp_path_differs_from_target_with_tmp_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.tmp");
        let blob = FileBlob::new(&path);

        assert_eq!(blob.tmp_path(), dir.path().join("data.tmp.tmp"));

        blob.write("[1]".to_string()).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1]");
        assert!(!blob.tmp_path().exists());
    }

    #[tokio::test]
    async fn test_read_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blob = FileBlob::new(dir.path());

        let err = blob.read().await.unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{FileAcquisition, FileAcquisitionError};
use crate::domain::{FileDescriptor, FileHandle};

/// Uploaded files kept on local disk, addressed by their [`FileHandle`].
pub struct LocalFileStore {
    inner: Arc<LocalFileSystem>,
}

impl LocalFileStore {
    pub fn new(base_path: PathBuf) -> Result<Self, FileAcquisitionError> {
        std::fs::create_dir_all(&base_path)?;
        let fs = LocalFileSystem::new_with_prefix(base_path)
            .map_err(|e| FileAcquisitionError::DownloadFailed(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
        })
    }

    pub async fn put(
        &self,
        handle: &FileHandle,
        bytes: Bytes,
    ) -> Result<u64, FileAcquisitionError> {
        let size = bytes.len() as u64;
        self.inner
            .put(&store_path(handle), PutPayload::from(bytes))
            .await
            .map_err(|e| FileAcquisitionError::DownloadFailed(e.to_string()))?;
        Ok(size)
    }

    pub async fn delete(&self, handle: &FileHandle) -> Result<(), FileAcquisitionError> {
        self.inner
            .delete(&store_path(handle))
            .await
            .map_err(|e| map_store_error(handle, e))
    }

    pub async fn get(&self, handle: &FileHandle) -> Result<Bytes, FileAcquisitionError> {
        let result = self
            .inner
            .get(&store_path(handle))
            .await
            .map_err(|e| map_store_error(handle, e))?;

        result
            .bytes()
            .await
            .map_err(|e| FileAcquisitionError::DownloadFailed(e.to_string()))
    }

    pub async fn head(&self, handle: &FileHandle) -> Result<u64, FileAcquisitionError> {
        let meta = self
            .inner
            .head(&store_path(handle))
            .await
            .map_err(|e| map_store_error(handle, e))?;
        Ok(meta.size as u64)
    }
}

#[async_trait]
impl FileAcquisition for LocalFileStore {
    async fn acquire(&self, descriptor: &FileDescriptor) -> Result<Bytes, FileAcquisitionError> {
        self.get(&descriptor.id).await
    }
}

fn store_path(handle: &FileHandle) -> StorePath {
    StorePath::from(handle.as_str())
}

fn map_store_error(handle: &FileHandle, error: object_store::Error) -> FileAcquisitionError {
    match error {
        object_store::Error::NotFound { .. } => FileAcquisitionError::NotFound(handle.to_string()),
        other => FileAcquisitionError::DownloadFailed(other.to_string()),
    }
}

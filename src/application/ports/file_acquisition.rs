use std::io;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::FileDescriptor;

#[async_trait]
pub trait FileAcquisition: Send + Sync {
    async fn acquire(&self, descriptor: &FileDescriptor) -> Result<Bytes, FileAcquisitionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FileAcquisitionError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

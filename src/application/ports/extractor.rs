use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::{AttemptOutcome, Deadline, ExtractionStage};

/// Uploaded file materialized on local disk for the duration of one extraction.
/// The backing temp file is owned by the orchestrator, not by this value.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub path: PathBuf,
    pub bytes: Bytes,
    pub extension: String,
}

impl StagedFile {
    pub fn byte_size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[async_trait]
pub trait Extractor: Send + Sync {
    fn stage(&self) -> ExtractionStage;

    async fn attempt(&self, file: &StagedFile, deadline: Deadline) -> AttemptOutcome;
}
